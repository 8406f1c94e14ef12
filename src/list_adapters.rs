use crate::registry;

/// Print every registered adapter with its kind, export and operations.
pub fn run() -> anyhow::Result<()> {
    let manifests = registry::manifests();
    println!("Registered adapters");
    println!("===================");
    for m in &manifests {
        println!();
        println!("{} ({})", m.name, m.kind);
        println!("   export:     {}", m.export);
        println!("   operations: {}", m.operations.join(", "));
        println!("   test params: {}", m.test_params);
    }
    println!();
    println!("{} adapters", manifests.len());
    Ok(())
}
