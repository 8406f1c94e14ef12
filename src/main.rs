use clap::Parser;

use grix_adapters::cli::{Cli, Command};
use grix_adapters::config::AdapterSettings;
use grix_adapters::conformance::{self, HarnessOptions};
use grix_adapters::{docs, list_adapters, scaffold, telemetry, validate};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.global.verbose);

    match cli.command {
        Command::List => list_adapters::run(),
        Command::CheckStructure {
            root,
            changed_files,
            all,
        } => validate::run(&root, changed_files.as_deref(), all),
        Command::Conformance {
            adapter,
            require_non_empty,
            lenient,
            allow_unimplemented,
        } => {
            let settings = AdapterSettings::from_cli(&cli.global)?;
            let options = HarnessOptions {
                strict: !lenient,
                require_non_empty,
                allow_unimplemented,
            };
            conformance::run(&adapter, &settings, &options)
        }
        Command::Scaffold {
            name,
            root,
            features,
            force,
        } => scaffold::run(&root, name, features, force),
        Command::Docs { adapter, root } => docs::run(&root, &adapter),
    }
}
