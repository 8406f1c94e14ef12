pub mod hyperliquid;
pub mod lode;
pub mod template;
