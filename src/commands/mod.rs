// ABOUTME: Command implementations for the CLI
// ABOUTME: Exports export, import, repair and optimize commands

pub mod export;
pub mod import;
pub mod maintenance;

pub use export::export;
pub use import::import;
pub use maintenance::{optimize, repair};
