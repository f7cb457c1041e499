// ABOUTME: Library module for seren-mysqldump
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod client;
pub mod commands;
pub mod config;
pub mod dump;
pub mod error;
pub mod filters;
pub mod mysql;
pub mod utils;

pub use client::{Client, Row, ServerInfo};
pub use config::{DumpConfig, EventKind};
pub use error::{DatabaseError, DumpError};
