pub mod commands;
pub mod shell;

pub use commands::*;
