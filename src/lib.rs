pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod query;
pub mod session;
pub mod store;
