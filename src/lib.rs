pub mod config;
pub mod errors;

pub mod database;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
