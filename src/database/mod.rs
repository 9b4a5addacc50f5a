pub mod column_options;
pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repository;
pub mod seed_data;

#[cfg(test)]
pub mod test_utils;

pub use column_options::*;
pub use connection::*;
pub use repository::*;
