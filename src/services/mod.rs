pub mod vtable_service;
pub mod vtable_types;

pub use vtable_service::*;
pub use vtable_types::*;
