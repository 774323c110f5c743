pub mod schema;
pub mod domain;
pub mod scoring;
pub mod error;
pub mod utilities;
pub mod mock;

pub use error::EntityError;
