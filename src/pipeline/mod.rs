//! Pipeline module - schema validation, classification and report assembly

pub mod aliases;
pub mod assembler;
pub mod classifier;
pub mod error;
pub mod geo;
pub mod loader;
pub mod recommendations;
pub mod risk;
pub mod schema;
pub mod validator;

pub use aliases::*;
pub use assembler::*;
pub use classifier::*;
pub use error::*;
pub use geo::*;
pub use loader::*;
pub use recommendations::*;
pub use risk::*;
pub use schema::*;
pub use validator::*;
