pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod store;

pub use error::{EngineError, Result};
