pub mod catalog;
pub mod schema;
pub mod source;
