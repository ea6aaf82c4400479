// Query module - the query object and how it is built from the form
pub mod ast;
pub mod builder;

pub use ast::Query;
pub use builder::QueryBuilder;

use crate::error::QueryError;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a prewritten query object from a JSON file
/// Key order is kept as written, so the query is sent verbatim
pub fn load_raw<P: AsRef<Path>>(path: P) -> Result<Value, QueryError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
