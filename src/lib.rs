// Campus Explorer - builds dataset queries from a query form and sends them
// This is the library root that exposes the public API

pub mod client;
pub mod error;
pub mod form;
pub mod logging;
pub mod query;

// Re-export commonly used types for convenience
pub use client::{ClientConfig, QueryResponse, QuerySender};
pub use error::{QueryError, SendError};
pub use form::{Dataset, FormState, LogicConnector};
pub use query::{Query, QueryBuilder};
