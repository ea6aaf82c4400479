// Client module - sends built queries to the query endpoint
pub mod config;
pub mod response;
pub mod sender;

pub use config::ClientConfig;
pub use response::QueryResponse;
pub use sender::QuerySender;
