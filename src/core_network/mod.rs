pub mod connection;
pub mod host;
pub mod manager;
