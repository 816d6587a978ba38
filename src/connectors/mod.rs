pub mod connection;
pub mod http;
pub mod sqlite;
