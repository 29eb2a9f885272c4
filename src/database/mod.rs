//! # Database
//!
//! Connection pool management and embedded migrations.

pub mod connection;

pub use connection::DatabaseConnection;
