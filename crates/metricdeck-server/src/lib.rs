//! metricdeck server library entry.
//!
//! Wires configuration, SQLite storage, the unit-of-work and persistence
//! registry, seed loaders, application services and the HTTP transport into
//! one stack. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod db;
pub mod loaders;
pub mod logging;
pub mod ops;
pub mod persistence;
pub mod query_gen;
pub mod router;
pub mod services;
pub mod transport;
pub mod uow;
