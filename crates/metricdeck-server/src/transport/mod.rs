//! HTTP transport: request handlers, wire contracts, and error responses.

pub mod contracts;
pub mod error;
pub mod handlers;
