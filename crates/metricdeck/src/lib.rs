//! Top-level facade crate for metricdeck.
//!
//! Re-exports the domain model and the server library so users can depend on
//! a single crate.

pub mod core {
    pub use metricdeck_core::*;
}

pub mod server {
    pub use metricdeck_server::*;
}
