//! Persistence registry and unit of work.
//!
//! The registry maps a capability (a persistence trait object type) to a
//! typed constructor. A unit of work owns one storage session and hands out
//! fresh capability instances bound to it.

pub mod registry;
pub mod unit_of_work;

pub use registry::{Capability, Factory, PersistenceRegistry};
pub use unit_of_work::{Session, UnitOfWork, UnitOfWorkFactory};
