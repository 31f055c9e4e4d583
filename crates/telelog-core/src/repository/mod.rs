//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (telelog-infra) implements. Each call is one unit of work: it commits or
//! fails independently, and no transaction spans two calls.

pub mod message;
pub mod session;
pub mod user;
