//! Services orchestrating the repository ports.

pub mod ledger;
