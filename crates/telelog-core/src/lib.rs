//! Business logic for Telelog.
//!
//! Defines the repository ports the infrastructure layer implements and the
//! `LedgerService` that orchestrates them for the dispatcher and CLI. This
//! crate never depends on any specific storage technology.

pub mod repository;
pub mod service;
