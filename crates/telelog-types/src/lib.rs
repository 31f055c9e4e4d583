//! Shared domain types for Telelog.
//!
//! This crate contains the persisted entities (`User`, `Message`,
//! `ChatSession`), the inbound descriptors they are built from, the
//! configuration surface, and the error taxonomies used across the layers.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod session;
pub mod user;
