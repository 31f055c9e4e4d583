//! Infrastructure implementations for Telelog.
//!
//! SQLite-backed repositories behind the ports defined in telelog-core.

pub mod sqlite;
