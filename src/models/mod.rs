//! Core data model for the bootcamp directory.
//!
//! Stored bootcamps serialize as camelCase JSON via `serde`; the SQLite row
//! mapping lives next to the queries in `services::bootcamp_service`.

pub mod bootcamp;
