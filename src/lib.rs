//! Opening-hours status for a directory of service agencies.
//!
//! Pipeline: `ingest` fetches and maps the directory, `schedule` normalizes,
//! decodes and evaluates each agency's hours against `clock`, and `listing`
//! turns the result into immutable, searchable view records.

pub mod clock;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod listing;
pub mod logging;
pub mod model;
pub mod schedule;
pub mod verify;
