//! Storage layer for savepoint
//!
//! JSON helpers and the target registry (the per-target `config.json`).

pub mod file_io;
pub mod targets;

pub use file_io::{read_json, read_json_required, write_json_atomic, write_json_new};
pub use targets::{validate_target_name, TargetConfig, TargetRepository};
