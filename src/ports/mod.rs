//! Port traits the core's callers implement.

pub mod config_port;
pub mod data_port;
pub mod report_port;
