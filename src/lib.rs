//! stockscope: indicator scoring, signal fusion and position advice for a
//! single security.
//!
//! Hexagonal architecture: the pure evaluation core lives in [`domain`], port
//! traits in [`ports`], file/console implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
