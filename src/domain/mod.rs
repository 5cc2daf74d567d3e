//! Core domain types and evaluation logic.

pub mod advisor;
pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod evaluator;
pub mod fusion;
pub mod indicator;
pub mod market_data;
pub mod ohlcv;
pub mod scoring;
pub mod signal;
