//! Core domain types and logic.

pub mod bar;
pub mod config_validation;
pub mod engine;
pub mod error;
pub mod execution;
pub mod indicator;
pub mod performance;
pub mod position;
pub mod signal;
pub mod sizing;
pub mod strategy;
