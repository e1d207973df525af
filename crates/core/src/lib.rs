//! Core types and configuration for the Lee-Ready trade direction engine.
//!
//! This crate provides shared types used across all other crates:
//! - Market data types (trade prints, quotes, classified trades)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
