//! plugin-release - engine plugin packaging library
//!
//! This library packages one engine plugin against several engine versions
//! by driving the engine's RunUAT tool:
//! - Version list resolution and ordering (newest first)
//! - One BuildPlugin invocation per version
//! - Cleanup of stale and failed output
//! - A log artifact covering the whole run

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod toolchain;
