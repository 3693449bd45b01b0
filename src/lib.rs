//! Proctoring core library
//!
//! Turns per-frame perception output into a deduplicated integrity event
//! log and a scored session report. Exposes modules for integration testing
//! and binary reuse.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
