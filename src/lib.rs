//! daylog - leveled logging with a day-rotating file sink
//!
//! This library provides a console sink, a self-rotating file sink with
//! age-based backup retention, and a tracing bridge writing through either.

pub mod config;
pub mod logging;
