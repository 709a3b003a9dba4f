//! Internals of the Headwins terminal client.
//!
//! This library provides configuration, command parsing, rendering, and the
//! driver loop used by the hw_client binary.

pub mod app;
pub mod commands;
pub mod config;
pub mod render;
