//! Testing infrastructure for tracescope.
//!
//! This crate provides utilities for writing robust tests:
//! - `fixtures`: Event builders and synthetic logs
//! - `symbolicator`: Symbolicators whose completion the test controls
//! - `host`: A panel host that records every hook call
//! - `TestWorld`: Isolated environment for running the CLI

pub mod fixtures;
pub mod host;
pub mod symbolicator;
pub mod world;

pub use host::{HostCall, RecordingHost};
pub use symbolicator::{GatedSymbolicator, NamingSymbolicator};
pub use world::TestWorld;
