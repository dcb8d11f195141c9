//! # Presentation Layer
//!
//! Everything that draws the event panel.
//!
//! ```text
//! [ Handler ] --> [ Panel (runtime) ] --> [ Renderer ] --> [ View ] --> terminal
//!                        ^                     |
//!                        +---- key input ------+
//! ```
//!
//! - `formatters`: label text, ANSI parsing and style-token mapping
//! - `views`: ratatui widgets and the plain-text dump
//! - `renderers`: the interactive event loop

pub mod formatters;
pub mod renderers;
pub mod views;
