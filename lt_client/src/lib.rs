//! Internal modules for the Lotería client.
//!
//! This library provides the command parser, the websocket session adapter,
//! and the TUI application used by the lt_client binary.

pub mod commands;
pub mod session;
pub mod tui_app;
