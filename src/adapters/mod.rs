//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, WebSocket, terminal output).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: letters REST API client and session auth
//! - `console`: terminal rendering of letters and connection status
//! - `feeds`: live letter stream over WebSocket

pub mod api;
pub mod console;
pub mod feeds;
