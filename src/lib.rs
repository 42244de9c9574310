//! SmartHealth — session and navigation core for the health-surveillance client.
//!
//! Holds the signed-in identity, persists it across restarts, and decides
//! which route subtrees and menu entries each role may reach.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod config;
pub mod identity;
pub mod logging;
pub mod navigation;
pub mod routes;
pub mod session;
