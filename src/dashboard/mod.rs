//! Embedded web dashboard
//!
//! Serves the shelf page at `/`: the service tiles with their reachability,
//! and the placed widgets. The page is static HTML/JS/CSS compiled into the
//! binary; it renders from the JSON API and polls widget series itself.

pub mod handler;

pub use handler::{assets_handler, dashboard_handler};
