//! Homeshelf - self-hosted personal dashboard
//!
//! This library provides the shelf of service tiles, the reachability and
//! torrent proxy endpoints behind it, and the polled network-traffic widget.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod polling;
pub mod reachability;
pub mod shelf;
pub mod torrents;
pub mod widgets;
