//! Evacuation CLI - talks to a running advisory server.

pub mod client;
pub mod render;

pub use client::{AdvisoryClient, ZoneListing};
