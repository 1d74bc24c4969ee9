//! Shared library surface for the evacuation advisory server and its tests.

pub mod advisory;
pub mod api;
pub mod config;
pub mod geolocation;
pub mod loader;
pub mod state;
