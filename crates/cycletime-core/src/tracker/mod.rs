//! Tracker API integration

pub mod client;

pub use client::{TrackerClient, DEFAULT_BASE_URL};
