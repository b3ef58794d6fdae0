// --- File: crates/quoteverify_hubspot/src/lib.rs ---

pub mod client;
pub mod error;
pub mod service;

pub use client::HubSpotClient;
pub use error::HubSpotError;
