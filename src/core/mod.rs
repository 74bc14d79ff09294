//! Core business logic - framework-agnostic listing storage, rendering, and access rules.
//!
//! Nothing in here talks to Discord directly; outbound effects go through
//! [`mirror::ListingMirror`].

/// Role checks for managing and downloading
pub mod access;
/// Identifiers embedded in buttons and forms
pub mod custom_id;
/// Listing operations and their outcomes
pub mod listing;
/// Outbound message and delivery effects
pub mod mirror;
/// Form input parsing and embed rendering
pub mod render;
/// File-backed listing collection
pub mod store;
