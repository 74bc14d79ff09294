//! Entity module - the data that gets persisted.
//! Listings are the only persisted entity; the embed types describe their rendered content.

pub mod listing;

pub use listing::{EmbedField, EmbedFooter, EmbedPayload, ListingRecord, NewListing};
