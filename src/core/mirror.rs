//! Outbound effects of listing operations.
//!
//! The posted channel message is a best-effort mirror of a listing record. The
//! core talks to it through [`ListingMirror`] so the same flows run against
//! Discord in production and against a recording double in tests.

use crate::{entities::ListingRecord, errors::Result};
use async_trait::async_trait;
use std::path::Path;

/// Posts, edits and removes listing messages, and delivers downloads privately.
#[async_trait]
pub trait ListingMirror: Send + Sync {
    /// Posts `listing` with its download button and returns the new message id.
    async fn post(&self, channel_id: u64, listing: &ListingRecord) -> Result<u64>;

    /// Replaces the content of an already posted listing message.
    async fn edit(&self, channel_id: u64, message_id: u64, listing: &ListingRecord) -> Result<()>;

    /// Deletes a posted listing message.
    async fn remove(&self, channel_id: u64, message_id: u64) -> Result<()>;

    /// Sends a local file to the user as a private attachment.
    async fn send_file(&self, user_id: u64, path: &Path) -> Result<()>;

    /// Sends the raw download link to the user privately.
    async fn send_link(&self, user_id: u64, link: &str) -> Result<()>;
}

/// How the posted message fared after a store mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorStatus {
    /// The message was posted, edited or removed as requested.
    Synced,
    /// The platform call failed (message gone, missing permissions, ...); the store change still stands.
    Unavailable,
    /// The record has no posted message to act on.
    Detached,
}
