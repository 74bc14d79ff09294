//! Shared test utilities for `download-desk`.
//!
//! Provides temp-dir backed stores, sample drafts, and a [`RecordingMirror`]
//! that stands in for Discord.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        access::Requester,
        listing::ListingService,
        mirror::ListingMirror,
        render::ListingDraft,
        store::ListingStore,
    },
    entities::{ListingRecord, NewListing},
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};
use tempfile::TempDir;

/// Manager role used by [`open_temp_service`].
pub const MANAGER_ROLE: u64 = 9000;

/// User id of [`manager`].
pub const MANAGER_USER: u64 = 1;

/// User id of every [`member`].
pub const MEMBER_USER: u64 = 2;

/// Opens a store backed by `listings.json` inside a fresh temp dir.
/// Keep the returned `TempDir` alive for as long as the store is used.
pub async fn open_temp_store() -> Result<(TempDir, ListingStore)> {
    let dir = tempfile::tempdir()?;
    let store = ListingStore::open(dir.path().join("listings.json")).await?;
    Ok((dir, store))
}

/// A [`ListingService`] over a temp store, managed by [`MANAGER_ROLE`].
pub async fn open_temp_service() -> Result<(TempDir, ListingService)> {
    let (dir, store) = open_temp_store().await?;
    Ok((dir, ListingService::new(Arc::new(store), MANAGER_ROLE)))
}

/// A requester holding the manager role.
#[must_use]
pub fn manager() -> Requester {
    Requester::new(MANAGER_USER, [MANAGER_ROLE])
}

/// A regular member holding `roles`.
#[must_use]
pub fn member(roles: &[u64]) -> Requester {
    Requester::new(MEMBER_USER, roles.iter().copied())
}

/// A filled-in form with sensible defaults.
///
/// # Defaults
/// * `description`: "Test listing"
/// * `fields`: "Size:1 MB"
/// * `color`: "#336699"
/// * `download_link`: "files/test.zip"
#[must_use]
pub fn sample_draft(title: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: Some("Test listing".to_string()),
        fields: "Size:1 MB".to_string(),
        color: "#336699".to_string(),
        download_link: "files/test.zip".to_string(),
    }
}

/// A free, unposted listing ready for [`ListingStore::create`].
#[must_use]
pub fn new_listing(title: &str, download_link: &str) -> NewListing {
    NewListing {
        embed: sample_draft(title).render(None),
        download_link: download_link.to_string(),
        required_role_id: None,
        channel_id: None,
    }
}

/// One call made against a [`RecordingMirror`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MirrorEvent {
    /// `post`
    Posted { channel_id: u64, listing_id: u64 },
    /// `edit`
    Edited { channel_id: u64, listing_id: u64 },
    /// `remove`
    Removed { channel_id: u64, message_id: u64 },
    /// `send_file`
    FileSent { user_id: u64, path: PathBuf },
    /// `send_link`
    LinkSent { user_id: u64, link: String },
}

/// Records successful calls; when built with [`RecordingMirror::failing`], every call fails.
#[derive(Debug, Default)]
pub struct RecordingMirror {
    events: Mutex<Vec<MirrorEvent>>,
    last_message_id: AtomicU64,
    fail: bool,
}

impl RecordingMirror {
    /// A mirror whose every call errors, as if the message or DM channel were gone.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Calls recorded so far, in order.
    pub fn events(&self) -> Vec<MirrorEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: MirrorEvent) -> Result<()> {
        if self.fail {
            return Err(Error::Io(std::io::Error::other("mirror unavailable")));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[async_trait]
impl ListingMirror for RecordingMirror {
    async fn post(&self, channel_id: u64, listing: &ListingRecord) -> Result<u64> {
        self.record(MirrorEvent::Posted {
            channel_id,
            listing_id: listing.id,
        })?;
        Ok(self.last_message_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn edit(&self, channel_id: u64, _message_id: u64, listing: &ListingRecord) -> Result<()> {
        self.record(MirrorEvent::Edited {
            channel_id,
            listing_id: listing.id,
        })
    }

    async fn remove(&self, channel_id: u64, message_id: u64) -> Result<()> {
        self.record(MirrorEvent::Removed {
            channel_id,
            message_id,
        })
    }

    async fn send_file(&self, user_id: u64, path: &Path) -> Result<()> {
        self.record(MirrorEvent::FileSent {
            user_id,
            path: path.to_path_buf(),
        })
    }

    async fn send_link(&self, user_id: u64, link: &str) -> Result<()> {
        self.record(MirrorEvent::LinkSent {
            user_id,
            link: link.to_string(),
        })
    }
}
