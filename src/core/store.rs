//! Listing store - the durable collection of listing records.
//!
//! The store owns both the in-memory records and the file they live in. Every
//! mutation rewrites the whole file as pretty-printed JSON before returning, so
//! the file always matches what callers last observed. There is no partial-write
//! protection: a crash in the middle of a write can leave a truncated file.
//!
//! The highest id ever issued lives in a small sidecar file next to the listings
//! (`listings.json` -> `listings.json.ids`), so an id freed by a delete is not
//! handed out again after a restart.

use crate::{
    entities::{ListingRecord, NewListing},
    errors::Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

struct StoreState {
    listings: Vec<ListingRecord>,
    /// Highest id ever handed out, including ids of deleted records.
    high_water: u64,
}

/// Contents of the id sidecar file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct IdMark {
    high_water: u64,
}

/// File-backed collection of [`ListingRecord`]s.
pub struct ListingStore {
    path: PathBuf,
    ids_path: PathBuf,
    state: Mutex<StoreState>,
}

impl std::fmt::Debug for ListingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ListingStore {
    /// Opens the store at `path`, creating an empty listings file if none exists.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or created, or does not hold
    /// a JSON array of listings.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let listings = if tokio::fs::try_exists(&path).await? {
            let contents = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str::<Vec<ListingRecord>>(&contents)?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            persist(&path, &[]).await?;
            info!("Created empty listings file at {}", path.display());
            Vec::new()
        };

        let ids_path = sidecar_path(&path);
        let recorded = if tokio::fs::try_exists(&ids_path).await? {
            let contents = tokio::fs::read_to_string(&ids_path).await?;
            serde_json::from_str::<IdMark>(&contents)?.high_water
        } else {
            0
        };
        let high_water = listings
            .iter()
            .map(|l| l.id)
            .max()
            .unwrap_or(0)
            .max(recorded);
        persist_mark(&ids_path, high_water).await?;
        info!(
            "Loaded {} listings from {} (highest id issued: {})",
            listings.len(),
            path.display(),
            high_water
        );

        Ok(Self {
            path,
            ids_path,
            state: Mutex::new(StoreState {
                listings,
                high_water,
            }),
        })
    }

    /// Location of the listings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores a new listing under the next free id and returns the stored record.
    ///
    /// The id is one past the highest id ever issued, which equals
    /// `max(existing) + 1` unless the highest record has been deleted.
    pub async fn create(&self, new_listing: NewListing) -> Result<ListingRecord> {
        let mut state = self.state.lock().await;
        let id = state.high_water + 1;
        let record = new_listing.into_record(id);

        state.listings.push(record.clone());
        state.high_water = id;
        persist(&self.path, &state.listings).await?;
        persist_mark(&self.ids_path, id).await?;

        debug!(listing_id = id, "Listing created");
        Ok(record)
    }

    /// Looks up a listing by id.
    pub async fn get(&self, id: u64) -> Option<ListingRecord> {
        let state = self.state.lock().await;
        state.listings.iter().find(|l| l.id == id).cloned()
    }

    /// Applies `mutator` to the listing with `id` and persists the result.
    ///
    /// Returns the updated record, or `None` (with nothing written) if no such
    /// listing exists. The mutator cannot change the record's id.
    pub async fn update<F>(&self, id: u64, mutator: F) -> Result<Option<ListingRecord>>
    where
        F: FnOnce(&mut ListingRecord),
    {
        let mut state = self.state.lock().await;
        let Some(record) = state.listings.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };

        mutator(record);
        record.id = id;
        let updated = record.clone();

        persist(&self.path, &state.listings).await?;
        debug!(listing_id = id, "Listing updated");
        Ok(Some(updated))
    }

    /// Removes the listing with `id`, returning it if it existed.
    pub async fn delete(&self, id: u64) -> Result<Option<ListingRecord>> {
        let mut state = self.state.lock().await;
        let Some(index) = state.listings.iter().position(|l| l.id == id) else {
            return Ok(None);
        };

        let removed = state.listings.remove(index);
        persist(&self.path, &state.listings).await?;
        debug!(listing_id = id, "Listing deleted");
        Ok(Some(removed))
    }

    /// All listings in insertion order.
    pub async fn list(&self) -> Vec<ListingRecord> {
        self.state.lock().await.listings.clone()
    }
}

async fn persist(path: &Path, listings: &[ListingRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(listings)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

async fn persist_mark(path: &Path, high_water: u64) -> Result<()> {
    let json = serde_json::to_string(&IdMark { high_water })?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".ids");
    PathBuf::from(name)
}
