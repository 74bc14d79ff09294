//! Listing business logic - every interaction the bot answers, minus Discord itself.
//!
//! [`ListingService`] combines the access gate, the store and the renderer. Each
//! operation returns an outcome enum describing what happened; the bot layer
//! only turns those outcomes into private replies.

use crate::{
    core::{
        access::{self, Requester},
        custom_id::FormContext,
        mirror::{ListingMirror, MirrorStatus},
        render::{self, ListingDraft},
        store::ListingStore,
    },
    entities::{EmbedFooter, EmbedPayload, ListingRecord, NewListing},
    errors::Result,
};
use std::{path::Path, sync::Arc};
use tracing::{info, instrument, warn};

/// Why an interaction was turned away before anything changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The requester lacks the manager role.
    NotManager,
    /// The requester lacks the listing's required role.
    MissingRole,
    /// No listing has the given id.
    NotFound,
}

impl Rejection {
    /// Private reply shown to the requester.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotManager => "You don't have permission to use the embed builder.",
            Self::MissingRole => "You don't have the required role to access this download.",
            Self::NotFound => "Listing not found.",
        }
    }
}

/// Result of submitting the listing form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new listing was stored and (maybe) posted.
    Created {
        /// Id of the new listing
        listing_id: u64,
        /// Whether the announcement message went out
        mirror: MirrorStatus,
    },
    /// An existing listing was re-rendered and stored.
    Updated {
        /// Id of the edited listing
        listing_id: u64,
        /// Whether the posted message was edited in place
        mirror: MirrorStatus,
    },
    /// The edited listing no longer exists.
    NotFound,
}

impl SubmitOutcome {
    /// Private reply shown to the submitter.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Created {
                mirror: MirrorStatus::Synced,
                ..
            } => "Listing created and posted!",
            Self::Created { .. } => "Listing created, but the message could not be posted here.",
            Self::Updated { .. } => "Listing updated!",
            Self::NotFound => Rejection::NotFound.message(),
        }
    }
}

/// Result of `delete_listing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record is gone; the posted message may or may not be.
    Deleted {
        /// What happened to the posted message
        mirror: MirrorStatus,
    },
    /// Nothing was deleted.
    Rejected(Rejection),
}

impl DeleteOutcome {
    /// Private reply shown to the requester.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Deleted { .. } => "Listing deleted.",
            Self::Rejected(rejection) => rejection.message(),
        }
    }
}

/// Result of `set_listing_role`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleOutcome {
    /// The requirement was replaced.
    Updated {
        /// New requirement; `None` makes the listing free
        required_role_id: Option<u64>,
    },
    /// Nothing changed.
    Rejected(Rejection),
}

impl RoleOutcome {
    /// Private reply shown to the requester.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Updated { .. } => "Required role updated.",
            Self::Rejected(rejection) => rejection.message(),
        }
    }
}

/// How a download reached the requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The local file was attached to a direct message.
    File,
    /// The raw link was sent in a direct message.
    Link,
}

/// Result of pressing a download button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Something was sent to the requester's DMs.
    Delivered(Delivery),
    /// Access was granted but no direct message could be sent.
    Undeliverable,
    /// Access was refused or the listing is gone.
    Rejected(Rejection),
}

impl DownloadOutcome {
    /// Private acknowledgment shown to the requester.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Delivered(_) => "Download sent to your DMs!",
            Self::Undeliverable => {
                "I couldn't send you a direct message. Please allow DMs from server members and try again."
            }
            Self::Rejected(rejection) => rejection.message(),
        }
    }
}

/// A form ready to be shown: where its submission goes and what it is pre-filled with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormRequest {
    /// Encoded into the modal's custom id
    pub context: FormContext,
    /// Initial values of the five inputs
    pub defaults: ListingDraft,
}

/// Routes listing interactions through the access gate, the store and the renderer.
#[derive(Debug)]
pub struct ListingService {
    store: Arc<ListingStore>,
    manager_role_id: u64,
}

impl ListingService {
    /// Creates a service over `store`, gated by `manager_role_id`.
    #[must_use]
    pub const fn new(store: Arc<ListingStore>, manager_role_id: u64) -> Self {
        Self {
            store,
            manager_role_id,
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &ListingStore {
        &self.store
    }

    fn check_manage(&self, requester: &Requester) -> std::result::Result<(), Rejection> {
        if access::can_manage(requester, self.manager_role_id) {
            Ok(())
        } else {
            Err(Rejection::NotManager)
        }
    }

    /// `create_listing`: a blank form whose submission creates a listing gated by `required_role_id`.
    pub fn open_create_form(
        &self,
        requester: &Requester,
        required_role_id: Option<u64>,
    ) -> std::result::Result<FormRequest, Rejection> {
        self.check_manage(requester)?;
        Ok(FormRequest {
            context: FormContext::Create { required_role_id },
            defaults: ListingDraft::blank(),
        })
    }

    /// `edit_listing`: a form pre-filled from the listing's current content.
    pub async fn open_edit_form(
        &self,
        requester: &Requester,
        listing_id: u64,
    ) -> std::result::Result<FormRequest, Rejection> {
        self.check_manage(requester)?;
        let listing = self.store.get(listing_id).await.ok_or(Rejection::NotFound)?;
        Ok(FormRequest {
            context: FormContext::Edit { listing_id },
            defaults: ListingDraft::from_record(&listing),
        })
    }

    /// Handles a listing form submission made in `channel_id`.
    ///
    /// Creating stores the record first, posts it, then backfills the message id.
    /// Editing stores the new content, then edits the posted message in place.
    /// Failures of the posted message are logged and reported as
    /// [`MirrorStatus::Unavailable`]; the store change stands either way.
    #[instrument(skip(self, draft, footer, mirror))]
    pub async fn submit_form<M>(
        &self,
        context: FormContext,
        draft: &ListingDraft,
        channel_id: u64,
        footer: Option<EmbedFooter>,
        mirror: &M,
    ) -> Result<SubmitOutcome>
    where
        M: ListingMirror + ?Sized,
    {
        let embed = draft.render(footer);

        match context {
            FormContext::Create { required_role_id } => {
                self.create_listing(embed, draft, required_role_id, channel_id, mirror)
                    .await
            }
            FormContext::Edit { listing_id } => {
                let download_link = draft.download_link.clone();
                let Some(updated) = self
                    .store
                    .update(listing_id, |listing| {
                        listing.embed = embed;
                        listing.download_link = download_link;
                    })
                    .await?
                else {
                    return Ok(SubmitOutcome::NotFound);
                };

                info!(listing_id, "Listing updated");
                let mirror = refresh_message(&updated, mirror).await;
                Ok(SubmitOutcome::Updated { listing_id, mirror })
            }
        }
    }

    async fn create_listing<M>(
        &self,
        embed: EmbedPayload,
        draft: &ListingDraft,
        required_role_id: Option<u64>,
        channel_id: u64,
        mirror: &M,
    ) -> Result<SubmitOutcome>
    where
        M: ListingMirror + ?Sized,
    {
        let created = self
            .store
            .create(NewListing {
                embed,
                download_link: draft.download_link.clone(),
                required_role_id,
                channel_id: Some(channel_id),
            })
            .await?;
        let listing_id = created.id;
        info!(listing_id, channel_id, "Listing created");

        let status = match mirror.post(channel_id, &created).await {
            Ok(message_id) => {
                self.store
                    .update(listing_id, |listing| listing.message_id = Some(message_id))
                    .await?;
                MirrorStatus::Synced
            }
            Err(e) => {
                warn!(listing_id, "Failed to post listing message: {}", e);
                MirrorStatus::Unavailable
            }
        };

        Ok(SubmitOutcome::Created {
            listing_id,
            mirror: status,
        })
    }

    /// `delete_listing`: removes the record, then best-effort deletes its message.
    #[instrument(skip(self, requester, mirror))]
    pub async fn delete_listing<M>(
        &self,
        requester: &Requester,
        listing_id: u64,
        mirror: &M,
    ) -> Result<DeleteOutcome>
    where
        M: ListingMirror + ?Sized,
    {
        if let Err(rejection) = self.check_manage(requester) {
            return Ok(DeleteOutcome::Rejected(rejection));
        }
        let Some(removed) = self.store.delete(listing_id).await? else {
            return Ok(DeleteOutcome::Rejected(Rejection::NotFound));
        };
        info!(listing_id, "Listing deleted");

        let status = match removed.message_coordinates() {
            None => MirrorStatus::Detached,
            Some((channel_id, message_id)) => {
                match mirror.remove(channel_id, message_id).await {
                    Ok(()) => MirrorStatus::Synced,
                    Err(e) => {
                        warn!(listing_id, "Message not found or already deleted: {}", e);
                        MirrorStatus::Unavailable
                    }
                }
            }
        };

        Ok(DeleteOutcome::Deleted { mirror: status })
    }

    /// `list_listings`: every listing, in creation order. Not gated.
    pub async fn list_listings(&self) -> Vec<ListingRecord> {
        self.store.list().await
    }

    /// `list_listings` rendered as summary embeds that fit in one message.
    pub async fn listing_summary(&self, footer: Option<&EmbedFooter>) -> render::ListingSummary {
        render::summary_embeds(&self.list_listings().await, footer)
    }

    /// `set_listing_role`: replaces the role requirement; `None` makes the listing free.
    #[instrument(skip(self, requester))]
    pub async fn set_listing_role(
        &self,
        requester: &Requester,
        listing_id: u64,
        required_role_id: Option<u64>,
    ) -> Result<RoleOutcome> {
        if let Err(rejection) = self.check_manage(requester) {
            return Ok(RoleOutcome::Rejected(rejection));
        }
        let updated = self
            .store
            .update(listing_id, |listing| listing.required_role_id = required_role_id)
            .await?;

        Ok(updated.map_or(RoleOutcome::Rejected(Rejection::NotFound), |_| {
            info!(listing_id, ?required_role_id, "Listing role requirement updated");
            RoleOutcome::Updated { required_role_id }
        }))
    }

    /// Download button: checks the listing's role, then DMs the file or the link.
    ///
    /// A link that names an existing local file is sent as an attachment; if that
    /// fails, or the link is anything else, the raw link text is sent instead.
    #[instrument(skip(self, requester, mirror), fields(user_id = requester.user_id))]
    pub async fn request_download<M>(
        &self,
        requester: &Requester,
        listing_id: u64,
        mirror: &M,
    ) -> DownloadOutcome
    where
        M: ListingMirror + ?Sized,
    {
        let Some(listing) = self.store.get(listing_id).await else {
            return DownloadOutcome::Rejected(Rejection::NotFound);
        };
        if !access::can_download(requester, &listing) {
            return DownloadOutcome::Rejected(Rejection::MissingRole);
        }

        let path = Path::new(&listing.download_link);
        if is_local_file(path).await {
            match mirror.send_file(requester.user_id, path).await {
                Ok(()) => return DownloadOutcome::Delivered(Delivery::File),
                Err(e) => warn!(listing_id, "Sending file failed, falling back to link: {}", e),
            }
        }

        match mirror
            .send_link(requester.user_id, &listing.download_link)
            .await
        {
            Ok(()) => DownloadOutcome::Delivered(Delivery::Link),
            Err(e) => {
                warn!(listing_id, "Could not DM download link: {}", e);
                DownloadOutcome::Undeliverable
            }
        }
    }
}

async fn refresh_message<M>(listing: &ListingRecord, mirror: &M) -> MirrorStatus
where
    M: ListingMirror + ?Sized,
{
    let Some((channel_id, message_id)) = listing.message_coordinates() else {
        return MirrorStatus::Detached;
    };

    match mirror.edit(channel_id, message_id, listing).await {
        Ok(()) => MirrorStatus::Synced,
        Err(e) => {
            warn!(
                listing_id = listing.id,
                "Message not found or already deleted: {}", e
            );
            MirrorStatus::Unavailable
        }
    }
}

async fn is_local_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}
