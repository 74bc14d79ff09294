//! [`ListingMirror`] backed by the Discord HTTP API.

use crate::{
    bot::embed::{download_row, to_create_embed},
    core::mirror::ListingMirror,
    entities::ListingRecord,
    errors::Result,
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::path::Path;
use tracing::debug;

/// Posts listing messages and DMs downloads through serenity's HTTP client.
pub struct DiscordMirror<'a> {
    http: &'a serenity::Http,
}

impl<'a> DiscordMirror<'a> {
    /// Wraps the HTTP client of the current context.
    #[must_use]
    pub const fn new(http: &'a serenity::Http) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<'a> ListingMirror for DiscordMirror<'a> {
    async fn post(&self, channel_id: u64, listing: &ListingRecord) -> Result<u64> {
        let message = serenity::ChannelId::new(channel_id)
            .send_message(
                self.http,
                serenity::CreateMessage::new()
                    .embed(to_create_embed(&listing.embed))
                    .components(vec![download_row(listing.id)]),
            )
            .await?;
        debug!(listing_id = listing.id, message_id = %message.id, "Posted listing message");
        Ok(message.id.get())
    }

    async fn edit(&self, channel_id: u64, message_id: u64, listing: &ListingRecord) -> Result<()> {
        serenity::ChannelId::new(channel_id)
            .edit_message(
                self.http,
                serenity::MessageId::new(message_id),
                serenity::EditMessage::new()
                    .embed(to_create_embed(&listing.embed))
                    .components(vec![download_row(listing.id)]),
            )
            .await?;
        Ok(())
    }

    async fn remove(&self, channel_id: u64, message_id: u64) -> Result<()> {
        serenity::ChannelId::new(channel_id)
            .delete_message(self.http, serenity::MessageId::new(message_id))
            .await?;
        Ok(())
    }

    async fn send_file(&self, user_id: u64, path: &Path) -> Result<()> {
        let attachment = serenity::CreateAttachment::path(path).await?;
        let channel = serenity::UserId::new(user_id)
            .create_dm_channel(self.http)
            .await?;
        channel
            .send_message(self.http, serenity::CreateMessage::new().add_file(attachment))
            .await?;
        Ok(())
    }

    async fn send_link(&self, user_id: u64, link: &str) -> Result<()> {
        let channel = serenity::UserId::new(user_id)
            .create_dm_channel(self.http)
            .await?;
        channel
            .send_message(self.http, serenity::CreateMessage::new().content(link))
            .await?;
        Ok(())
    }
}
