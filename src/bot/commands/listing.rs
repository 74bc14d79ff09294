//! Listing slash commands - create, edit, delete, list, and re-gate listings.
//!
//! Every reply is ephemeral. `create_listing` and `edit_listing` answer with
//! the listing form; its submission is handled in
//! [`crate::bot::handlers::form`].

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, embed, form::ListingForm, requester_from},
        core::{access::Requester, listing::FormRequest},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::sync::atomic::Ordering;
    use tracing::{info, instrument};

    /// Reply shown by `list_listings` when the store is empty.
    const NO_LISTINGS: &str = "No listings found.";

    async fn requester(ctx: poise::Context<'_, BotData, Error>) -> Requester {
        let member = ctx.author_member().await;
        requester_from(ctx.author(), member.as_deref())
    }

    async fn reply(ctx: poise::Context<'_, BotData, Error>, content: &str) -> Result<()> {
        ctx.send(
            poise::CreateReply::default()
                .content(content)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Answers the slash command with the listing form instead of a message.
    async fn open_form(ctx: poise::Context<'_, BotData, Error>, form: FormRequest) -> Result<()> {
        let poise::Context::Application(app_ctx) = ctx else {
            return Err(Error::Modal(
                "listing forms can only be opened from slash commands".to_string(),
            ));
        };

        let response = <ListingForm as poise::Modal>::create(
            Some(form.defaults.into()),
            form.context.custom_id(),
        );
        app_ctx
            .interaction
            .create_response(ctx.http(), response)
            .await?;
        app_ctx
            .has_sent_initial_response
            .store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Create a new download listing (requires embed builder perm)
    #[poise::command(slash_command, guild_only)]
    #[instrument(skip(ctx, required_role))]
    pub async fn create_listing(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Role required to access this download (none for free)"]
        required_role: Option<serenity::Role>,
    ) -> Result<()> {
        let requester = requester(ctx).await;
        let required_role_id = required_role.map(|role| role.id.get());

        match ctx
            .data()
            .listings
            .open_create_form(&requester, required_role_id)
        {
            Ok(form) => open_form(ctx, form).await,
            Err(rejection) => reply(ctx, rejection.message()).await,
        }
    }

    /// Edit an existing download listing (requires embed builder perm)
    #[poise::command(slash_command, guild_only)]
    #[instrument(skip(ctx))]
    pub async fn edit_listing(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The ID of the listing to edit"]
        #[min = 1]
        listing_id: u64,
    ) -> Result<()> {
        let requester = requester(ctx).await;

        match ctx
            .data()
            .listings
            .open_edit_form(&requester, listing_id)
            .await
        {
            Ok(form) => open_form(ctx, form).await,
            Err(rejection) => reply(ctx, rejection.message()).await,
        }
    }

    /// Delete a download listing (requires embed builder perm)
    #[poise::command(slash_command, guild_only)]
    #[instrument(skip(ctx))]
    pub async fn delete_listing(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The ID of the listing to delete"]
        #[min = 1]
        listing_id: u64,
    ) -> Result<()> {
        let requester = requester(ctx).await;
        let mirror = crate::bot::mirror::DiscordMirror::new(ctx.http());

        let outcome = ctx
            .data()
            .listings
            .delete_listing(&requester, listing_id, &mirror)
            .await?;
        info!(listing_id, ?outcome, "delete_listing handled");
        reply(ctx, outcome.message()).await
    }

    /// List all download listings
    #[poise::command(slash_command, guild_only)]
    #[instrument(skip(ctx))]
    pub async fn list_listings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let summary = data.listings.listing_summary(data.footer.as_ref()).await;

        if summary.is_empty() {
            return reply(ctx, NO_LISTINGS).await;
        }

        let mut base = poise::CreateReply::default().ephemeral(true);
        if let Some(notice) = summary.truncation_notice() {
            info!(shown = summary.shown, total = summary.total, "Listing summary truncated");
            base = base.content(notice);
        }

        let response = summary
            .embeds
            .iter()
            .fold(base, |response, payload| {
                response.embed(embed::to_create_embed(payload))
            });
        ctx.send(response).await?;
        Ok(())
    }

    /// Set required role for a listing (requires embed builder perm)
    #[poise::command(slash_command, guild_only)]
    #[instrument(skip(ctx, required_role))]
    pub async fn set_listing_role(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The ID of the listing"]
        #[min = 1]
        listing_id: u64,
        #[description = "Role required to access this download (none for free)"]
        required_role: Option<serenity::Role>,
    ) -> Result<()> {
        let requester = requester(ctx).await;
        let required_role_id = required_role.map(|role| role.id.get());

        let outcome = ctx
            .data()
            .listings
            .set_listing_role(&requester, listing_id, required_role_id)
            .await?;
        reply(ctx, outcome.message()).await
    }
}

// Re-export all commands
pub use inner::*;
