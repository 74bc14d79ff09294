//! Download button presses.

use crate::{
    bot::{BotData, mirror::DiscordMirror, requester_from},
    errors::Result,
};
use poise::serenity_prelude as serenity;
use tracing::{info, instrument};

/// Delivers a listing's file or link to the presser's DMs, if they may have it.
///
/// The press is deferred first since uploading a file can outlast Discord's
/// response window; the acknowledgment follows as an ephemeral followup.
#[instrument(skip(ctx, component, data), fields(user_id = %component.user.id))]
pub async fn handle_download(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    listing_id: u64,
    data: &BotData,
) -> Result<()> {
    component
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Defer(
                serenity::CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    let requester = requester_from(&component.user, component.member.as_ref());
    let mirror = DiscordMirror::new(&ctx.http);
    let outcome = data
        .listings
        .request_download(&requester, listing_id, &mirror)
        .await;
    info!(?outcome, "Download request handled");

    component
        .create_followup(
            ctx,
            serenity::CreateInteractionResponseFollowup::new()
                .content(outcome.message())
                .ephemeral(true),
        )
        .await?;
    Ok(())
}
