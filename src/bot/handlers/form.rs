//! Listing form submissions.

use crate::{
    bot::{BotData, form::ListingForm, mirror::DiscordMirror},
    core::{custom_id::FormContext, render::ListingDraft},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{error, info, instrument};

/// Creates or updates a listing from a submitted form.
///
/// The form's custom id decides which: it carries the edit target, or the role
/// picked on `create_listing`.
#[instrument(skip_all, fields(custom_id = %modal.data.custom_id, user_id = %modal.user.id))]
pub async fn handle_form_submission(
    ctx: &serenity::Context,
    modal: &serenity::ModalInteraction,
    data: &BotData,
) -> Result<()> {
    let context = FormContext::parse(&modal.data.custom_id)?;
    let form = <ListingForm as poise::Modal>::parse(modal.data.clone())
        .map_err(|e| Error::Modal(e.to_string()))?;
    let draft = ListingDraft::from(form);

    modal
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Defer(
                serenity::CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    let mirror = DiscordMirror::new(&ctx.http);
    let content = match data
        .listings
        .submit_form(
            context,
            &draft,
            modal.channel_id.get(),
            data.footer.clone(),
            &mirror,
        )
        .await
    {
        Ok(outcome) => {
            info!(?outcome, "Listing form handled");
            outcome.message()
        }
        Err(e) => {
            error!("Failed to save listing: {}", e);
            "Something went wrong while saving the listing."
        }
    };

    modal
        .create_followup(
            ctx,
            serenity::CreateInteractionResponseFollowup::new()
                .content(content)
                .ephemeral(true),
        )
        .await?;
    Ok(())
}
