//! Discord interaction handlers
//!
//! Slash commands are dispatched by poise itself; everything else the bot
//! answers (listing form submissions and download buttons) arrives here.

/// Download button presses
pub mod download;
/// Listing form submissions
pub mod form;

use crate::{
    bot::BotData,
    core::custom_id::{FormContext, parse_download_button_id},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::trace;

/// Routes component and modal interactions to their handlers.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    let serenity::FullEvent::InteractionCreate { interaction } = event else {
        return Ok(());
    };

    match interaction {
        serenity::Interaction::Modal(modal) if FormContext::matches(&modal.data.custom_id) => {
            form::handle_form_submission(ctx, modal, data).await
        }
        serenity::Interaction::Component(component) => {
            match parse_download_button_id(&component.data.custom_id) {
                Some(listing_id) => {
                    download::handle_download(ctx, component, listing_id, data).await
                }
                None => {
                    trace!("Ignoring component {}", component.data.custom_id);
                    Ok(())
                }
            }
        }
        _ => Ok(()),
    }
}
