//! Conversion of listing payloads into serenity builders.

use crate::{core::custom_id, entities::EmbedPayload};
use poise::serenity_prelude as serenity;

/// Builds the serenity embed for `payload`.
#[must_use]
pub fn to_create_embed(payload: &EmbedPayload) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(payload.title.clone())
        .color(payload.color)
        .fields(
            payload
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.value.clone(), field.inline)),
        );

    if let Some(description) = &payload.description {
        embed = embed.description(description.clone());
    }
    if let Some(footer) = &payload.footer {
        let mut builder = serenity::CreateEmbedFooter::new(footer.text.clone());
        if let Some(icon_url) = &footer.icon_url {
            builder = builder.icon_url(icon_url.clone());
        }
        embed = embed.footer(builder);
    }

    embed
}

/// The row holding a listing's "Download" button.
#[must_use]
pub fn download_row(listing_id: u64) -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(custom_id::download_button_id(listing_id))
            .label("Download")
            .style(serenity::ButtonStyle::Primary),
    ])
}
