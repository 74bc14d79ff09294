//! Bot layer - Discord-specific interface, command handlers and bot context
//!
//! This module wires the listing service into poise: slash commands, the
//! listing form, and the event handler that answers form submissions and
//! download buttons.

/// Slash command implementations
pub mod commands;
/// Payload to serenity builder conversion
pub mod embed;
/// The listing form (modal)
pub mod form;
/// Discord interaction handlers (form submissions, buttons)
pub mod handlers;
/// Discord-backed listing mirror
pub mod mirror;

use crate::{
    config::AppConfig,
    core::{access::Requester, listing::ListingService, store::ListingStore},
    entities::EmbedFooter,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all commands and event handlers.
#[derive(Debug)]
pub struct BotData {
    /// Listing operations over the persisted store
    pub listings: ListingService,
    /// Footer stamped on rendered listings: the bot's own name and avatar
    pub footer: Option<EmbedFooter>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(listings: ListingService, footer: Option<EmbedFooter>) -> Self {
        Self { listings, footer }
    }
}

/// Builds a [`Requester`] from the interacting user and, inside a guild, their member data.
#[must_use]
pub fn requester_from(user: &serenity::User, member: Option<&serenity::Member>) -> Requester {
    let roles = member
        .map(|member| member.roles.iter().map(|role| role.get()).collect::<Vec<_>>())
        .unwrap_or_default();
    Requester::new(user.id.get(), roles)
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let reply = poise::CreateReply::default()
                .content("An error occurred while handling that command.")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::EventHandler { error, .. } => {
            error!("Error while handling interaction: {:?}", error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves listing interactions until the client stops.
///
/// Commands are registered in the configured guild once the bot is ready.
#[instrument(skip(app_config, store))]
pub async fn run_bot(app_config: AppConfig, store: ListingStore) -> Result<()> {
    let guild_id = serenity::GuildId::new(app_config.guild_id);
    let manager_role_id = app_config.manager_role_id;
    let store = Arc::new(store);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands in guild {}...", guild_id);
                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;

                let footer = EmbedFooter {
                    text: ready.user.name.clone(),
                    icon_url: Some(ready.user.face()),
                };
                Ok(BotData::new(
                    ListingService::new(store, manager_role_id),
                    Some(footer),
                ))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&app_config.token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
