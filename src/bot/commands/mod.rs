//! Discord command implementations.

/// Listing management and browsing commands
pub mod listing;

pub use listing::*;

use crate::{bot::BotData, errors::Error};

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        create_listing(),
        edit_listing(),
        delete_listing(),
        list_listings(),
        set_listing_role(),
    ]
}
