//! Listing entity - a published download and the embed that advertises it.
//!
//! Records are persisted as a JSON array by [`crate::core::store::ListingStore`].
//! Discord snowflakes are kept as plain `u64` so the core stays framework-agnostic.
//! They are written as numbers but also read from numeric strings.

use serde::{Deserialize, Deserializer, Serialize, de};

/// One `name: value` row of an embed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Row heading
    pub name: String,
    /// Row body
    pub value: String,
    /// Whether Discord may lay this row out side by side with others
    #[serde(default)]
    pub inline: bool,
}

/// Footer line shown under the embed, normally the bot's own name and avatar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    /// Footer text
    pub text: String,
    /// Small icon shown next to the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// The display payload of a listing, independent of any Discord builder type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedPayload {
    /// Embed title
    pub title: String,
    /// Optional body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field rows in display order
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    /// Accent color as `0xRRGGBB`
    pub color: u32,
    /// Optional footer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

/// A persisted download listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Stable handle used by commands and the download button
    pub id: u64,
    /// Rendered content of the posted message
    pub embed: EmbedPayload,
    /// Local file path or URL handed to requesters
    pub download_link: String,
    /// Role a requester must hold to download; `None` means free
    #[serde(default, deserialize_with = "optional_snowflake")]
    pub required_role_id: Option<u64>,
    /// Posted message mirroring this listing
    #[serde(default, deserialize_with = "optional_snowflake")]
    pub message_id: Option<u64>,
    /// Channel of the posted message
    #[serde(default, deserialize_with = "optional_snowflake")]
    pub channel_id: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Snowflake {
    Number(u64),
    Text(String),
}

/// Reads an optional snowflake given either as a number or as a string of digits.
/// `null` and empty strings mean "none".
fn optional_snowflake<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Snowflake>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Snowflake::Number(id)) => Ok(Some(id)),
        Some(Snowflake::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Snowflake::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid snowflake: {text:?}"))),
    }
}

impl ListingRecord {
    /// `true` when downloading requires a role.
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        self.required_role_id.is_some()
    }

    /// `(channel_id, message_id)` of the posted message, when both are known.
    #[must_use]
    pub const fn message_coordinates(&self) -> Option<(u64, u64)> {
        match (self.channel_id, self.message_id) {
            (Some(channel_id), Some(message_id)) => Some((channel_id, message_id)),
            _ => None,
        }
    }
}

/// Everything needed to create a record except its id, which the store assigns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewListing {
    /// Rendered content
    pub embed: EmbedPayload,
    /// Local file path or URL
    pub download_link: String,
    /// Role requirement, if any
    pub required_role_id: Option<u64>,
    /// Channel the listing will be posted to
    pub channel_id: Option<u64>,
}

impl NewListing {
    /// Attaches the assigned id, producing a record with no posted message yet.
    #[must_use]
    pub fn into_record(self, id: u64) -> ListingRecord {
        ListingRecord {
            id,
            embed: self.embed,
            download_link: self.download_link,
            required_role_id: self.required_role_id,
            message_id: None,
            channel_id: self.channel_id,
        }
    }
}
