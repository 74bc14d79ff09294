//! Listing rendering - turns raw form input into embed payloads and back.
//!
//! Everything here is pure: malformed input is coerced or dropped, never rejected.

use crate::entities::{EmbedField, EmbedFooter, EmbedPayload, ListingRecord};

/// Accent used when no valid color was supplied (Discord blurple).
pub const DEFAULT_ACCENT: u32 = 0x0058_65F2;

/// Largest value an embed color can take.
pub const MAX_COLOR: u32 = 0x00FF_FFFF;

/// Discord accepts at most this many fields per embed.
pub const MAX_EMBED_FIELDS: usize = 25;

/// Longest field name Discord accepts, in characters.
pub const MAX_FIELD_NAME_CHARS: usize = 256;

/// Longest field value Discord accepts, in characters.
pub const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// Discord accepts at most this many embeds in one message.
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;

/// Combined text budget of all embeds in one message.
pub const MAX_MESSAGE_EMBED_CHARS: usize = 6000;

/// Title of the summary embed produced for `list_listings`.
pub const SUMMARY_TITLE: &str = "Download Listings";

/// The five raw values of the listing form, before any parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingDraft {
    /// Embed title (required)
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// `name:value` pairs joined by `|`
    pub fields: String,
    /// Hex color, with or without a leading `#`
    pub color: String,
    /// Local file path or URL
    pub download_link: String,
}

impl ListingDraft {
    /// Defaults shown when creating a listing: everything blank except the accent color.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            color: format_color(DEFAULT_ACCENT),
            ..Self::default()
        }
    }

    /// Defaults shown when editing: the record's current content in form syntax.
    #[must_use]
    pub fn from_record(listing: &ListingRecord) -> Self {
        Self {
            title: listing.embed.title.clone(),
            description: listing.embed.description.clone(),
            fields: format_fields(&listing.embed.fields),
            color: format_color(listing.embed.color),
            download_link: listing.download_link.clone(),
        }
    }

    /// Renders this draft into a display payload.
    #[must_use]
    pub fn render(&self, footer: Option<EmbedFooter>) -> EmbedPayload {
        EmbedPayload {
            title: self.title.clone(),
            description: self
                .description
                .as_ref()
                .filter(|description| !description.trim().is_empty())
                .cloned(),
            fields: parse_fields(&self.fields),
            color: parse_color(&self.color),
            footer,
        }
    }
}

/// Parses `name:value|name:value` into embed fields.
///
/// Each entry splits on its first `:`; entries without one, or with a blank
/// name or value, are dropped. Names and values are trimmed, clipped to
/// Discord's field limits, and input order is kept.
#[must_use]
pub fn parse_fields(input: &str) -> Vec<EmbedField> {
    input
        .split('|')
        .filter_map(|entry| entry.split_once(':'))
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .map(|(name, value)| EmbedField {
            name: clip(name, MAX_FIELD_NAME_CHARS),
            value: clip(value, MAX_FIELD_VALUE_CHARS),
            inline: false,
        })
        .collect()
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
#[must_use]
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Parses a hex color such as `#5865F2`, falling back to [`DEFAULT_ACCENT`].
#[must_use]
pub fn parse_color(input: &str) -> u32 {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return DEFAULT_ACCENT;
    }

    u32::from_str_radix(hex, 16)
        .ok()
        .filter(|color| *color <= MAX_COLOR)
        .unwrap_or(DEFAULT_ACCENT)
}

/// Inverse of [`parse_fields`].
#[must_use]
pub fn format_fields(fields: &[EmbedField]) -> String {
    fields
        .iter()
        .map(|field| format!("{}:{}", field.name, field.value))
        .collect::<Vec<_>>()
        .join("|")
}

/// Formats a color as `#rrggbb`.
#[must_use]
pub fn format_color(color: u32) -> String {
    format!("#{color:06x}")
}

/// One summary row per listing: `ID: <id> - <title>` / `<access> | Link: <link>`.
///
/// Rows are clipped to Discord's field limits.
#[must_use]
pub fn summary_fields(listings: &[ListingRecord]) -> Vec<EmbedField> {
    listings
        .iter()
        .map(|listing| {
            let access = listing
                .required_role_id
                .map_or_else(|| "Free".to_string(), |role| format!("Role ID: {role}"));
            EmbedField {
                name: clip(
                    &format!("ID: {} - {}", listing.id, listing.embed.title),
                    MAX_FIELD_NAME_CHARS,
                ),
                value: clip(
                    &format!("{access} | Link: {}", listing.download_link),
                    MAX_FIELD_VALUE_CHARS,
                ),
                inline: false,
            }
        })
        .collect()
}

/// The `list_listings` reply: summary embeds that fit in one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingSummary {
    /// Embeds to send, in listing order
    pub embeds: Vec<EmbedPayload>,
    /// Rows that made it into `embeds`
    pub shown: usize,
    /// Listings in the store
    pub total: usize,
}

impl ListingSummary {
    /// `true` when there are no listings at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Note telling the reader the list was cut short, if it was.
    #[must_use]
    pub fn truncation_notice(&self) -> Option<String> {
        (self.shown < self.total).then(|| {
            format!(
                "Showing {} of {} listings; the rest did not fit in one message.",
                self.shown, self.total
            )
        })
    }
}

/// Packs summary rows into embeds for one message.
///
/// A new embed starts every [`MAX_EMBED_FIELDS`] rows. Packing stops at the first
/// row that would push the message past [`MAX_EMBEDS_PER_MESSAGE`] embeds or
/// [`MAX_MESSAGE_EMBED_CHARS`] characters of embed text.
#[must_use]
pub fn summary_embeds(listings: &[ListingRecord], footer: Option<&EmbedFooter>) -> ListingSummary {
    let header_chars =
        SUMMARY_TITLE.chars().count() + footer.map_or(0, |footer| footer.text.chars().count());
    let mut embeds: Vec<EmbedPayload> = Vec::new();
    let mut used = 0;

    for row in summary_fields(listings) {
        let starts_embed = embeds
            .last()
            .is_none_or(|embed| embed.fields.len() >= MAX_EMBED_FIELDS);
        let cost = row.name.chars().count()
            + row.value.chars().count()
            + if starts_embed { header_chars } else { 0 };

        if used + cost > MAX_MESSAGE_EMBED_CHARS
            || (starts_embed && embeds.len() >= MAX_EMBEDS_PER_MESSAGE)
        {
            break;
        }

        if starts_embed {
            embeds.push(EmbedPayload {
                title: SUMMARY_TITLE.to_string(),
                description: None,
                fields: Vec::new(),
                color: DEFAULT_ACCENT,
                footer: footer.cloned(),
            });
        }
        if let Some(embed) = embeds.last_mut() {
            embed.fields.push(row);
        }
        used += cost;
    }

    ListingSummary {
        shown: embeds.iter().map(|embed| embed.fields.len()).sum(),
        embeds,
        total: listings.len(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::NewListing;

    fn field(name: &str, value: &str) -> EmbedField {
        EmbedField {
            name: name.to_string(),
            value: value.to_string(),
            inline: false,
        }
    }

    #[test]
    fn test_parse_fields_drops_entries_without_separator() {
        let fields = parse_fields("Size: 12 MB|garbage| Version :2.1 ||OS:Linux");
        assert_eq!(
            fields,
            vec![field("Size", "12 MB"), field("Version", "2.1"), field("OS", "Linux")]
        );
    }

    #[test]
    fn test_parse_fields_splits_on_first_colon_only() {
        let fields = parse_fields("Mirror:https://example.com/a.zip");
        assert_eq!(fields, vec![field("Mirror", "https://example.com/a.zip")]);
    }

    #[test]
    fn test_parse_fields_empty_input() {
        assert!(parse_fields("").is_empty());
        assert!(parse_fields("no separators here").is_empty());
    }

    #[test]
    fn test_parse_fields_drops_blank_names_and_values() {
        let fields = parse_fields("Size:|:orphan|  :  |OS:Linux");
        assert_eq!(fields, vec![field("OS", "Linux")]);
    }

    #[test]
    fn test_parse_fields_clips_to_field_limits() {
        let input = format!("{}:{}", "n".repeat(300), "v".repeat(2000));
        let fields = parse_fields(&input);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name.chars().count(), MAX_FIELD_NAME_CHARS);
        assert_eq!(fields[0].value.chars().count(), MAX_FIELD_VALUE_CHARS);
        assert!(fields[0].name.ends_with('…'));
    }

    #[test]
    fn test_clip_counts_characters_not_bytes() {
        assert_eq!(clip("héllo", 5), "héllo");
        assert_eq!(clip("héllo wörld", 6), "héllo…");
        assert_eq!(clip("", 3), "");
    }

    #[test]
    fn test_parse_color_accepts_hex_with_or_without_hash() {
        assert_eq!(parse_color("#FF0000"), 0x00FF_0000);
        assert_eq!(parse_color("00ff7f"), 0x0000_FF7F);
        assert_eq!(parse_color(" #5865F2 "), DEFAULT_ACCENT);
    }

    #[test]
    fn test_parse_color_falls_back_on_bad_input() {
        for input in ["", "#", "blue", "#12345G", "+ff", "#1000000", "-1"] {
            assert_eq!(parse_color(input), DEFAULT_ACCENT, "input {input:?}");
        }
    }

    #[test]
    fn test_format_color_pads_to_six_digits() {
        assert_eq!(format_color(0xFF), "#0000ff");
        assert_eq!(format_color(DEFAULT_ACCENT), "#5865f2");
    }

    #[test]
    fn test_render_omits_blank_description() {
        let draft = ListingDraft {
            title: "Pack".to_string(),
            description: Some("   ".to_string()),
            fields: String::new(),
            color: "nope".to_string(),
            download_link: "pack.zip".to_string(),
        };

        let payload = draft.render(None);
        assert_eq!(payload.title, "Pack");
        assert_eq!(payload.description, None);
        assert!(payload.fields.is_empty());
        assert_eq!(payload.color, DEFAULT_ACCENT);
    }

    #[test]
    fn test_edit_defaults_reproduce_record_content() {
        let submitted = ListingDraft {
            title: "Pack".to_string(),
            description: Some("All the textures".to_string()),
            fields: "Size:12 MB|Version:2".to_string(),
            color: "#00AA00".to_string(),
            download_link: "files/pack.zip".to_string(),
        };
        let record = NewListing {
            embed: submitted.render(None),
            download_link: submitted.download_link.clone(),
            required_role_id: None,
            channel_id: None,
        }
        .into_record(1);

        let defaults = ListingDraft::from_record(&record);
        assert_eq!(defaults.fields, "Size:12 MB|Version:2");
        assert_eq!(defaults.color, "#00aa00");
        assert_eq!(defaults.render(None), record.embed);
    }

    #[test]
    fn test_blank_draft_defaults_to_accent() {
        let draft = ListingDraft::blank();
        assert!(draft.title.is_empty());
        assert_eq!(parse_color(&draft.color), DEFAULT_ACCENT);
    }

    fn listing(id: u64, title: &str, download_link: &str) -> ListingRecord {
        NewListing {
            embed: ListingDraft {
                title: title.to_string(),
                ..ListingDraft::blank()
            }
            .render(None),
            download_link: download_link.to_string(),
            required_role_id: None,
            channel_id: None,
        }
        .into_record(id)
    }

    fn message_chars(summary: &ListingSummary) -> usize {
        summary
            .embeds
            .iter()
            .map(|embed| {
                embed.title.chars().count()
                    + embed.footer.as_ref().map_or(0, |f| f.text.chars().count())
                    + embed
                        .fields
                        .iter()
                        .map(|f| f.name.chars().count() + f.value.chars().count())
                        .sum::<usize>()
            })
            .sum()
    }

    #[test]
    fn test_summary_rows_and_chunking() {
        let mut listings: Vec<ListingRecord> = (1..=30)
            .map(|id| listing(id, &format!("Pack {id}"), &format!("files/{id}.zip")))
            .collect();
        listings[1].required_role_id = Some(77);

        let rows = summary_fields(&listings[..2]);
        assert_eq!(rows[0].name, "ID: 1 - Pack 1");
        assert_eq!(rows[0].value, "Free | Link: files/1.zip");
        assert_eq!(rows[1].value, "Role ID: 77 | Link: files/2.zip");

        let summary = summary_embeds(&listings, None);
        assert_eq!(summary.embeds.len(), 2);
        assert_eq!(summary.embeds[0].fields.len(), MAX_EMBED_FIELDS);
        assert_eq!(summary.embeds[1].fields.len(), 5);
        assert_eq!(summary.truncation_notice(), None);

        let empty = summary_embeds(&[], None);
        assert!(empty.is_empty());
        assert!(empty.embeds.is_empty());
    }

    #[test]
    fn test_summary_rows_respect_field_limits() {
        let link = format!("https://example.com/{}", "x".repeat(1100));
        let listings = [listing(1, &"t".repeat(256), &link)];

        let rows = summary_fields(&listings);
        assert_eq!(rows[0].name.chars().count(), MAX_FIELD_NAME_CHARS);
        assert!(rows[0].name.starts_with("ID: 1 - "));
        assert_eq!(rows[0].value.chars().count(), MAX_FIELD_VALUE_CHARS);
    }

    #[test]
    fn test_summary_stays_within_message_text_budget() {
        let footer = EmbedFooter {
            text: "Download Desk".to_string(),
            icon_url: None,
        };
        let listings: Vec<ListingRecord> = (1..=20)
            .map(|id| listing(id, &"t".repeat(250), &"l".repeat(900)))
            .collect();

        let summary = summary_embeds(&listings, Some(&footer));
        assert!(message_chars(&summary) <= MAX_MESSAGE_EMBED_CHARS);
        assert!(summary.shown > 0);
        assert!(summary.shown < listings.len());
        assert_eq!(summary.total, listings.len());
        assert_eq!(
            summary.embeds[0].fields[0].name,
            format!("ID: 1 - {}…", "t".repeat(247))
        );

        let notice = summary.truncation_notice().unwrap();
        assert!(notice.starts_with(&format!("Showing {} of 20 listings", summary.shown)));
    }

    #[test]
    fn test_summary_of_many_short_rows_fits_one_message() {
        let listings: Vec<ListingRecord> = (1..=300).map(|id| listing(id, "P", "f")).collect();

        let summary = summary_embeds(&listings, None);
        assert!(summary.embeds.len() <= MAX_EMBEDS_PER_MESSAGE);
        assert!(summary.embeds.iter().all(|e| e.fields.len() <= MAX_EMBED_FIELDS));
        assert!(message_chars(&summary) <= MAX_MESSAGE_EMBED_CHARS);
        assert!(summary.shown < listings.len());
        assert!(summary.truncation_notice().unwrap().contains("of 300"));
    }
}
