//! The listing form, shared by `create_listing` and `edit_listing`.
//!
//! Which of the two a submission belongs to is carried by the modal's custom id
//! (see [`crate::core::custom_id::FormContext`]), not by the form itself.

use crate::core::render::ListingDraft;

/// Five text inputs describing a listing.
#[derive(Debug, Clone, PartialEq, Eq, poise::Modal)]
#[name = "Embed Builder"]
pub struct ListingForm {
    /// Embed title
    #[name = "Title"]
    #[max_length = 256]
    pub title: String,
    /// Embed description
    #[name = "Description"]
    #[paragraph]
    pub description: Option<String>,
    /// `name:value` pairs joined by `|`
    #[name = "Fields (format: name:value|name:value)"]
    #[paragraph]
    pub fields: Option<String>,
    /// Hex accent color
    #[name = "Color (hex, e.g. #5865F2)"]
    pub color: Option<String>,
    /// File path or URL delivered on download
    #[name = "Download Link or File Path"]
    pub download_link: String,
}

impl From<ListingForm> for ListingDraft {
    fn from(form: ListingForm) -> Self {
        Self {
            title: form.title,
            description: form.description,
            fields: form.fields.unwrap_or_default(),
            color: form.color.unwrap_or_default(),
            download_link: form.download_link,
        }
    }
}

impl From<ListingDraft> for ListingForm {
    fn from(draft: ListingDraft) -> Self {
        let non_empty = |value: String| Some(value).filter(|v| !v.is_empty());
        Self {
            title: draft.title,
            description: draft.description.and_then(non_empty),
            fields: non_empty(draft.fields),
            color: non_empty(draft.color),
            download_link: draft.download_link,
        }
    }
}
