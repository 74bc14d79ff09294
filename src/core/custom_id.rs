//! Identifiers carried by the download button and the listing form.
//!
//! Both encode everything their handler needs, so no state has to survive
//! between opening a form and receiving its submission.
//!
//! - `download_<listing id>`
//! - `listing_form:create` or `listing_form:create:<role id>`
//! - `listing_form:edit:<listing id>`

use crate::errors::{Error, Result};

/// Prefix of every download button id.
pub const DOWNLOAD_PREFIX: &str = "download_";

/// Prefix of every listing form id.
pub const FORM_PREFIX: &str = "listing_form";

/// Custom id of the download button for `listing_id`.
#[must_use]
pub fn download_button_id(listing_id: u64) -> String {
    format!("{DOWNLOAD_PREFIX}{listing_id}")
}

/// Listing id encoded in a download button id, if `custom_id` is one.
#[must_use]
pub fn parse_download_button_id(custom_id: &str) -> Option<u64> {
    custom_id
        .strip_prefix(DOWNLOAD_PREFIX)?
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
}

/// What a submitted listing form should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormContext {
    /// Create a new listing, optionally gated behind a role.
    Create {
        /// Role picked on the `create_listing` command
        required_role_id: Option<u64>,
    },
    /// Replace the content of an existing listing.
    Edit {
        /// Listing being edited
        listing_id: u64,
    },
}

impl FormContext {
    /// `true` if `custom_id` belongs to a listing form.
    #[must_use]
    pub fn matches(custom_id: &str) -> bool {
        custom_id == FORM_PREFIX || custom_id.starts_with(&format!("{FORM_PREFIX}:"))
    }

    /// Encodes this context as a modal custom id.
    #[must_use]
    pub fn custom_id(&self) -> String {
        match self {
            Self::Create {
                required_role_id: None,
            } => format!("{FORM_PREFIX}:create"),
            Self::Create {
                required_role_id: Some(role_id),
            } => format!("{FORM_PREFIX}:create:{role_id}"),
            Self::Edit { listing_id } => format!("{FORM_PREFIX}:edit:{listing_id}"),
        }
    }

    /// Decodes a modal custom id produced by [`Self::custom_id`].
    pub fn parse(custom_id: &str) -> Result<Self> {
        let invalid = || Error::InvalidCustomId {
            custom_id: custom_id.to_string(),
        };
        let parse_id = |raw: &str| raw.parse::<u64>().ok().filter(|id| *id > 0);

        let rest = custom_id
            .strip_prefix(FORM_PREFIX)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(invalid)?;

        match rest.split_once(':') {
            None if rest == "create" => Ok(Self::Create {
                required_role_id: None,
            }),
            Some(("create", role)) => parse_id(role)
                .map(|role_id| Self::Create {
                    required_role_id: Some(role_id),
                })
                .ok_or_else(invalid),
            Some(("edit", listing)) => parse_id(listing)
                .map(|listing_id| Self::Edit { listing_id })
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_download_button_id() {
        assert_eq!(download_button_id(12), "download_12");
        assert_eq!(parse_download_button_id("download_12"), Some(12));
        assert_eq!(parse_download_button_id("download_"), None);
        assert_eq!(parse_download_button_id("download_0"), None);
        assert_eq!(parse_download_button_id("download_x"), None);
        assert_eq!(parse_download_button_id("upload_3"), None);
    }

    #[test]
    fn test_form_context_encodings() {
        let contexts = [
            FormContext::Create {
                required_role_id: None,
            },
            FormContext::Create {
                required_role_id: Some(987_654_321_000),
            },
            FormContext::Edit { listing_id: 7 },
        ];
        for context in contexts {
            let id = context.custom_id();
            assert!(FormContext::matches(&id), "{id}");
            assert_eq!(FormContext::parse(&id).unwrap(), context);
        }
        assert_eq!(
            FormContext::Edit { listing_id: 7 }.custom_id(),
            "listing_form:edit:7"
        );
    }

    #[test]
    fn test_form_context_rejects_malformed_ids() {
        for id in [
            "listing_form",
            "listing_form:",
            "listing_form:edit",
            "listing_form:edit:",
            "listing_form:edit:abc",
            "listing_form:edit:0",
            "listing_form:create:",
            "listing_form:delete:3",
            "listing_formx:create",
            "embed_builder_modal",
        ] {
            assert!(
                matches!(FormContext::parse(id), Err(Error::InvalidCustomId { .. })),
                "{id}"
            );
        }
        assert!(!FormContext::matches("embed_builder_modal"));
    }
}
