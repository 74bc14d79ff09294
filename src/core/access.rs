//! Access gate - role-membership checks for managing and downloading listings.

use crate::entities::ListingRecord;

/// The user behind an interaction and the roles they hold in the guild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requester {
    /// Discord user id, used for private delivery
    pub user_id: u64,
    /// Role ids held in the guild
    pub roles: Vec<u64>,
}

impl Requester {
    /// Creates a requester from a user id and their roles.
    pub fn new(user_id: u64, roles: impl IntoIterator<Item = u64>) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
        }
    }

    /// `true` if the requester holds `role_id`.
    #[must_use]
    pub fn holds(&self, role_id: u64) -> bool {
        self.roles.contains(&role_id)
    }
}

/// Only holders of the manager role may create, edit, delete, or re-gate listings.
#[must_use]
pub fn can_manage(requester: &Requester, manager_role_id: u64) -> bool {
    requester.holds(manager_role_id)
}

/// Free listings are open to everyone; gated ones need their role.
#[must_use]
pub fn can_download(requester: &Requester, listing: &ListingRecord) -> bool {
    listing
        .required_role_id
        .is_none_or(|role_id| requester.holds(role_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::ListingDraft;
    use crate::entities::NewListing;

    fn listing(required_role_id: Option<u64>) -> ListingRecord {
        NewListing {
            embed: ListingDraft::blank().render(None),
            download_link: "pack.zip".to_string(),
            required_role_id,
            channel_id: None,
        }
        .into_record(1)
    }

    #[test]
    fn test_manage_requires_manager_role() {
        assert!(can_manage(&Requester::new(1, [5, 9]), 9));
        assert!(!can_manage(&Requester::new(1, [5]), 9));
        assert!(!can_manage(&Requester::new(1, []), 9));
    }

    #[test]
    fn test_free_listing_open_to_anyone() {
        let free = listing(None);
        assert!(can_download(&Requester::new(1, []), &free));
        assert!(can_download(&Requester::new(2, [3]), &free));
    }

    #[test]
    fn test_gated_listing_needs_its_role() {
        let gated = listing(Some(42));
        assert!(can_download(&Requester::new(1, [42]), &gated));
        assert!(!can_download(&Requester::new(1, [41, 43]), &gated));
    }
}
