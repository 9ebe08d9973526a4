//! # Family member records
//!
//! Defines the records held by [`crate::ProfileStore`]. They are
//! `Serialize + Deserialize` because the member list is persisted as JSON
//! under [`crate::FAMILY_MEMBERS_KEY`].
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`FamilyMember`] | One person whose health data can be viewed through the app. Carries an opaque unique `id`, the display name, the relationship to the account holder and a date of birth. Any other profile attributes ride along in `extra` untouched. |
//! | [`NewFamilyMember`] | A member that has not been added yet (no `id`). Input to [`crate::ProfileStore::add_member`]. |
//! | [`FamilySnapshot`] | The published store state: member list, current selection and the hydration flag. |
//!
//! The id [`CURRENT_USER_ID`] is reserved for the authenticated account holder.
//! That record is supplied by the caller at read time and never stored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Selector meaning "the logged-in account holder".
pub const CURRENT_USER_ID: &str = "currentUser";

/// A family member profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    /// Opaque unique id: "2026-10-15T08:30:00.123Z-0"
    pub id: String,
    /// Name shown in the profile switcher: "Asha"
    pub display_name: String,
    /// Relationship to the account holder: "daughter"
    pub relationship: String,
    /// ISO date: "2010-01-01"
    pub date_of_birth: String,
    /// Remaining profile attributes (blood group, allergies, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FamilyMember {
    /// Whether this record is the account holder rather than a stored member.
    pub fn is_current_user(&self) -> bool {
        self.id == CURRENT_USER_ID
    }
}

/// A family member before an id has been assigned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFamilyMember {
    pub display_name: String,
    pub relationship: String,
    pub date_of_birth: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewFamilyMember {
    pub fn new(
        display_name: impl Into<String>,
        relationship: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            relationship: relationship.into(),
            date_of_birth: date_of_birth.into(),
            extra: Map::new(),
        }
    }

    /// Builder method to attach an extra profile attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub(crate) fn into_member(self, id: String) -> FamilyMember {
        FamilyMember {
            id,
            display_name: self.display_name,
            relationship: self.relationship,
            date_of_birth: self.date_of_birth,
            extra: self.extra,
        }
    }
}

/// Point-in-time copy of the profile store state.
#[derive(Clone, Debug, PartialEq)]
pub struct FamilySnapshot {
    pub members: Vec<FamilyMember>,
    /// Either [`CURRENT_USER_ID`] or a member id (possibly dangling).
    pub selected_member_id: String,
    pub hydrated: bool,
}

impl Default for FamilySnapshot {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            selected_member_id: CURRENT_USER_ID.to_string(),
            hydrated: false,
        }
    }
}

impl FamilySnapshot {
    /// Resolve the selection against the member list.
    ///
    /// Falls back to `current_user` for the sentinel and for a selection whose
    /// member has since been removed.
    pub fn selected_member(&self, current_user: &FamilyMember) -> FamilyMember {
        if self.selected_member_id == CURRENT_USER_ID {
            return current_user.clone();
        }
        self.members
            .iter()
            .find(|m| m.id == self.selected_member_id)
            .cloned()
            .unwrap_or_else(|| current_user.clone())
    }
}
