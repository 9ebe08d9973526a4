//! # Persisted member list — JSON payload
//!
//! The member list is stored under [`FAMILY_MEMBERS_KEY`] as JSON. New writes
//! use a versioned envelope:
//!
//! ```json
//! {"version":1,"members":[{"id":"...","displayName":"Asha","relationship":"daughter","dateOfBirth":"2010-01-01"}]}
//! ```
//!
//! A bare JSON array of members (the layout written before the envelope
//! existed) is still accepted on read.
//!
//! Decoding is strict here and lenient in [`crate::ProfileStore::hydrate`]:
//! any [`PayloadError`] makes the store hydrate to an empty list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{FamilyMember, CURRENT_USER_ID};

/// Storage key holding the persisted member list.
pub const FAMILY_MEMBERS_KEY: &str = "allwayscare-family-members";

/// Envelope version written by this crate.
pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed member payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("member payload version {found} is newer than supported version {PAYLOAD_VERSION}")]
    UnsupportedVersion { found: u32 },
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    members: &'a [FamilyMember],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned {
        version: u32,
        members: Vec<FamilyMember>,
    },
    Legacy(Vec<FamilyMember>),
}

/// Serialize the member list into the current envelope.
pub fn encode_members(members: &[FamilyMember]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope {
        version: PAYLOAD_VERSION,
        members,
    })
}

/// Parse a stored payload (envelope or legacy array).
pub fn decode_members(raw: &str) -> Result<Vec<FamilyMember>, PayloadError> {
    match serde_json::from_str::<Stored>(raw)? {
        Stored::Versioned { version, .. } if version > PAYLOAD_VERSION => {
            Err(PayloadError::UnsupportedVersion { found: version })
        }
        Stored::Versioned { members, .. } | Stored::Legacy(members) => Ok(members),
    }
}

/// Drop records the store must never hold: the reserved sentinel id and
/// repeated ids (first occurrence wins). Returns how many were dropped.
pub(crate) fn retain_valid(members: &mut Vec<FamilyMember>) -> usize {
    let before = members.len();
    let mut seen = HashSet::new();
    members.retain(|m| m.id != CURRENT_USER_ID && !m.id.is_empty() && seen.insert(m.id.clone()));
    before - members.len()
}
