//! Innovation catalog entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{InputError, Timestamp};

/// Longest group or slug segment accepted from a request path.
pub const MAX_SLUG_LEN: usize = 255;

/// Opaque unique identifier of an innovation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InnovationId(Uuid);

impl InnovationId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for InnovationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry visitors can vote for.
///
/// `(group_slug, slug)` is unique across the catalog. Entries are created
/// and updated only by seeding; the vote path never mutates them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innovation {
    pub id: InnovationId,
    pub group_slug: String,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_innovation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_entity_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ig_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yt_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Innovation {
    /// The `group/slug` path this entry is addressed by.
    pub fn path(&self) -> String {
        format!("{}/{}", self.group_slug, self.slug)
    }
}

/// Fields supplied when seeding an innovation. Timestamps and the id are
/// assigned by the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewInnovation {
    pub group_slug: String,
    pub slug: String,
    pub name: String,
    pub division: Option<String>,
    pub entity_name: Option<String>,
    pub pic: Option<String>,
    pub description: Option<String>,
    pub logo_innovation_url: Option<String>,
    pub logo_entity_url: Option<String>,
    pub video_url: Option<String>,
    pub slide_url: Option<String>,
    pub ig_url: Option<String>,
    pub yt_url: Option<String>,
}

impl NewInnovation {
    pub fn new(
        group_slug: impl Into<String>,
        slug: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            group_slug: group_slug.into(),
            slug: slug.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }

    /// Materialize into a stored record. Used by in-memory ledgers.
    pub fn into_innovation(self, id: InnovationId, now: Timestamp) -> Innovation {
        Innovation {
            id,
            group_slug: self.group_slug,
            slug: self.slug,
            name: self.name,
            division: self.division,
            entity_name: self.entity_name,
            pic: self.pic,
            description: self.description,
            logo_innovation_url: self.logo_innovation_url,
            logo_entity_url: self.logo_entity_url,
            video_url: self.video_url,
            slide_url: self.slide_url,
            ig_url: self.ig_url,
            yt_url: self.yt_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Check a group or slug path segment: non-empty, at most
/// [`MAX_SLUG_LEN`] bytes, lowercase ASCII letters, digits and `-` only.
pub fn validate_slug(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.is_empty() {
        return Err(InputError::Empty { field });
    }
    if value.len() > MAX_SLUG_LEN {
        return Err(InputError::TooLong {
            field,
            max: MAX_SLUG_LEN,
        });
    }
    if !value
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(InputError::InvalidCharacters { field });
    }
    Ok(())
}
