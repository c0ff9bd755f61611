//! Innovation catalog storage trait.

use async_trait::async_trait;
use voteweb_types::{Innovation, NewInnovation};

use crate::StoreError;

#[async_trait]
pub trait InnovationStore: Send + Sync {
    /// Look up an innovation by its (group, slug) key.
    async fn innovation_by_slug(
        &self,
        group_slug: &str,
        slug: &str,
    ) -> Result<Option<Innovation>, StoreError>;

    /// All innovations ordered by group, then name.
    async fn list_innovations(&self) -> Result<Vec<Innovation>, StoreError>;

    /// Insert, or update the descriptive fields of an existing (group, slug).
    /// The id of an existing row is preserved.
    async fn upsert_innovation(&self, innovation: NewInnovation)
        -> Result<Innovation, StoreError>;

    async fn innovation_count(&self) -> Result<i64, StoreError>;
}
