//! PostgreSQL implementation of InnovationStore.

use async_trait::async_trait;
use uuid::Uuid;
use voteweb_store::{InnovationStore, StoreError};
use voteweb_types::{Innovation, NewInnovation};

use crate::row::{select_innovation, InnovationRow};
use crate::{PgError, PgLedger};

#[async_trait]
impl InnovationStore for PgLedger {
    async fn innovation_by_slug(
        &self,
        group_slug: &str,
        slug: &str,
    ) -> Result<Option<Innovation>, StoreError> {
        let row = sqlx::query_as::<_, InnovationRow>(select_innovation!(
            "FROM innovations WHERE group_slug = $1 AND slug = $2"
        ))
        .bind(group_slug)
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(PgError::from)?;
        Ok(row.map(Innovation::from))
    }

    async fn list_innovations(&self) -> Result<Vec<Innovation>, StoreError> {
        let rows = sqlx::query_as::<_, InnovationRow>(select_innovation!(
            "FROM innovations ORDER BY group_slug, name"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(PgError::from)?;
        Ok(rows.into_iter().map(Innovation::from).collect())
    }

    async fn upsert_innovation(
        &self,
        innovation: NewInnovation,
    ) -> Result<Innovation, StoreError> {
        let row = sqlx::query_as::<_, InnovationRow>(concat!(
            "WITH upserted AS (",
            "INSERT INTO innovations (id, group_slug, slug, name, division, entity_name, pic, ",
            "description, logo_innovation_url, logo_entity_url, video_url, slide_url, ig_url, yt_url) ",
            "VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) ",
            "ON CONFLICT (group_slug, slug) DO UPDATE SET ",
            "name = EXCLUDED.name, division = EXCLUDED.division, ",
            "entity_name = EXCLUDED.entity_name, pic = EXCLUDED.pic, ",
            "description = EXCLUDED.description, ",
            "logo_innovation_url = EXCLUDED.logo_innovation_url, ",
            "logo_entity_url = EXCLUDED.logo_entity_url, video_url = EXCLUDED.video_url, ",
            "slide_url = EXCLUDED.slide_url, ig_url = EXCLUDED.ig_url, yt_url = EXCLUDED.yt_url, ",
            "updated_at = now() ",
            "RETURNING *) ",
            select_innovation!("FROM upserted")
        ))
        .bind(Uuid::new_v4())
        .bind(&innovation.group_slug)
        .bind(&innovation.slug)
        .bind(&innovation.name)
        .bind(&innovation.division)
        .bind(&innovation.entity_name)
        .bind(&innovation.pic)
        .bind(&innovation.description)
        .bind(&innovation.logo_innovation_url)
        .bind(&innovation.logo_entity_url)
        .bind(&innovation.video_url)
        .bind(&innovation.slide_url)
        .bind(&innovation.ig_url)
        .bind(&innovation.yt_url)
        .fetch_one(self.pool())
        .await
        .map_err(PgError::from)?;
        Ok(row.into())
    }

    async fn innovation_count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM innovations")
            .fetch_one(self.pool())
            .await
            .map_err(PgError::from)?;
        Ok(count)
    }
}
