use sqlx::FromRow;
use uuid::Uuid;
use voteweb_types::{Innovation, InnovationId, Timestamp};

/// Column list shared by every query that returns an innovation. Timestamps
/// come back as whole epoch seconds.
macro_rules! select_innovation {
    ($tail:literal) => {
        concat!(
            "SELECT id, group_slug, slug, name, division, entity_name, pic, description, ",
            "logo_innovation_url, logo_entity_url, video_url, slide_url, ig_url, yt_url, ",
            "EXTRACT(EPOCH FROM created_at)::BIGINT AS created_at, ",
            "EXTRACT(EPOCH FROM updated_at)::BIGINT AS updated_at ",
            $tail
        )
    };
}
pub(crate) use select_innovation;

#[derive(Debug, FromRow)]
pub(crate) struct InnovationRow {
    id: Uuid,
    group_slug: String,
    slug: String,
    name: String,
    division: Option<String>,
    entity_name: Option<String>,
    pic: Option<String>,
    description: Option<String>,
    logo_innovation_url: Option<String>,
    logo_entity_url: Option<String>,
    video_url: Option<String>,
    slide_url: Option<String>,
    ig_url: Option<String>,
    yt_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<InnovationRow> for Innovation {
    fn from(row: InnovationRow) -> Self {
        Innovation {
            id: InnovationId::new(row.id),
            group_slug: row.group_slug,
            slug: row.slug,
            name: row.name,
            division: row.division,
            entity_name: row.entity_name,
            pic: row.pic,
            description: row.description,
            logo_innovation_url: row.logo_innovation_url,
            logo_entity_url: row.logo_entity_url,
            video_url: row.video_url,
            slide_url: row.slide_url,
            ig_url: row.ig_url,
            yt_url: row.yt_url,
            created_at: Timestamp::from_epoch_i64(row.created_at),
            updated_at: Timestamp::from_epoch_i64(row.updated_at),
        }
    }
}
