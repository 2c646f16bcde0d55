use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// A blob held by the media host, referenced by its public URL and storage id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub url: String,
    pub public_id: String,
}

pub fn to_offset(dt: bson::DateTime) -> OffsetDateTime {
    dt.to_time_0_3()
}

pub fn to_offset_opt(dt: Option<bson::DateTime>) -> Option<OffsetDateTime> {
    dt.map(bson::DateTime::to_time_0_3)
}

pub(crate) fn default_true() -> bool {
    true
}
