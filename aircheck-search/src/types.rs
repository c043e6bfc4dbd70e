//! Wire types for the listing API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One listing entry. The API uses camelCase field names; the publication
/// date is RFC 3339.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub title: String,
    pub url: String,

    #[serde(rename = "publicationDate")]
    pub publication_date: DateTime<Utc>,

    #[serde(default)]
    pub description: Option<String>,
}
