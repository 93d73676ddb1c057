//! Per-user display metadata.

use serde::{Deserialize, Serialize};

/// Row in the `profiles` table. `id` equals the owning session user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Media host public id, or a full https URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}
