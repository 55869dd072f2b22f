//! Hardware and VM inventory records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::AssetId;
use super::resource::{Resource, ResourceKind};
use super::status::{AssetStatus, AssetType};

/// An asset as returned by `GET /assets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    #[serde(rename = "type")]
    pub kind: AssetType,
    #[serde(default)]
    pub make_model: String,
    #[serde(default)]
    pub serial: String,
    /// Empty while the asset is unassigned.
    #[serde(default)]
    pub assigned_to: String,
    pub status: AssetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Asset {
    /// Current assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        Some(self.assigned_to.as_str()).filter(|name| !name.is_empty())
    }
}

/// Creatable fields of an [`Asset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDraft {
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub make_model: String,
    pub serial: String,
    pub assigned_to: String,
    pub status: AssetStatus,
}

impl Resource for Asset {
    type Id = AssetId;
    type Status = AssetStatus;
    type Draft = AssetDraft;

    const KIND: ResourceKind = ResourceKind::Asset;

    fn id(&self) -> AssetId {
        self.id
    }

    fn status(&self) -> AssetStatus {
        self.status
    }

    fn set_status(&mut self, status: AssetStatus) {
        self.status = status;
    }

    fn matches_draft(&self, draft: &AssetDraft) -> bool {
        self.kind == draft.kind
            && self.make_model == draft.make_model
            && self.serial == draft.serial
            && self.assigned_to == draft.assigned_to
            && self.status == draft.status
    }
}
