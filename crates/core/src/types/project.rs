//! Project records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::ProjectId;
use super::resource::{Resource, ResourceKind};
use super::status::ProjectStatus;

/// A project as returned by `GET /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Creatable fields of a [`Project`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
}

impl Resource for Project {
    type Id = ProjectId;
    type Status = ProjectStatus;
    type Draft = ProjectDraft;

    const KIND: ResourceKind = ResourceKind::Project;

    fn id(&self) -> ProjectId {
        self.id
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }

    fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    fn matches_draft(&self, draft: &ProjectDraft) -> bool {
        self.name == draft.name
            && self.description == draft.description
            && self.status == draft.status
    }
}
