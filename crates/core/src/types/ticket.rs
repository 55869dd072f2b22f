//! Helpdesk ticket records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::TicketId;
use super::resource::{Resource, ResourceKind};
use super::status::{TicketPriority, TicketStatus};

/// A ticket as returned by `GET /tickets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    /// Empty when the ticket has no requester on file.
    #[serde(default)]
    pub requester_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Ticket {
    /// Requester email, if one was given.
    #[must_use]
    pub fn requester(&self) -> Option<&str> {
        Some(self.requester_email.as_str()).filter(|email| !email.is_empty())
    }
}

/// Creatable fields of a [`Ticket`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub requester_email: String,
}

impl Resource for Ticket {
    type Id = TicketId;
    type Status = TicketStatus;
    type Draft = TicketDraft;

    const KIND: ResourceKind = ResourceKind::Ticket;

    fn id(&self) -> TicketId {
        self.id
    }

    fn status(&self) -> TicketStatus {
        self.status
    }

    fn set_status(&mut self, status: TicketStatus) {
        self.status = status;
    }

    fn matches_draft(&self, draft: &TicketDraft) -> bool {
        self.title == draft.title
            && self.description == draft.description
            && self.priority == draft.priority
            && self.status == draft.status
            && self.requester_email == draft.requester_email
    }
}
