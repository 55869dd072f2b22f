//! The resource abstraction shared by projects, tickets and assets.
//!
//! A [`Resource`] is a server-owned record with a server-assigned id, a
//! status that can be changed in place, and a creatable [`Resource::Draft`].
//! Everything kind-specific the client needs beyond that (collection path,
//! display labels, field layout) lives in [`ResourceKind`] as static data.

use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

use serde::{Serialize, de::DeserializeOwned};

use super::status::{AssetStatus, AssetType, ParseChoiceError, ProjectStatus, TicketPriority, TicketStatus};

/// A record kind exposed by the portal API.
pub trait Resource: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Typed id for this kind.
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// The field replaced by status updates.
    type Status: Copy + Eq + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static;

    /// Creatable fields, with the portal's form defaults as `Default`.
    type Draft: Clone + Default + fmt::Debug + Serialize + Send + Sync + 'static;

    /// Which kind this is.
    const KIND: ResourceKind;

    /// Server-assigned id.
    fn id(&self) -> Self::Id;

    /// Current status.
    fn status(&self) -> Self::Status;

    /// Replace the status, leaving every other field untouched.
    fn set_status(&mut self, status: Self::Status);

    /// Whether the record's creatable fields equal `draft`.
    ///
    /// Server-managed fields (`id`, timestamps) are not compared.
    fn matches_draft(&self, draft: &Self::Draft) -> bool;
}

/// The three resource kinds of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Ticket,
    Asset,
}

impl ResourceKind {
    pub const ALL: &'static [Self] = &[Self::Project, Self::Ticket, Self::Asset];

    /// Collection segment of the API path (`/projects`, ...).
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Ticket => "tickets",
            Self::Asset => "assets",
        }
    }

    /// Singular, lowercase label for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Ticket => "ticket",
            Self::Asset => "asset",
        }
    }

    /// Field layout used to render records and forms of this kind.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Project => PROJECT_FIELDS,
            Self::Ticket => TICKET_FIELDS,
            Self::Asset => ASSET_FIELDS,
        }
    }

    /// Wire values accepted by status updates of this kind.
    #[must_use]
    pub const fn status_values(self) -> &'static [&'static str] {
        match self {
            Self::Project => ProjectStatus::WIRE_VALUES,
            Self::Ticket => TicketStatus::WIRE_VALUES,
            Self::Asset => AssetStatus::WIRE_VALUES,
        }
    }

    /// Look up a field by its wire name.
    #[must_use]
    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|field| field.name == name)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for ResourceKind {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.collection() == s || kind.label() == s)
            .ok_or_else(|| ParseChoiceError {
                field: "resource kind",
                value: s.to_owned(),
                expected: "projects, tickets, assets".to_owned(),
            })
    }
}

/// How a field is entered in a create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    /// Single-line text.
    Text,
    /// Multi-line text.
    LongText,
    /// One of a fixed set of wire values.
    Choice(&'static [&'static str]),
}

/// One field of a resource as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key on the wire.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub input: FieldInput,
    /// Whether an empty value means "not set".
    pub optional: bool,
}

impl FieldSpec {
    const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            input: FieldInput::Text,
            optional: false,
        }
    }

    const fn long_text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            input: FieldInput::LongText,
            optional: false,
        }
    }

    const fn choice(name: &'static str, label: &'static str, values: &'static [&'static str]) -> Self {
        Self {
            name,
            label,
            input: FieldInput::Choice(values),
            optional: false,
        }
    }

    const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "Name"),
    FieldSpec::long_text("description", "Description"),
    FieldSpec::choice("status", "Status", ProjectStatus::WIRE_VALUES),
];

const TICKET_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::long_text("description", "Description"),
    FieldSpec::text("requester_email", "Requester Email").optional(),
    FieldSpec::choice("priority", "Priority", TicketPriority::WIRE_VALUES),
    FieldSpec::choice("status", "Status", TicketStatus::WIRE_VALUES),
];

const ASSET_FIELDS: &[FieldSpec] = &[
    FieldSpec::choice("type", "Type", AssetType::WIRE_VALUES),
    FieldSpec::choice("status", "Status", AssetStatus::WIRE_VALUES),
    FieldSpec::text("make_model", "Make & Model"),
    FieldSpec::text("serial", "Serial"),
    FieldSpec::text("assigned_to", "Assigned To").optional(),
];
