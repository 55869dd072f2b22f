//! Closed-choice values for resource fields.
//!
//! Every value serializes as the exact lowercase string the API expects
//! (`"in-progress"`, `"in-use"`, ...), and round-trips through `Display` and
//! `FromStr` with the same spelling.

use thiserror::Error;

/// A string that does not name any variant of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {value} (expected one of: {expected})")]
pub struct ParseChoiceError {
    /// Field being parsed, e.g. `"ticket priority"`.
    pub field: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma-separated list of accepted values.
    pub expected: String,
}

/// Defines a closed-choice enum with its wire spelling.
///
/// Generates `serde` (de)serialization, `Display`, `FromStr`, `as_str()` and
/// an `ALL` slice in declaration order. The variant marked first is the
/// `Default`.
macro_rules! define_choice {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            #[default]
            $first:ident => $first_wire:literal,
            $($variant:ident => $wire:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        pub enum $name {
            #[default]
            #[serde(rename = $first_wire)]
            $first,
            $(
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        impl $name {
            /// Every variant, in the order the portal offers them.
            pub const ALL: &'static [Self] = &[Self::$first, $(Self::$variant),*];

            /// Wire spellings, in the same order as [`Self::ALL`].
            pub const WIRE_VALUES: &'static [&'static str] = &[$first_wire, $($wire),*];

            /// The value as sent to and received from the API.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    Self::$first => $first_wire,
                    $(Self::$variant => $wire,)*
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ParseChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == s)
                    .ok_or_else(|| ParseChoiceError {
                        field: $field,
                        value: s.to_owned(),
                        expected: Self::WIRE_VALUES.join(", "),
                    })
            }
        }
    };
}

define_choice! {
    /// Project lifecycle status.
    ProjectStatus, "project status" {
        #[default]
        Planned => "planned",
        Active => "active",
        Done => "done",
    }
}

define_choice! {
    /// Ticket urgency.
    TicketPriority, "ticket priority" {
        #[default]
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

define_choice! {
    /// Ticket workflow status.
    TicketStatus, "ticket status" {
        #[default]
        Open => "open",
        InProgress => "in-progress",
        Resolved => "resolved",
    }
}

define_choice! {
    /// Kind of tracked hardware or virtual machine.
    AssetType, "asset type" {
        #[default]
        Laptop => "laptop",
        Monitor => "monitor",
        Vm => "vm",
    }
}

define_choice! {
    /// Asset lifecycle status.
    AssetStatus, "asset status" {
        #[default]
        Stock => "stock",
        InUse => "in-use",
        Retired => "retired",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenated_wire_values() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<AssetStatus>("\"in-use\"").unwrap(),
            AssetStatus::InUse
        );
    }

    #[test]
    fn test_display_matches_from_str() {
        for status in ProjectStatus::ALL {
            assert_eq!(status.to_string().parse::<ProjectStatus>().unwrap(), *status);
        }
        for kind in AssetType::ALL {
            assert_eq!(kind.as_str().parse::<AssetType>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_defaults_match_portal_forms() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Planned);
        assert_eq!(TicketPriority::default(), TicketPriority::Low);
        assert_eq!(TicketStatus::default(), TicketStatus::Open);
        assert_eq!(AssetType::default(), AssetType::Laptop);
        assert_eq!(AssetStatus::default(), AssetStatus::Stock);
    }

    #[test]
    fn test_parse_rejects_unknown_value() {
        let err = "in_progress".parse::<TicketStatus>().unwrap_err();
        assert_eq!(err.field, "ticket status");
        assert_eq!(
            err.to_string(),
            "invalid ticket status: in_progress (expected one of: open, in-progress, resolved)"
        );
    }

    #[test]
    fn test_unknown_wire_value_fails_to_deserialize() {
        assert!(serde_json::from_str::<ProjectStatus>("\"archived\"").is_err());
    }
}
