//! Bitmask permission codec.
//!
//! Every bit grants one capability to one actor class. Bits are assigned in a
//! fixed order (guest block, then user block, then group block; capabilities
//! peek, read, create, update, delete, execute, refer) starting at bit 1, and
//! [`PERMISSION_NAMES`] lists them in that order. Name lookups and formatting
//! walk the table, never a hash map, so output order is deterministic.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde_json::Value;

use crate::error::{ModelError, ModelResult};

bitflags! {
    /// Set of granted `(actor class, capability)` pairs stored as a 64-bit mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct AuthPermission: u64 {
        /// Guests may learn that the object exists.
        const GUEST_PEEK = 1 << 1;
        /// Guests may read the object.
        const GUEST_READ = 1 << 2;
        /// Guests may create objects.
        const GUEST_CREATE = 1 << 3;
        /// Guests may update the object.
        const GUEST_UPDATE = 1 << 4;
        /// Guests may delete the object.
        const GUEST_DELETE = 1 << 5;
        /// Guests may execute actions on the object.
        const GUEST_EXECUTE = 1 << 6;
        /// Guests may reference the object from other objects.
        const GUEST_REFER = 1 << 7;
        /// The owning user may learn that the object exists.
        const USER_PEEK = 1 << 8;
        /// The owning user may read the object.
        const USER_READ = 1 << 9;
        /// The owning user may create objects.
        const USER_CREATE = 1 << 10;
        /// The owning user may update the object.
        const USER_UPDATE = 1 << 11;
        /// The owning user may delete the object.
        const USER_DELETE = 1 << 12;
        /// The owning user may execute actions on the object.
        const USER_EXECUTE = 1 << 13;
        /// The owning user may reference the object.
        const USER_REFER = 1 << 14;
        /// Group members may learn that the object exists.
        const GROUP_PEEK = 1 << 15;
        /// Group members may read the object.
        const GROUP_READ = 1 << 16;
        /// Group members may create objects.
        const GROUP_CREATE = 1 << 17;
        /// Group members may update the object.
        const GROUP_UPDATE = 1 << 18;
        /// Group members may delete the object.
        const GROUP_DELETE = 1 << 19;
        /// Group members may execute actions on the object.
        const GROUP_EXECUTE = 1 << 20;
        /// Group members may reference the object.
        const GROUP_REFER = 1 << 21;
    }
}

/// Wire names paired with their flag, in bit order.
pub const PERMISSION_NAMES: [(&str, AuthPermission); 21] = [
    ("GuestPeek", AuthPermission::GUEST_PEEK),
    ("GuestRead", AuthPermission::GUEST_READ),
    ("GuestCreate", AuthPermission::GUEST_CREATE),
    ("GuestUpdate", AuthPermission::GUEST_UPDATE),
    ("GuestDelete", AuthPermission::GUEST_DELETE),
    ("GuestExecute", AuthPermission::GUEST_EXECUTE),
    ("GuestRefer", AuthPermission::GUEST_REFER),
    ("UserPeek", AuthPermission::USER_PEEK),
    ("UserRead", AuthPermission::USER_READ),
    ("UserCreate", AuthPermission::USER_CREATE),
    ("UserUpdate", AuthPermission::USER_UPDATE),
    ("UserDelete", AuthPermission::USER_DELETE),
    ("UserExecute", AuthPermission::USER_EXECUTE),
    ("UserRefer", AuthPermission::USER_REFER),
    ("GroupPeek", AuthPermission::GROUP_PEEK),
    ("GroupRead", AuthPermission::GROUP_READ),
    ("GroupCreate", AuthPermission::GROUP_CREATE),
    ("GroupUpdate", AuthPermission::GROUP_UPDATE),
    ("GroupDelete", AuthPermission::GROUP_DELETE),
    ("GroupExecute", AuthPermission::GROUP_EXECUTE),
    ("GroupRefer", AuthPermission::GROUP_REFER),
];

/// How a delta is merged into an existing permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOp {
    /// Grant the delta bits (bitwise OR).
    Union,
    /// Revoke the delta bits (AND-NOT).
    Subtract,
}

impl AuthPermission {
    /// Parse permission names, OR-ing the matching bits together.
    ///
    /// Tokens are trimmed. An empty token is not a permission name, so an
    /// empty list or a stray comma is rejected rather than read as "no grants".
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPermission`] for the first token that is not
    /// in [`PERMISSION_NAMES`].
    pub fn parse_names<I, S>(names: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::empty(), |acc, name| {
            let name = name.as_ref().trim();
            Self::from_permission_name(name)
                .map(|flag| acc | flag)
                .ok_or_else(|| ModelError::UnknownPermission {
                    name: name.to_string(),
                })
        })
    }

    /// Look up a single flag by its wire name.
    #[must_use]
    pub fn from_permission_name(name: &str) -> Option<Self> {
        PERMISSION_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, flag)| *flag)
    }

    /// Names of every set flag, in table order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        PERMISSION_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Merge `delta` into `self`.
    #[must_use]
    pub const fn combine(self, delta: Self, op: PermissionOp) -> Self {
        match op {
            PermissionOp::Union => self.union(delta),
            PermissionOp::Subtract => self.difference(delta),
        }
    }

    /// Decode the server's `permission` attribute (decimal string or integer).
    ///
    /// Bits outside the named table are retained so a write-back never drops
    /// grants this client does not know about.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidPermissionValue`] for anything other than a
    /// non-negative integer.
    pub fn from_attribute(value: &Value) -> ModelResult<Self> {
        let bits = match value {
            Value::String(text) => text.trim().parse::<u64>().ok(),
            Value::Number(number) => number.as_u64(),
            _ => None,
        };
        bits.map(Self::from_bits_retain)
            .ok_or_else(|| ModelError::InvalidPermissionValue {
                value: value.to_string(),
            })
    }

    /// Encode as the decimal string the server expects on write.
    #[must_use]
    pub fn to_attribute(self) -> Value {
        Value::String(self.bits().to_string())
    }
}

impl FromStr for AuthPermission {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse_names(value.split(','))
    }
}

impl fmt::Display for AuthPermission {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            formatter.write_str("None")
        } else {
            formatter.write_str(&names.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn all_names() -> Vec<&'static str> {
        PERMISSION_NAMES.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn table_assigns_consecutive_bits_from_one() {
        for (index, (_, flag)) in PERMISSION_NAMES.iter().enumerate() {
            assert_eq!(flag.bits(), 1_u64 << (index + 1));
        }
        assert_eq!(AuthPermission::GUEST_READ.bits(), 4);
        assert_eq!(PERMISSION_NAMES.len(), AuthPermission::all().iter().count());
    }

    #[test]
    fn parse_then_format_round_trips_as_a_set() {
        let names = all_names();
        let samples: Vec<Vec<&str>> = vec![
            vec![],
            vec!["GuestRead"],
            vec!["UserUpdate", "GuestPeek", "GroupRefer"],
            names.iter().copied().step_by(2).collect(),
            names.iter().copied().rev().step_by(3).collect(),
            names.clone(),
        ];
        for sample in samples {
            let parsed = AuthPermission::parse_names(&sample).expect("known names");
            let formatted: BTreeSet<&str> = parsed.names().into_iter().collect();
            let expected: BTreeSet<&str> = sample.into_iter().collect();
            assert_eq!(formatted, expected);
        }
    }

    #[test]
    fn names_follow_table_order() {
        let parsed = AuthPermission::parse_names(["GroupRead", "GuestPeek", "UserRead"])
            .expect("known names");
        assert_eq!(parsed.names(), vec!["GuestPeek", "UserRead", "GroupRead"]);
        assert_eq!(parsed.to_string(), "GuestPeek,UserRead,GroupRead");
        assert_eq!(AuthPermission::empty().to_string(), "None");
    }

    #[test]
    fn unknown_token_is_reported_verbatim_at_any_position() {
        let known = ["GuestRead", "UserUpdate", "GroupDelete"];
        for position in 0..=known.len() {
            let mut tokens: Vec<&str> = known.to_vec();
            tokens.insert(position, "UserTeleport");
            let err = AuthPermission::parse_names(&tokens).expect_err("unknown name must fail");
            assert_eq!(
                err,
                ModelError::UnknownPermission {
                    name: "UserTeleport".to_string()
                }
            );
        }
    }

    #[test]
    fn comma_list_trims_tokens_and_rejects_empty_ones() {
        let parsed: AuthPermission = " UserRead , UserUpdate".parse().expect("valid list");
        assert_eq!(parsed, AuthPermission::USER_READ | AuthPermission::USER_UPDATE);
        for raw in ["", "  ", "UserRead,,UserUpdate", "UserRead,"] {
            let err = raw.parse::<AuthPermission>().expect_err(raw);
            assert_eq!(
                err,
                ModelError::UnknownPermission {
                    name: String::new()
                }
            );
        }
        let err = "userread".parse::<AuthPermission>().expect_err("names are case-sensitive");
        assert!(err.to_string().contains("userread"));
    }

    #[test]
    fn union_is_commutative_and_idempotent() {
        let samples = [
            AuthPermission::empty(),
            AuthPermission::GUEST_READ,
            AuthPermission::GUEST_READ | AuthPermission::USER_READ,
            AuthPermission::USER_UPDATE | AuthPermission::GROUP_REFER,
            AuthPermission::all(),
        ];
        for p in samples {
            for q in samples {
                let merged = p.combine(q, PermissionOp::Union);
                assert_eq!(merged, q.combine(p, PermissionOp::Union));
                assert_eq!(merged.combine(q, PermissionOp::Union), merged);
            }
        }
    }

    #[test]
    fn subtract_after_union_clears_exactly_the_delta() {
        let samples = [
            AuthPermission::empty(),
            AuthPermission::GUEST_READ,
            AuthPermission::GUEST_READ | AuthPermission::USER_READ,
            AuthPermission::USER_UPDATE | AuthPermission::GROUP_REFER,
            AuthPermission::all(),
        ];
        for p in samples {
            for q in samples {
                let result = p
                    .combine(q, PermissionOp::Union)
                    .combine(q, PermissionOp::Subtract);
                assert!(!result.intersects(q));
                assert_eq!(result, p - q);
            }
        }
    }

    #[test]
    fn attribute_accepts_strings_and_numbers() {
        assert_eq!(
            AuthPermission::from_attribute(&json!("4")).expect("string"),
            AuthPermission::GUEST_READ
        );
        assert_eq!(
            AuthPermission::from_attribute(&json!(2564)).expect("number"),
            AuthPermission::GUEST_READ | AuthPermission::USER_READ | AuthPermission::USER_UPDATE
        );
        let unknown_bits = AuthPermission::from_attribute(&json!("1")).expect("bit zero");
        assert_eq!(unknown_bits.bits(), 1);
        assert!(unknown_bits.names().is_empty());
    }

    #[test]
    fn attribute_rejects_non_integers() {
        for value in [json!("abc"), json!(-3), json!(true), json!(null), json!(1.5)] {
            assert!(matches!(
                AuthPermission::from_attribute(&value),
                Err(ModelError::InvalidPermissionValue { .. })
            ));
        }
    }

    #[test]
    fn attribute_encoding_is_a_decimal_string() {
        let permission = AuthPermission::GUEST_READ | AuthPermission::USER_READ;
        assert_eq!(permission.to_attribute(), json!("516"));
    }
}
