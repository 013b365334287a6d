//! Address newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash;

/// An account address.
///
/// Either a 66-character `AdNe`-prefixed identifier, or one of the reserved
/// logical account names (`treasury`, `genesis`, `community`, `founder`),
/// which are exempt from the prefix/length constraint.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Wraps `s` without validating its shape.
    ///
    /// Used at trust boundaries (bootstrap, reserved accounts) where the
    /// caller is known to be constructing a valid or intentionally reserved
    /// address. User-submitted addresses should go through
    /// [`Address::parse_user_submitted`] instead.
    pub fn new(s: impl Into<String>) -> Self {
        Address(s.into())
    }

    /// Derives a fresh address from arbitrary seed bytes.
    pub fn derive(seed: &[u8]) -> Self {
        Address(hash::address_from(seed))
    }

    /// Validates `s` as an address a user-submitted transaction may carry:
    /// exactly 66 chars, `AdNe`-prefixed. Reserved accounts are rejected
    /// here, matching the data model's rule that they "never appear as the
    /// `from` of a user-submitted transaction except in bootstrap".
    pub fn parse_user_submitted(s: &str) -> Option<Self> {
        if hash::is_well_formed_address(s) {
            Some(Address(s.to_string()))
        } else {
            None
        }
    }

    /// Validates `s` as either a well-formed `AdNe` address or a reserved
    /// account name. Used for bootstrap paths and for the `to` side of a
    /// transfer, which may legitimately target a reserved account.
    pub fn parse_any(s: &str) -> Option<Self> {
        if hash::is_well_formed_address(s) || hash::is_reserved_account(s) {
            Some(Address(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_reserved(&self) -> bool {
        hash::is_reserved_account(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}
