// crates/toolgate-core/src/core/tier.rs
// ============================================================================
// Module: Permission Tiers
// Description: Caller permission tiers and their total order.
// Purpose: Rank callers and tool requirements for tier-based authorization.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Permission tiers form a fixed total order `guest (0) < user (1) < admin (2)`.
//! Tier labels arrive as free-form strings from callers and catalog files, so
//! unrecognized labels are preserved verbatim and ranked through an
//! [`UnknownTierPolicy`].
//!
//! Security posture: the default policy ranks unrecognized tiers as `user`
//! (fail open to the baseline tier). Deployments that require fail-closed
//! behavior select [`UnknownTierPolicy::FailClosed`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Rank of the `guest` tier.
pub const GUEST_RANK: u8 = 0;
/// Rank of the `user` tier.
pub const USER_RANK: u8 = 1;
/// Rank of the `admin` tier.
pub const ADMIN_RANK: u8 = 2;

// ============================================================================
// SECTION: Permission Tier
// ============================================================================

/// Permission tier carried by callers and required by tools.
///
/// # Invariants
/// - Recognized labels are exactly `guest`, `user`, and `admin` (case-sensitive).
/// - Unrecognized labels round-trip unchanged through serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PermissionTier {
    /// Lowest tier.
    Guest,
    /// Baseline tier; the default for callers that omit a tier.
    #[default]
    User,
    /// Highest tier.
    Admin,
    /// Label outside the fixed tier set.
    Unrecognized(String),
}

impl PermissionTier {
    /// Parses a tier label.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            "guest" => Self::Guest,
            "user" => Self::User,
            "admin" => Self::Admin,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the tier label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
            Self::Unrecognized(label) => label,
        }
    }

    /// Returns the rank for recognized tiers.
    #[must_use]
    pub const fn known_rank(&self) -> Option<u8> {
        match self {
            Self::Guest => Some(GUEST_RANK),
            Self::User => Some(USER_RANK),
            Self::Admin => Some(ADMIN_RANK),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns true when the label is one of the fixed tiers.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        self.known_rank().is_some()
    }
}

impl fmt::Display for PermissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PermissionTier {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for PermissionTier {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PermissionTier> for String {
    fn from(value: PermissionTier) -> Self {
        match value {
            PermissionTier::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

// ============================================================================
// SECTION: Unknown Tier Policy
// ============================================================================

/// Ranking policy for unrecognized tier labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTierPolicy {
    /// Unrecognized labels rank as `user` on both sides of the comparison.
    #[default]
    FailOpenUser,
    /// Unrecognized caller tiers rank as `guest`; unrecognized tool
    /// requirements rank as `admin`.
    FailClosed,
}

impl UnknownTierPolicy {
    /// Returns the rank used for a caller's tier.
    #[must_use]
    pub const fn caller_rank(self, tier: &PermissionTier) -> u8 {
        match tier.known_rank() {
            Some(rank) => rank,
            None => match self {
                Self::FailOpenUser => USER_RANK,
                Self::FailClosed => GUEST_RANK,
            },
        }
    }

    /// Returns the rank used for a tool's required tier.
    #[must_use]
    pub const fn required_rank(self, tier: &PermissionTier) -> u8 {
        match tier.known_rank() {
            Some(rank) => rank,
            None => match self {
                Self::FailOpenUser => USER_RANK,
                Self::FailClosed => ADMIN_RANK,
            },
        }
    }

    /// Returns a stable label for the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailOpenUser => "fail_open_user",
            Self::FailClosed => "fail_closed",
        }
    }
}
