//! Write consistency levels
//!
//! The number of replica acknowledgments the store must collect before a
//! batch is reported as successful. Names match the store's own spelling so
//! that configuration files can use them verbatim.

use crate::error::{CassiaError, CassiaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Replica acknowledgment requirement for a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyLevel {
    /// A single replica, hinted handoff counts
    Any,
    /// One replica
    #[default]
    One,
    /// Two replicas
    Two,
    /// Three replicas
    Three,
    /// A majority of replicas
    Quorum,
    /// A majority of replicas in the local data center
    LocalQuorum,
    /// A majority of replicas in every data center
    EachQuorum,
    /// One replica in the local data center
    LocalOne,
    /// Every replica
    All,
}

impl ConsistencyLevel {
    /// All levels, in the order of their wire codes
    pub const ALL_LEVELS: [ConsistencyLevel; 9] = [
        ConsistencyLevel::One,
        ConsistencyLevel::Quorum,
        ConsistencyLevel::LocalQuorum,
        ConsistencyLevel::EachQuorum,
        ConsistencyLevel::All,
        ConsistencyLevel::Any,
        ConsistencyLevel::Two,
        ConsistencyLevel::Three,
        ConsistencyLevel::LocalOne,
    ];

    /// Store-side name of the level
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConsistencyLevel::Any => "ANY",
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Two => "TWO",
            ConsistencyLevel::Three => "THREE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::LocalQuorum => "LOCAL_QUORUM",
            ConsistencyLevel::EachQuorum => "EACH_QUORUM",
            ConsistencyLevel::LocalOne => "LOCAL_ONE",
            ConsistencyLevel::All => "ALL",
        }
    }

    /// Numeric code used by the store's RPC interface
    pub const fn wire_code(&self) -> i32 {
        match self {
            ConsistencyLevel::One => 1,
            ConsistencyLevel::Quorum => 2,
            ConsistencyLevel::LocalQuorum => 3,
            ConsistencyLevel::EachQuorum => 4,
            ConsistencyLevel::All => 5,
            ConsistencyLevel::Any => 6,
            ConsistencyLevel::Two => 7,
            ConsistencyLevel::Three => 8,
            ConsistencyLevel::LocalOne => 11,
        }
    }

    /// Look up a level by its wire code
    pub fn from_wire_code(code: i32) -> Option<Self> {
        Self::ALL_LEVELS
            .iter()
            .copied()
            .find(|level| level.wire_code() == code)
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsistencyLevel {
    type Err = CassiaError;

    /// Parse a level name, ignoring case
    fn from_str(s: &str) -> CassiaResult<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL_LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| {
                CassiaError::config(format!(
                    "Invalid consistency level '{}'. Expected one of ANY, ONE, TWO, THREE, \
                     QUORUM, LOCAL_QUORUM, EACH_QUORUM, LOCAL_ONE, ALL.",
                    s
                ))
            })
    }
}
