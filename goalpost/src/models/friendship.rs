//! Directed friendship records.
//!
//! A pending request is a single record owned by the requester. Accepting it
//! adds a mirrored record in the opposite direction, so an accepted
//! friendship is always two records with status `accepted`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a directed friendship record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    /// Reserved. No operation produces it, but it still occupies the pair.
    Blocked,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FriendshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FriendshipStatus::Pending),
            "accepted" => Ok(FriendshipStatus::Accepted),
            "blocked" => Ok(FriendshipStatus::Blocked),
            _ => Err(format!("Invalid friendship status: {}", s)),
        }
    }
}

/// A directed edge `requester -> recipient`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Friendship {
    pub id: String,
    pub requester: String,
    pub recipient: String,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// Whether `user_id` is on either side of the edge
    pub fn involves(&self, user_id: &str) -> bool {
        self.requester == user_id || self.recipient == user_id
    }

    /// The other side of the edge as seen from `user_id`.
    ///
    /// `None` when the user is not part of this record.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.requester == user_id {
            Some(&self.recipient)
        } else if self.recipient == user_id {
            Some(&self.requester)
        } else {
            None
        }
    }

    /// The order-independent key of the pair this record belongs to
    pub fn pair_key(&self) -> String {
        pair_key(&self.requester, &self.recipient)
    }
}

/// Order-independent key for the unordered pair `{a, b}`.
///
/// The first record written for a pair is stored under this key, which is
/// what makes a second request for the same pair (in either direction)
/// collide at the database.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}_{}", a, b)
    } else {
        format!("{}_{}", b, a)
    }
}

const MIRROR_SUFFIX: &str = "_mirror";

/// Record key of the mirrored record written on acceptance.
pub fn mirror_key(pair_key: &str) -> String {
    format!("{}{}", pair_key, MIRROR_SUFFIX)
}

/// Pair key a friendship record id belongs to, for either of its records.
pub fn pair_key_of_record(record_id: &str) -> &str {
    record_id.strip_suffix(MIRROR_SUFFIX).unwrap_or(record_id)
}
