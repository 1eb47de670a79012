//! Friend relationships
//!
//! [`FriendshipManager`] drives the request lifecycle
//! (`none -> pending -> accepted`, with reject/cancel/remove deleting
//! records) on top of a [`crate::storage::traits::FriendshipStore`].
//! [`build_friends_view`] turns the records touching one user into the
//! three lists the client renders.

mod locks;
pub mod manager;
pub mod view;

pub use manager::FriendshipManager;
pub use view::{FriendsView, PendingRequest, build_friends_view};

use serde::{Deserialize, Serialize};

/// Who a friend request is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestTarget {
    /// A user id
    Id(String),
    /// An exact username
    Username(String),
}

impl FriendRequestTarget {
    /// Build a target from the optional fields of a request body.
    ///
    /// An id wins over a username. Blank values count as missing; `None`
    /// when neither is usable.
    pub fn from_parts(friend_id: Option<String>, username: Option<String>) -> Option<Self> {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        non_blank(friend_id)
            .map(FriendRequestTarget::Id)
            .or_else(|| non_blank(username).map(FriendRequestTarget::Username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_wins_over_username() {
        let target = FriendRequestTarget::from_parts(Some("u1".into()), Some("bob".into()));
        assert_eq!(target, Some(FriendRequestTarget::Id("u1".into())));
    }

    #[test]
    fn blank_fields_are_ignored() {
        assert_eq!(
            FriendRequestTarget::from_parts(Some("  ".into()), Some("bob".into())),
            Some(FriendRequestTarget::Username("bob".into()))
        );
        assert_eq!(FriendRequestTarget::from_parts(Some(String::new()), None), None);
        assert_eq!(FriendRequestTarget::from_parts(None, None), None);
    }
}
