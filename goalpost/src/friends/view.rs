//! Caller-relative friends view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{Friendship, FriendshipStatus, PublicUser};

/// A pending request as shown to one of its two parties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingRequest {
    /// Record id, used to accept, reject or cancel
    pub id: String,
    pub requester: String,
    pub recipient: String,
    /// The party that is not the viewer
    pub user: PublicUser,
    pub created_at: DateTime<Utc>,
}

/// Everything the friends screen shows for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FriendsView {
    pub accepted_friends: Vec<PublicUser>,
    pub pending_received_requests: Vec<PendingRequest>,
    pub sent_requests: Vec<PendingRequest>,
}

/// Split the records touching `caller` into the three lists.
///
/// `records` must be in creation order; the output keeps it. An accepted
/// friendship is stored as two mirrored records, so accepted friends are
/// deduplicated by id with the first occurrence kept. Records whose other
/// party is missing from `users` are skipped, as are `blocked` records and
/// records not involving the caller.
pub fn build_friends_view(
    caller: &str,
    records: &[Friendship],
    users: &HashMap<String, PublicUser>,
) -> FriendsView {
    let mut view = FriendsView::default();
    let mut seen_friends = HashSet::new();

    for record in records {
        let Some(other_id) = record.counterpart(caller) else {
            continue;
        };
        if other_id == caller {
            continue;
        }
        let Some(other) = users.get(other_id) else {
            continue;
        };

        match record.status {
            FriendshipStatus::Accepted => {
                if seen_friends.insert(other_id.to_string()) {
                    view.accepted_friends.push(other.clone());
                }
            }
            FriendshipStatus::Pending => {
                let entry = PendingRequest {
                    id: record.id.clone(),
                    requester: record.requester.clone(),
                    recipient: record.recipient.clone(),
                    user: other.clone(),
                    created_at: record.created_at,
                };
                if record.recipient == caller {
                    view.pending_received_requests.push(entry);
                } else {
                    view.sent_requests.push(entry);
                }
            }
            FriendshipStatus::Blocked => {}
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(id: &str) -> PublicUser {
        PublicUser {
            id: id.to_string(),
            username: format!("{}_name", id),
            email: format!("{}@example.com", id),
        }
    }

    fn directory(ids: &[&str]) -> HashMap<String, PublicUser> {
        ids.iter().map(|id| (id.to_string(), user(id))).collect()
    }

    fn record(
        id: &str,
        requester: &str,
        recipient: &str,
        status: FriendshipStatus,
        offset: i64,
    ) -> Friendship {
        let at = Utc::now() + Duration::seconds(offset);
        Friendship {
            id: id.to_string(),
            requester: requester.to_string(),
            recipient: recipient.to_string(),
            status,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn no_records_gives_three_empty_lists() {
        let view = build_friends_view("a", &[], &directory(&["a"]));
        assert_eq!(view, FriendsView::default());
    }

    #[test]
    fn mirrored_pair_is_counted_once() {
        let records = vec![
            record("a_b", "a", "b", FriendshipStatus::Accepted, 0),
            record("a_b_mirror", "b", "a", FriendshipStatus::Accepted, 1),
        ];
        let users = directory(&["a", "b"]);

        let view_a = build_friends_view("a", &records, &users);
        assert_eq!(view_a.accepted_friends, vec![user("b")]);

        let view_b = build_friends_view("b", &records, &users);
        assert_eq!(view_b.accepted_friends, vec![user("a")]);
    }

    #[test]
    fn pending_records_split_by_direction() {
        let records = vec![
            record("a_b", "a", "b", FriendshipStatus::Pending, 0),
            record("a_c", "c", "a", FriendshipStatus::Pending, 1),
        ];
        let view = build_friends_view("a", &records, &directory(&["a", "b", "c"]));

        assert!(view.accepted_friends.is_empty());
        assert_eq!(view.sent_requests.len(), 1);
        assert_eq!(view.sent_requests[0].user, user("b"));
        assert_eq!(view.pending_received_requests.len(), 1);
        assert_eq!(view.pending_received_requests[0].id, "a_c");
        assert_eq!(view.pending_received_requests[0].user, user("c"));
    }

    #[test]
    fn input_order_is_kept() {
        let records = vec![
            record("a_d", "d", "a", FriendshipStatus::Accepted, 0),
            record("a_b", "a", "b", FriendshipStatus::Accepted, 1),
            record("a_d_mirror", "a", "d", FriendshipStatus::Accepted, 2),
            record("a_c", "a", "c", FriendshipStatus::Accepted, 3),
        ];
        let view = build_friends_view("a", &records, &directory(&["a", "b", "c", "d"]));
        let ids: Vec<&str> = view.accepted_friends.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "c"]);
    }

    #[test]
    fn unresolved_and_blocked_records_are_skipped() {
        let records = vec![
            record("a_gone", "a", "gone", FriendshipStatus::Accepted, 0),
            record("a_b", "b", "a", FriendshipStatus::Blocked, 1),
            record("a_c", "c", "a", FriendshipStatus::Pending, 2),
            record("b_c", "b", "c", FriendshipStatus::Accepted, 3),
        ];
        let view = build_friends_view("a", &records, &directory(&["a", "b", "c"]));

        assert!(view.accepted_friends.is_empty());
        assert!(view.sent_requests.is_empty());
        assert_eq!(view.pending_received_requests.len(), 1);
    }

    #[test]
    fn caller_never_lists_themselves() {
        let records = vec![record("a_a", "a", "a", FriendshipStatus::Accepted, 0)];
        let view = build_friends_view("a", &records, &directory(&["a"]));
        assert!(view.accepted_friends.is_empty());
    }
}
