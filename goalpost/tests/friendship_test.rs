//! Friend request lifecycle through the Backend managers

use goalpost::prelude::*;
use goalpost::storage::traits::{FriendshipStore, UserStore};

async fn backend() -> Backend {
    let config = ConfigBuilder::testing().build().expect("testing config");
    init(config).await.expect("backend")
}

async fn register(backend: &Backend, name: &str) -> User {
    backend
        .storage()
        .create_user(NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "hash".to_string(),
        })
        .await
        .expect("create user")
}

fn by_id(user: &User) -> FriendRequestTarget {
    FriendRequestTarget::Id(user.id.clone())
}

fn friend_ids(view: &FriendsView) -> Vec<String> {
    view.accepted_friends.iter().map(|u| u.id.clone()).collect()
}

async fn make_friends(backend: &Backend, a: &User, b: &User) {
    let request = backend.friends().send_request(&a.id, by_id(b)).await.unwrap();
    backend.friends().accept_request(&b.id, &request.id).await.unwrap();
}

#[tokio::test]
async fn send_request_creates_pending_record() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    assert_eq!(request.requester, alice.id);
    assert_eq!(request.recipient, bob.id);
    assert_eq!(request.status, FriendshipStatus::Pending);

    let sent = backend.friends().friends_view(&alice.id).await.unwrap();
    assert_eq!(sent.sent_requests.len(), 1);
    assert_eq!(sent.sent_requests[0].user.username, "bob");
    assert!(sent.pending_received_requests.is_empty());
    assert!(sent.accepted_friends.is_empty());

    let received = backend.friends().friends_view(&bob.id).await.unwrap();
    assert_eq!(received.pending_received_requests.len(), 1);
    assert_eq!(received.pending_received_requests[0].id, request.id);
    assert_eq!(received.pending_received_requests[0].user.username, "alice");
    assert!(received.sent_requests.is_empty());
}

#[tokio::test]
async fn send_request_by_username() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend
        .friends()
        .send_request(&alice.id, FriendRequestTarget::Username("bob".to_string()))
        .await
        .unwrap();
    assert_eq!(request.recipient, bob.id);
}

#[tokio::test]
async fn duplicate_request_conflicts_in_both_directions() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();

    let again = backend.friends().send_request(&alice.id, by_id(&bob)).await;
    assert!(matches!(again, Err(GoalpostError::Conflict(_))));

    let reverse = backend.friends().send_request(&bob.id, by_id(&alice)).await;
    assert!(matches!(reverse, Err(GoalpostError::Conflict(_))));
}

#[tokio::test]
async fn request_to_friend_conflicts() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;
    make_friends(&backend, &alice, &bob).await;

    let result = backend.friends().send_request(&bob.id, by_id(&alice)).await;
    assert!(matches!(result, Err(GoalpostError::Conflict(_))));
}

#[tokio::test]
async fn invalid_targets() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;

    let to_self = backend.friends().send_request(&alice.id, by_id(&alice)).await;
    assert!(matches!(to_self, Err(GoalpostError::Validation(_))));

    let unknown_id = backend
        .friends()
        .send_request(&alice.id, FriendRequestTarget::Id("nobody".to_string()))
        .await;
    assert!(matches!(unknown_id, Err(GoalpostError::NotFound(_))));

    let unknown_name = backend
        .friends()
        .send_request(&alice.id, FriendRequestTarget::Username("nobody".to_string()))
        .await;
    assert!(matches!(unknown_name, Err(GoalpostError::NotFound(_))));

    let blank = backend
        .friends()
        .send_request(&alice.id, FriendRequestTarget::Username("  ".to_string()))
        .await;
    assert!(matches!(blank, Err(GoalpostError::Validation(_))));
}

#[tokio::test]
async fn accept_makes_friendship_symmetric() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    let accepted = backend.friends().accept_request(&bob.id, &request.id).await.unwrap();
    assert_eq!(accepted.id, request.id);
    assert_eq!(accepted.status, FriendshipStatus::Accepted);

    assert!(backend.friends().are_friends(&alice.id, &bob.id).await.unwrap());
    assert!(backend.friends().are_friends(&bob.id, &alice.id).await.unwrap());

    let records = backend
        .storage()
        .list_friendships_for(&alice.id, &[FriendshipStatus::Accepted])
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.requester == alice.id));
    assert!(records.iter().any(|r| r.requester == bob.id));
}

#[tokio::test]
async fn only_the_recipient_can_accept() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;
    let carol = register(&backend, "carol").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();

    let by_requester = backend.friends().accept_request(&alice.id, &request.id).await;
    assert!(matches!(by_requester, Err(GoalpostError::NotFound(_))));

    let by_stranger = backend.friends().accept_request(&carol.id, &request.id).await;
    assert!(matches!(by_stranger, Err(GoalpostError::NotFound(_))));

    let missing = backend.friends().accept_request(&bob.id, "no_such_request").await;
    assert!(matches!(missing, Err(GoalpostError::NotFound(_))));

    assert!(!backend.friends().are_friends(&alice.id, &bob.id).await.unwrap());
}

#[tokio::test]
async fn accepting_twice_conflicts() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    backend.friends().accept_request(&bob.id, &request.id).await.unwrap();

    let again = backend.friends().accept_request(&bob.id, &request.id).await;
    assert!(matches!(again, Err(GoalpostError::Conflict(_))));
}

#[tokio::test]
async fn reject_and_cancel_delete_the_request() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();

    // Only the recipient rejects, only the requester cancels.
    let wrong_reject = backend.friends().reject_request(&alice.id, &request.id).await;
    assert!(matches!(wrong_reject, Err(GoalpostError::NotFound(_))));
    let wrong_cancel = backend.friends().cancel_request(&bob.id, &request.id).await;
    assert!(matches!(wrong_cancel, Err(GoalpostError::NotFound(_))));

    backend.friends().reject_request(&bob.id, &request.id).await.unwrap();
    let view = backend.friends().friends_view(&bob.id).await.unwrap();
    assert!(view.pending_received_requests.is_empty());

    // The pair is free again, from either side.
    let request = backend.friends().send_request(&bob.id, by_id(&alice)).await.unwrap();
    backend.friends().cancel_request(&bob.id, &request.id).await.unwrap();
    let view = backend.friends().friends_view(&alice.id).await.unwrap();
    assert_eq!(view, FriendsView::default());

    let gone = backend.friends().reject_request(&alice.id, &request.id).await;
    assert!(matches!(gone, Err(GoalpostError::NotFound(_))));
}

#[tokio::test]
async fn dismiss_picks_the_callers_side() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    backend.friends().dismiss_request(&alice.id, &request.id).await.unwrap();

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    let carol = register(&backend, "carol").await;
    let stranger = backend.friends().dismiss_request(&carol.id, &request.id).await;
    assert!(matches!(stranger, Err(GoalpostError::NotFound(_))));
    backend.friends().dismiss_request(&bob.id, &request.id).await.unwrap();

    assert!(
        backend
            .storage()
            .find_friendship_between(&alice.id, &bob.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn friends_view_never_lists_caller_or_duplicates() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;
    let carol = register(&backend, "carol").await;

    make_friends(&backend, &alice, &bob).await;
    make_friends(&backend, &carol, &alice).await;

    let view = backend.friends().friends_view(&alice.id).await.unwrap();
    assert_eq!(friend_ids(&view), vec![bob.id.clone(), carol.id.clone()]);
    assert!(!friend_ids(&view).contains(&alice.id));
    assert_eq!(view.accepted_friends[0].email, "bob@example.com");

    let bob_view = backend.friends().friends_view(&bob.id).await.unwrap();
    assert_eq!(friend_ids(&bob_view), vec![alice.id.clone()]);
}

#[tokio::test]
async fn remove_requires_an_accepted_friendship() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let missing = backend.friends().remove_friendship(&alice.id, &bob.id).await;
    assert!(matches!(missing, Err(GoalpostError::NotFound(_))));

    backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    let pending = backend.friends().remove_friendship(&alice.id, &bob.id).await;
    assert!(matches!(pending, Err(GoalpostError::NotFound(_))));

    // The pending request survives the failed removal.
    let view = backend.friends().friends_view(&bob.id).await.unwrap();
    assert_eq!(view.pending_received_requests.len(), 1);
}

#[tokio::test]
async fn full_scenario_send_accept_remove() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    backend.friends().accept_request(&bob.id, &request.id).await.unwrap();

    let alice_view = backend.friends().friends_view(&alice.id).await.unwrap();
    let bob_view = backend.friends().friends_view(&bob.id).await.unwrap();
    assert_eq!(friend_ids(&alice_view), vec![bob.id.clone()]);
    assert_eq!(friend_ids(&bob_view), vec![alice.id.clone()]);
    assert!(alice_view.sent_requests.is_empty());
    assert!(bob_view.pending_received_requests.is_empty());

    // Removal by the recipient side must clear both directions.
    backend.friends().remove_friendship(&bob.id, &alice.id).await.unwrap();

    let alice_view = backend.friends().friends_view(&alice.id).await.unwrap();
    let bob_view = backend.friends().friends_view(&bob.id).await.unwrap();
    assert_eq!(alice_view, FriendsView::default());
    assert_eq!(bob_view, FriendsView::default());
    assert!(!backend.friends().are_friends(&alice.id, &bob.id).await.unwrap());
    assert!(!backend.friends().are_friends(&bob.id, &alice.id).await.unwrap());

    let again = backend.friends().remove_friendship(&alice.id, &bob.id).await;
    assert!(matches!(again, Err(GoalpostError::NotFound(_))));

    // And they can start over.
    backend.friends().send_request(&bob.id, by_id(&alice)).await.unwrap();
}

#[tokio::test]
async fn view_skips_deleted_users() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;
    make_friends(&backend, &alice, &bob).await;

    backend
        .storage()
        .create_friendship(&alice.id, "ghost", FriendshipStatus::Pending)
        .await
        .unwrap();

    let view = backend.friends().friends_view(&alice.id).await.unwrap();
    assert_eq!(friend_ids(&view), vec![bob.id.clone()]);
    assert!(view.sent_requests.is_empty());
}

#[tokio::test]
async fn dismissing_an_accepted_request_is_a_conflict() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();
    backend.friends().accept_request(&bob.id, &request.id).await.unwrap();

    let result = backend.friends().dismiss_request(&alice.id, &request.id).await;
    assert!(matches!(result, Err(GoalpostError::Conflict(_))));
    assert!(backend.friends().are_friends(&alice.id, &bob.id).await.unwrap());
}

/// Races an accept against a withdrawal of the same request and checks that
/// exactly one side wins and the stored records agree with the winner.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn accept_and_withdraw_race_has_one_winner() {
    let backend = backend().await;

    for round in 0..20 {
        let alice = register(&backend, &format!("alice{}", round)).await;
        let bob = register(&backend, &format!("bob{}", round)).await;
        let request = backend.friends().send_request(&alice.id, by_id(&bob)).await.unwrap();

        let accept = {
            let backend = backend.clone();
            let (bob_id, request_id) = (bob.id.clone(), request.id.clone());
            tokio::spawn(async move { backend.friends().accept_request(&bob_id, &request_id).await })
        };
        // Even rounds the requester cancels, odd rounds the recipient rejects.
        let withdraw = {
            let backend = backend.clone();
            let (alice_id, bob_id, request_id) =
                (alice.id.clone(), bob.id.clone(), request.id.clone());
            tokio::spawn(async move {
                if round % 2 == 0 {
                    backend.friends().cancel_request(&alice_id, &request_id).await
                } else {
                    backend.friends().reject_request(&bob_id, &request_id).await
                }
            })
        };

        let accepted = accept.await.unwrap().is_ok();
        let withdrawn = withdraw.await.unwrap().is_ok();
        assert!(
            accepted != withdrawn,
            "round {}: accepted={} withdrawn={}",
            round,
            accepted,
            withdrawn
        );

        let records = backend
            .storage()
            .list_friendships_for(
                &alice.id,
                &[
                    FriendshipStatus::Pending,
                    FriendshipStatus::Accepted,
                    FriendshipStatus::Blocked,
                ],
            )
            .await
            .unwrap();
        let friends = backend.friends().are_friends(&alice.id, &bob.id).await.unwrap();

        if accepted {
            assert_eq!(records.len(), 2, "round {}: {:?}", round, records);
            assert!(records.iter().all(|r| r.status == FriendshipStatus::Accepted));
            assert!(friends);
        } else {
            assert!(records.is_empty(), "round {}: {:?}", round, records);
            assert!(!friends);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_opposite_requests_create_one_record() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let forward = {
        let backend = backend.clone();
        let (from, to) = (alice.id.clone(), bob.id.clone());
        tokio::spawn(async move { backend.friends().send_request(&from, FriendRequestTarget::Id(to)).await })
    };
    let backward = {
        let backend = backend.clone();
        let (from, to) = (bob.id.clone(), alice.id.clone());
        tokio::spawn(async move { backend.friends().send_request(&from, FriendRequestTarget::Id(to)).await })
    };

    let results = [forward.await.unwrap(), backward.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(GoalpostError::Conflict(_))))
    );
}
