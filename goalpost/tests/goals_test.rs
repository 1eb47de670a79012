//! Goal CRUD and sharing through the Backend managers

use chrono::{Duration, Utc};
use goalpost::prelude::*;
use goalpost::storage::traits::UserStore;

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

fn goal(title: &str) -> NewGoal {
    NewGoal {
        title: title.to_string(),
        description: "Keep at it".to_string(),
        deadline: Utc::now() + Duration::days(7),
    }
}

async fn make_friends(backend: &Backend, a: &User, b: &User) {
    let request = backend
        .friends()
        .send_request(&a.id, FriendRequestTarget::Id(b.id.clone()))
        .await
        .unwrap();
    backend.friends().accept_request(&b.id, &request.id).await.unwrap();
}

#[tokio::test]
async fn add_and_list_goals() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;

    let created = backend.goals().add_goal(&alice.id, goal("Marathon")).await.unwrap();
    assert_eq!(created.owner, alice.id);
    assert_eq!(created.title, "Marathon");

    let goals = backend.goals().list_goals(&alice.id).await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].id, created.id);

    let fetched = backend.goals().get_goal(&alice.id, &created.id).await.unwrap();
    assert_eq!(fetched.description, "Keep at it");
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;

    let mut blank = goal(" ");
    let result = backend.goals().add_goal(&alice.id, blank.clone()).await;
    assert!(matches!(result, Err(GoalpostError::Validation(_))));

    blank.title = "Title".to_string();
    blank.description = String::new();
    let result = backend.goals().add_goal(&alice.id, blank).await;
    assert!(matches!(result, Err(GoalpostError::Validation(_))));
}

#[tokio::test]
async fn goals_are_private_until_shared() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;
    let carol = register(&backend, "carol").await;
    make_friends(&backend, &alice, &bob).await;

    let created = backend.goals().add_goal(&alice.id, goal("Marathon")).await.unwrap();

    let hidden = backend.goals().get_goal(&bob.id, &created.id).await;
    assert!(matches!(hidden, Err(GoalpostError::NotFound(_))));

    let shared = backend
        .goals()
        .share_goal(&alice.id, &created.id, &bob.id)
        .await
        .unwrap();
    assert_eq!(shared.shared_with, vec![bob.id.clone()]);

    // Sharing twice keeps one entry.
    let shared = backend
        .goals()
        .share_goal(&alice.id, &created.id, &bob.id)
        .await
        .unwrap();
    assert_eq!(shared.shared_with.len(), 1);

    let visible = backend.goals().get_goal(&bob.id, &created.id).await.unwrap();
    assert_eq!(visible.id, created.id);

    let for_bob = backend.goals().list_shared_goals(&bob.id).await.unwrap();
    assert_eq!(for_bob.len(), 1);
    assert!(backend.goals().list_goals(&bob.id).await.unwrap().is_empty());

    let for_carol = backend.goals().get_goal(&carol.id, &created.id).await;
    assert!(matches!(for_carol, Err(GoalpostError::NotFound(_))));
}

#[tokio::test]
async fn sharing_needs_an_owned_goal_and_a_friend() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;
    let carol = register(&backend, "carol").await;
    make_friends(&backend, &alice, &bob).await;

    let created = backend.goals().add_goal(&alice.id, goal("Marathon")).await.unwrap();

    let not_friend = backend.goals().share_goal(&alice.id, &created.id, &carol.id).await;
    assert!(matches!(not_friend, Err(GoalpostError::Validation(_))));

    let no_friend_id = backend.goals().share_goal(&alice.id, &created.id, "").await;
    assert!(matches!(no_friend_id, Err(GoalpostError::Validation(_))));

    let not_owner = backend.goals().share_goal(&bob.id, &created.id, &alice.id).await;
    assert!(matches!(not_owner, Err(GoalpostError::NotFound(_))));

    let missing = backend.goals().share_goal(&alice.id, "missing", &bob.id).await;
    assert!(matches!(missing, Err(GoalpostError::NotFound(_))));

    // A pending request is not enough.
    backend
        .friends()
        .send_request(&alice.id, FriendRequestTarget::Id(carol.id.clone()))
        .await
        .unwrap();
    let pending = backend.goals().share_goal(&alice.id, &created.id, &carol.id).await;
    assert!(matches!(pending, Err(GoalpostError::Validation(_))));
}

#[tokio::test]
async fn only_the_owner_deletes() {
    let backend = backend().await;
    let alice = register(&backend, "alice").await;
    let bob = register(&backend, "bob").await;

    let created = backend.goals().add_goal(&alice.id, goal("Marathon")).await.unwrap();

    let by_bob = backend.goals().delete_goal(&bob.id, &created.id).await;
    assert!(matches!(by_bob, Err(GoalpostError::NotFound(_))));

    backend.goals().delete_goal(&alice.id, &created.id).await.unwrap();
    assert!(backend.goals().list_goals(&alice.id).await.unwrap().is_empty());

    let again = backend.goals().delete_goal(&alice.id, &created.id).await;
    assert!(matches!(again, Err(GoalpostError::NotFound(_))));
}
