//! Tests for the request service and its access rules

use std::sync::Arc;

use helpdesk_requests_core::{Error, RequestService, RequestStatus, SqliteRequestStore};
use helpdesk_users_core::{user_store, Identity, SqliteUserStore, UserStore};
use tempfile::TempDir;

async fn setup() -> (RequestService, SqliteUserStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = user_store::connect(&db_url).await.unwrap();
    let users = SqliteUserStore::new(pool.clone()).await.unwrap();
    let requests = SqliteRequestStore::new(pool).await.unwrap();

    let service = RequestService::new(Arc::new(requests), Arc::new(users.clone()));
    (service, users, temp_dir)
}

async fn make_user(users: &SqliteUserStore, name: &str, partner: bool) -> Identity {
    let user = users
        .create_user(name, &format!("{}@test.local", name), "hash")
        .await
        .unwrap();

    if partner {
        sqlx::query("UPDATE users SET is_partner = 1 WHERE id = ?")
            .bind(user.id)
            .execute(users.pool())
            .await
            .unwrap();
    }

    Identity {
        user_id: user.id,
        username: user.username,
    }
}

#[tokio::test]
async fn create_and_get() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;

    let created = service
        .create(&alice, "Bug", "It crashes", None)
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.status, RequestStatus::New);
    assert_eq!(created.user_id, Some(alice.user_id));

    let fetched = service.get(created.id).await.unwrap();
    assert_eq!(fetched.title, "Bug");
    assert_eq!(fetched.content, "It crashes");
}

#[tokio::test]
async fn create_rejects_empty_fields() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;

    for (title, content) in [("", "body"), ("title", ""), ("  ", "body")] {
        let result = service.create(&alice, title, content, None).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}

#[tokio::test]
async fn create_accepts_known_status_and_rejects_unknown() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;

    let created = service
        .create(&alice, "Bug", "body", Some("Pending"))
        .await
        .unwrap();
    assert_eq!(created.status, RequestStatus::Pending);

    let result = service.create(&alice, "Bug", "body", Some("Urgent")).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let (service, _users, _tmp) = setup().await;
    assert!(matches!(service.get(99).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn list_all_is_newest_first() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;

    for title in ["first", "second", "third"] {
        service.create(&alice, title, "body", None).await.unwrap();
    }

    let all = service.list_all().await.unwrap();
    let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn list_mine_is_scoped_to_caller() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;
    let bob = make_user(&users, "bob", false).await;

    service.create(&alice, "mine", "body", None).await.unwrap();
    service.create(&bob, "theirs", "body", None).await.unwrap();

    let mine = service.list_mine(&alice, None).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "mine");

    // Asking for your own id explicitly is fine
    let mine = service.list_mine(&alice, Some(alice.user_id)).await.unwrap();
    assert_eq!(mine.len(), 1);

    // Asking for someone else's is not
    let result = service.list_mine(&alice, Some(bob.user_id)).await;
    assert!(matches!(result, Err(Error::Forbidden)));
}

#[tokio::test]
async fn delete_is_owner_only() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;
    let bob = make_user(&users, "bob", false).await;

    let request = service.create(&alice, "Bug", "body", None).await.unwrap();

    let result = service.delete(&bob, request.id).await;
    assert!(matches!(result, Err(Error::Forbidden)));
    assert!(service.get(request.id).await.is_ok());

    service.delete(&alice, request.id).await.unwrap();
    assert!(matches!(
        service.get(request.id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_missing_is_not_found() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;

    let result = service.delete(&alice, 99).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn admin_delete_requires_role() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;
    let admin = make_user(&users, "admin", true).await;

    let request = service.create(&alice, "Bug", "body", None).await.unwrap();

    // A plain user is rejected even for requests they do not own
    let result = service.delete_as_admin(&alice, request.id).await;
    assert!(matches!(result, Err(Error::Forbidden)));

    // An administrator may delete anyone's request
    service.delete_as_admin(&admin, request.id).await.unwrap();
    assert!(matches!(
        service.get(request.id).await,
        Err(Error::NotFound(_))
    ));

    // Absent id, after passing the role check
    let result = service.delete_as_admin(&admin, request.id).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn change_status_enforces_role_and_fixed_set() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;
    let admin = make_user(&users, "admin", true).await;

    let request = service.create(&alice, "Bug", "body", None).await.unwrap();

    let result = service.change_status(&alice, request.id, "Accepted").await;
    assert!(matches!(result, Err(Error::Forbidden)));

    // Out-of-set strings are rejected and the stored status is untouched
    for bad in ["Done", "new", "accepted", ""] {
        let result = service.change_status(&admin, request.id, bad).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(
            service.get(request.id).await.unwrap().status,
            RequestStatus::New
        );
    }

    let updated = service
        .change_status(&admin, request.id, "Accepted")
        .await
        .unwrap();
    assert_eq!(updated.status, RequestStatus::Accepted);

    let result = service.change_status(&admin, 99, "Accepted").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn list_by_status_requires_role() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;
    let admin = make_user(&users, "admin", true).await;

    let r1 = service.create(&alice, "a", "body", None).await.unwrap();
    service.create(&alice, "b", "body", None).await.unwrap();
    service.change_status(&admin, r1.id, "Accepted").await.unwrap();

    let result = service.list_by_status(&alice, "Accepted").await;
    assert!(matches!(result, Err(Error::Forbidden)));

    let accepted = service.list_by_status(&admin, "Accepted").await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, r1.id);

    // Unknown filter strings match nothing rather than erroring
    let none = service.list_by_status(&admin, "Bogus").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn update_content_validates_and_reports_missing() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;

    let request = service.create(&alice, "Bug", "body", None).await.unwrap();

    let result = service.update_content(request.id, "", "body").await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let updated = service
        .update_content(request.id, "Bug!", "It still crashes")
        .await
        .unwrap();
    assert_eq!(updated.title, "Bug!");
    assert_eq!(updated.content, "It still crashes");
    assert_eq!(updated.status, RequestStatus::New);

    let result = service.update_content(99, "t", "c").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

// The two tests below pin a long-standing gap: reads of a single request
// and content updates are NOT restricted to the owner, while delete is.
// They are expected to keep passing until the rules are deliberately
// tightened; if one starts failing, the access policy changed.

#[tokio::test]
async fn content_update_by_non_owner_is_currently_permitted() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;
    make_user(&users, "bob", false).await;

    let request = service.create(&alice, "Bug", "body", None).await.unwrap();

    // update_content takes no caller at all; bob's handler path reaches it
    // the same way alice's does
    let updated = service
        .update_content(request.id, "Rewritten by someone else", "body")
        .await
        .unwrap();
    assert_eq!(updated.title, "Rewritten by someone else");
}

#[tokio::test]
async fn get_single_by_non_owner_is_currently_permitted() {
    let (service, users, _tmp) = setup().await;
    let alice = make_user(&users, "alice", false).await;
    make_user(&users, "bob", false).await;

    let request = service.create(&alice, "Bug", "body", None).await.unwrap();

    // No ownership filter on single reads
    let fetched = service.get(request.id).await.unwrap();
    assert_eq!(fetched.user_id, Some(alice.user_id));
}
