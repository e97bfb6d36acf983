/// Service-level tests against the in-memory repository
///
/// These cover the business rules without a database and run with a plain
/// `cargo test`.

use std::sync::Arc;
use usermgmt_shared::error::UserError;
use usermgmt_shared::models::user::{NameLengthPolicy, UserPayload};
use usermgmt_shared::repository::InMemoryUserRepository;
use usermgmt_shared::service::{DeletePolicy, UserService};

fn payload(first: &str, last: &str, email: &str) -> UserPayload {
    UserPayload {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        active: None,
    }
}

fn service_with(policy: DeletePolicy) -> (UserService, Arc<InMemoryUserRepository>) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let service = UserService::new(repo.clone()).with_delete_policy(policy);
    (service, repo)
}

#[tokio::test]
async fn test_create_assigns_id_and_defaults_active() {
    let (service, _) = service_with(DeletePolicy::Hard);

    let user = service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    assert!(user.id > 0);
    assert!(user.active);
    assert!(user.deleted_at.is_none());
    assert_eq!(user.created_at, user.updated_at);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict_and_not_persisted() {
    let (service, repo) = service_with(DeletePolicy::Hard);
    service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    let err = service
        .create_user(payload("Augusta", "King", "ada@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::DuplicateEmail(ref e) if e == "ada@example.com"));
    assert_eq!(repo.row_count().await, 1);
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let (service, _) = service_with(DeletePolicy::Hard);

    let err = service.get_user_by_id(404).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(404)));
}

#[tokio::test]
async fn test_get_by_email_distinguishes_absence() {
    let (service, _) = service_with(DeletePolicy::Hard);
    let created = service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    let found = service.get_user_by_email("ada@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let missing = service.get_user_by_email("nobody@example.com").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_update_unknown_id_leaves_storage_unchanged() {
    let (service, repo) = service_with(DeletePolicy::Hard);
    let existing = service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    let err = service
        .update_user(999, payload("Grace", "Hopper", "grace@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(repo.row_count().await, 1);
    assert_eq!(service.get_user_by_id(existing.id).await.unwrap(), existing);
}

#[tokio::test]
async fn test_update_unknown_id_with_taken_email_is_not_found() {
    let (service, repo) = service_with(DeletePolicy::Hard);
    service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    let err = service
        .update_user(999, payload("Grace", "Hopper", "ada@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::NotFound(999)), "got {err:?}");
    assert_eq!(repo.row_count().await, 1);
}

#[tokio::test]
async fn test_update_overwrites_fields() {
    let (service, _) = service_with(DeletePolicy::Hard);
    let user = service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    let mut change = payload("Augusta", "King", "augusta@example.com");
    change.active = Some(false);
    let updated = service.update_user(user.id, change).await.unwrap();

    assert_eq!(updated.id, user.id);
    assert_eq!(updated.first_name, "Augusta");
    assert_eq!(updated.email, "augusta@example.com");
    assert!(!updated.active);
    assert_eq!(updated.created_at, user.created_at);
    assert!(updated.updated_at >= user.updated_at);

    // Keeping your own email is not a conflict; omitted `active` is unchanged
    let again = service
        .update_user(user.id, payload("Augusta", "Lovelace", "augusta@example.com"))
        .await
        .unwrap();
    assert!(!again.active);
}

#[tokio::test]
async fn test_update_to_taken_email_is_conflict() {
    let (service, _) = service_with(DeletePolicy::Hard);
    service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();
    let grace = service
        .create_user(payload("Grace", "Hopper", "grace@example.com"))
        .await
        .unwrap();

    let err = service
        .update_user(grace.id, payload("Grace", "Hopper", "ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::DuplicateEmail(_)));
}

#[tokio::test]
async fn test_hard_delete_twice() {
    let (service, repo) = service_with(DeletePolicy::Hard);
    let user = service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    service.delete_user(user.id).await.unwrap();
    assert_eq!(repo.row_count().await, 0);

    let err = service.delete_user(user.id).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(id) if id == user.id));
}

#[tokio::test]
async fn test_soft_delete_twice_hides_row_and_frees_email() {
    let (service, repo) = service_with(DeletePolicy::Soft);
    let user = service
        .create_user(payload("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    service.delete_user(user.id).await.unwrap();
    assert_eq!(repo.row_count().await, 1);
    assert!(service.get_user_by_id(user.id).await.unwrap_err().is_not_found());
    assert!(service.get_all_users().await.unwrap().is_empty());

    assert!(service.delete_user(user.id).await.unwrap_err().is_not_found());

    let replacement = service
        .create_user(payload("Ada", "Byron", "ada@example.com"))
        .await
        .unwrap();
    assert_ne!(replacement.id, user.id);
}

#[tokio::test]
async fn test_get_all_users_lists_live_users() {
    let (service, _) = service_with(DeletePolicy::Hard);
    for (first, email) in [("Ada", "ada@example.com"), ("Grace", "grace@example.com")] {
        service
            .create_user(payload(first, "Test", email))
            .await
            .unwrap();
    }

    let users = service.get_all_users().await.unwrap();
    let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, ["ada@example.com", "grace@example.com"]);
}

#[tokio::test]
async fn test_name_policy_is_enforced() {
    let (service, repo) = service_with(DeletePolicy::Hard);

    let err = service
        .create_user(payload("A", "Lovelace", "ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::Validation(_)));
    assert_eq!(repo.row_count().await, 0);

    let relaxed = service.with_name_policy(NameLengthPolicy::Unbounded);
    let user = relaxed
        .create_user(payload("A", "L", "al@example.com"))
        .await
        .unwrap();
    assert_eq!(user.first_name, "A");
}
