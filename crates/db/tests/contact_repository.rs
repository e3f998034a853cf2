//! PostgreSQL integration tests for `ContactRepository`.
//!
//! Require `DATABASE_URL` pointing at a server where the test user may create
//! databases. Run with `cargo test -p contacts-db -- --ignored`.

use contacts_core::{AppError, ContactChanges, ContactFilter, ContactGroup, NewContact, SortOrder};
use contacts_db::{ConnectionMonitor, ConnectionState, ContactRepository, ContactStore};
use sqlx::PgPool;

fn repository(pool: PgPool) -> ContactRepository {
    ContactRepository::new(pool, ConnectionMonitor::new())
}

fn new_contact(name: &str, email: &str, group: ContactGroup) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        group,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn create_and_find_one(pool: PgPool) {
    let repo = repository(pool);
    let created = repo
        .create(new_contact("Ann Lee", "ann@example.com", ContactGroup::Other))
        .await
        .unwrap();

    let found = repo.find_one(&created.id.to_string()).await.unwrap();
    assert_eq!(found, created);
    assert_eq!(found.group, ContactGroup::Other);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn duplicate_email_maps_to_conflict(pool: PgPool) {
    let repo = repository(pool);
    repo.create(new_contact("Ann Lee", "ann@example.com", ContactGroup::Other))
        .await
        .unwrap();

    let err = repo
        .create(new_contact("Ann2", "ann@example.com", ContactGroup::Work))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already exists"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn search_group_and_sort(pool: PgPool) {
    let repo = repository(pool);
    for (name, email, group) in [
        ("Ann Lee", "ann@example.com", ContactGroup::Work),
        ("Joanna Ray", "joanna@example.com", ContactGroup::Work),
        ("Hannah Fox", "hannah@example.com", ContactGroup::Family),
        ("Bob Stone", "bob@example.com", ContactGroup::Work),
    ] {
        repo.create(new_contact(name, email, group)).await.unwrap();
    }

    let filter = ContactFilter {
        search: Some("ANN".to_string()),
        group: Some(ContactGroup::Work),
        sort: SortOrder::Desc,
        sort_by: "name".to_string(),
    };
    let names: Vec<_> = repo
        .find_all(&filter)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Joanna Ray", "Ann Lee"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn search_matches_wildcards_literally(pool: PgPool) {
    let repo = repository(pool);
    repo.create(new_contact("100% Real", "real@example.com", ContactGroup::Other))
        .await
        .unwrap();
    repo.create(new_contact("1000 Fake", "fake@example.com", ContactGroup::Other))
        .await
        .unwrap();

    let filter = ContactFilter {
        search: Some("0%".to_string()),
        ..ContactFilter::default()
    };
    let found = repo.find_all(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "100% Real");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn update_merges_and_clears_phone(pool: PgPool) {
    let repo = repository(pool);
    let created = repo
        .create(NewContact {
            phone: Some("555-0000".to_string()),
            ..new_contact("Ann Lee", "ann@example.com", ContactGroup::Family)
        })
        .await
        .unwrap();
    let id = created.id.to_string();

    let changed = repo
        .update(
            &id,
            ContactChanges {
                phone: Some(Some("555-1234".to_string())),
                ..ContactChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(changed.phone.as_deref(), Some("555-1234"));
    assert_eq!(changed.name, created.name);
    assert_eq!(changed.group, ContactGroup::Family);
    assert!(changed.updated_at >= created.updated_at);

    let cleared = repo
        .update(
            &id,
            ContactChanges {
                phone: Some(None),
                ..ContactChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.phone, None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn update_to_taken_email_maps_to_conflict(pool: PgPool) {
    let repo = repository(pool);
    let ann = repo
        .create(new_contact("Ann Lee", "ann@example.com", ContactGroup::Other))
        .await
        .unwrap();
    repo.create(new_contact("Bob Stone", "bob@example.com", ContactGroup::Work))
        .await
        .unwrap();

    let id = ann.id.to_string();
    let changes = ContactChanges {
        email: Some("bob@example.com".to_string()),
        ..ContactChanges::default()
    };
    let err = repo.update(&id, changes).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already exists"));

    let stored = repo.find_one(&id).await.unwrap();
    assert_eq!(stored, ann);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn remove_and_missing_ids(pool: PgPool) {
    let repo = repository(pool);
    let created = repo
        .create(new_contact("Ann Lee", "ann@example.com", ContactGroup::Other))
        .await
        .unwrap();
    let id = created.id.to_string();

    repo.remove(&id).await.unwrap();
    assert!(matches!(repo.find_one(&id).await, Err(AppError::NotFound(_))));
    assert!(matches!(repo.remove(&id).await, Err(AppError::NotFound(_))));
    assert!(matches!(repo.find_one("garbage").await, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn distinct_groups_and_ping(pool: PgPool) {
    let repo = repository(pool);
    repo.create(new_contact("A", "a@example.com", ContactGroup::Work))
        .await
        .unwrap();
    repo.create(new_contact("B", "b@example.com", ContactGroup::Friends))
        .await
        .unwrap();

    assert_eq!(repo.distinct_groups().await.unwrap(), ["Friends", "Work"]);

    let ping = repo.ping().await;
    assert!(ping.success);
    assert_eq!(repo.connection_state(), ConnectionState::Connected);
}
