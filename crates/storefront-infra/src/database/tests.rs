use sea_orm::{DatabaseBackend, MockDatabase};

use storefront_core::ports::UserRepository;

use crate::database::PostgresUserRepository;
use crate::database::entity::user;

fn model(email: &str) -> user::Model {
    let now = chrono::Utc::now();
    user::Model {
        id: uuid::Uuid::new_v4(),
        email: email.to_owned(),
        password_hash: "$argon2id$fake".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone: String::new(),
        role: "customer".to_owned(),
        email_verified: false,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_user_by_id() {
    let expected = model("ada@example.com");
    let id = expected.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![expected]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.email, "ada@example.com");
    assert_eq!(found.role, "customer");
}

#[tokio::test]
async fn find_user_by_email() {
    let expected = model("ada@example.com");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![expected]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_email("ada@example.com").await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn find_by_email_misses_cleanly() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_email("nobody@example.com").await.unwrap();
    assert!(found.is_none());
}
