//! Default population on insert: store-generated fields come back filled,
//! application defaults compute before the write, optional fields without a
//! default stay null.

use tests::*;

use crumpet::{schema::Field, stmt::Type, stmt::Value, Record, Repository, Schema, Serializer};
use crumpet_driver_sqlite::Sqlite;

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

#[tokio::test]
async fn insert_populates_declared_defaults() {
    let repo = repository().await;

    let mut user = new_user(&repo, "Test User");
    repo.insert(&mut user).await.unwrap();

    // Store-generated
    assert!(user.get("id").unwrap().as_i64().is_some());
    assert!(user.get("created_at").unwrap().as_str().is_some());

    // Application defaults
    assert_eq!(user.get("role").unwrap(), &Value::String("member".into()));
    assert_eq!(user.get("active").unwrap(), &Value::Bool(true));

    // No default, no caller value: stays null, not generated
    assert_eq!(user.get("updated_at").unwrap(), &Value::Null);
}

#[tokio::test]
async fn caller_values_win_over_defaults() {
    let repo = repository().await;

    let mut user = new_user(&repo, "admin user");
    user.set("role", "admin").unwrap();
    user.set("active", false).unwrap();
    repo.insert(&mut user).await.unwrap();

    let query = repo
        .query_builder("user")
        .unwrap()
        .filter("id", user.get("id").unwrap().clone())
        .unwrap();
    let found = repo.one(&query).await.unwrap();

    assert_eq!(found.get("role").unwrap(), &Value::String("admin".into()));
    assert_eq!(found.get("active").unwrap(), &Value::Bool(false));
}

#[tokio::test]
async fn missing_required_field_never_reaches_the_store() {
    let driver = Arc::new(CountingDriver::in_memory());
    let repo = repository_with_driver(driver.clone()).await;

    let before = driver.statements();

    let mut user = Record::new(repo.schema().model_by_name("user").unwrap().clone());
    let err = repo.insert(&mut user).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(driver.statements(), before);
}

#[tokio::test]
async fn application_default_thunks_run_per_insert() {
    static SEQ: AtomicI64 = AtomicI64::new(1);

    let mut builder = Schema::builder();
    builder
        .model("job")
        .field(Field::new("id", Type::I64).primary_key().db_default())
        .field(
            Field::new("seq", Type::I64)
                .app_default_with(|| Value::I64(SEQ.fetch_add(1, Ordering::SeqCst))),
        );
    let schema = builder.build().unwrap();

    let repo = Repository::new(schema, Arc::new(Sqlite::in_memory()), Serializer::sqlite());
    repo.exec(
        "CREATE TABLE job (id INTEGER PRIMARY KEY, seq INTEGER NOT NULL)",
        vec![],
    )
    .await
    .unwrap();

    let model = repo.schema().model_by_name("job").unwrap().clone();
    let mut first = Record::new(model.clone());
    let mut second = Record::new(model);

    repo.insert(&mut first).await.unwrap();
    repo.insert(&mut second).await.unwrap();

    assert_ne!(first.get("seq").unwrap(), second.get("seq").unwrap());
}
