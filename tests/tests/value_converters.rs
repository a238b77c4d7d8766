//! Custom value converters: application values transform on write, raw
//! store values transform on read, and an unmappable raw value is a
//! conversion error rather than a silent default.

use crumpet::{
    schema::{Converter, Field},
    stmt::{Type, Value},
    Error, Record, Repository, Result, Schema, Serializer,
};
use crumpet_driver_sqlite::Sqlite;

use std::sync::Arc;

/// Task state kept as a string in the application, an integer in the store.
#[derive(Debug)]
struct StateCode;

impl Converter for StateCode {
    fn to_store(&self, value: Value) -> Result<Value> {
        match value.as_str() {
            Some("queued") => Ok(Value::I64(0)),
            Some("running") => Ok(Value::I64(1)),
            Some("done") => Ok(Value::I64(2)),
            _ => Err(Error::type_conversion(&value, "task state")),
        }
    }

    fn from_store(&self, value: Value) -> Result<Value> {
        match value.as_i64() {
            Some(0) => Ok(Value::String("queued".into())),
            Some(1) => Ok(Value::String("running".into())),
            Some(2) => Ok(Value::String("done".into())),
            _ => Err(Error::type_conversion(&value, "task state")),
        }
    }
}

async fn task_repository() -> Repository {
    let mut builder = Schema::builder();
    builder
        .model("task")
        .field(Field::new("id", Type::I64).primary_key().db_default())
        .field(Field::new("title", Type::String))
        .field(
            Field::new("state", Type::String)
                .app_default("queued")
                .converter(Arc::new(StateCode)),
        );
    let schema = builder.build().unwrap();

    let repo = Repository::new(schema, Arc::new(Sqlite::in_memory()), Serializer::sqlite());
    repo.exec(
        "CREATE TABLE task (id INTEGER PRIMARY KEY, title TEXT NOT NULL, state INTEGER NOT NULL)",
        vec![],
    )
    .await
    .unwrap();

    repo
}

fn new_task(repo: &Repository, title: &str) -> Record {
    let mut task = Record::new(repo.schema().model_by_name("task").unwrap().clone());
    task.set("title", title).unwrap();
    task
}

#[tokio::test]
async fn converter_round_trips_through_storage() {
    let repo = task_repository().await;

    let mut task = new_task(&repo, "build");
    task.set("state", "running").unwrap();
    repo.insert(&mut task).await.unwrap();

    // Stored as the integer code
    let raw = repo
        .scalar("SELECT state FROM task WHERE id = ?", vec![
            task.get("id").unwrap().clone(),
        ])
        .await
        .unwrap();
    assert_eq!(raw, Value::I64(1));

    // Read back as the application value
    let found = repo
        .one(&repo
            .query_builder("task")
            .unwrap()
            .filter("id", task.get("id").unwrap().clone())
            .unwrap())
        .await
        .unwrap();
    assert_eq!(found.get("state").unwrap(), &Value::String("running".into()));
}

#[tokio::test]
async fn converter_applies_inside_predicates() {
    let repo = task_repository().await;

    let mut running = new_task(&repo, "a");
    running.set("state", "running").unwrap();
    repo.insert(&mut running).await.unwrap();
    repo.insert(&mut new_task(&repo, "b")).await.unwrap();

    let query = repo
        .query_builder("task")
        .unwrap()
        .filter("state", "running")
        .unwrap();

    let found = repo.query_all(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("title").unwrap(), &Value::String("a".into()));
}

#[tokio::test]
async fn converter_applies_to_application_defaults() {
    let repo = task_repository().await;

    let mut task = new_task(&repo, "defaulted");
    repo.insert(&mut task).await.unwrap();

    let raw = repo
        .scalar("SELECT state FROM task", vec![])
        .await
        .unwrap();
    assert_eq!(raw, Value::I64(0));
}

#[tokio::test]
async fn unmappable_raw_value_is_a_conversion_error() {
    let repo = task_repository().await;

    repo.exec(
        "INSERT INTO task (title, state) VALUES (?, ?)",
        vec![Value::String("corrupt".into()), Value::I64(99)],
    )
    .await
    .unwrap();

    let err = repo
        .one(&repo.query_builder("task").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_type_conversion());
}
