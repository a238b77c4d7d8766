//! Shared fixtures for the integration suite: the user/post schema, a
//! repository wired to an in-memory SQLite driver, and a statement-counting
//! driver wrapper for round-trip assertions.

use crumpet::{driver::Driver, Record, Repository, Schema, Serializer};
use crumpet_core::{
    driver::{Operation, Response},
    schema::Field,
    stmt::Type,
};
use crumpet_driver_sqlite::Sqlite;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// The test schema: users with generated, application-default, and nullable
/// fields; posts owning a foreign key to their author.
pub fn schema() -> Arc<Schema> {
    let mut builder = Schema::builder();

    builder
        .model("user")
        .table("users")
        .field(Field::new("id", Type::I64).primary_key().db_default())
        .field(Field::new("name", Type::String))
        .field(Field::new("role", Type::String).app_default("member"))
        .field(Field::new("active", Type::Bool).app_default(true))
        .field(Field::new("created_at", Type::String).db_default())
        .field(Field::new("updated_at", Type::String).nullable())
        .has_many("posts", "post", "author_id");

    builder
        .model("post")
        .table("posts")
        .field(Field::new("id", Type::I64).primary_key().db_default())
        .field(Field::new("author_id", Type::I64))
        .field(Field::new("title", Type::String))
        .field(Field::new("body", Type::String).nullable())
        .belongs_to("author", "user", "author_id");

    builder.build().unwrap()
}

pub async fn repository() -> Repository {
    repository_with_driver(Arc::new(Sqlite::in_memory())).await
}

pub async fn repository_with_driver(driver: Arc<dyn Driver>) -> Repository {
    let repo = Repository::new(schema(), driver, Serializer::sqlite());
    create_tables(&repo).await;
    repo
}

/// DDL goes through the raw passthrough; schema migration is not this
/// system's business.
pub async fn create_tables(repo: &Repository) {
    repo.exec(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            active INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT
        )",
        vec![],
    )
    .await
    .unwrap();

    repo.exec(
        "CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            author_id INTEGER NOT NULL REFERENCES users(id),
            title TEXT NOT NULL,
            body TEXT
        )",
        vec![],
    )
    .await
    .unwrap();
}

/// A fresh user record with only the required field set.
pub fn new_user(repo: &Repository, name: &str) -> Record {
    let mut user = Record::new(repo.schema().model_by_name("user").unwrap().clone());
    user.set("name", name).unwrap();
    user
}

/// A fresh post record owned by the given (inserted) author.
pub fn new_post(repo: &Repository, author: &Record, title: &str) -> Record {
    let mut post = Record::new(repo.schema().model_by_name("post").unwrap().clone());
    post.set("author_id", author.get("id").unwrap().clone())
        .unwrap();
    post.set("title", title).unwrap();
    post
}

/// Wraps a driver and counts the statements that actually reach it.
#[derive(Debug)]
pub struct CountingDriver {
    inner: Sqlite,
    statements: AtomicUsize,
}

impl CountingDriver {
    pub fn in_memory() -> Self {
        Self {
            inner: Sqlite::in_memory(),
            statements: AtomicUsize::new(0),
        }
    }

    pub fn statements(&self) -> usize {
        self.statements.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Driver for CountingDriver {
    async fn exec(&self, op: Operation) -> crumpet::Result<Response> {
        self.statements.fetch_add(1, Ordering::SeqCst);
        self.inner.exec(op).await
    }
}
