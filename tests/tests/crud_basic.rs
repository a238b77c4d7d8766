//! Basic single-record lifecycle: insert, round-trip query, update, delete,
//! plus the raw-SQL and scalar surfaces.

use tests::*;

use crumpet::stmt::Value;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn insert_then_query_round_trips() {
    let repo = repository().await;

    let mut user = new_user(&repo, "Test User");
    repo.insert(&mut user).await.unwrap();

    let id = user.get("id").unwrap().clone();

    let query = repo
        .query_builder("user")
        .unwrap()
        .filter("id", id.clone())
        .unwrap();
    let found = repo.one(&query).await.unwrap();

    assert_eq!(found.get("id").unwrap(), &id);
    assert_eq!(
        found.get("name").unwrap(),
        &Value::String("Test User".into())
    );
    assert_eq!(found.get("role").unwrap(), user.get("role").unwrap());
    assert_eq!(found.get("active").unwrap(), user.get("active").unwrap());
    assert_eq!(
        found.get("created_at").unwrap(),
        user.get("created_at").unwrap()
    );
    assert_eq!(found.get("updated_at").unwrap(), &Value::Null);
}

#[tokio::test]
async fn update_then_delete_then_requery() {
    let repo = repository().await;

    let mut user = new_user(&repo, "Original");
    repo.insert(&mut user).await.unwrap();

    user.set("name", "Renamed").unwrap();
    assert_eq!(repo.update(&mut user).await.unwrap(), Some(1));

    let query = repo
        .query_builder("user")
        .unwrap()
        .filter("id", user.get("id").unwrap().clone())
        .unwrap();

    let reloaded = repo.one(&query).await.unwrap();
    assert_eq!(
        reloaded.get("name").unwrap(),
        &Value::String("Renamed".into())
    );

    assert_eq!(repo.delete(&user).await.unwrap(), 1);
    assert!(repo.query_all(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn query_streams_records_lazily() {
    let repo = repository().await;

    for name in ["a", "b", "c"] {
        repo.insert(&mut new_user(&repo, name)).await.unwrap();
    }

    let query = repo.query_builder("user").unwrap();
    let mut cursor = repo.query(&query).await.unwrap();

    let mut seen = 0;
    while let Some(record) = cursor.next().await {
        record.unwrap();
        seen += 1;
    }
    assert_eq!(seen, 3);
}

#[tokio::test]
async fn raw_sql_materializes_records() {
    let repo = repository().await;

    repo.insert(&mut new_user(&repo, "raw")).await.unwrap();

    let records = repo
        .query_sql(
            "user",
            "SELECT id, name FROM users WHERE name = ?",
            vec![Value::String("raw".into())],
        )
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("name").unwrap(),
        &Value::String("raw".into())
    );
    // Raw projection never mentioned role
    assert!(records[0].get("role").unwrap_err().is_unset_field());
}

#[tokio::test]
async fn scalar_returns_the_single_value() {
    let repo = repository().await;

    repo.insert(&mut new_user(&repo, "a")).await.unwrap();
    repo.insert(&mut new_user(&repo, "b")).await.unwrap();

    let count = repo
        .scalar("SELECT count(*) FROM users", vec![])
        .await
        .unwrap();
    assert_eq!(count.to_i64().unwrap(), 2);

    let query = repo.query_builder("user").unwrap().select(["count(*)"]);
    let count = repo.scalar_query(&query).await.unwrap();
    assert_eq!(count.to_i64().unwrap(), 2);
}

#[tokio::test]
async fn exec_passes_driver_results_through() {
    let repo = repository().await;

    repo.insert(&mut new_user(&repo, "gone")).await.unwrap();

    let affected = repo
        .exec("DELETE FROM users WHERE name = ?", vec!["gone".into()])
        .await
        .unwrap();
    assert_eq!(affected, 1);
}

#[tokio::test]
async fn driver_failures_surface_verbatim() {
    let repo = repository().await;

    let err = repo.exec("NOT EVEN SQL", vec![]).await.unwrap_err();
    assert!(err.is_driver());
}
