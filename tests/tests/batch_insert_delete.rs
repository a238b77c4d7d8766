//! Batched writes: one statement per batch, distinct generated keys, and
//! key-set deletes.

use tests::*;

use crumpet::stmt::Value;

use std::sync::Arc;

#[tokio::test]
async fn batch_insert_is_one_round_trip_with_distinct_keys() {
    let driver = Arc::new(CountingDriver::in_memory());
    let repo = repository_with_driver(driver.clone()).await;

    let before = driver.statements();

    let mut batch = [new_user(&repo, "one"), new_user(&repo, "two")];
    repo.insert_many(&mut batch).await.unwrap();

    assert_eq!(driver.statements(), before + 1);

    let first = batch[0].get("id").unwrap();
    let second = batch[1].get("id").unwrap();
    assert_ne!(first, second);

    // Generated timestamps arrived too
    assert!(batch[0].get("created_at").unwrap().as_str().is_some());
    assert!(batch[1].get("created_at").unwrap().as_str().is_some());
}

#[tokio::test]
async fn delete_queried_records_then_requery_returns_empty() {
    let repo = repository().await;

    for name in ["x", "y", "z"] {
        repo.insert(&mut new_user(&repo, name)).await.unwrap();
    }

    let all = repo
        .query_all(&repo.query_builder("user").unwrap())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let ids: Vec<Value> = all
        .iter()
        .map(|record| record.get("id").unwrap().clone())
        .collect();

    assert_eq!(repo.delete_many(&all).await.unwrap(), 3);

    let requeried = repo
        .query_all(
            &repo
                .query_builder("user")
                .unwrap()
                .filter("id", Value::List(ids))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(requeried.is_empty());
}

#[tokio::test]
async fn delete_query_removes_by_predicate() {
    let repo = repository().await;

    repo.insert(&mut new_user(&repo, "keep")).await.unwrap();
    let mut admin = new_user(&repo, "drop");
    admin.set("role", "admin").unwrap();
    repo.insert(&mut admin).await.unwrap();

    let deleted = repo
        .delete_query(
            &repo
                .query_builder("user")
                .unwrap()
                .filter("role", "admin")
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining = repo
        .query_all(&repo.query_builder("user").unwrap())
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        remaining[0].get("name").unwrap(),
        &Value::String("keep".into())
    );
}

#[tokio::test]
async fn empty_batches_are_no_ops() {
    let driver = Arc::new(CountingDriver::in_memory());
    let repo = repository_with_driver(driver.clone()).await;

    let before = driver.statements();

    repo.insert_many(&mut []).await.unwrap();
    assert_eq!(repo.delete_many(&[]).await.unwrap(), 0);

    assert_eq!(driver.statements(), before);
}

#[tokio::test]
async fn batch_mixing_models_is_rejected() {
    let repo = repository().await;

    let mut author = new_user(&repo, "mixed");
    repo.insert(&mut author).await.unwrap();

    let mut batch = [new_user(&repo, "ok"), new_post(&repo, &author, "not ok")];
    let err = repo.insert_many(&mut batch).await.unwrap_err();
    assert!(err.is_invalid_statement());
}
