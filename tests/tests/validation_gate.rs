//! The validation collaborator gates writes: a rejected record never
//! produces a statement.

use tests::*;

use crumpet::{Error, Record, Result, Validator};

use std::sync::Arc;

struct NoEmptyNames;

impl Validator for NoEmptyNames {
    fn validate(&self, record: &Record) -> Result<()> {
        if record.is_set("name") && record.get("name")?.as_str() == Some("") {
            return Err(Error::validation("name must not be empty"));
        }
        Ok(())
    }
}

#[tokio::test]
async fn rejected_insert_never_reaches_the_store() {
    let driver = Arc::new(CountingDriver::in_memory());
    let repo = repository_with_driver(driver.clone())
        .await
        .with_validator(Arc::new(NoEmptyNames));

    let before = driver.statements();

    let err = repo.insert(&mut new_user(&repo, "")).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(driver.statements(), before);
}

#[tokio::test]
async fn rejected_update_never_reaches_the_store() {
    let driver = Arc::new(CountingDriver::in_memory());
    let repo = repository_with_driver(driver.clone())
        .await
        .with_validator(Arc::new(NoEmptyNames));

    let mut user = new_user(&repo, "valid");
    repo.insert(&mut user).await.unwrap();

    let before = driver.statements();

    user.set("name", "").unwrap();
    let err = repo.update(&mut user).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(driver.statements(), before);
}

#[tokio::test]
async fn valid_records_pass_the_gate() {
    let repo = repository()
        .await
        .with_validator(Arc::new(NoEmptyNames));

    let mut user = new_user(&repo, "fine");
    repo.insert(&mut user).await.unwrap();

    user.set("name", "still fine").unwrap();
    assert_eq!(repo.update(&mut user).await.unwrap(), Some(1));
}
