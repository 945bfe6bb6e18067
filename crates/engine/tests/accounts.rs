use sea_orm::Database;

use engine::{Engine, EngineError, Role};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

#[tokio::test]
async fn first_set_budget_registers_the_owner() {
    let engine = engine_with_db().await;

    assert_eq!(engine.role(42).await.unwrap(), None);
    engine.set_budget(42, 500.0).await.unwrap();
    assert_eq!(engine.role(42).await.unwrap(), Some(Role::Owner));
    assert_eq!(engine.balance(42).await.unwrap(), Some(500.0));
}

#[tokio::test]
async fn set_budget_twice_is_idempotent() {
    let engine = engine_with_db().await;

    engine.set_budget(42, 500.0).await.unwrap();
    engine.set_budget(42, 500.0).await.unwrap();

    assert_eq!(engine.balance(42).await.unwrap(), Some(500.0));
}

#[tokio::test]
async fn set_budget_fully_resets_budget_and_balance() {
    let engine = engine_with_db().await;

    engine.set_budget(42, 500.0).await.unwrap();
    engine.spend(42, 100.0).await.unwrap();
    assert_eq!(engine.balance(42).await.unwrap(), Some(400.0));

    engine.set_budget(42, 800.0).await.unwrap();

    let account = engine.account(42).await.unwrap().unwrap();
    assert_eq!(account.budget, Some(800.0));
    assert_eq!(account.balance, Some(800.0));
}

#[tokio::test]
async fn spend_decrements_the_balance() {
    let engine = engine_with_db().await;

    engine.set_budget(42, 1000.0).await.unwrap();
    assert_eq!(engine.spend(42, 300.0).await.unwrap(), 700.0);
    assert_eq!(engine.spend(42, 200.0).await.unwrap(), 500.0);
    assert_eq!(engine.balance(42).await.unwrap(), Some(500.0));
}

#[tokio::test]
async fn spend_below_zero_goes_negative() {
    let engine = engine_with_db().await;

    engine.set_budget(42, 100.0).await.unwrap();
    assert_eq!(engine.spend(42, 150.0).await.unwrap(), -50.0);
}

#[tokio::test]
async fn set_budget_rejects_invalid_amounts() {
    let engine = engine_with_db().await;

    for amount in [0.0, -500.0, f64::NAN, f64::INFINITY] {
        let err = engine.set_budget(42, amount).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    assert_eq!(engine.role(42).await.unwrap(), None);
}

#[tokio::test]
async fn observer_cannot_mutate_anything() {
    let engine = engine_with_db().await;

    engine.set_budget(1, 1000.0).await.unwrap();
    engine.add_observer(1, 2).await.unwrap();

    let err = engine.set_budget(2, 500.0).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine.spend(2, 100.0).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine.add_observer(2, 3).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // None of the rejected calls left a trace in the store.
    let observer = engine.account(2).await.unwrap().unwrap();
    assert_eq!(observer.role, Role::Observer);
    assert_eq!(observer.budget, None);
    assert_eq!(observer.balance, None);
    assert_eq!(engine.role(3).await.unwrap(), None);
    assert_eq!(engine.balance(1).await.unwrap(), Some(1000.0));
}

#[tokio::test]
async fn unregistered_caller_cannot_spend_or_add_observers() {
    let engine = engine_with_db().await;

    let err = engine.spend(42, 100.0).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine.add_observer(42, 99).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(engine.role(99).await.unwrap(), None);
}

#[tokio::test]
async fn observer_registration_never_overwrites_an_owner() {
    let engine = engine_with_db().await;

    engine.set_budget(42, 1000.0).await.unwrap();
    engine.set_budget(7, 300.0).await.unwrap();

    // Another owner registering 42 as an observer must not touch the row.
    engine.add_observer(7, 42).await.unwrap();

    let account = engine.account(42).await.unwrap().unwrap();
    assert_eq!(account.role, Role::Owner);
    assert_eq!(account.budget, Some(1000.0));
    assert_eq!(account.balance, Some(1000.0));
}

#[tokio::test]
async fn observer_registration_is_a_noop_when_repeated() {
    let engine = engine_with_db().await;

    engine.set_budget(1, 1000.0).await.unwrap();
    engine.add_observer(1, 99).await.unwrap();
    engine.add_observer(1, 99).await.unwrap();

    assert_eq!(engine.role(99).await.unwrap(), Some(Role::Observer));
}

#[tokio::test]
async fn balance_is_unset_until_a_budget_exists() {
    let engine = engine_with_db().await;

    assert_eq!(engine.balance(42).await.unwrap(), None);

    engine.set_budget(1, 1000.0).await.unwrap();
    engine.add_observer(1, 2).await.unwrap();
    // Observers have no budget of their own either.
    assert_eq!(engine.balance(2).await.unwrap(), None);
}

#[tokio::test]
async fn owner_lifecycle() {
    let engine = engine_with_db().await;

    engine.set_budget(42, 1000.0).await.unwrap();
    assert_eq!(engine.balance(42).await.unwrap(), Some(1000.0));

    assert_eq!(engine.spend(42, 250.0).await.unwrap(), 750.0);
    assert_eq!(engine.balance(42).await.unwrap(), Some(750.0));

    engine.add_observer(42, 99).await.unwrap();
    assert_eq!(engine.role(99).await.unwrap(), Some(Role::Observer));
    assert_eq!(engine.balance(99).await.unwrap(), None);
}
