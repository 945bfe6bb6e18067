//! Budget ledger core.
//!
//! The engine gates every mutating operation by the caller's stored role and
//! translates validated inputs into account-store calls. It keeps no account
//! state in memory: every read and write is a round trip to durable storage,
//! so concurrent command handlers need no shared mutable state here.

use sea_orm::DatabaseConnection;

pub use accounts::{Account, Role};
pub use error::EngineError;
pub use store::AccountStore;

mod accounts;
mod error;
mod store;

type ResultEngine<T> = Result<T, EngineError>;

/// Per-account state machine: an unregistered caller becomes the owner via
/// set-budget, or an observer when an owner registers it. There is no
/// transition out of either role.
#[derive(Debug)]
pub struct Engine {
    store: AccountStore,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Role currently stored for `account_id`, if any.
    ///
    /// A lookup only; no row is created for unknown callers.
    pub async fn role(&self, account_id: i64) -> ResultEngine<Option<Role>> {
        self.store.role(account_id).await
    }

    /// Set (or fully reset) the caller's budget and return the new balance.
    ///
    /// A caller without a row becomes the owner here; observers are rejected.
    /// Both `budget` and `balance` are set to `amount`: re-running the
    /// command is a full reset, not an adjustment.
    pub async fn set_budget(&self, caller: i64, amount: f64) -> ResultEngine<f64> {
        if let Some(Role::Observer) = self.store.role(caller).await? {
            return Err(EngineError::Forbidden(
                "observers cannot set a budget".to_string(),
            ));
        }

        validate_amount(amount)?;
        self.store.upsert_owner(caller, amount).await?;
        Ok(amount)
    }

    /// Record an expense and return the remaining balance.
    ///
    /// Owner only. The balance has no floor and may go negative.
    pub async fn spend(&self, caller: i64, amount: f64) -> ResultEngine<f64> {
        match self.store.role(caller).await? {
            Some(Role::Owner) => {}
            _ => {
                return Err(EngineError::Forbidden(
                    "only the owner can spend".to_string(),
                ));
            }
        }

        validate_amount(amount)?;
        self.store.adjust_balance(caller, amount).await?;
        self.store
            .balance(caller)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("balance not set".to_string()))
    }

    /// Remaining balance for any role; `None` until a budget has been set.
    pub async fn balance(&self, account_id: i64) -> ResultEngine<Option<f64>> {
        self.store.balance(account_id).await
    }

    /// Register `target` as a read-only observer account. Owner only.
    ///
    /// Observers live in a flat namespace: the row carries no link back to
    /// the owner who registered it. Registering an existing account is a
    /// no-op and never changes its role.
    pub async fn add_observer(&self, caller: i64, target: i64) -> ResultEngine<()> {
        match self.store.role(caller).await? {
            Some(Role::Owner) => {}
            _ => {
                return Err(EngineError::Forbidden(
                    "only the owner can add observers".to_string(),
                ));
            }
        }

        self.store.upsert_observer(target).await
    }

    /// Full account row, if any.
    pub async fn account(&self, account_id: i64) -> ResultEngine<Option<Account>> {
        self.store.account(account_id).await
    }
}

fn validate_amount(amount: f64) -> ResultEngine<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            store: AccountStore::new(self.database),
        }
    }
}
