//! Durable account storage.
//!
//! Every operation is a single SQL statement, so concurrent commands against
//! the same account row are linearized by the database. The connection is a
//! shared pool; there is no per-call open/close and no in-memory copy of the
//! rows.

use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::{Expr, OnConflict},
};

use crate::{
    ResultEngine,
    accounts::{self, Account, Role},
};

#[derive(Debug)]
pub struct AccountStore {
    database: DatabaseConnection,
}

impl AccountStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Insert an owner row with `budget = balance = budget`, or fully reset
    /// an existing row's budget and balance to the new value.
    ///
    /// The stored role is not part of the conflict update, so a second call
    /// can never flip it. Idempotent: re-running with the same budget leaves
    /// the same state.
    pub async fn upsert_owner(&self, account_id: i64, budget: f64) -> ResultEngine<()> {
        let row = accounts::ActiveModel {
            account_id: ActiveValue::Set(account_id),
            role: ActiveValue::Set(Role::Owner.as_str().to_string()),
            budget: ActiveValue::Set(Some(budget)),
            balance: ActiveValue::Set(Some(budget)),
        };

        accounts::Entity::insert(row)
            .on_conflict(
                OnConflict::column(accounts::Column::AccountId)
                    .update_columns([accounts::Column::Budget, accounts::Column::Balance])
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    /// Insert an observer row with unset budget and balance.
    ///
    /// Conflict policy: a no-op when the row already exists. Registration
    /// never downgrades an existing owner or alters its data.
    pub async fn upsert_observer(&self, account_id: i64) -> ResultEngine<()> {
        let row = accounts::ActiveModel {
            account_id: ActiveValue::Set(account_id),
            role: ActiveValue::Set(Role::Observer.as_str().to_string()),
            budget: ActiveValue::Set(None),
            balance: ActiveValue::Set(None),
        };

        accounts::Entity::insert(row)
            .on_conflict(
                OnConflict::column(accounts::Column::AccountId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    /// Decrement the stored balance by `amount` in place.
    ///
    /// Missing rows and rows with a NULL balance are left unchanged; the
    /// caller gates on role before getting here.
    pub async fn adjust_balance(&self, account_id: i64, amount: f64) -> ResultEngine<()> {
        accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).sub(amount),
            )
            .filter(accounts::Column::AccountId.eq(account_id))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    pub async fn balance(&self, account_id: i64) -> ResultEngine<Option<f64>> {
        let row = accounts::Entity::find_by_id(account_id)
            .one(&self.database)
            .await?;
        Ok(row.and_then(|model| model.balance))
    }

    pub async fn role(&self, account_id: i64) -> ResultEngine<Option<Role>> {
        let row = accounts::Entity::find_by_id(account_id)
            .one(&self.database)
            .await?;
        row.map(|model| Role::try_from(model.role.as_str()))
            .transpose()
    }

    /// Full row read.
    pub async fn account(&self, account_id: i64) -> ResultEngine<Option<Account>> {
        let row = accounts::Entity::find_by_id(account_id)
            .one(&self.database)
            .await?;
        row.map(Account::try_from).transpose()
    }
}
