//! Account primitives.
//!
//! One account row exists per chat participant who has interacted with the
//! bot. The role is assigned at the first write and never changes afterwards;
//! budget and balance are only meaningful for the owner.

use sea_orm::entity::prelude::*;

use crate::EngineError;

/// What an account may do: the owner sets the budget, spends from it and
/// grants visibility; observers can only read the remaining balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Owner,
    Observer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Observer => "observer",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "owner" => Ok(Self::Owner),
            "observer" => Ok(Self::Observer),
            other => Err(EngineError::InvalidRole(format!("invalid role: {other}"))),
        }
    }
}

/// A stored account.
///
/// `balance` is only defined once a budget has been set; an unset balance is
/// "no budget yet", not zero. The balance itself has no floor.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub id: i64,
    pub role: Role,
    pub budget: Option<f64>,
    pub balance: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Platform user id. Assigned by the chat platform, never generated here.
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: i64,
    pub role: String,
    pub budget: Option<f64>,
    pub balance: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.account_id,
            role: Role::try_from(model.role.as_str())?,
            budget: model.budget,
            balance: model.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_form() {
        assert_eq!(Role::try_from(Role::Owner.as_str()).unwrap(), Role::Owner);
        assert_eq!(
            Role::try_from(Role::Observer.as_str()).unwrap(),
            Role::Observer
        );
    }

    #[test]
    fn unknown_role_string_is_rejected() {
        let err = Role::try_from("admin").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRole(_)));
    }

    #[test]
    fn account_from_model() {
        let model = Model {
            account_id: 42,
            role: "owner".to_string(),
            budget: Some(1000.0),
            balance: Some(750.0),
        };

        let account = Account::try_from(model).unwrap();
        assert_eq!(account.id, 42);
        assert_eq!(account.role, Role::Owner);
        assert_eq!(account.budget, Some(1000.0));
        assert_eq!(account.balance, Some(750.0));
    }

    #[test]
    fn account_from_model_rejects_corrupted_role() {
        let model = Model {
            account_id: 42,
            role: "root".to_string(),
            budget: None,
            balance: None,
        };

        assert!(Account::try_from(model).is_err());
    }
}
