//! Commands and command handler functions.

use teloxide::{
    RequestError, dispatching::UpdateHandler, prelude::*, types::User,
    utils::command::BotCommands,
};

use engine::{EngineError, Role};

use crate::{
    ConfigParameters,
    commands::{BudgetCommands, UserStartCommands},
    parsing,
};

const SET_BUDGET_USAGE: &str = "Please enter a valid amount. Example: /setbudget 5000";
const SPEND_USAGE: &str = "Please enter a valid amount. Example: /spend 500";
const ADD_OBSERVER_USAGE: &str = "Please enter a valid id. Example: /addobserver 123456789";

/// Build the schema for the bot commands.
pub fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<UserStartCommands>()
                .endpoint(handle_start),
        )
        .branch(
            Update::filter_message()
                .filter_command::<BudgetCommands>()
                .endpoint(handle_budget_commands),
        )
}

async fn handle_start(
    bot: Bot,
    cfg: ConfigParameters,
    msg: Message,
    _cmd: UserStartCommands,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, "Could not identify the user.")
            .await?;
        return Ok(());
    };

    let reply = match cfg.engine.role(caller_id(from)).await {
        Ok(role) => start_text(role),
        Err(err) => user_message_for_engine_error(&err),
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_budget_commands(
    bot: Bot,
    cfg: ConfigParameters,
    msg: Message,
    cmd: BudgetCommands,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, "Could not identify the user.")
            .await?;
        return Ok(());
    };
    let caller = caller_id(from);

    let reply = match cmd {
        BudgetCommands::Help => BudgetCommands::descriptions().to_string(),
        BudgetCommands::SetBudget { amount } => set_budget_reply(&cfg, caller, &amount).await,
        BudgetCommands::Spend { amount } => spend_reply(&cfg, caller, &amount).await,
        BudgetCommands::Balance => balance_reply(&cfg, caller).await,
        BudgetCommands::AddObserver { target } => add_observer_reply(&cfg, caller, &target).await,
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn set_budget_reply(cfg: &ConfigParameters, caller: i64, amount: &str) -> String {
    let Ok(amount) = parsing::parse_amount(amount) else {
        return SET_BUDGET_USAGE.to_string();
    };

    match cfg.engine.set_budget(caller, amount).await {
        Ok(budget) => format!("Budget set to {budget}."),
        Err(EngineError::InvalidAmount(_)) => SET_BUDGET_USAGE.to_string(),
        Err(err) => user_message_for_engine_error(&err),
    }
}

async fn spend_reply(cfg: &ConfigParameters, caller: i64, amount: &str) -> String {
    let Ok(amount) = parsing::parse_amount(amount) else {
        return SPEND_USAGE.to_string();
    };

    match cfg.engine.spend(caller, amount).await {
        Ok(balance) => format!("Spent {amount}. Balance: {balance}."),
        Err(EngineError::InvalidAmount(_)) => SPEND_USAGE.to_string(),
        Err(err) => user_message_for_engine_error(&err),
    }
}

async fn balance_reply(cfg: &ConfigParameters, caller: i64) -> String {
    match cfg.engine.balance(caller).await {
        Ok(Some(balance)) => format!("Balance: {balance}."),
        Ok(None) => "Set a budget first with /setbudget.".to_string(),
        Err(err) => user_message_for_engine_error(&err),
    }
}

async fn add_observer_reply(cfg: &ConfigParameters, caller: i64, target: &str) -> String {
    let Ok(target) = parsing::parse_account_id(target) else {
        return ADD_OBSERVER_USAGE.to_string();
    };

    match cfg.engine.add_observer(caller, target).await {
        Ok(()) => format!("User {target} added as observer."),
        Err(err) => user_message_for_engine_error(&err),
    }
}

fn start_text(role: Option<Role>) -> String {
    match role {
        Some(Role::Owner) => {
            "Hi! You own this budget. Use /setbudget <amount> to reset it \
             and /spend <amount> to record expenses."
        }
        Some(Role::Observer) => {
            "Hi! You are an observer of this budget. Use /balance to check \
             what is left."
        }
        None => "Hi! Use /setbudget <amount> to start tracking a budget.",
    }
    .to_string()
}

fn user_message_for_engine_error(err: &EngineError) -> String {
    match err {
        EngineError::Forbidden(_) => "You do not have permission to do that.".to_string(),
        EngineError::InvalidAmount(_) => "Please enter a valid amount.".to_string(),
        EngineError::KeyNotFound(_) => "Set a budget first with /setbudget.".to_string(),
        err => {
            tracing::error!("engine operation failed: {err}");
            "Operation failed. Please try again later.".to_string()
        }
    }
}

fn caller_id(user: &User) -> i64 {
    user.id.0 as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_greeting_depends_on_role() {
        assert!(start_text(Some(Role::Owner)).contains("/setbudget"));
        assert!(start_text(Some(Role::Observer)).contains("/balance"));
        assert!(start_text(None).contains("/setbudget"));
    }

    #[test]
    fn permission_errors_map_to_no_permission_reply() {
        let err = EngineError::Forbidden("only the owner can spend".to_string());
        assert_eq!(
            user_message_for_engine_error(&err),
            "You do not have permission to do that."
        );
    }

    #[test]
    fn missing_balance_maps_to_setup_hint() {
        let err = EngineError::KeyNotFound("balance not set".to_string());
        assert_eq!(
            user_message_for_engine_error(&err),
            "Set a budget first with /setbudget."
        );
    }
}
