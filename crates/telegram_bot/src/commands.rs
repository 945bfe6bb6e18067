//! Command structs

use teloxide::utils::command::{BotCommands, ParseError};

/// Passes the whole argument line through untouched.
///
/// Malformed or missing arguments must turn into a corrective reply, not a
/// dispatcher parse failure, so validation happens in the handlers instead.
pub fn raw_arg(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_string(),))
}

/// Commands to manage the budget.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Commands to manage the budget:")]
pub enum BudgetCommands {
    #[command(description = "Show this message.")]
    Help,
    #[command(description = "Set or reset the budget.", parse_with = raw_arg)]
    SetBudget { amount: String },
    #[command(description = "Record an expense.", parse_with = raw_arg)]
    Spend { amount: String },
    #[command(description = "Show the remaining balance.")]
    Balance,
    #[command(
        description = "Grant a user read-only access to the balance.",
        parse_with = raw_arg
    )]
    AddObserver { target: String },
}

/// Start command. Needed when user send /start
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum UserStartCommands {
    Start,
}
