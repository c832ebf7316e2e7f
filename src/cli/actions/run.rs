use crate::cli::actions::{Action, server, user};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point: every `Action::*` variant maps to its module's `execute`.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Server(args) => server::execute(args).await,
        Action::CreateUser(args) => user::execute(args).await,
    }
}
