use async_trait::async_trait;

use super::{Command, CommandResult, Session};

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "list available pages and commands"
    }

    /// The registry prints the listing itself; this is only reached when the
    /// command is run outside a registry.
    async fn execute(&self, _args: &str, _session: &Session) -> CommandResult {
        CommandResult::Handled
    }
}
