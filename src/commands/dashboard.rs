use async_trait::async_trait;

use super::{Command, CommandResult, Session};
use crate::dashboard::Summary;

pub struct DashboardCommand;

#[async_trait]
impl Command for DashboardCommand {
    fn name(&self) -> &str {
        "/dashboard"
    }

    fn aliases(&self) -> &[&str] {
        &["/d"]
    }

    fn description(&self) -> &str {
        "summary cards from the realtime store"
    }

    async fn execute(&self, _args: &str, session: &Session) -> CommandResult {
        let summary = Summary::fetch(session.store.as_ref()).await;
        print!("{}", summary.render(&session.ui.palette()));
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_session;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn handled_even_when_store_fails() {
        let store = MemoryStore::new()
            .with("activeSensors", json!(41))
            .failing("leaksDetected");
        let (session, _, _shell) = test_session(vec![], store);
        assert!(matches!(
            DashboardCommand.execute("", &session).await,
            CommandResult::Handled
        ));
    }

    #[test]
    fn metadata() {
        assert_eq!(DashboardCommand.name(), "/dashboard");
        assert_eq!(DashboardCommand.aliases(), &["/d"]);
    }
}
