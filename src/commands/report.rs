use async_trait::async_trait;

use super::{Command, CommandResult, Session};

pub struct ReportCommand;

impl ReportCommand {
    /// `village | symptoms | water source`. Missing trailing parts are empty.
    fn split(args: &str) -> (&str, &str, &str) {
        let mut parts = args.splitn(3, '|').map(str::trim);
        (
            parts.next().unwrap_or(""),
            parts.next().unwrap_or(""),
            parts.next().unwrap_or(""),
        )
    }
}

#[async_trait]
impl Command for ReportCommand {
    fn name(&self) -> &str {
        "/report"
    }

    fn usage(&self) -> &str {
        "VILLAGE | SYMPTOMS | WATER SOURCE"
    }

    fn description(&self) -> &str {
        "file a manual case report for the selected disease"
    }

    async fn execute(&self, args: &str, session: &Session) -> CommandResult {
        let (village, symptoms, water_source) = Self::split(args);
        match session.outbreak.report(village, symptoms, water_source) {
            Ok(report) => {
                println!(
                    "  ✓ report saved: {} ({})",
                    report.village, report.disease
                );
                CommandResult::Handled
            }
            Err(e) => {
                eprintln!("  ✗ {e}");
                CommandResult::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_session;
    use crate::outbreak::Disease;
    use crate::store::MemoryStore;

    #[test]
    fn splits_on_pipes() {
        assert_eq!(
            ReportCommand::split("Village B | fever, vomiting | river"),
            ("Village B", "fever, vomiting", "river")
        );
        assert_eq!(ReportCommand::split("Village B"), ("Village B", "", ""));
        assert_eq!(
            ReportCommand::split("a | b | c | d"),
            ("a", "b", "c | d")
        );
    }

    #[tokio::test]
    async fn saves_report_and_raises_alert() {
        let (session, _, _shell) = test_session(vec![], MemoryStore::new());
        session.outbreak.select(Disease::Typhoid);
        assert!(matches!(
            ReportCommand.execute("Village B | fever | river", &session).await,
            CommandResult::Handled
        ));
        assert_eq!(session.outbreak.alerts()[0], "New Report: Village B (typhoid)");
        let stored = session.outbreak.reports().recent(1).unwrap();
        assert_eq!(stored[0].report.water_source, "river");
    }

    #[tokio::test]
    async fn missing_village_fails() {
        let (session, _, _shell) = test_session(vec![], MemoryStore::new());
        assert!(matches!(
            ReportCommand.execute(" | fever | river", &session).await,
            CommandResult::Failed
        ));
        assert!(session.outbreak.reports().recent(1).unwrap().is_empty());
    }
}
