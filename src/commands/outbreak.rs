use async_trait::async_trait;
use tracing::error;

use super::{Command, CommandResult, Session};
use crate::outbreak::Disease;

/// How many manual reports the page lists under the charts.
const RECENT_REPORTS: usize = 5;

pub struct OutbreakCommand;

#[async_trait]
impl Command for OutbreakCommand {
    fn name(&self) -> &str {
        "/outbreak"
    }

    fn usage(&self) -> &str {
        "[DISEASE]"
    }

    fn description(&self) -> &str {
        "outbreak risk, trends and hotspots for a disease"
    }

    async fn execute(&self, args: &str, session: &Session) -> CommandResult {
        let page = &session.outbreak;
        let disease = if args.is_empty() {
            page.disease()
        } else {
            match args.parse::<Disease>() {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("  ✗ {e}");
                    return CommandResult::Failed;
                }
            }
        };

        let snapshot = match page.load(disease).await {
            Ok(s) => s,
            Err(e) => {
                error!(%disease, error = %e, "outbreak data unavailable");
                eprintln!("  ✗ outbreak data unavailable: {e}");
                return CommandResult::Failed;
            }
        };
        let palette = session.ui.palette();
        print!("{}", page.render(&snapshot, &palette));

        match page.reports().recent(RECENT_REPORTS) {
            Ok(reports) if !reports.is_empty() => {
                println!();
                println!("{}", palette.heading("Recent Field Reports"));
                for r in reports {
                    println!(
                        "  {}  {} ({})  {} / {}",
                        r.timestamp,
                        r.report.village,
                        r.report.disease,
                        r.report.symptoms,
                        r.report.water_source
                    );
                }
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "failed to read field reports"),
        }
        CommandResult::Handled
    }
}
