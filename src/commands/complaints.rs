use async_trait::async_trait;
use tracing::error;

use super::{Command, CommandResult, Session};
use crate::complaints::{self, Complaint};

pub struct ComplaintsCommand;

impl ComplaintsCommand {
    fn image_for<'a>(complaints: &'a [Complaint], id: &str) -> anyhow::Result<&'a str> {
        let complaint = complaints
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow::anyhow!("no complaint with id {id}"))?;
        complaint
            .image_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("complaint {id} has no image"))
    }
}

#[async_trait]
impl Command for ComplaintsCommand {
    fn name(&self) -> &str {
        "/complaints"
    }

    fn usage(&self) -> &str {
        "[open ID]"
    }

    fn description(&self) -> &str {
        "list citizen complaints, or open one's image"
    }

    async fn execute(&self, args: &str, session: &Session) -> CommandResult {
        let complaints = match complaints::fetch(session.store.as_ref()).await {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "failed to load complaints");
                eprintln!("  ✗ could not load complaints: {e}");
                return CommandResult::Failed;
            }
        };

        if let Some(id) = args.strip_prefix("open") {
            let url = match Self::image_for(&complaints, id.trim()) {
                Ok(url) => url,
                Err(e) => {
                    eprintln!("  ✗ {e}");
                    return CommandResult::Failed;
                }
            };
            println!("  opening {url}");
            // Headless terminals have no browser; the URL is printed above.
            let _ = open::that(url);
            return CommandResult::Handled;
        }

        if complaints.is_empty() {
            println!("  no complaints reported");
        } else {
            print!("{}", complaints::render(&complaints, &session.ui.palette()));
        }
        CommandResult::Handled
    }
}
