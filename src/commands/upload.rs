use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::error;

use super::{Command, CommandResult, Session, show_modal};
use crate::predict::{Alert, PredictionKind, Render, clean_path};
use crate::spinner::Spinner;
use crate::workflow::{Submission, UploadPage};

/// One command per prediction page. `/leak FILE` selects and submits,
/// `/leak` alone resubmits the current selection.
pub struct UploadCommand<K: PredictionKind> {
    name: String,
    page: fn(&Session) -> &UploadPage<K>,
    _kind: PhantomData<K>,
}

impl<K: PredictionKind> UploadCommand<K> {
    pub fn new(page: fn(&Session) -> &UploadPage<K>) -> Self {
        Self {
            name: format!("/{}", K::NAME),
            page,
            _kind: PhantomData,
        }
    }
}

#[async_trait]
impl<K: PredictionKind> Command for UploadCommand<K> {
    fn name(&self) -> &str {
        &self.name
    }

    fn usage(&self) -> &str {
        "[FILE]"
    }

    fn description(&self) -> &str {
        K::ACTION
    }

    async fn execute(&self, args: &str, session: &Session) -> CommandResult {
        let page = (self.page)(session);
        let palette = session.ui.palette();

        if !args.is_empty()
            && let Err(e) = page.select(clean_path(args))
        {
            error!(page = K::NAME, error = %e, "file rejected");
            return failed(&e.user_message(), session).await;
        }

        println!("{}", palette.heading(K::TITLE));
        if let Some(path) = page.selected() {
            println!("  file      {}", path.display());
        }
        println!("  endpoint  {}", page.endpoint().url);

        let spinner = Spinner::follow(page.loading(), "Loading...");
        let outcome = page.submit().await;
        spinner.stop().await;

        match outcome {
            Ok(Submission::Applied(result)) => {
                println!();
                print!("{}", result.render(&palette));
                if let Some(alert) = result.alert() {
                    show_modal(&alert, session).await;
                }
                CommandResult::Handled
            }
            Ok(Submission::Superseded) => {
                println!("  a newer submission replaced this one");
                CommandResult::Handled
            }
            Ok(Submission::Discarded) => CommandResult::Handled,
            Err(e) => {
                error!(page = K::NAME, error = %e, kind = ?e.kind(), "submission failed");
                failed(&e.user_message(), session).await
            }
        }
    }
}

/// Raise the error modal. Details stay in the log.
async fn failed(message: &str, session: &Session) -> CommandResult {
    let alert = Alert {
        title: "Error".to_string(),
        message: message.to_string(),
    };
    show_modal(&alert, session).await;
    CommandResult::Failed
}
