use async_trait::async_trait;

use super::{Command, CommandResult, Session, StateChange};
use crate::state::ThemeChange;
use crate::theme::{Color, ThemeMode};

pub struct ThemeCommand;

impl ThemeCommand {
    fn parse(args: &str) -> anyhow::Result<ThemeChange> {
        let (setting, value) = args
            .split_once(char::is_whitespace)
            .map(|(s, v)| (s, v.trim()))
            .unwrap_or((args, ""));
        match setting {
            "color" | "colour" => Ok(ThemeChange::Color(value.parse::<Color>()?)),
            "mode" => Ok(ThemeChange::Mode(value.parse::<ThemeMode>()?)),
            other => anyhow::bail!("unknown theme setting: {other} (expected color or mode)"),
        }
    }
}

#[async_trait]
impl Command for ThemeCommand {
    fn name(&self) -> &str {
        "/theme"
    }

    fn usage(&self) -> &str {
        "[color #RRGGBB | mode light|dark]"
    }

    fn description(&self) -> &str {
        "show or change the accent colour and mode"
    }

    async fn execute(&self, args: &str, session: &Session) -> CommandResult {
        if args.is_empty() {
            let theme = session.ui.snapshot().theme;
            println!("  color  {}", theme.color);
            println!("  mode   {}", theme.mode);
            return CommandResult::Handled;
        }

        match Self::parse(args) {
            Ok(change) => CommandResult::StateChanged(StateChange::Theme(change)),
            Err(e) => {
                eprintln!("  ✗ {e}");
                CommandResult::Failed
            }
        }
    }
}
