//! Pages of the shell, reached with `/`-prefixed commands.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry handles dispatch, alias resolution,
//! and dynamic help generation. Commands read from the [`Session`] and never
//! write UI state themselves; they hand a [`StateChange`] back to the shell.

mod complaints;
mod dashboard;
mod help;
mod outbreak;
mod quit;
mod report;
mod theme;
mod upload;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::Mutex;

use crate::outbreak::OutbreakPage;
use crate::predict::{Leakage, Pilferage, WaterQuality};
use crate::state::{ThemeChange, UiView};
use crate::store::RealtimeStore;
use crate::workflow::UploadPage;

/// Everything pages can reach while running.
pub struct Session {
    pub leakage: UploadPage<Leakage>,
    pub pilferage: UploadPage<Pilferage>,
    pub quality: UploadPage<WaterQuality>,
    pub store: Arc<dyn RealtimeStore>,
    pub outbreak: OutbreakPage,
    pub ui: UiView,
    /// The terminal's line reader, shared with the REPL prompt. `None` when
    /// nobody is at the terminal; modals then do not wait.
    pub input: Option<SharedInput>,
}

/// Line reader shared by the prompt and modals, so typed-ahead lines are
/// never split between two buffers.
pub type SharedInput = Arc<Mutex<Lines<Box<dyn AsyncBufRead + Send + Unpin>>>>;

pub fn shared_input(reader: impl AsyncBufRead + Send + Unpin + 'static) -> SharedInput {
    let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
    Arc::new(Mutex::new(reader.lines()))
}

impl Session {
    /// Tear down every page. Requests still in flight are dropped.
    pub fn close(&self) {
        self.leakage.close();
        self.pilferage.close();
        self.quality.close();
    }
}

/// A state change the shell needs to apply after a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Theme(ThemeChange),
}

/// What the REPL should do after a command runs.
#[derive(Debug)]
pub enum CommandResult {
    /// Not a command.
    NotACommand,
    /// Command handled, continue the REPL loop.
    Handled,
    /// Command ran but its page reported a failure.
    Failed,
    /// Command produced a state change the shell must apply.
    StateChanged(StateChange),
    /// Exit the REPL.
    Quit,
}

/// A page or action. Implement this trait to add new commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/dashboard"`.
    fn name(&self) -> &str;

    /// Alternative names, e.g. `&["/d"]`.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Argument synopsis for `/help`, e.g. `"[FILE]"`.
    fn usage(&self) -> &str {
        ""
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command. `args` is everything after the command name, trimmed.
    async fn execute(&self, args: &str, session: &Session) -> CommandResult;
}

/// Holds registered commands. Supports runtime registration.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in pages.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(dashboard::DashboardCommand),
            Arc::new(upload::UploadCommand::<Leakage>::new(|s| &s.leakage)),
            Arc::new(upload::UploadCommand::<Pilferage>::new(|s| &s.pilferage)),
            Arc::new(upload::UploadCommand::<WaterQuality>::new(|s| &s.quality)),
            Arc::new(complaints::ComplaintsCommand),
            Arc::new(outbreak::OutbreakCommand),
            Arc::new(report::ReportCommand),
            Arc::new(theme::ThemeCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Dispatch input to a matching command, or return `NotACommand`.
    pub async fn dispatch(&self, input: &str, session: &Session) -> CommandResult {
        let input = input.trim();
        let (cmd, args) = match input.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (input, ""),
        };

        for command in &self.commands {
            if cmd == command.name() || command.aliases().contains(&cmd) {
                // /help needs the registry to list all commands
                if command.name() == "/help" {
                    print!("{}", self.help_text());
                    return CommandResult::Handled;
                }
                return command.execute(args, session).await;
            }
        }

        if cmd.starts_with('/') {
            println!("unknown command: {cmd}");
            println!("type /help for available commands");
            return CommandResult::Handled;
        }

        CommandResult::NotACommand
    }

    /// Generate help text from all registered commands.
    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.usage(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// All registered names and aliases (for duplicate detection).
    pub fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_label(name: &str, usage: &str, aliases: &[&str]) -> String {
    let mut label = name.to_string();
    if !usage.is_empty() {
        label.push(' ');
        label.push_str(usage);
    }
    if !aliases.is_empty() {
        label.push_str(&format!(" ({})", aliases.join(", ")));
    }
    label
}

/// Print a boxed alert and, when someone is watching, wait for Enter.
///
/// The wait is an ordinary await, so Ctrl+C in the REPL cancels it.
pub(crate) async fn show_modal(alert: &crate::predict::Alert, session: &Session) {
    print!("\n{}", alert.render(&session.ui.palette()));
    if let Some(input) = &session.input {
        print!("  press Enter to close ");
        let _ = std::io::Write::flush(&mut std::io::stdout());
        let _ = input.lock().await.next_line().await;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::outbreak::mock::MockOutbreakSource;
    use crate::outbreak::reports::ReportLog;
    use crate::predict::mock::{MockPredictor, Scripted};
    use crate::predict::{Endpoint, Predictor};
    use crate::state::{UiShell, UiState};
    use crate::store::MemoryStore;
    use std::time::Duration;

    /// A non-interactive session over mocks. The shell is returned so the
    /// view stays connected.
    pub(crate) fn test_session(
        script: Vec<Scripted>,
        store: MemoryStore,
    ) -> (Session, Arc<MockPredictor>, UiShell) {
        let mock = Arc::new(MockPredictor::new(script));
        let predictor: Arc<dyn Predictor> = mock.clone();
        let shell = UiShell::new(UiState::default(), false);
        let session = Session {
            leakage: UploadPage::new(Endpoint::new("http://leak.test/predict"), predictor.clone()),
            pilferage: UploadPage::new(
                Endpoint::new("http://flow.test/pilferage"),
                predictor.clone(),
            ),
            quality: UploadPage::new(Endpoint::new("http://quality.test/predict"), predictor),
            store: Arc::new(store),
            outbreak: OutbreakPage::new(
                Box::new(MockOutbreakSource::seeded(1, Duration::ZERO)),
                ReportLog::open(":memory:").unwrap(),
            ),
            ui: shell.view(),
            input: None,
        };
        (session, mock, shell)
    }

    #[test]
    fn all_builtins_registered() {
        let reg = CommandRegistry::new();
        let names = reg.names();
        for name in [
            "/help",
            "/dashboard",
            "/leak",
            "/pilferage",
            "/quality",
            "/complaints",
            "/outbreak",
            "/report",
            "/theme",
            "/quit",
        ] {
            assert!(names.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn no_duplicate_triggers() {
        let reg = CommandRegistry::new();
        let triggers = reg.all_triggers();
        let mut seen = Vec::new();
        for t in &triggers {
            assert!(!seen.contains(t), "duplicate trigger: {t}");
            seen.push(t);
        }
    }

    #[test]
    fn help_text_includes_all_commands() {
        let reg = CommandRegistry::new();
        let text = reg.help_text();
        for name in reg.names() {
            assert!(text.contains(name), "help missing: {name}");
        }
        assert!(text.contains("/h, /?"));
    }

    #[tokio::test]
    async fn unknown_slash_command_is_handled() {
        let (session, _, _shell) = test_session(vec![], MemoryStore::new());
        let reg = CommandRegistry::new();
        assert!(matches!(
            reg.dispatch("/foobar", &session).await,
            CommandResult::Handled
        ));
    }

    #[tokio::test]
    async fn plain_text_is_not_a_command() {
        let (session, _, _shell) = test_session(vec![], MemoryStore::new());
        let reg = CommandRegistry::new();
        assert!(matches!(
            reg.dispatch("show me leaks", &session).await,
            CommandResult::NotACommand
        ));
    }

    #[tokio::test]
    async fn args_are_split_from_name() {
        let (session, _, _shell) = test_session(vec![], MemoryStore::new());
        let reg = CommandRegistry::new();
        let result = reg.dispatch("/theme   mode   dark ", &session).await;
        assert!(matches!(
            result,
            CommandResult::StateChanged(StateChange::Theme(ThemeChange::Mode(
                crate::theme::ThemeMode::Dark
            )))
        ));
    }

    #[tokio::test]
    async fn registered_command_works() {
        struct PingCommand;

        #[async_trait]
        impl Command for PingCommand {
            fn name(&self) -> &str {
                "/ping"
            }
            fn description(&self) -> &str {
                "pong"
            }
            async fn execute(&self, _args: &str, _session: &Session) -> CommandResult {
                CommandResult::Handled
            }
        }

        let (session, _, _shell) = test_session(vec![], MemoryStore::new());
        let mut reg = CommandRegistry::new();
        reg.register(Arc::new(PingCommand));
        assert!(matches!(
            reg.dispatch("/ping", &session).await,
            CommandResult::Handled
        ));
        assert!(reg.help_text().contains("/ping"));
    }

    #[test]
    fn format_label_variants() {
        assert_eq!(format_label("/quit", "", &[]), "/quit");
        assert_eq!(format_label("/help", "", &["/h", "/?"]), "/help (/h, /?)");
        assert_eq!(format_label("/leak", "[FILE]", &[]), "/leak [FILE]");
    }

    fn alert() -> crate::predict::Alert {
        crate::predict::Alert {
            title: "Leak Detected!".into(),
            message: "One or more sensor nodes have detected a leak.".into(),
        }
    }

    #[tokio::test]
    async fn modal_consumes_one_line_from_shared_input() {
        let (mut session, _, _shell) = test_session(vec![], MemoryStore::new());
        let input = shared_input(&b"\n/dashboard\n"[..]);
        session.input = Some(input.clone());

        show_modal(&alert(), &session).await;

        let next = input.lock().await.next_line().await.unwrap();
        assert_eq!(next.as_deref(), Some("/dashboard"));
    }

    #[tokio::test]
    async fn waiting_modal_can_be_cancelled() {
        let (mut session, _, _shell) = test_session(vec![], MemoryStore::new());
        let (_writer, reader) = tokio::io::duplex(64);
        let input = shared_input(tokio::io::BufReader::new(reader));
        session.input = Some(input.clone());

        let waited =
            tokio::time::timeout(Duration::from_millis(50), show_modal(&alert(), &session)).await;

        assert!(waited.is_err());
        assert!(input.try_lock().is_ok());
    }

    #[test]
    fn close_tears_down_every_page() {
        let (session, _, _shell) = test_session(vec![], MemoryStore::new());
        session.close();
        assert!(session.leakage.is_closed());
        assert!(session.pilferage.is_closed());
        assert!(session.quality.is_closed());
    }
}
