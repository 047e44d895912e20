use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn};

use jalrakshak::banner::{BannerInfo, print_banner, print_goodbye};
use jalrakshak::commands::{
    CommandRegistry, CommandResult, Session, StateChange, shared_input,
};
use jalrakshak::config::{Config, Key, Settings};
use jalrakshak::consts::{MOCK_OUTBREAK_LATENCY_MS, STORE_TOKEN_ENV, default_db_path};
use jalrakshak::logging;
use jalrakshak::outbreak::mock::MockOutbreakSource;
use jalrakshak::outbreak::reports::ReportLog;
use jalrakshak::outbreak::{Disease, OutbreakPage};
use jalrakshak::predict::{Endpoint, HttpPredictor, Predictor};
use jalrakshak::state::{ThemeChange, UiShell, UiState};
use jalrakshak::store::FirebaseStore;
use jalrakshak::workflow::UploadPage;

#[derive(Parser)]
#[command(
    name = "jalrakshak",
    version,
    about = "Water network monitoring: leaks, pilferage, quality and outbreaks."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// SQLite database for config and field reports (use :memory: for ephemeral)
    #[arg(short, long, global = true)]
    db: Option<String>,

    /// Realtime database URL for the dashboard and complaints
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Give up on prediction services after this many seconds (default: wait)
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Plain output without colours
    #[arg(long, global = true, default_value_t = false)]
    no_color: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Upload pressure readings and check every sensor node for leaks
    Leak {
        file: PathBuf,
        /// Override the leak detection service URL
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Upload flow readings and bucket sensors by pilferage risk
    Pilferage {
        file: PathBuf,
        /// Override the pilferage service URL
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Upload water samples and score their potability
    Quality {
        file: PathBuf,
        /// Override the water-quality service URL
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Show the dashboard summary
    Dashboard,
    /// List citizen complaints
    Complaints,
    /// Show outbreak risk for a disease
    Outbreak {
        #[arg(long, default_value = "cholera")]
        disease: Disease,
    },
    /// File a manual case report
    Report {
        village: String,
        symptoms: String,
        source: String,
        #[arg(long, default_value = "cholera")]
        disease: Disease,
    },
    /// Read or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show every stored setting
    List,
    /// Show one setting
    Get { key: Key },
    /// Store a setting
    Set { key: Key, value: String },
    /// Remove a stored setting, restoring its default
    Unset { key: Key },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let mut cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;

    let db = match cli.db.take() {
        Some(db) => db,
        None => {
            let path = default_db_path();
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
            path.to_string_lossy().into_owned()
        }
    };
    let config = Config::open(&db)?;

    let mut settings = Settings::load(&config)?;
    if let Some(url) = cli.store_url.take() {
        settings.store_url = url;
    }
    match &cli.command {
        Some(Command::Leak {
            endpoint: Some(url),
            ..
        }) => settings.leakage_endpoint = url.clone(),
        Some(Command::Pilferage {
            endpoint: Some(url),
            ..
        }) => settings.pilferage_endpoint = url.clone(),
        Some(Command::Quality {
            endpoint: Some(url),
            ..
        }) => settings.quality_endpoint = url.clone(),
        _ => {}
    }

    let token = std::env::var(STORE_TOKEN_ENV).ok();
    let store_auth = token.as_deref().is_some_and(|t| !t.is_empty());
    let predictor: Arc<dyn Predictor> =
        Arc::new(HttpPredictor::new(cli.timeout.map(Duration::from_secs))?);
    let shell = UiShell::new(
        UiState {
            theme: settings.theme,
        },
        !cli.no_color && io::stdout().is_terminal(),
    );

    // One reader for the prompt and for modals
    let input = shared_input(BufReader::new(tokio::io::stdin()));

    let session = Session {
        leakage: UploadPage::new(
            Endpoint::new(settings.leakage_endpoint.clone()),
            predictor.clone(),
        ),
        pilferage: UploadPage::new(
            Endpoint::new(settings.pilferage_endpoint.clone()),
            predictor.clone(),
        ),
        quality: UploadPage::new(Endpoint::new(settings.quality_endpoint.clone()), predictor),
        store: Arc::new(FirebaseStore::new(settings.store_url.clone(), token)),
        outbreak: OutbreakPage::new(
            Box::new(MockOutbreakSource::new(Duration::from_millis(
                MOCK_OUTBREAK_LATENCY_MS,
            ))),
            ReportLog::open(&db)?,
        ),
        ui: shell.view(),
        input: io::stdin().is_terminal().then(|| input.clone()),
    };
    let registry = CommandRegistry::new();

    // One-shot mode
    if let Some(command) = cli.command {
        let input = match command {
            Command::Leak { file, .. } => format!("/leak {}", file.display()),
            Command::Pilferage { file, .. } => format!("/pilferage {}", file.display()),
            Command::Quality { file, .. } => format!("/quality {}", file.display()),
            Command::Dashboard => "/dashboard".to_string(),
            Command::Complaints => "/complaints".to_string(),
            Command::Outbreak { disease } => format!("/outbreak {disease}"),
            Command::Report {
                village,
                symptoms,
                source,
                disease,
            } => {
                session.outbreak.select(disease);
                return Ok(match session.outbreak.report(&village, &symptoms, &source) {
                    Ok(report) => {
                        println!("  ✓ report saved: {} ({})", report.village, report.disease);
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("  ✗ {e}");
                        ExitCode::FAILURE
                    }
                });
            }
            Command::Config { action } => return handle_config(&config, &action),
        };
        let result = registry.dispatch(&input, &session).await;
        session.close();
        return Ok(match result {
            CommandResult::Failed => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        });
    }

    let database = if db == ":memory:" { "ephemeral" } else { db.as_str() };
    print_banner(&BannerInfo {
        settings: &settings,
        database,
        store_auth,
    });

    // REPL, async stdin so Ctrl+C is caught at the prompt too
    loop {
        print!("\njalrakshak> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = async { input.lock().await.next_line().await } => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {e}");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        // Ctrl+C while a page loads abandons that request, not the REPL
        let result = tokio::select! {
            result = registry.dispatch(command, &session) => result,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\ninterrupted");
                continue;
            }
        };

        match result {
            CommandResult::NotACommand => {
                println!("pages start with /, type /help for the list");
            }
            CommandResult::Handled | CommandResult::Failed => {}
            CommandResult::StateChanged(StateChange::Theme(change)) => {
                shell.apply(&change);
                let saved = match &change {
                    ThemeChange::Color(color) => config.set(Key::ThemeColor, &color.to_string()),
                    ThemeChange::Mode(mode) => config.set(Key::ThemeMode, mode.as_str()),
                };
                if let Err(e) = saved {
                    warn!(error = %e, "theme applied but not saved");
                }
                let theme = shell.state().theme;
                println!("  theme {} ({})", theme.color, theme.mode);
            }
            CommandResult::Quit => break,
        }
    }

    session.close();
    info!("session closed");
    print_goodbye();
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, action: &ConfigAction) -> anyhow::Result<ExitCode> {
    match action {
        ConfigAction::List => {
            let entries = config.entries()?;
            if entries.is_empty() {
                println!("no stored settings, defaults apply");
            }
            for (key, value) in entries {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Get { key } => match config.get(*key)? {
            Some(value) => println!("{value}"),
            None => {
                eprintln!("{key} is not set");
                return Ok(ExitCode::FAILURE);
            }
        },
        ConfigAction::Set { key, value } => {
            config.set(*key, value)?;
            println!("✓ {key} = {}", value.trim());
        }
        ConfigAction::Unset { key } => {
            config.remove(*key)?;
            println!("✓ {key} unset");
        }
    }
    Ok(ExitCode::SUCCESS)
}
