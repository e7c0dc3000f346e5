use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use jobmail_insight::api::HttpApiClient;
use jobmail_insight::app::InsightApp;
use jobmail_insight::config::Config;
use jobmail_insight::filter::{EmailFilter, StatusFilter};
use jobmail_insight::navigation::MemoryNavigator;
use jobmail_insight::view::ViewMode;
use jobmail_insight::ApplicationStatus;

#[derive(Parser)]
#[command(name = "jobmail-insight")]
#[command(about = "Dashboard client for classified job-application emails")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Obtain an authorization URL and open it in the browser
    Login,
    /// Show the current session state
    Status,
    /// Load and print the dashboard
    Dashboard {
        /// Ask the backend to bypass its cache
        #[arg(long)]
        refresh: bool,
        /// Case-insensitive term matched against company or subject
        #[arg(long)]
        search: Option<String>,
        /// Restrict to one status: selection, pending or rejection
        #[arg(long)]
        status: Option<String>,
        /// Write the filtered view to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Mark one email as read
    MarkRead { id: String },
    /// Invalidate the backend session
    Logout,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: jobmail-insight --help");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("jobmail_insight=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("jobmail_insight=info,warn,error"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load(&cli.config).await?;
    let gateway = Arc::new(HttpApiClient::new(&config.backend.base_url, config.timeout())?);
    let navigator = Arc::new(MemoryNavigator::parse("http://localhost/")?);
    let app = InsightApp::new(gateway, navigator.clone());

    match cli.command {
        Commands::Login => {
            app.login().await;
            match navigator.navigations().last() {
                Some(auth_url) => {
                    println!("Authorize at: {}", auth_url);
                    if open::that(auth_url).is_err() {
                        println!("Could not open a browser; visit the URL manually.");
                    }
                }
                None => {
                    let error = app
                        .session
                        .state()
                        .error
                        .unwrap_or_else(|| "Login failed".to_string());
                    anyhow::bail!(error);
                }
            }
        }
        Commands::Status => {
            app.session.resolve_initial_session().await;
            if app.session.state().is_authenticated() {
                println!("Authenticated");
            } else {
                println!("Not authenticated. Run `jobmail-insight login` first.");
            }
        }
        Commands::Dashboard {
            refresh,
            search,
            status,
            export,
        } => {
            let spinner = load_spinner();
            app.start().await;
            if refresh {
                app.refresh().await;
            }
            spinner.finish_and_clear();

            let filter = build_filter(search, status)?;
            render(&app, &filter);

            if let Some(path) = export {
                app.export_csv(&filter, &path).await?;
                println!("\nExported filtered view to {}", path.display());
            }
        }
        Commands::MarkRead { id } => {
            let spinner = load_spinner();
            app.start().await;
            spinner.finish_and_clear();
            app.mark_read(&id).await?;
            println!("Marked {} as read", id);
        }
        Commands::Logout => {
            app.logout().await;
            println!("Logged out");
        }
    }

    Ok(())
}

fn load_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static template is valid"),
    );
    spinner.set_message("Loading your emails...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn build_filter(search: Option<String>, status: Option<String>) -> Result<EmailFilter> {
    let status = match status {
        Some(s) => StatusFilter::Only(
            s.parse::<ApplicationStatus>()
                .map_err(|e| anyhow::anyhow!(e))?,
        ),
        None => StatusFilter::All,
    };
    Ok(EmailFilter {
        search: search.unwrap_or_default(),
        status,
    })
}

fn render(app: &InsightApp, filter: &EmailFilter) {
    match app.view_mode() {
        ViewMode::CheckingAuth | ViewMode::LoadingData => {
            // start() settles both states before we render; reaching here
            // means the backend never answered
            println!("Still loading; try again.");
        }
        ViewMode::Unauthenticated { error } => {
            if let Some(message) = error {
                println!("Authentication error: {}", message);
            }
            println!("Not authenticated. Run `jobmail-insight login` first.");
        }
        ViewMode::DataError { message } => {
            println!("Failed to load dashboard: {}", message);
            println!("Retry with `jobmail-insight dashboard --refresh`.");
        }
        ViewMode::Dashboard { data, refreshing } => {
            if refreshing {
                println!("(refreshing in background)");
            }
            let stats = &data.stats;
            println!(
                "Total: {}  Selection: {}  Pending: {}  Rejection: {}  Unread: {}",
                stats.total, stats.selection, stats.pending, stats.rejection, stats.unread
            );

            let cards = filter.apply(&data.emails);
            if cards.is_empty() {
                println!("\nNo job emails match the current filter.");
                return;
            }

            println!();
            for card in cards {
                let read_marker = if card.read { " " } else { "*" };
                println!(
                    "{} {}  {:<20} {:<9}  {}",
                    read_marker, card.date, card.company, card.status, card.subject
                );
            }
        }
    }
}
