//! projboard CLI
//!
//! Project manager and status dashboard for a projboard server.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use console::{style, Term};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::error::RecvError;

use projboard::cli::{CliApp, CliConfig, CliError, OutputFormat, OutputFormatter};
use projboard::client::ProjectManager;
use projboard::core::project::ProjectId;
use projboard::dashboard::alerts::{
    AlertArchive, AlertRules, AlertThresholds, DEFAULT_OPEN_ISSUES_THRESHOLD,
};
use projboard::refresh::{RefreshConfig, RefreshService};
use projboard::view::form::ProjectForm;

/// projboard CLI - projects and status dashboard
#[derive(Parser)]
#[command(name = "projboard")]
#[command(version = projboard::VERSION)]
#[command(about = "Manage projects and watch the status dashboard", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PROJBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Server base URL
    #[arg(short, long, env = "PROJBOARD_API_URL")]
    api_url: Option<String>,

    /// Output format (text, json, json-pretty)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project operations
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Show the status dashboard
    Dashboard {
        /// Keep refreshing until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Refresh interval in seconds (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Alert operations
    #[command(subcommand)]
    Alerts(AlertCommands),

    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Check server health
    Health,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List all projects
    List,

    /// Add a project (prompts for missing required fields)
    Add {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        /// Repository URL
        #[arg(short, long)]
        repository: Option<String>,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a project
    Delete {
        /// Project ID
        id: ProjectId,
    },
}

#[derive(Subcommand)]
enum AlertCommands {
    /// Evaluate threshold alerts against the current dashboard
    Check {
        /// Write the alerts to a timestamped JSON file in this directory
        #[arg(short, long)]
        archive_dir: Option<PathBuf>,

        /// Open-issue threshold
        #[arg(short, long, default_value_t = DEFAULT_OPEN_ISSUES_THRESHOLD)]
        threshold: u64,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let term = Term::stdout();

    if let Err(e) = run_command(&cli, &term).await {
        let output = OutputFormatter::new(cli.format).with_color(!cli.no_color);
        output.error(&CliError::from_anyhow(e).to_string());
        std::process::exit(1);
    }
}

async fn run_command(cli: &Cli, term: &Term) -> anyhow::Result<()> {
    let app = build_app(cli)?;

    if app.is_verbose() {
        app.output().info(&format!("Server: {}", app.config().api_url));
    }

    match &cli.command {
        Commands::Projects(cmd) => cmd_projects(&app, cmd).await,
        Commands::Dashboard { watch, interval } => {
            cmd_dashboard(&app, *watch, *interval, term).await
        }
        Commands::Alerts(cmd) => cmd_alerts(&app, cmd).await,
        Commands::Config(cmd) => cmd_config(cli, &app, cmd),
        Commands::Health => cmd_health(&app).await,
    }
}

fn build_app(cli: &Cli) -> anyhow::Result<CliApp> {
    let mut app = CliApp::load(cli.config.clone())?.with_verbose(cli.verbose);

    if let Some(url) = &cli.api_url {
        app = app.with_api_url(url.clone());
    }
    if cli.no_color {
        app = app.without_color();
    }
    console::set_colors_enabled(app.config().color);

    Ok(app.with_format(cli.format))
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

async fn cmd_projects(app: &CliApp, cmd: &ProjectCommands) -> anyhow::Result<()> {
    let mut manager = ProjectManager::new(app.api_client()?);
    let output = app.output();

    match cmd {
        ProjectCommands::List => {
            let spinner = create_spinner("Fetching projects...");
            let result = manager.refresh().await;
            spinner.finish_and_clear();

            let board = result?;
            output.data(&board.projects(), &board.render(app.config().color));
        }

        ProjectCommands::Add {
            name,
            repository,
            description,
        } => {
            let interactive = name.is_none() || repository.is_none();
            let mut form = ProjectForm::new();

            form.set_name(match name {
                Some(name) => name.clone(),
                None => prompt("Project name", false)?,
            });
            form.set_repository(match repository {
                Some(url) => url.clone(),
                None => prompt("Repository URL", false)?,
            });
            match description {
                Some(text) => {
                    form.set_description(text.clone());
                }
                None if interactive => {
                    form.set_description(prompt("Description (optional)", true)?);
                }
                None => {}
            }

            let spinner = create_spinner("Adding project...");
            let result = manager.add(&mut form).await;
            spinner.finish_and_clear();

            let project = result?;
            if output.format().is_json() {
                output.data(&project, "");
            } else {
                output.success(&format!("Added project {} (#{})", project.name, project.id));
            }
        }

        ProjectCommands::Delete { id } => {
            let spinner = create_spinner("Deleting project...");
            let result = manager.delete(*id).await;
            spinner.finish_and_clear();

            result?;
            output.success(&format!("Deleted project #{}", id));
        }
    }

    Ok(())
}

async fn cmd_dashboard(
    app: &CliApp,
    watch: bool,
    interval: Option<u64>,
    term: &Term,
) -> anyhow::Result<()> {
    let client = app.api_client()?;
    let renderer = app.renderer();

    if !watch {
        let spinner = create_spinner("Loading dashboard...");
        let result = client.fetch_dashboard().await;
        spinner.finish_and_clear();

        let data = result?;
        app.output().data(&data, &renderer.render(&data));
        return Ok(());
    }

    let secs = interval.unwrap_or(app.config().refresh_interval_secs).max(1);
    let service = RefreshService::new(client, RefreshConfig::every_secs(secs));
    let mut updates = service.subscribe();
    let handle = service.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(data) => {
                    let _ = term.clear_screen();
                    let _ = term.write_line(&renderer.render(&data));

                    let state = service.state().await;
                    let _ = term.write_line(&format!(
                        "{} refreshed {} ({} ok, {} failed), next in {}s, Ctrl-C to quit",
                        style("ℹ").blue(),
                        Utc::now().format("%H:%M:%S"),
                        state.total_refreshes,
                        state.failed_refreshes,
                        secs
                    ));
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
            _ = &mut ctrl_c => break,
        }
    }

    service.stop();
    let _ = handle.await;
    Ok(())
}

async fn cmd_alerts(app: &CliApp, cmd: &AlertCommands) -> anyhow::Result<()> {
    match cmd {
        AlertCommands::Check {
            archive_dir,
            threshold,
        } => {
            let client = app.api_client()?;

            let spinner = create_spinner("Loading dashboard...");
            let result = client.fetch_dashboard().await;
            spinner.finish_and_clear();
            let data = result?;

            let rules = AlertRules::new(AlertThresholds {
                open_issues: *threshold,
            });
            let derived = rules.evaluate(&data).len();
            let alerts = rules.annotate(data).alerts;

            app.output()
                .data(&alerts, &app.renderer().alerts(&alerts));

            if derived > 0 {
                app.output().warning(&format!(
                    "{} subsystem(s) above {} open issues",
                    derived, threshold
                ));
            }

            if let Some(dir) = archive_dir {
                match AlertArchive::new(dir.clone()).save(&alerts, Utc::now())? {
                    Some(path) => app.output().success(&format!(
                        "Archived {} alert(s) to {}",
                        alerts.len(),
                        path.display()
                    )),
                    None => app.output().info("No alerts to archive"),
                }
            }
        }
    }

    Ok(())
}

fn cmd_config(cli: &Cli, app: &CliApp, cmd: &ConfigCommands) -> anyhow::Result<()> {
    let output = app.output();

    match cmd {
        ConfigCommands::Show => {
            let config = app.config();
            let rows = vec![
                vec!["api_url".to_string(), config.api_url.clone()],
                vec!["timeout_secs".to_string(), config.timeout_secs.to_string()],
                vec![
                    "refresh_interval_secs".to_string(),
                    config.refresh_interval_secs.to_string(),
                ],
                vec!["color".to_string(), config.color.to_string()],
            ];
            if output.format().is_json() {
                output.data(config, "");
            } else {
                output.table(&["Key", "Value"], &rows);
            }
        }

        ConfigCommands::Init { force } => {
            let path = cli.config.clone().unwrap_or_else(CliConfig::default_path);

            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            app.config().save(&path)?;
            output.success(&format!("Configuration written to {}", path.display()));
        }
    }

    Ok(())
}

async fn cmd_health(app: &CliApp) -> anyhow::Result<()> {
    let client = app.api_client()?;

    let spinner = create_spinner("Checking server...");
    let result = client.health().await;
    spinner.finish_and_clear();

    let health = result?;
    if app.output().format().is_json() {
        app.output().data(&health, "");
    } else {
        app.output().success(&format!(
            "{} {} is {} at {}",
            health.service,
            health.version,
            health.status,
            client.base_url()
        ));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

fn prompt(label: &str, allow_empty: bool) -> anyhow::Result<String> {
    let value = Input::<String>::new()
        .with_prompt(label)
        .allow_empty(allow_empty)
        .interact_text()?;
    Ok(value)
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}
