//! JobDeck - customizable job search dashboard.
//!
//! This binary opens the interactive dashboard and exposes non-interactive
//! commands for inspecting and editing a user's layout and metrics.
//!
//! # Commands
//!
//! - `jobdeck tui`: Interactive dashboard (the default)
//! - `jobdeck layout ...`: Show and edit the widget layout
//! - `jobdeck metrics ...`: Show and update dashboard counters
//! - `jobdeck widgets`: List the widget catalogue
//!
//! # Environment Variables
//!
//! See the [`config`](jobdeck_dashboard::config) module for available
//! configuration options.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use jobdeck_dashboard::config::{validate_user_id, Config};
use jobdeck_dashboard::layout::LayoutStore;
use jobdeck_dashboard::registry::WidgetRegistry;
use jobdeck_dashboard::session::Session;
use jobdeck_dashboard::singleton::SingletonRegistry;
use jobdeck_dashboard::tui::{self, App, Symbols, Theme};
use jobdeck_dashboard::types::{MetricsUpdate, WidgetSize};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "JOBDECK_LOG";

/// JobDeck - customizable job search dashboard.
///
/// Shows a per-user dashboard of job search widgets and lets you arrange
/// them from the terminal.
#[derive(Parser, Debug)]
#[command(name = "jobdeck")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    JOBDECK_USER_ID        User id namespacing stored data (default: hostname)
    JOBDECK_DATA_DIR       Storage directory (default: ~/.jobdeck)
    JOBDECK_FEATURE_FLAGS  Comma-separated active feature flags
    JOBDECK_TICK_RATE_MS   TUI tick interval, 10-1000 (default: 60)
    JOBDECK_LOG            Log filter (default: info)
    NO_COLOR               Disable colors in the TUI

EXAMPLES:
    # Open the dashboard
    jobdeck

    # Show every widget, hidden ones included
    jobdeck layout show --all

    # Make the streaks widget visible and large
    jobdeck layout toggle streaks --visible true
    jobdeck layout size streaks L

    # Record this week's applications
    jobdeck metrics set --applications-week 5
")]
struct Cli {
    /// User id (overrides JOBDECK_USER_ID).
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Storage directory (overrides JOBDECK_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive dashboard.
    Tui,

    /// Show and edit the widget layout.
    #[command(subcommand)]
    Layout(LayoutCommand),

    /// Show and update dashboard counters.
    #[command(subcommand)]
    Metrics(MetricsCommand),

    /// List the widget catalogue.
    Widgets {
        /// Extra feature flag to treat as active (repeatable).
        #[arg(long = "flag", value_name = "NAME")]
        flags: Vec<String>,
    },
}

/// Layout subcommands.
#[derive(Subcommand, Debug)]
enum LayoutCommand {
    /// Print the layout in render order.
    Show {
        /// Include hidden widgets.
        #[arg(short, long)]
        all: bool,
    },

    /// Show or hide a widget.
    Toggle {
        /// Widget id.
        id: String,
        /// Target visibility.
        #[arg(long, action = clap::ArgAction::Set)]
        visible: bool,
    },

    /// Change a widget's size.
    Size {
        /// Widget id.
        id: String,
        /// New size (S, M or L).
        size: WidgetSize,
    },

    /// Add a widget, or make it visible if already present.
    Add {
        /// Widget id.
        id: String,
        /// Size to use instead of the widget's default.
        #[arg(short, long)]
        size: Option<WidgetSize>,
    },

    /// Hide a widget.
    Remove {
        /// Widget id.
        id: String,
    },

    /// Move a widget to a new position in the full layout.
    Move {
        /// Widget id.
        id: String,
        /// Target index, clamped to the layout length.
        index: usize,
    },

    /// Restore the default layout.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Metrics subcommands.
#[derive(Subcommand, Debug)]
enum MetricsCommand {
    /// Print the current counters.
    Show,

    /// Update one or more counters.
    Set(MetricsArgs),
}

/// Counter values for `metrics set`; omitted values are left unchanged.
#[derive(Args, Debug)]
struct MetricsArgs {
    /// Résumé completion percentage.
    #[arg(long)]
    resume_progress: Option<u32>,
    /// Applications submitted this week.
    #[arg(long)]
    applications_week: Option<u32>,
    /// Upcoming interviews.
    #[arg(long)]
    interviews_upcoming: Option<u32>,
    /// Deadlines within the next 48 hours.
    #[arg(long = "deadlines-48h")]
    deadlines_48h: Option<u32>,
    /// Consecutive active days.
    #[arg(long)]
    streak_days: Option<u32>,
}

impl From<MetricsArgs> for MetricsUpdate {
    fn from(args: MetricsArgs) -> Self {
        Self {
            resume_progress: args.resume_progress,
            applications_week: args.applications_week,
            interviews_upcoming: args.interviews_upcoming,
            deadlines_48h: args.deadlines_48h,
            streak_days: args.streak_days,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            init_file_logging(&config)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to create tokio runtime")?;

            runtime.block_on(run_tui(config))
        }
        Command::Layout(cmd) => {
            init_logging();
            run_layout(&config, cmd)
        }
        Command::Metrics(cmd) => {
            init_logging();
            run_metrics(&config, cmd)
        }
        Command::Widgets { flags } => {
            init_logging();
            run_widgets(&config, flags);
            Ok(())
        }
    }
}

/// Loads configuration from the environment and applies CLI overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env().context("Failed to load configuration")?;

    if let Some(user) = &cli.user {
        config.user_id = validate_user_id(user).context("Invalid --user")?;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    Ok(config)
}

/// Opens storage and loads both stores for the configured user.
fn open_session(config: &Config) -> Result<Session> {
    Session::open(config).context(format!(
        "Failed to open storage at {}",
        config.data_dir.display()
    ))
}

/// Runs the interactive dashboard.
async fn run_tui(config: Config) -> Result<()> {
    info!(
        user_id = %config.user_id,
        data_dir = %config.data_dir.display(),
        flags = ?config.feature_flags,
        "Starting JobDeck"
    );

    let Session { layout, metrics } = open_session(&config)?;

    let app = App::new(
        layout,
        metrics,
        config.feature_flags.clone(),
        SingletonRegistry::new(),
    )
    .with_style(Theme::for_no_color(config.no_color), Symbols::detect());

    tui::run(app, Duration::from_millis(config.tick_rate_ms))
        .await
        .context("Dashboard failed")?;

    info!("JobDeck stopped");
    Ok(())
}

/// Runs a layout subcommand.
fn run_layout(config: &Config, cmd: LayoutCommand) -> Result<()> {
    let mut store = open_session(config)?.layout;

    match cmd {
        LayoutCommand::Show { all } => {
            print_lines(&layout_rows(&store, all));
            return Ok(());
        }
        LayoutCommand::Reset { yes: false } if !confirm("Restore the default layout?")? => {
            eprintln!("Aborted.");
            return Ok(());
        }
        cmd => apply_layout_command(&mut store, cmd)?,
    }

    debug!(user_id = %config.user_id, "Layout updated");
    print_lines(&layout_rows(&store, true));
    Ok(())
}

/// Applies a layout edit. `Show` is a no-op and `Reset` does not prompt.
fn apply_layout_command(store: &mut LayoutStore, cmd: LayoutCommand) -> Result<()> {
    match cmd {
        LayoutCommand::Show { .. } => {}
        LayoutCommand::Toggle { id, visible } => {
            ensure_present(store, &id)?;
            store.update_widget_visibility(&id, visible)?;
        }
        LayoutCommand::Size { id, size } => {
            ensure_present(store, &id)?;
            if !store.registry().supports_size(&id, size) {
                bail!("Widget '{id}' does not support size {size}");
            }
            store.update_widget_size(&id, size)?;
        }
        LayoutCommand::Add { id, size } => {
            let Some(definition) = store.registry().get_widget_by_id(&id) else {
                bail!("Unknown widget '{id}'. Run 'jobdeck widgets' to list them.");
            };
            if let Some(size) = size {
                if !definition.supports(size) {
                    bail!("Widget '{id}' does not support size {size}");
                }
            }
            store.add_widget(&id, size)?;
        }
        LayoutCommand::Remove { id } => {
            ensure_present(store, &id)?;
            store.remove_widget(&id)?;
        }
        LayoutCommand::Move { id, index } => {
            ensure_present(store, &id)?;
            store.move_widget(&id, index)?;
        }
        LayoutCommand::Reset { .. } => store.reset_to_defaults()?,
    }
    Ok(())
}

/// Fails unless `id` is part of the user's layout.
fn ensure_present(store: &LayoutStore, id: &str) -> Result<()> {
    if store.widget(id).is_none() {
        bail!("Widget '{id}' is not in the layout. Run 'jobdeck layout show --all'.");
    }
    Ok(())
}

/// Formats the layout as a table in render order, header first.
fn layout_rows(store: &LayoutStore, all: bool) -> Vec<String> {
    let mut rows = vec![format!(
        "{:<5} {:<8} {:<4} {:<20} TITLE",
        "ORDER", "VISIBLE", "SIZE", "ID"
    )];
    for widget in store.widgets().iter().filter(|w| all || w.visible) {
        let title = store
            .registry()
            .get_widget_by_id(&widget.id)
            .map_or("", |d| d.title);
        rows.push(format!(
            "{:<5} {:<8} {:<4} {:<20} {}",
            widget.order,
            if widget.visible { "yes" } else { "no" },
            widget.size,
            widget.id,
            title
        ));
    }
    rows
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Runs a metrics subcommand.
fn run_metrics(config: &Config, cmd: MetricsCommand) -> Result<()> {
    let mut store = open_session(config)?.metrics;

    if let MetricsCommand::Set(args) = cmd {
        let update = MetricsUpdate::from(args);
        if update.is_empty() {
            bail!("Nothing to update. Pass at least one counter, e.g. --streak-days 3");
        }
        store.update_metrics(update)?;
    }

    let metrics = store.metrics();
    println!("Résumé progress:      {}%", metrics.resume_progress);
    println!("Applications (week):  {}", metrics.applications_week);
    println!("Upcoming interviews:  {}", metrics.interviews_upcoming);
    println!("Deadlines (48h):      {}", metrics.deadlines_48h);
    println!("Streak (days):        {}", metrics.streak_days);
    Ok(())
}

/// Lists the widgets available under the configured and extra flags.
fn run_widgets(config: &Config, extra_flags: Vec<String>) {
    let mut flags = config.feature_flags.clone();
    flags.extend(extra_flags);

    let registry = WidgetRegistry::builtin();
    println!("{:<20} {:<7} {:<12} DESCRIPTION", "ID", "SIZES", "FLAG");
    for definition in registry.get_available_widgets(&flags) {
        let sizes: String = definition
            .supports_sizes
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{:<20} {:<7} {:<12} {}",
            definition.id,
            sizes,
            definition.feature_flag.unwrap_or("-"),
            definition.description
        );
    }
}

/// Asks a yes/no question on stderr.
fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging to stderr for non-interactive commands.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

/// Initializes logging to the log file so the alternate screen stays clean.
fn init_file_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context(format!(
        "Failed to create data directory {}",
        config.data_dir.display()
    ))?;
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context(format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use clap::CommandFactory;
    use jobdeck_dashboard::layout::layout_key;
    use jobdeck_dashboard::storage::{KeyValueStorage, MemoryStorage};

    fn store_with(raw: Option<&str>) -> LayoutStore {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(raw) = raw {
            storage.set(&layout_key("alice"), raw).unwrap();
        }
        Session::with_storage(storage, "alice").layout
    }

    /// Widget ids from `layout_rows`, skipping the header.
    fn row_ids(rows: &[String]) -> Vec<&str> {
        rows.iter()
            .skip(1)
            .filter_map(|row| row.split_whitespace().nth(3))
            .collect()
    }

    fn parse_layout(args: &[&str]) -> LayoutCommand {
        let cli = Cli::try_parse_from(["jobdeck", "layout"].iter().chain(args)).unwrap();
        match cli.command {
            Some(Command::Layout(cmd)) => cmd,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["jobdeck", "--user", "bob"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.user.as_deref(), Some("bob"));
    }

    #[test]
    fn size_argument_rejects_unknown_values() {
        assert!(Cli::try_parse_from(["jobdeck", "layout", "size", "streaks", "XL"]).is_err());
    }

    #[test]
    fn metrics_set_builds_partial_update() {
        let cli = Cli::try_parse_from([
            "jobdeck",
            "metrics",
            "set",
            "--deadlines-48h",
            "3",
            "--streak-days",
            "5",
        ])
        .unwrap();
        let Some(Command::Metrics(MetricsCommand::Set(args))) = cli.command else {
            panic!("expected metrics set");
        };

        let update = MetricsUpdate::from(args);

        assert_eq!(update.deadlines_48h, Some(3));
        assert_eq!(update.streak_days, Some(5));
        assert_eq!(update.resume_progress, None);
        assert!(!update.is_empty());
    }

    #[test]
    fn show_lists_visible_widgets_unless_all() {
        let store = store_with(None);

        let visible = layout_rows(&store, false);
        let all = layout_rows(&store, true);

        assert!(visible[0].starts_with("ORDER"));
        assert_eq!(row_ids(&visible).len(), 6);
        assert_eq!(row_ids(&all).len(), 8);
        assert!(!row_ids(&visible).contains(&"streaks"));
    }

    #[test]
    fn show_prints_unsorted_layout_in_render_order() {
        let store = store_with(Some(
            r#"[
                {"id":"streaks","size":"S","visible":true,"order":2},
                {"id":"quickStats","size":"M","visible":true,"order":0},
                {"id":"nextActions","size":"M","visible":true,"order":1}
            ]"#,
        ));

        assert_eq!(
            row_ids(&layout_rows(&store, false)),
            ["quickStats", "nextActions", "streaks"]
        );
    }

    #[test]
    fn move_follows_render_order_of_unsorted_layout() {
        let mut store = store_with(Some(
            r#"[
                {"id":"streaks","size":"S","visible":true,"order":2},
                {"id":"quickStats","size":"M","visible":true,"order":0},
                {"id":"nextActions","size":"M","visible":true,"order":1}
            ]"#,
        ));

        apply_layout_command(&mut store, parse_layout(&["move", "quickStats", "2"])).unwrap();

        assert_eq!(
            row_ids(&layout_rows(&store, false)),
            ["nextActions", "streaks", "quickStats"]
        );
    }

    #[test]
    fn move_of_absent_widget_fails() {
        let mut store = store_with(None);
        let before = store.widgets().to_vec();

        let err = apply_layout_command(&mut store, parse_layout(&["move", "weather", "0"]))
            .unwrap_err();

        assert!(err.to_string().contains("not in the layout"));
        assert_eq!(store.widgets(), before.as_slice());
    }

    #[test]
    fn unsupported_size_is_an_error() {
        let mut store = store_with(None);

        let err = apply_layout_command(&mut store, parse_layout(&["size", "streaks", "L"]))
            .unwrap_err();

        assert!(err.to_string().contains("does not support size L"));
    }

    #[test]
    fn toggle_then_reset() {
        let mut store = store_with(None);

        apply_layout_command(
            &mut store,
            parse_layout(&["toggle", "streaks", "--visible", "true"]),
        )
        .unwrap();
        assert!(row_ids(&layout_rows(&store, false)).contains(&"streaks"));

        apply_layout_command(&mut store, parse_layout(&["reset", "--yes"])).unwrap();
        assert!(!row_ids(&layout_rows(&store, false)).contains(&"streaks"));
    }
}
