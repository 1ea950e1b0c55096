use std::fs::File;
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use tracing::Level;

use mdbtop::app::App;
use mdbtop::config::{self, Config};
use mdbtop::event::{Event, EventHandler};
use mdbtop::plot::{self, PlotOptions, ProcessFilter};
use mdbtop::report::{self, ReportMeta};
use mdbtop::snapshot::{self, LogTail};
use mdbtop::ui;
use mdbtop::ui::theme::Theme;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser)]
#[command(
    name = "mdbtop",
    version,
    about = "Charts and live view for MonetDB process monitoring logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Write diagnostics as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    /// Track processes whose name matches this regex
    #[arg(long, global = true)]
    pattern: Option<String>,

    /// Track processes with exactly these names (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    names: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum Command {
    /// Render a snapshot log as an HTML chart
    Report {
        /// Snapshot log (JSON lines)
        log: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Short description to include under the heading
        #[arg(long)]
        desc: Option<String>,
    },
    /// Print the chart configuration as JSON
    Plot {
        /// Snapshot log (JSON lines)
        log: PathBuf,

        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Follow a snapshot log in the terminal
    Watch {
        /// Snapshot log (JSON lines)
        log: PathBuf,

        /// Poll interval in seconds
        #[arg(short = 't', long)]
        interval: Option<u64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let is_watch = matches!(cli.command, Command::Watch { .. });
    // The terminal belongs to the UI while watching.
    if !is_watch || cli.log_file.is_some() {
        setup_logging(cli.log_level, cli.log_file.as_deref(), cli.log_json)?;
    }

    let config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    let options = plot_options(&cli, &config)?;

    match &cli.command {
        Command::Report { log, out, desc } => {
            let spec = build_plot(log, &options)?;
            let meta = ReportMeta {
                title: &config.report.title,
                description: desc.as_deref(),
            };
            let html = report::render_html(&spec, &meta)?;
            match out {
                Some(path) => report::write_report(path, &html)?,
                None => stdout().write_all(html.as_bytes())?,
            }
            Ok(())
        }
        Command::Plot { log, pretty } => {
            let spec = build_plot(log, &options)?;
            let json = if *pretty {
                spec.to_json_pretty()?
            } else {
                spec.to_json()?
            };
            println!("{json}");
            Ok(())
        }
        Command::Watch { log, interval } => {
            let secs = interval.unwrap_or(config.watch.interval_secs).max(1);
            let theme = Theme::from_name(&config.watch.theme);
            let app = App::new(LogTail::new(log), options.filter, theme);

            let mut terminal = ratatui::init();
            let result = run(&mut terminal, app, Duration::from_secs(secs)).await;
            ratatui::restore();
            result
        }
    }
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    mut app: App,
    tick_rate: Duration,
) -> Result<()> {
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Poll => app.refresh_data(),
            Event::Resize => {}
            Event::InputClosed(reason) => {
                tracing::warn!(%reason, "terminal input closed");
                break;
            }
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }

    Ok(())
}

fn build_plot(log: &Path, options: &PlotOptions) -> Result<plot::PlotSpec> {
    let snapshots = snapshot::read_log(log)?;
    let spec = plot::build_plot(&snapshots, options)
        .wrap_err_with(|| format!("cannot plot {}", log.display()))?;
    tracing::info!(
        log = %log.display(),
        ticks = snapshots.len(),
        series = spec.series.len(),
        "built plot"
    );
    Ok(spec)
}

/// CLI filter flags override the config file.
fn plot_options(cli: &Cli, config: &Config) -> Result<PlotOptions> {
    let mut options = config
        .plot_options()
        .wrap_err("invalid [filter] pattern in config")?;
    if let Some(names) = &cli.names {
        options.filter = ProcessFilter::names(names.iter().cloned());
    }
    if let Some(pattern) = &cli.pattern {
        options.filter = ProcessFilter::pattern(pattern)
            .map_err(|e| eyre!("invalid --pattern `{pattern}`: {e}"))?;
    }
    Ok(options)
}

fn setup_logging(level: LogLevel, log_file: Option<&Path>, json: bool) -> Result<()> {
    let level = match level {
        LogLevel::Off => return Ok(()),
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);

    let result = match (log_file, json) {
        (Some(path), json) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("cannot create log file {}", path.display()))?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if json {
                tracing::subscriber::set_global_default(builder.json().finish())
            } else {
                tracing::subscriber::set_global_default(builder.finish())
            }
        }
        (None, true) => tracing::subscriber::set_global_default(
            builder.json().with_writer(std::io::stderr).finish(),
        ),
        (None, false) => {
            tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())
        }
    };
    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}
