mod app;
mod calendar;
mod cli;
mod clipboard;
mod config;
mod export;
mod markup;
mod theme;
mod ui;
mod widget;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use cli::{Cli, Command};
use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
use config::AppConfig;
use export::CopyKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use widget::{Attributes, WidgetAttrs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load().context("reading config.toml")?;
    let base = cfg.initial_attributes();

    let Some(command) = cli.command else { return run_tui(&cfg).await };
    init_stderr_logging();
    match command {
        Command::Render(args) => cmd_render(&args.attrs.layer_over(base), args.page, args.out),
        Command::Copy(args)   => {
            cmd_copy(&cfg, &args.attrs.layer_over(base), args.container, args.dry_run).await
        }
        Command::Grid(args)   => cmd_grid(&args.attrs.layer_over(base), args.json),
        Command::Open(args)   => cmd_open(&args.attrs.layer_over(base)),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logging to stderr so it doesn't interfere with markup on stdout.
fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ─── Non-interactive commands ─────────────────────────────────────────────────

fn cmd_render(attrs: &Attributes, page: bool, out: Option<std::path::PathBuf>) -> Result<()> {
    let rendered = markup::render(&WidgetAttrs::from_attributes(attrs));
    let html = if page { rendered.standalone_document() } else { rendered.rich_html() };
    match out {
        Some(path) => {
            std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}

async fn cmd_copy(cfg: &AppConfig, attrs: &Attributes, container: bool, dry_run: bool) -> Result<()> {
    let rendered = markup::render(&WidgetAttrs::from_attributes(attrs));
    let kind     = if container { CopyKind::Container } else { CopyKind::Rich };

    if dry_run {
        let clip = MemoryClipboard::new();
        let msg  = export::copy_calendar(Some(&rendered), kind, &clip).await?;
        for payload in clip.take() {
            println!("{}", payload.text);
        }
        eprintln!("{msg} (dry run)");
        return Ok(());
    }

    let clip = SystemClipboard::new(cfg.clipboard_backend(), cfg.clipboard_timeout_ms());
    copy_with(&clip, &rendered, kind).await
}

async fn copy_with<C: Clipboard>(clip: &C, rendered: &markup::RenderedCalendar, kind: CopyKind) -> Result<()> {
    let msg = export::copy_calendar(Some(rendered), kind, clip).await?;
    println!("{msg}");
    Ok(())
}

fn cmd_grid(attrs: &Attributes, json: bool) -> Result<()> {
    let grid = calendar::Grid::compute(&WidgetAttrs::from_attributes(attrs).request());
    if json {
        println!("{}", cli::grid_json(&grid)?);
    } else {
        print!("{}", cli::grid_text(&grid));
    }
    Ok(())
}

fn cmd_open(attrs: &Attributes) -> Result<()> {
    let rendered = markup::render(&WidgetAttrs::from_attributes(attrs));
    let path = export::open_in_browser(&rendered)?;
    println!("Opened {}", path.display());
    Ok(())
}

// ─── TUI ─────────────────────────────────────────────────────────────────────

async fn run_tui(cfg: &AppConfig) -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("calcard");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "calcard.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!("Starting calcard");

    let initial   = WidgetAttrs::from_attributes(&cfg.initial_attributes());
    let clipboard = SystemClipboard::new(cfg.clipboard_backend(), cfg.clipboard_timeout_ms());
    if clipboard.backend().is_none() {
        tracing::warn!("no clipboard backend detected; copy actions will fail");
    }

    let mut app = App::new(clipboard, &initial, cfg.status_ttl());
    app.run().await
}
