use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use logbook_core::{
    ColorMode, ExceptionInfo, IntakeQueue, Logbook, LogbookConfig, Record, RecordItem,
};
use logbook_handler::LogbookHandler;

/// Logbook - a live, filterable viewer for in-process log records
#[derive(Parser, Debug)]
#[command(name = "logbook")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Filter pattern applied at startup
    #[arg(short, long)]
    filter: Option<String>,

    /// Coloring mode (disabled, foreground_tint, background_tint)
    #[arg(long)]
    color_mode: Option<String>,

    /// Producer threads to spawn
    #[arg(long, default_value = "4")]
    producers: usize,

    /// Records each producer emits
    #[arg(long, default_value = "25")]
    records: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing goes to stderr through its own subscriber; the log facade
    // stays free for the logbook handler.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting tracing subscriber")?;

    let result = run_app(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run_app(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => LogbookConfig::default(),
    };
    if let Some(mode) = &args.color_mode {
        config.color_mode = parse_color_mode(mode)?;
    }

    let mut logbook = Logbook::new(&config).context("invalid level configuration")?;
    if let Some(pattern) = &args.filter {
        logbook
            .set_pattern(pattern)
            .with_context(|| format!("filter pattern {pattern:?}"))?;
    }

    // Route the log macros into the viewer
    let handler = LogbookHandler::new(logbook.registry().clone());
    handler.subscribe(logbook.intake());
    handler
        .clone()
        .install(log::LevelFilter::Trace)
        .context("installing log handler")?;

    let critical = logbook.registry().severity_of("critical").ok();
    let producers = spawn_producers(args.producers, args.records, logbook.intake(), critical);

    // Pump until every producer is done, then print the snapshot
    let cancel = CancellationToken::new();
    let producers_done = cancel.clone();
    let joiner = tokio::task::spawn_blocking(move || {
        for handle in producers {
            let _ = handle.join();
        }
        producers_done.cancel();
    });

    let intake = logbook.intake();
    loop {
        tokio::select! {
            _ = intake.notified() => {
                logbook.pump();
            }
            _ = cancel.cancelled() => {
                logbook.pump();
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("interrupted before producers finished");
                break;
            }
        }
    }
    let _ = joiner.await;

    print_snapshot(&logbook);
    print_stats(&logbook, &handler);

    Ok(())
}

fn load_config(path: &Path) -> Result<LogbookConfig> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn parse_color_mode(value: &str) -> Result<ColorMode> {
    match value {
        "disabled" => Ok(ColorMode::Disabled),
        "foreground_tint" | "foreground" => Ok(ColorMode::ForegroundTint),
        "background_tint" | "background" => Ok(ColorMode::BackgroundTint),
        other => anyhow::bail!("unknown color mode {other:?}"),
    }
}

/// Emit a burst of records from separate threads, mixing the log macros
/// with direct submits
fn spawn_producers(
    count: usize,
    records: usize,
    intake: IntakeQueue,
    critical_severity: Option<u32>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|worker| {
            let intake = intake.clone();
            thread::spawn(move || {
                for step in 0..records {
                    match step % 5 {
                        0 => log::debug!(target: "demo.worker", "worker {worker} step {step} starting"),
                        1 => log::info!(target: "demo.worker", "worker {worker} step {step} done"),
                        2 => log::warn!(target: "demo.worker", "worker {worker} step {step} is slow"),
                        3 => log::error!(target: "demo.worker", "worker {worker} step {step} failed"),
                        _ => submit_critical(&intake, critical_severity, worker, step),
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect()
}

/// The log facade has no critical level, so those records are submitted
/// directly
fn submit_critical(intake: &IntakeQueue, severity: Option<u32>, worker: usize, step: usize) {
    let Some(severity) = severity else {
        return;
    };
    let record = Record::new(
        severity,
        format!("worker {worker} step {step} gave up"),
        "demo.worker",
    )
    .with_exception(ExceptionInfo {
        kind: "TimeoutError".to_string(),
        message: "backend did not answer".to_string(),
        traceback: vec![
            format!("  worker {worker} waiting on backend"),
            "  demo.worker::run".to_string(),
        ],
    });
    intake.submit(record);
}

fn print_snapshot(logbook: &Logbook) {
    let store = logbook.store();
    println!();
    println!(
        "== {} visible of {} stored (color mode: {}) ==",
        store.visible_len(),
        store.len(),
        logbook.color_mode().label()
    );
    for item in store.visible() {
        println!("{}", render_line(item));
        if let Some(tooltip) = &item.tooltip {
            for line in tooltip.lines() {
                println!("      {line}");
            }
        }
    }
}

/// Render one item with truecolor escapes matching its assigned colors
fn render_line(item: &RecordItem) -> String {
    let mut out = String::new();
    if let Some(bg) = item.background() {
        out.push_str(&format!("\x1b[48;2;{};{};{}m", bg.r, bg.g, bg.b));
    }
    if let Some(fg) = item.foreground() {
        out.push_str(&format!("\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b));
    }
    let colored = item.background().is_some() || item.foreground().is_some();
    out.push_str(&item.display_text);
    if colored {
        out.push_str("\x1b[0m");
    }
    out
}

fn print_stats(logbook: &Logbook, handler: &LogbookHandler) {
    let stats = logbook.intake().stats();
    println!();
    println!(
        "intake: {} submitted, {} dropped, {} unmapped severities, {} skipped by handler",
        stats.submitted,
        stats.dropped,
        logbook.unmapped_severities(),
        handler.unmapped()
    );
}
