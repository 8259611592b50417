//! Colorful console output for simulation runs.
//!
//! Provides a custom `tracing` layer that formats simulation events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (simulation start/end)
//! - **DEBUG**: Chunk boundaries and ELECTRE TRI classifications
//! - **WARN**: Weight sampling fallbacks

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static RUN_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "smaa_simulation=info,smaa_electre=info";

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SmaaConsoleLayer)
            .try_init();
    });
}

// Marks the start of a run for elapsed time tracking.
fn mark_run_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    RUN_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since the run started.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = RUN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____  __  __    _        _
/ ___||  \/  |  / \      / \
\___ \| |\/| | / _ \    / _ \
 ___) | |  | |/ ___ \  / ___ \
|____/|_|  |_/_/   \_\/_/   \_\
"#;

    let version_line = format!(
        "   v{} - Stochastic Multicriteria Acceptability Analysis\n",
        VERSION
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats simulation events with colors.
pub struct SmaaConsoleLayer;

impl<S: Subscriber> Layer<S> for SmaaConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();

        if !target.starts_with("smaa_simulation") && !target.starts_with("smaa_electre") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    method: Option<String>,
    message: Option<String>,
    rule: Option<String>,
    alternatives: Option<u64>,
    criteria: Option<u64>,
    categories: Option<u64>,
    iterations: Option<u64>,
    shards: Option<u64>,
    seed: Option<u64>,
    completed: Option<u64>,
    total: Option<u64>,
    trials: Option<u64>,
    duration_ms: Option<u64>,
    iterations_per_sec: Option<u64>,
    cancelled: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "method" => self.method = Some(s.trim_matches('"').to_string()),
            "message" => self.message = Some(s),
            "rule" => self.rule = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "alternatives" => self.alternatives = Some(value),
            "criteria" => self.criteria = Some(value),
            "categories" => self.categories = Some(value),
            "iterations" => self.iterations = Some(value),
            "shards" => self.shards = Some(value),
            "seed" => self.seed = Some(value),
            "completed" => self.completed = Some(value),
            "total" => self.total = Some(value),
            "trials" => self.trials = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "iterations_per_sec" => self.iterations_per_sec = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "cancelled" {
            self.cancelled = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "method" => self.method = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "rule" => self.rule = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "simulation_start" => format_simulation_start(v),
        "simulation_end" => format_simulation_end(v),
        "chunk_end" => format_chunk_end(v),
        "weight_fallback" => format_weight_fallback(v),
        "electre_tri_classified" => format_classified(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_simulation_start(v: &EventVisitor) -> String {
    mark_run_start();
    let method = v.method.as_deref().unwrap_or("smaa");

    let mut output = format!(
        "{} {} {} │ {} alternatives │ {} criteria │ {} iterations",
        format_elapsed(),
        "▶".bright_green().bold(),
        method.to_uppercase().white().bold(),
        count(v.alternatives).bright_yellow(),
        count(v.criteria).bright_yellow(),
        count(v.iterations).bright_yellow(),
    );

    if let Some(shards) = v.shards.filter(|&s| s > 1) {
        output.push_str(&format!(" │ {} shards", shards.bright_yellow()));
    }
    if let Some(seed) = v.seed {
        output.push_str(&format!(" │ seed {}", seed.bright_black()));
    }

    output
}

fn format_chunk_end(v: &EventVisitor) -> String {
    let completed = v.completed.unwrap_or(0);
    let total = v.total.unwrap_or(0);
    let percent = if total > 0 {
        completed as f64 * 100.0 / total as f64
    } else {
        0.0
    };

    format!(
        "{} {} {:>12} / {} │ {:>5.1}%",
        format_elapsed(),
        "⚡".bright_cyan(),
        completed.to_formatted_string(&Locale::en).white(),
        total.to_formatted_string(&Locale::en),
        percent.bright_magenta()
    )
}

fn format_simulation_end(v: &EventVisitor) -> String {
    let cancelled = v.cancelled.unwrap_or(false);
    let status = if cancelled {
        "CANCELLED".bright_yellow().bold().to_string()
    } else {
        "COMPLETED".bright_green().bold().to_string()
    };

    format!(
        "{} {} {} │ {} iterations │ {} │ {} it/s",
        format_elapsed(),
        "■".bright_cyan().bold(),
        status,
        count(v.completed).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.iterations_per_sec).bright_magenta().bold(),
    )
}

fn format_weight_fallback(v: &EventVisitor) -> String {
    format!(
        "{} {} {} trials used fallback weights",
        format_elapsed(),
        "!".bright_yellow().bold(),
        count(v.trials).bright_yellow(),
    )
}

fn format_classified(v: &EventVisitor) -> String {
    format!(
        "{} {} ELECTRE TRI │ {} alternatives into {} categories │ {}",
        format_elapsed(),
        "◆".bright_blue(),
        count(v.alternatives).white(),
        count(v.categories).white(),
        v.rule.as_deref().unwrap_or("Pessimistic").to_lowercase(),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
