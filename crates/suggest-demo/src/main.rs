#![forbid(unsafe_code)]

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use suggest_core::geometry::Size;
use suggest_demo::app::{App, Control};
use suggest_demo::cli::Opts;
use suggest_demo::session::{SessionOptions, TerminalSession};
use suggest_demo::view;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Log to `path` when given. The terminal owns stdout, so there is no
/// fallback writer.
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env("SUGGEST_DEMO_LOG")
        .unwrap_or_else(|_| EnvFilter::new("suggest_overlay=debug,suggest_demo=debug,info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);
    tracing_subscriber::registry().with(filter).with(layer).init();
    Ok(())
}

fn run(opts: &Opts) -> io::Result<()> {
    let session = TerminalSession::new(SessionOptions::full())?;
    let (width, height) = session.size()?;
    let mut app = App::new(opts, Size::new(width, height));
    let mut stdout = io::stdout();
    let started = Instant::now();
    let deadline = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));

    tracing::info!(root = %opts.root.display(), multiline = opts.multiline, "demo started");
    loop {
        view::draw(&mut stdout, &app)?;
        if deadline.is_some_and(|d| started.elapsed() >= d) {
            tracing::info!("exit timer elapsed");
            break;
        }
        if !session.poll_event(POLL_INTERVAL)? {
            continue;
        }
        let Some(event) = session.read_event()? else {
            continue;
        };
        if app.handle(&event) == Control::Quit {
            break;
        }
    }
    drop(session);
    tracing::info!("demo finished");
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    if let Err(err) = init_logging(opts.log_file.as_deref()) {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    }
    if let Err(err) = run(&opts) {
        eprintln!("suggest-demo: {err}");
        std::process::exit(1);
    }
}
