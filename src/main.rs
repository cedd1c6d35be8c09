//! Eradia command-line front end
//!
//! Loads the journal and its open windows, applies one window command
//! against a fixed viewport, prints the resulting window table and saves
//! the open-window map.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eradia::config::Config;
use eradia::journal::{Entry, FileStore};
use eradia::session::Session;
use eradia::wm::{FixedViewport, WindowCommand, WindowMode};

const USAGE: &str = "\
Usage: eradia [--viewport WxH] <command>

Commands:
  list [date]       Show entries (optionally only those created on YYYY-MM-DD)
                    and open windows
  new               Create an entry and open it
  open <id>         Open an entry's window (or raise it)
  close <id>        Close an entry's window
  tile              Tile all visible windows
  cascade           Cascade all visible windows
  minimize-all      Minimize every window
  activate <id>     Raise a window (restores it if maximized)
  maximize <id>     Maximize a window
  restore <id>      Restore a minimized or maximized window";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    List(Option<NaiveDate>),
    New,
    Open(String),
    Close(String),
    Tile,
    Cascade,
    MinimizeAll,
    Activate(String),
    Maximize(String),
    Restore(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Args {
    viewport: Option<(f64, f64)>,
    command: Command,
}

fn parse_viewport(value: &str) -> Result<(f64, f64)> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .with_context(|| format!("Viewport must look like 1280x800, got {:?}", value))?;
    let width: f64 = width.trim().parse().context("Invalid viewport width")?;
    let height: f64 = height.trim().parse().context("Invalid viewport height")?;
    if !(width > 0.0 && height > 0.0) {
        bail!("Viewport must have a positive size, got {}x{}", width, height);
    }
    Ok((width, height))
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut viewport = None;
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--viewport" | "-v" => {
                let value = iter.next().context("--viewport needs a value")?;
                viewport = Some(parse_viewport(value)?);
            }
            other => match other.strip_prefix("--viewport=") {
                Some(value) => viewport = Some(parse_viewport(value)?),
                None => rest.push(other),
            },
        }
    }

    let id = |name: &str| -> Result<String> {
        rest.get(1)
            .map(|id| id.to_string())
            .with_context(|| format!("`{}` needs an entry id", name))
    };

    let command = match rest.first().copied() {
        None => Command::List(None),
        Some("list") => match rest.get(1) {
            Some(date) => Command::List(Some(
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", date))?,
            )),
            None => Command::List(None),
        },
        Some("new") => Command::New,
        Some("open") => Command::Open(id("open")?),
        Some("close") => Command::Close(id("close")?),
        Some("tile") => Command::Tile,
        Some("cascade") => Command::Cascade,
        Some("minimize-all") => Command::MinimizeAll,
        Some("activate") => Command::Activate(id("activate")?),
        Some("maximize") => Command::Maximize(id("maximize")?),
        Some("restore") => Command::Restore(id("restore")?),
        Some(other) => bail!("Unknown command {:?}\n\n{}", other, USAGE),
    };

    Ok(Args { viewport, command })
}

async fn run(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::List(_) => {}
        Command::New => {
            let id = session.new_entry(None).await?;
            println!("Created entry {}", id);
        }
        Command::Open(id) => session.open_entry(&id)?,
        Command::Close(id) => {
            if !session.close_entry(&id) {
                println!("Entry {} has no open window", id);
            }
        }
        Command::Tile => session.dispatch(WindowCommand::TileWindows),
        Command::Cascade => session.dispatch(WindowCommand::CascadeWindows),
        Command::MinimizeAll => session.dispatch(WindowCommand::MinimizeAll),
        Command::Activate(id) => session.dispatch(WindowCommand::Activate { id }),
        Command::Maximize(id) => session.dispatch(WindowCommand::Maximize { id }),
        Command::Restore(id) => {
            let command = match session.windows().mode(&id) {
                Some(WindowMode::Minimized) => WindowCommand::Restore { id },
                _ => WindowCommand::RestoreFromMaximize { id },
            };
            session.dispatch(command);
        }
    }
    Ok(())
}

fn print_table(session: &Session, date: Option<NaiveDate>) {
    let entries: Vec<&Entry> = match date {
        Some(date) => session.entries_on(date),
        None => session.entries().collect(),
    };
    println!("{} entries", entries.len());
    for entry in entries {
        let marker = if session.windows().is_open(&entry.id) { "*" } else { " " };
        println!("{} {}  {}  {}", marker, entry.created.format("%Y-%m-%d %H:%M"), entry.id, entry.title);
    }

    let mut windows = session.windows().render_list();
    if windows.is_empty() {
        println!("\nNo open windows");
        return;
    }

    // Top of the stack first
    let order = session.windows().stacking_order();
    windows.sort_by_key(|w| std::cmp::Reverse(order.iter().position(|id| *id == w.id)));
    let topmost = session.windows().topmost();

    println!("\n  {:<38} {:<10} {:>7} {:>7} {:>7} {:>7} {:>6}  Title", "Id", "Mode", "X", "Y", "W", "H", "Z");
    for window in &windows {
        let marker = if topmost == Some(&window.id) { ">" } else { " " };
        let mode = match window.mode {
            WindowMode::Normal => "normal",
            WindowMode::Maximized => "maximized",
            WindowMode::Minimized => "minimized",
        };
        println!(
            "{} {:<38} {:<10} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>6}  {}",
            marker,
            window.id,
            mode,
            window.rect.x,
            window.rect.y,
            window.rect.width,
            window.rect.height,
            window.z_index,
            window.title
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "eradia=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    let args = parse_args(&args)?;

    let config = Config::load().context("Failed to load configuration")?;
    let (width, height) = args
        .viewport
        .unwrap_or((config.viewport.width, config.viewport.height));
    info!("Starting Eradia with a {}x{} viewport", width, height);

    let store = FileStore::from_config(&config);
    info!("Journal directory: {:?}", store.journal_dir());
    let store = Arc::new(store);
    let mut session = Session::load(store, &config, FixedViewport::new(width, height)).await?;

    let date = match args.command {
        Command::List(date) => date,
        _ => None,
    };
    run(&mut session, args.command).await?;
    print_table(&session, date);

    session.shutdown().await
}
