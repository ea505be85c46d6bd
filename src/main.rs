use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use kitchen_timer::config::{Config, default_config_path};
use kitchen_timer::duration::{format_duration, parse_duration};
use kitchen_timer::notify;
use kitchen_timer::presets::{QUICK_START, custom_timer, find_quick_start};
use kitchen_timer::shell::{self, HELP, ShellCommand};
use kitchen_timer::{Clock, CookingSession, NewTimer, Recipe, TimerEngine, logging};

#[derive(Parser, Debug)]
#[command(name = "ktimer", version, about = "Kitchen timers in your terminal")]
struct Cli {
    /// Config file (defaults to ~/.config/ktimer/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Don't play a sound when a timer finishes
    #[arg(long, global = true)]
    no_beep: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the quick-start timers
    Presets,
    /// Start timers and keep them running interactively
    Start {
        /// Quick-start presets to start right away (e.g. pasta eggs)
        presets: Vec<String>,
        /// Custom timers as NAME=DURATION (e.g. rice=12m, tea=3m30s)
        #[arg(long = "custom", value_name = "NAME=DURATION")]
        custom: Vec<String>,
    },
    /// Step through a recipe file with per-step timers
    Cook {
        /// Recipe JSON: { "title": .., "instructions": [{ "instruction_text": .., "duration": secs }] }
        recipe: PathBuf,
    },
}

fn parse_custom(spec: &str) -> Result<NewTimer> {
    let (name, duration) = spec
        .rsplit_once('=')
        .with_context(|| format!("'{spec}' is not NAME=DURATION"))?;
    let seconds = parse_duration(duration).with_context(|| format!("bad duration in '{spec}'"))?;
    Ok(custom_timer(name, seconds)?)
}

fn print_presets() {
    println!("Quick start:");
    for preset in &QUICK_START {
        println!(
            "  {} {:<8} {}",
            preset.emoji,
            preset.name,
            format_duration(preset.minutes * 60)
        );
    }
}

/// Forward Ctrl-C into the runtime so shutdown goes through one path
fn install_interrupt() -> Result<mpsc::UnboundedReceiver<()>> {
    let (tx, rx) = mpsc::unbounded_channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .context("error setting Ctrl-C handler")?;
    Ok(rx)
}

/// Read stdin on a plain thread. A blocking read parked on the runtime's
/// blocking pool would keep the process alive after Ctrl-C.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
        debug!("stdin reader finished");
    });
    rx
}

/// Create a timer; the start hook runs from the listener
fn start_timer(engine: &TimerEngine, timer: NewTimer) -> Result<()> {
    let name = timer.name.clone();
    let seconds = timer.total_seconds;
    let emoji = timer.emoji.clone();
    let id = engine.create(timer)?;
    println!(
        "{emoji} Started #{id} {} ({})",
        notify::display_name(&name),
        format_duration(seconds)
    );
    Ok(())
}

async fn run(
    engine: TimerEngine,
    config: Config,
    listener: JoinHandle<()>,
    mut session: Option<CookingSession>,
) -> Result<()> {
    let mut interrupts = install_interrupt()?;
    let mut clock = Clock::start(engine.clone(), config.tick_period());

    let mut snapshots = engine.subscribe();
    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    println!("Type 'help' for commands.");
    loop {
        tokio::select! {
            _ = interrupts.recv() => {
                println!("\n🛑 Interrupted!");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = shell::render_status(&snapshots.borrow_and_update());
                print!("\r\x1b[2K{status}");
                let _ = std::io::stdout().flush();
            }
            line = lines.recv(), if stdin_open => {
                let Some(line) = line else {
                    // Keep counting down until interrupted
                    info!("stdin closed, waiting for Ctrl-C");
                    stdin_open = false;
                    continue;
                };
                match shell::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => {
                        println!("{}", shell::apply(&command, &engine, session.as_mut()));
                    }
                    Err(err) => println!("{err}"),
                }
            }
        }
    }

    clock.stop();
    listener.abort();
    let snapshot = engine.snapshot();
    if snapshot.running_count > 0 {
        warn!(running = snapshot.running_count, "exiting with timers still running");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = Config::load_or_create(&config_path);
    if cli.no_beep {
        config.beep = false;
    }

    let engine = TimerEngine::new();

    match cli.command {
        Command::Presets => {
            print_presets();
            Ok(())
        }
        Command::Start { presets, custom } => {
            let mut timers = Vec::new();
            for name in &presets {
                let Some(preset) = find_quick_start(name) else {
                    bail!("no quick-start preset named '{name}' (see `ktimer presets`)");
                };
                timers.push(preset.to_new_timer());
            }
            for spec in &custom {
                timers.push(parse_custom(spec)?);
            }

            let listener = notify::spawn_listener(&engine, config.clone());
            for timer in timers {
                start_timer(&engine, timer)?;
            }
            run(engine, config, listener, None).await
        }
        Command::Cook { recipe } => {
            let recipe = Recipe::load(&recipe)?;
            println!("👨‍🍳 {}", recipe.title);
            let listener = notify::spawn_listener(&engine, config.clone());
            let session = CookingSession::new(recipe, engine.clone());
            println!("{}", session.announcement());
            println!("{HELP}");
            run(engine, config, listener, Some(session)).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_start() {
        let cli = Cli::try_parse_from([
            "ktimer", "start", "pasta", "eggs", "--custom", "tea=3m30s", "--no-beep",
        ])
        .unwrap();
        assert!(cli.no_beep);
        match cli.command {
            Command::Start { presets, custom } => {
                assert_eq!(presets, vec!["pasta", "eggs"]);
                assert_eq!(custom, vec!["tea=3m30s"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_custom() {
        let timer = parse_custom("green tea=3m30s").unwrap();
        assert_eq!(timer.name, "green tea");
        assert_eq!(timer.total_seconds, 210);
        assert!(parse_custom("tea").is_err());
        assert!(parse_custom("tea=0").is_err());
    }
}
