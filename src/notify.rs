//! Turns engine events into something the user notices
//!
//! Runs the configured shell hooks and plays a system sound. The engine only
//! raises events; everything here is a consumer of them.

use tokio::process::Command;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::Config;
use crate::engine::{Completion, Started, TimerEngine};
use crate::timer::TimerId;

/// The runnable command of a hook, if any. Commented-out (`#`) and blank
/// hooks are skipped.
pub fn hook_command(hook: Option<&str>) -> Option<&str> {
    let command = hook?.trim();
    if command.is_empty() || command.starts_with('#') {
        return None;
    }
    Some(command)
}

/// Spawn a hook in the background, exposing the timer to it through
/// `KTIMER_ID` and `KTIMER_NAME`
pub fn execute_hook(hook: Option<&str>, id: TimerId, name: &str) {
    let Some(command) = hook_command(hook) else {
        debug!("no hook to run");
        return;
    };
    let spawned = Command::new("sh")
        .arg("-c")
        .arg(command)
        .env("KTIMER_ID", id.to_string())
        .env("KTIMER_NAME", name)
        .spawn();
    if let Err(err) = spawned {
        warn!(error = %err, command, "failed to run hook");
    }
}

const MACOS_PLAYERS: &[&str] = &["afplay"];
const MACOS_SOUNDS: &[&str] = &[
    "/System/Library/Sounds/Glass.aiff",
    "/System/Library/Sounds/Ping.aiff",
];

const LINUX_PLAYERS: &[&str] = &["paplay", "aplay"];
const LINUX_SOUNDS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/sound-icons/bell.wav",
    "/usr/share/sounds/alsa/Front_Left.wav",
];

async fn play(player: &str, sound: &str) -> bool {
    match Command::new(player).arg(sound).status().await {
        Ok(status) => status.success(),
        Err(_) => false,
    }
}

/// Play a completion sound, falling back to the terminal bell
pub async fn system_beep() {
    let (players, sounds) = if cfg!(target_os = "macos") {
        (MACOS_PLAYERS, MACOS_SOUNDS)
    } else if cfg!(target_os = "linux") {
        (LINUX_PLAYERS, LINUX_SOUNDS)
    } else {
        (&[][..], &[][..])
    };

    for player in players {
        for sound in sounds {
            if play(player, sound).await {
                return;
            }
        }
    }

    print!("\x07");
    let _ = std::io::Write::flush(&mut std::io::stdout());
}

async fn announce(completion: &Completion, config: &Config) {
    println!("\n{} {} is done!", completion.emoji, display_name(&completion.name));
    execute_hook(
        config.hooks.on_complete.as_deref(),
        completion.id,
        &completion.name,
    );
    if config.beep {
        system_beep().await;
    }
}

fn started(event: &Started, config: &Config) {
    debug!(id = %event.id, seconds = event.total_seconds, "running start hook");
    execute_hook(config.hooks.on_start.as_deref(), event.id, &event.name);
}

/// Unnamed timers still need something to print
pub fn display_name(name: &str) -> &str {
    if name.is_empty() { "Timer" } else { name }
}

/// Listen for starts and completions until the engine goes away or the task
/// is aborted.
///
/// Subscribes before returning, so every timer created after this call gets
/// its start hook no matter which consumer created it.
pub fn spawn_listener(engine: &TimerEngine, config: Config) -> JoinHandle<()> {
    let mut starts = engine.starts();
    let mut completions = engine.completions();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                event = starts.recv() => match event {
                    Ok(event) => started(&event, &config),
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "start listener fell behind");
                    }
                    Err(RecvError::Closed) => break,
                },
                event = completions.recv() => match event {
                    Ok(completion) => announce(&completion, &config).await,
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "completion listener fell behind");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}
