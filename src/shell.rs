//! Interactive commands typed while timers run
//!
//! Each line of input is parsed into a `ShellCommand` and applied to the
//! shared engine (and the cooking session in cook mode). Replies are plain
//! text for the terminal.

use thiserror::Error;

use crate::cooking::{CookingSession, StepChange, VoiceCommand};
use crate::duration::{format_duration, parse_duration};
use crate::engine::{Snapshot, TimerEngine};
use crate::error::{DurationError, TimerError};
use crate::notify::display_name;
use crate::presets::{QUICK_START, custom_timer, find_quick_start};
use crate::timer::{TimerId, TimerStatus, format_clock, progress_bar};

pub const HELP: &str = "\
commands:
  list                   show all timers
  new NAME DURATION      start a custom timer (e.g. new rice 12m)
  quick PRESET           start a quick-start timer (e.g. quick pasta)
  toggle ID              pause or resume
  pause ID | resume ID   pause or resume, no change if already so
  add ID SECONDS         add time
  sub ID SECONDS         take time off
  rm ID                  delete a timer
  next | prev | repeat   move through recipe steps (cook mode)
  timer [DURATION]       start the current step's timer (cook mode)
  quit                   stop all timers and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    New { name: String, seconds: u64 },
    Quick(String),
    Toggle(TimerId),
    Pause(TimerId),
    Resume(TimerId),
    Adjust { id: TimerId, delta: i64 },
    Remove(TimerId),
    Voice(VoiceCommand),
    StepTimer(Option<u64>),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a timer id")]
    BadId(String),

    #[error("'{0}' is not a number of seconds")]
    BadSeconds(String),

    #[error(transparent)]
    Duration(#[from] DurationError),
}

fn parse_id(word: Option<&str>, usage: &'static str) -> Result<TimerId, ShellError> {
    let word = word.ok_or(ShellError::Usage(usage))?;
    word.parse().map_err(|_| ShellError::BadId(word.to_string()))
}

fn parse_seconds(word: Option<&str>, usage: &'static str) -> Result<i64, ShellError> {
    let word = word.ok_or(ShellError::Usage(usage))?;
    word.parse::<u32>()
        .map(i64::from)
        .map_err(|_| ShellError::BadSeconds(word.to_string()))
}

/// Parse one line. Blank lines are `None`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "new" => {
            let rest: Vec<&str> = words.collect();
            let (duration, name) = rest
                .split_last()
                .ok_or(ShellError::Usage("new NAME DURATION"))?;
            ShellCommand::New {
                name: name.join(" "),
                seconds: parse_duration(duration)?,
            }
        }
        "quick" => {
            let name: Vec<&str> = words.collect();
            if name.is_empty() {
                return Err(ShellError::Usage("quick PRESET"));
            }
            ShellCommand::Quick(name.join(" "))
        }
        "toggle" => ShellCommand::Toggle(parse_id(words.next(), "toggle ID")?),
        "pause" => ShellCommand::Pause(parse_id(words.next(), "pause ID")?),
        "resume" => ShellCommand::Resume(parse_id(words.next(), "resume ID")?),
        "add" => ShellCommand::Adjust {
            id: parse_id(words.next(), "add ID SECONDS")?,
            delta: parse_seconds(words.next(), "add ID SECONDS")?,
        },
        "sub" => ShellCommand::Adjust {
            id: parse_id(words.next(), "sub ID SECONDS")?,
            delta: -parse_seconds(words.next(), "sub ID SECONDS")?,
        },
        "rm" | "stop" => ShellCommand::Remove(parse_id(words.next(), "rm ID")?),
        "next" => ShellCommand::Voice(VoiceCommand::Next),
        "prev" | "previous" => ShellCommand::Voice(VoiceCommand::Previous),
        "repeat" => ShellCommand::Voice(VoiceCommand::Repeat),
        "timer" => ShellCommand::StepTimer(words.next().map(parse_duration).transpose()?),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ShellError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Apply a command and return the reply to print.
///
/// `Quit` is handled by the caller.
pub fn apply(
    command: &ShellCommand,
    engine: &TimerEngine,
    session: Option<&mut CookingSession>,
) -> String {
    match command {
        ShellCommand::List => render_list(&engine.snapshot()),
        ShellCommand::New { name, seconds } => {
            match custom_timer(name, *seconds).and_then(|timer| engine.create(timer)) {
                Ok(id) => format!(
                    "started #{id} {} ({})",
                    display_name(name.trim()),
                    format_duration(*seconds)
                ),
                Err(err) => err.to_string(),
            }
        }
        ShellCommand::Quick(name) => match find_quick_start(name) {
            Some(preset) => match engine.create(preset.to_new_timer()) {
                Ok(id) => format!("started #{id} {} {}", preset.emoji, preset.name),
                Err(err) => err.to_string(),
            },
            None => {
                let names: Vec<&str> = QUICK_START.iter().map(|p| p.name).collect();
                format!("no preset '{name}', try one of: {}", names.join(", "))
            }
        },
        ShellCommand::Toggle(id) => {
            engine.toggle(*id);
            describe(engine, *id)
        }
        ShellCommand::Pause(id) => {
            engine.set_status(*id, TimerStatus::Paused);
            describe(engine, *id)
        }
        ShellCommand::Resume(id) => {
            engine.set_status(*id, TimerStatus::Running);
            describe(engine, *id)
        }
        ShellCommand::Adjust { id, delta } => {
            engine.adjust_remaining(*id, *delta);
            describe(engine, *id)
        }
        ShellCommand::Remove(id) => {
            if engine.remove(*id) {
                format!("removed #{id}")
            } else {
                format!("no timer #{id}")
            }
        }
        ShellCommand::Voice(voice) => match session {
            Some(session) => match session.handle_voice(*voice) {
                StepChange::Moved(text) | StepChange::Repeated(text) => text,
                StepChange::Unchanged => "already at the first step".to_string(),
                StepChange::Finished => "You've completed all steps! Great job!".to_string(),
            },
            None => "step commands only work in cook mode".to_string(),
        },
        ShellCommand::StepTimer(seconds) => match session {
            Some(session) => {
                let started = match seconds {
                    Some(seconds) => session.start_custom_step_timer(*seconds, None),
                    None => session.start_step_timer(),
                };
                match started {
                    Ok(id) => describe(engine, id),
                    Err(TimerError::NoStepDuration { .. }) => {
                        "this step has no suggested time, use 'timer DURATION'".to_string()
                    }
                    Err(err) => err.to_string(),
                }
            }
            None => "step timers only work in cook mode".to_string(),
        },
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => String::new(),
    }
}

fn describe(engine: &TimerEngine, id: TimerId) -> String {
    match engine.get(id) {
        Some(timer) => format!(
            "#{} {} {} {} {}",
            timer.id,
            timer.emoji,
            display_name(&timer.name),
            format_clock(timer.remaining_seconds),
            status_word(timer.status)
        ),
        None => format!("no timer #{id}"),
    }
}

fn status_word(status: TimerStatus) -> &'static str {
    match status {
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
    }
}

/// Multi-line listing for the `list` command
pub fn render_list(snapshot: &Snapshot) -> String {
    if !snapshot.has_any {
        return "no timers".to_string();
    }
    let mut out = format!("{} running\n", snapshot.running_count);
    for timer in &snapshot.timers {
        out.push_str(&format!(
            "#{:<3} {} {:<12} {:>6} [{}] {:<8} {}\n",
            timer.id.to_string(),
            timer.emoji,
            display_name(&timer.name),
            format_clock(timer.remaining_seconds),
            progress_bar(timer.progress(), 20),
            timer.priority.label(),
            status_word(timer.status),
        ));
    }
    out.pop();
    out
}

/// One-line summary redrawn in place on every tick
pub fn render_status(snapshot: &Snapshot) -> String {
    let timers: Vec<String> = snapshot
        .timers
        .iter()
        .map(|timer| {
            let mark = if timer.is_running() { "" } else { " ⏸" };
            format!(
                "#{} {} {}{}",
                timer.id,
                timer.emoji,
                format_clock(timer.remaining_seconds),
                mark
            )
        })
        .collect();
    format!("⏱️  {} running | {}", snapshot.running_count, timers.join("  "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooking::{Recipe, RecipeStep};

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(
            parse("new wild rice 12m"),
            Ok(Some(ShellCommand::New {
                name: "wild rice".into(),
                seconds: 720,
            }))
        );
        assert_eq!(
            parse("sub 3 60"),
            Ok(Some(ShellCommand::Adjust {
                id: TimerId(3),
                delta: -60,
            }))
        );
        assert_eq!(parse("toggle 2"), Ok(Some(ShellCommand::Toggle(TimerId(2)))));
        assert_eq!(parse("PAUSE 2"), Ok(Some(ShellCommand::Pause(TimerId(2)))));
        assert_eq!(parse("resume 2"), Ok(Some(ShellCommand::Resume(TimerId(2)))));
        assert_eq!(parse("timer 90s"), Ok(Some(ShellCommand::StepTimer(Some(90)))));
        assert_eq!(parse("timer"), Ok(Some(ShellCommand::StepTimer(None))));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("dance"), Err(ShellError::Unknown("dance".into())));
        assert_eq!(parse("rm"), Err(ShellError::Usage("rm ID")));
        assert_eq!(parse("pause"), Err(ShellError::Usage("pause ID")));
        assert_eq!(parse("rm x"), Err(ShellError::BadId("x".into())));
        assert_eq!(parse("add 1 -5"), Err(ShellError::BadSeconds("-5".into())));
        assert_eq!(parse("new"), Err(ShellError::Usage("new NAME DURATION")));
        assert_eq!(parse("new pasta 0"), Err(ShellError::Duration(DurationError::Zero)));
    }

    #[test]
    fn test_apply_against_engine() {
        let engine = TimerEngine::new();
        let reply = apply(&ShellCommand::Quick("eggs".into()), &engine, None);
        assert!(reply.contains("Eggs"), "{reply}");

        let id = engine.snapshot().timers[0].id;
        apply(&ShellCommand::Toggle(id), &engine, None);
        assert_eq!(engine.get(id).unwrap().status, TimerStatus::Paused);

        apply(&ShellCommand::Adjust { id, delta: 60 }, &engine, None);
        assert_eq!(engine.get(id).unwrap().total_seconds, 660);

        assert_eq!(apply(&ShellCommand::Remove(id), &engine, None), format!("removed #{id}"));
        assert_eq!(apply(&ShellCommand::Remove(id), &engine, None), format!("no timer #{id}"));
        assert_eq!(apply(&ShellCommand::List, &engine, None), "no timers");
    }

    #[test]
    fn test_pause_and_resume_do_not_flip() {
        let engine = TimerEngine::new();
        let id = engine.create(crate::timer::NewTimer::new("Stock", 600)).unwrap();

        let reply = apply(&ShellCommand::Pause(id), &engine, None);
        assert!(reply.ends_with("paused"), "{reply}");
        // A second pause leaves it paused
        let reply = apply(&ShellCommand::Pause(id), &engine, None);
        assert!(reply.ends_with("paused"), "{reply}");
        assert_eq!(engine.get(id).unwrap().status, TimerStatus::Paused);

        apply(&ShellCommand::Resume(id), &engine, None);
        apply(&ShellCommand::Resume(id), &engine, None);
        assert_eq!(engine.get(id).unwrap().status, TimerStatus::Running);

        let reply = apply(&ShellCommand::Pause(TimerId(99)), &engine, None);
        assert_eq!(reply, "no timer #99");
    }

    #[test]
    fn test_unknown_preset_lists_choices() {
        let engine = TimerEngine::new();
        let reply = apply(&ShellCommand::Quick("soup".into()), &engine, None);
        assert!(reply.contains("Bread"));
        assert!(!engine.has_any());
    }

    #[test]
    fn test_step_commands_need_session() {
        let engine = TimerEngine::new();
        let reply = apply(&ShellCommand::Voice(VoiceCommand::Next), &engine, None);
        assert_eq!(reply, "step commands only work in cook mode");

        let recipe = Recipe {
            title: "Toast".into(),
            instructions: vec![RecipeStep {
                instruction_text: "Toast the bread".into(),
                duration: None,
                timer_name: None,
            }],
        };
        let mut session = CookingSession::new(recipe, engine.clone());
        let reply = apply(&ShellCommand::StepTimer(None), &engine, Some(&mut session));
        assert!(reply.contains("no suggested time"));

        apply(&ShellCommand::StepTimer(Some(120)), &engine, Some(&mut session));
        assert_eq!(engine.running_count(), 1);
    }

    #[test]
    fn test_render_list() {
        let engine = TimerEngine::new();
        let id = engine
            .create(crate::timer::NewTimer::new("Pasta", 480).emoji("🍝"))
            .unwrap();
        let listing = render_list(&engine.snapshot());
        assert!(listing.starts_with("1 running\n"));
        assert!(listing.contains(&format!("#{id}")));
        assert!(listing.contains("08:00"));
        assert!(listing.contains("ACTIVE"));
    }

    #[test]
    fn test_render_status_marks_paused_only() {
        let engine = TimerEngine::new();
        let running = engine
            .create(crate::timer::NewTimer::new("Pasta", 480).emoji("🍝"))
            .unwrap();
        let paused = engine
            .create(crate::timer::NewTimer::new("Eggs", 600).emoji("🥚"))
            .unwrap();
        engine.toggle(paused);

        let status = render_status(&engine.snapshot());
        let expected = format!("⏱️  1 running | #{running} 🍝 08:00  #{paused} 🥚 10:00 ⏸");
        assert_eq!(status, expected);
        assert_eq!(status.matches('⏸').count(), 1);
    }
}
