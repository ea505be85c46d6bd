use std::time::Duration;

use kitchen_timer::cooking::{CookingSession, Recipe};
use kitchen_timer::presets::{QUICK_START, find_quick_start};
use kitchen_timer::{Clock, NewTimer, TimerEngine, TimerError, TimerId, TimerStatus};

fn demo_recipe() -> Recipe {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/carbonara.json");
    Recipe::load(std::path::Path::new(path)).unwrap()
}

#[test]
fn test_timer_tab_and_cooking_share_timers() {
    let engine = TimerEngine::new();
    let timer_tab = engine.clone();
    let mut cooking = CookingSession::new(demo_recipe(), engine.clone());

    let pasta = timer_tab
        .create(find_quick_start("Pasta").unwrap().to_new_timer())
        .unwrap();
    cooking.next_step();
    let step = cooking.start_step_timer().unwrap();

    // Both consumers see both timers, in creation order, with no tick
    let seen: Vec<TimerId> = engine.snapshot().timers.iter().map(|t| t.id).collect();
    assert_eq!(seen, vec![pasta, step]);
    assert_eq!(cooking.current_step_timer().unwrap().name, "Spaghetti");

    // Pausing from the timer tab is visible in cooking mode
    timer_tab.toggle(step);
    assert_eq!(
        cooking.current_step_timer().unwrap().status,
        TimerStatus::Paused
    );

    engine.tick();
    assert_eq!(engine.get(pasta).unwrap().remaining_seconds, 479);
    assert_eq!(cooking.current_step_timer().unwrap().remaining_seconds, 480);

    // Deleting it elsewhere leaves cooking mode with no timer, not an error
    timer_tab.remove(step);
    assert!(cooking.current_step_timer().is_none());
}

#[test]
fn test_every_quick_start_preset_starts() {
    let engine = TimerEngine::new();
    for preset in &QUICK_START {
        engine.create(preset.to_new_timer()).unwrap();
    }
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.running_count, QUICK_START.len());
    assert_eq!(snapshot.timers[5].total_seconds, 30 * 60);
}

#[test]
fn test_zero_duration_is_rejected_synchronously() {
    let engine = TimerEngine::new();
    assert_eq!(
        engine.create(NewTimer::new("", 0)),
        Err(TimerError::InvalidDuration)
    );
}

#[test]
fn test_ids_unique_across_threads() {
    let engine = TimerEngine::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                (0..25)
                    .map(|i| engine.create(NewTimer::new(format!("t{i}"), 60)).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<TimerId> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
    assert_eq!(engine.snapshot().timers.len(), 100);
}

#[tokio::test(start_paused = true)]
async fn test_clock_drives_countdown_to_completion() {
    let engine = TimerEngine::new();
    let mut completions = engine.completions();
    let mut snapshots = engine.subscribe();
    let quick = engine.create(NewTimer::new("Tea", 3)).unwrap();
    let slow = engine.create(NewTimer::new("Stock", 600)).unwrap();

    let mut clock = Clock::start(engine.clone(), Duration::from_secs(1));

    let done = completions.recv().await.unwrap();
    assert_eq!(done.id, quick);
    snapshots.changed().await.unwrap();

    tokio::time::sleep(Duration::from_millis(10_500)).await;
    clock.stop();

    let timer = engine.get(quick).unwrap();
    assert_eq!(timer.remaining_seconds, 0);
    assert_eq!(timer.status, TimerStatus::Running);
    assert!(completions.try_recv().is_err());
    assert!(engine.get(slow).unwrap().remaining_seconds < 600);
}
