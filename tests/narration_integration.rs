//! Narration pipeline tests: narrator resource, narration thread and the ECS
//! bridge systems wired together, with a scripted backend that records what
//! it was asked to say.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy_ecs::prelude::*;

use stormwatergame::resources::narration::{
    NarrationError, Narrator, SpeakOptions, SpeechBackend, Voice, VoiceSettings,
    setup_narration, shutdown_narration,
};
use stormwatergame::resources::worldtime::WorldTime;
use stormwatergame::systems::narration::{
    apply_narration_messages, poll_narration_messages, tick_narration,
    update_bevy_narration_messages,
};

/// Backend that finishes every utterance on the first poll after it started.
struct Scripted {
    said: Arc<Mutex<Vec<String>>>,
    speaking: bool,
}

impl SpeechBackend for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Samantha", "en-US")]
    }

    fn start(&mut self, text: &str, _settings: &VoiceSettings) -> Result<(), NarrationError> {
        if let Ok(mut said) = self.said.lock() {
            said.push(text.to_string());
        }
        self.speaking = true;
        Ok(())
    }

    fn cancel(&mut self) {
        self.speaking = false;
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn poll_finished(&mut self, _elapsed: Duration) -> bool {
        std::mem::take(&mut self.speaking)
    }
}

fn make_world(enabled: bool) -> (World, Arc<Mutex<Vec<String>>>) {
    let said = Arc::new(Mutex::new(Vec::new()));
    let backend = Scripted {
        said: Arc::clone(&said),
        speaking: false,
    };
    let mut world = World::new();
    world.insert_resource(WorldTime {
        elapsed: 0.0,
        delta: 0.1,
        time_scale: 1.0,
    });
    setup_narration(
        &mut world,
        Some(Box::new(backend)),
        VoiceSettings::default(),
        enabled,
        0.3,
    );
    (world, said)
}

fn schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            poll_narration_messages,
            update_bevy_narration_messages,
            apply_narration_messages,
            tick_narration,
        )
            .chain(),
    );
    schedule
}

/// Run frames until `done` holds or the attempt budget runs out.
fn run_until(world: &mut World, schedule: &mut Schedule, done: impl Fn(&World) -> bool) {
    for _ in 0..300 {
        schedule.run(world);
        if done(world) {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn said(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().map(|v| v.clone()).unwrap_or_default()
}

#[test]
fn queued_utterances_are_spoken_in_order() {
    let (mut world, log) = make_world(true);
    let mut schedule = schedule();
    {
        let mut narrator = world.resource_mut::<Narrator>();
        narrator.queue("first", SpeakOptions::default());
        narrator.queue("second", SpeakOptions::default());
        narrator.queue("third", SpeakOptions::default());
        assert!(narrator.is_speaking());
        assert_eq!(narrator.status().queue_length, 2);
    }

    run_until(&mut world, &mut schedule, |w| {
        !w.resource::<Narrator>().is_speaking()
    });

    assert_eq!(said(&log), vec!["first", "second", "third"]);
    assert_eq!(world.resource::<Narrator>().status().queue_length, 0);
    shutdown_narration(&mut world);
}

#[test]
fn speak_interrupts_the_queue() {
    let (mut world, log) = make_world(true);
    let mut schedule = schedule();
    {
        let mut narrator = world.resource_mut::<Narrator>();
        narrator.queue("first", SpeakOptions::default());
        narrator.queue("second", SpeakOptions::default());
        narrator.speak("urgent", SpeakOptions::default());
        assert_eq!(narrator.status().queue_length, 0);
    }

    run_until(&mut world, &mut schedule, |w| {
        !w.resource::<Narrator>().is_speaking()
    });

    let said = said(&log);
    assert_eq!(said.last().map(String::as_str), Some("urgent"));
    assert!(!said.iter().any(|s| s == "second"));
    shutdown_narration(&mut world);
}

#[test]
fn disabling_drops_everything_pending() {
    let (mut world, log) = make_world(true);
    let mut schedule = schedule();
    {
        let mut narrator = world.resource_mut::<Narrator>();
        narrator.queue("first", SpeakOptions::default());
        narrator.queue("second", SpeakOptions::default());
        narrator.speak_game_text("scene text", SpeakOptions::default(), None);
        narrator.set_enabled(false);
        assert!(!narrator.is_speaking());
        assert_eq!(narrator.pending_delayed(), 0);

        // Ignored while disabled.
        narrator.queue("third", SpeakOptions::default());
    }

    for _ in 0..10 {
        schedule.run(&mut world);
        std::thread::sleep(Duration::from_millis(5));
    }

    let said = said(&log);
    assert!(said.len() <= 1);
    assert!(said.iter().all(|s| s == "first"));

    // Nothing is replayed on re-enable.
    world.resource_mut::<Narrator>().set_enabled(true);
    schedule.run(&mut world);
    assert!(!world.resource::<Narrator>().is_speaking());
    shutdown_narration(&mut world);
}

#[test]
fn game_text_waits_for_its_delay() {
    let (mut world, log) = make_world(true);
    let mut schedule = schedule();
    world.resource_mut::<Narrator>().speak_game_text(
        "Welcome to the STORMWATER game",
        SpeakOptions::default(),
        None,
    );

    // 0.1 s per frame against a 0.3 s delay.
    schedule.run(&mut world);
    schedule.run(&mut world);
    assert_eq!(world.resource::<Narrator>().pending_delayed(), 1);
    assert!(!world.resource::<Narrator>().is_speaking());

    schedule.run(&mut world);
    schedule.run(&mut world);
    assert_eq!(world.resource::<Narrator>().pending_delayed(), 0);

    run_until(&mut world, &mut schedule, |_| !said(&log).is_empty());
    assert_eq!(said(&log), vec!["Welcome to the storm water game"]);
    shutdown_narration(&mut world);
}

#[test]
fn starting_disabled_speaks_nothing() {
    let (mut world, log) = make_world(false);
    let mut schedule = schedule();
    world
        .resource_mut::<Narrator>()
        .speak("hello", SpeakOptions::default());
    schedule.run(&mut world);
    assert!(!world.resource::<Narrator>().is_enabled());
    assert!(said(&log).is_empty());
    shutdown_narration(&mut world);
}

#[test]
fn missing_backend_leaves_an_inert_narrator() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    setup_narration(&mut world, None, VoiceSettings::default(), true, 0.0);

    let mut narrator = world.resource_mut::<Narrator>();
    assert!(!narrator.is_supported());
    narrator.speak("hello", SpeakOptions::default());
    narrator.set_enabled(true);
    assert!(!narrator.is_enabled());
    assert!(!narrator.is_speaking());
}
