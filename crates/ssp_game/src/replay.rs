//! Scripted keyboard input for deterministic whole-game tests.
//!
//! A replay is a list of steps. Each step delivers its key events just before
//! its first tick, then runs `repeat` ticks with no further input.

use serde::Deserialize;
use ssp_core::input::{InputQueue, KeyEvent};
use ssp_core::surface::Canvas;
use std::fs;
use std::path::Path;

use crate::game_loop::{tick, TickReport};
use crate::world::World;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayStep {
    #[serde(default)]
    pub events: Vec<KeyEvent>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Outcome of running a replay to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplaySummary {
    pub ticks: u32,
    /// First tick (1-based) on which the win condition held.
    pub first_win_tick: Option<u32>,
    pub resets: u32,
}

impl ReplaySequence {
    pub fn total_ticks(&self) -> u32 {
        self.steps.iter().map(|step| step.repeat.max(1)).sum()
    }

    /// Feed the events through an [`InputQueue`] the way the runtime does and
    /// tick the world.
    pub fn run(&self, world: &mut World, canvas: &mut dyn Canvas) -> ReplaySummary {
        let mut queue = InputQueue::new();
        let mut summary = ReplaySummary::default();
        for step in &self.steps {
            for event in &step.events {
                queue.push(*event);
            }
            for _ in 0..step.repeat.max(1) {
                for event in queue.drain() {
                    world.handle_key(event);
                }
                let report: TickReport = tick(world, canvas);
                summary.ticks += 1;
                if report.won && summary.first_win_tick.is_none() {
                    summary.first_win_tick = Some(summary.ticks);
                }
                if report.reset {
                    summary.resets += 1;
                }
            }
        }
        summary
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.steps.is_empty() {
        return Err("Replay validation failed: steps list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_world, RecordingCanvas};
    use ssp_core::input::Key;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ssp_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn load_inline(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    const FULL_RUN: &str = r#"{
      "steps": [
        { "events": [{ "key": "d", "action": "down" }], "repeat": 149 },
        { "events": [{ "key": "w", "action": "down" }, { "key": "w", "action": "up" }], "repeat": 157 },
        { "events": [{ "key": "w", "action": "down" }, { "key": "w", "action": "up" }], "repeat": 60 }
      ]
    }"#;

    #[test]
    fn replay_file_parses_events_and_defaults() {
        let replay = load_inline(
            "parse",
            r#"{
              "steps": [
                { "events": [{ "key": "a", "action": "down" }], "repeat": 3 },
                { "events": [{ "key": "a", "action": "up" }] }
              ]
            }"#,
        );
        assert_eq!(replay.steps.len(), 2);
        assert_eq!(replay.steps[0].events, vec![KeyEvent::down(Key::A)]);
        assert_eq!(replay.steps[1].repeat, 1);
        assert_eq!(replay.total_ticks(), 4);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "steps": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("steps list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let path = temp_file_path("bad_key");
        fs::write(
            &path,
            r#"{ "steps": [{ "events": [{ "key": "q", "action": "down" }] }] }"#,
        )
        .expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("unknown key should fail");
        assert!(err.contains("Failed to parse replay JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn running_right_without_jumping_falls_into_second_gap() {
        let replay = load_inline(
            "fall",
            r#"{ "steps": [{ "events": [{ "key": "d", "action": "down" }], "repeat": 196 }] }"#,
        );
        let mut world = sample_world();
        let summary = replay.run(&mut world, &mut RecordingCanvas::default());

        assert_eq!(summary.ticks, 196);
        assert_eq!(summary.resets, 1);
        assert_eq!(summary.first_win_tick, None);
        assert_eq!(world.scroll_offset, 0.0);
    }

    #[test]
    fn two_timed_jumps_clear_the_level() {
        let replay = load_inline("full_run", FULL_RUN);
        let mut world = sample_world();
        let summary = replay.run(&mut world, &mut RecordingCanvas::default());

        assert_eq!(summary.resets, 0);
        assert_eq!(summary.first_win_tick, Some(350));
        assert!(world.scroll_offset > world.win_threshold());
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = load_inline("deterministic", FULL_RUN);
        let mut run_a = sample_world();
        let mut run_b = sample_world();
        let summary_a = replay.run(&mut run_a, &mut RecordingCanvas::default());
        let summary_b = replay.run(&mut run_b, &mut RecordingCanvas::default());

        assert_eq!(summary_a, summary_b);
        assert_eq!(run_a.player.position, run_b.player.position);
        assert_eq!(run_a.player.velocity, run_b.player.velocity);
        assert_eq!(run_a.player.frames, run_b.player.frames);
        assert_eq!(run_a.scroll_offset, run_b.scroll_offset);
    }
}
