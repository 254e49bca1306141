//! Headless runner: argument parsing, config loading and a seeded autopilot
//! that drives the engine without a player.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Engine, EngineEvent};
use crate::types::{EngineConfig, GameOverReason, InputSnapshot, PieceAction, TICK_SECS};

pub const USAGE: &str = "usage: tetr-sim [--ticks N] [--seed S] [--dt SECS] [--config PATH] [--event-log PATH]";

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Upper bound on ticks; the run also stops at Game Over
    pub ticks: u64,
    pub seed: u64,
    /// Seconds per tick
    pub dt: f32,
    pub config_path: Option<PathBuf>,
    pub event_log: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 3600,
            seed: 1,
            dt: TICK_SECS,
            config_path: None,
            event_log: None,
        }
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i)
        .ok_or_else(|| anyhow!("tetr-sim: missing value for {}", flag))
}

/// Parse runner arguments (without the program name).
///
/// Returns `Ok(None)` when help was requested.
pub fn parse_run_args(args: &[String]) -> Result<Option<RunConfig>> {
    let mut cfg = RunConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "--ticks" => {
                i += 1;
                let v = flag_value(args, i, "--ticks")?;
                cfg.ticks = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("tetr-sim: invalid --ticks value: {}", v))?;
            }
            "--seed" => {
                i += 1;
                let v = flag_value(args, i, "--seed")?;
                cfg.seed = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("tetr-sim: invalid --seed value: {}", v))?;
            }
            "--dt" => {
                i += 1;
                let v = flag_value(args, i, "--dt")?;
                let dt = v
                    .parse::<f32>()
                    .map_err(|_| anyhow!("tetr-sim: invalid --dt value: {}", v))?;
                if !(dt > 0.0 && dt.is_finite()) {
                    return Err(anyhow!("tetr-sim: --dt must be positive, got {}", v));
                }
                cfg.dt = dt;
            }
            "--config" => {
                i += 1;
                cfg.config_path = Some(PathBuf::from(flag_value(args, i, "--config")?));
            }
            "--event-log" => {
                i += 1;
                cfg.event_log = Some(PathBuf::from(flag_value(args, i, "--event-log")?));
            }
            other => {
                return Err(anyhow!("tetr-sim: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(Some(cfg))
}

/// Engine config from an optional JSON file, then `TETR_*` overrides.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| anyhow!("tetr-sim: read config {} failed: {}", path.display(), e))?;
            let mut config = serde_json::from_str::<EngineConfig>(&text)
                .map_err(|e| anyhow!("tetr-sim: parse config {} failed: {}", path.display(), e))?;
            config.apply_env();
            config
        }
        None => EngineConfig::from_env(),
    };
    config.validate()?;
    Ok(config)
}

/// Random player: holds a random mix of channels for a random duration
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: StdRng,
    held: InputSnapshot,
    hold_left: f32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            held: InputSnapshot::IDLE,
            hold_left: 0.0,
        }
    }

    /// Input for the next tick of length `dt`
    pub fn next_input(&mut self, dt: f32) -> InputSnapshot {
        self.hold_left -= dt;
        if self.hold_left <= 0.0 {
            self.held = self.pick();
            self.hold_left = self.rng.gen_range(0.05..0.6);
        }
        self.held
    }

    fn pick(&mut self) -> InputSnapshot {
        let mut input = InputSnapshot::IDLE;
        match self.rng.gen_range(0..3) {
            0 => input.press(PieceAction::MoveLeft),
            1 => input.press(PieceAction::MoveRight),
            _ => {}
        }
        if self.rng.gen_bool(0.3) {
            input.press(PieceAction::Rotate);
        }
        if self.rng.gen_bool(0.4) {
            input.press(PieceAction::SoftDrop);
        }
        if self.rng.gen_bool(0.1) {
            input.press(PieceAction::HardDrop);
        }
        input
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub pieces_locked: u32,
    pub lines_cleared: u32,
    pub fall_interval: f32,
    pub game_over: Option<GameOverReason>,
    pub events: usize,
}

impl RunSummary {
    pub fn of(engine: &Engine, events: usize) -> Self {
        Self {
            ticks: engine.tick_count(),
            pieces_locked: engine.pieces_locked(),
            lines_cleared: engine.lines_cleared(),
            fall_interval: engine.fall_interval(),
            game_over: engine.game_over(),
            events,
        }
    }
}

/// Drive `engine` with the autopilot until Game Over or `cfg.ticks`,
/// handing every event to `sink` in order.
pub fn run<F>(engine: &mut Engine, cfg: &RunConfig, mut sink: F) -> Result<RunSummary>
where
    F: FnMut(&EngineEvent) -> Result<()>,
{
    let mut pilot = Autopilot::new(cfg.seed);
    let mut events = 0usize;

    for event in engine.drain_events() {
        sink(&event)?;
        events += 1;
    }

    for _ in 0..cfg.ticks {
        if engine.is_game_over() {
            break;
        }
        let input = pilot.next_input(cfg.dt);
        let report = engine.tick(cfg.dt, &input);
        for event in &report.events {
            sink(event)?;
            events += 1;
        }
    }

    Ok(RunSummary::of(engine, events))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_defaults() {
        let cfg = parse_run_args(&[]).unwrap().unwrap();
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn parse_all_flags() {
        let cfg = parse_run_args(&args(&[
            "--ticks",
            "500",
            "--seed",
            "42",
            "--dt",
            "0.02",
            "--config",
            "engine.json",
            "--event-log",
            "events.jsonl",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.ticks, 500);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.dt, 0.02);
        assert_eq!(cfg.config_path, Some(PathBuf::from("engine.json")));
        assert_eq!(cfg.event_log, Some(PathBuf::from("events.jsonl")));
    }

    #[test]
    fn parse_errors() {
        assert!(parse_run_args(&args(&["--ticks"])).is_err());
        assert!(parse_run_args(&args(&["--seed", "abc"])).is_err());
        assert!(parse_run_args(&args(&["--dt", "0"])).is_err());
        let err = parse_run_args(&args(&["--bogus"])).unwrap_err();
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn parse_help() {
        assert!(parse_run_args(&args(&["--help"])).unwrap().is_none());
    }

    #[test]
    fn autopilot_is_deterministic() {
        let mut a = Autopilot::new(3);
        let mut b = Autopilot::new(3);
        for _ in 0..200 {
            assert_eq!(a.next_input(TICK_SECS), b.next_input(TICK_SECS));
        }
    }

    #[test]
    fn run_stops_at_tick_budget() {
        let mut engine = Engine::with_seed(10);
        let cfg = RunConfig {
            ticks: 120,
            seed: 10,
            ..RunConfig::default()
        };
        let mut seen = Vec::new();
        let summary = run(&mut engine, &cfg, |e| {
            seen.push(e.clone());
            Ok(())
        })
        .unwrap();

        assert!(summary.ticks <= 120);
        assert_eq!(summary.events, seen.len());
        assert!(matches!(seen.first(), Some(EngineEvent::Spawned { tick: 0, .. })));
    }
}
