//! Headless simulation runner (default binary).
//!
//! Runs one seeded session driven by the autopilot, optionally appending
//! every engine event to a JSONL log, then prints a summary and the final
//! playfield.

use anyhow::Result;

use tetr::core::Engine;
use tetr::event_log::{event_log_path_from_env, EventLog, EVENT_LOG_ENV};
use tetr::runner::{load_engine_config, parse_run_args, run, USAGE};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(cfg) = parse_run_args(&args)? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let engine_config = load_engine_config(cfg.config_path.as_deref())?;
    let mut engine = Engine::new(engine_config, cfg.seed)?;

    // An explicit --event-log must open; the environment fallback only warns.
    let mut log = match &cfg.event_log {
        Some(path) => Some(EventLog::open(path)?),
        None => event_log_path_from_env().and_then(|path| match EventLog::open(&path) {
            Ok(log) => Some(log),
            Err(e) => {
                eprintln!("[tetr-sim] {} ignored: {}", EVENT_LOG_ENV, e);
                None
            }
        }),
    };

    let summary = run(&mut engine, &cfg, |event| match log.as_mut() {
        Some(log) => log.write(event),
        None => Ok(()),
    })?;
    if let Some(log) = log.as_mut() {
        log.flush()?;
    }

    println!("seed:           {}", cfg.seed);
    println!("ticks:          {}", summary.ticks);
    println!("pieces locked:  {}", summary.pieces_locked);
    println!("lines cleared:  {}", summary.lines_cleared);
    println!("fall interval:  {:.3}s", summary.fall_interval);
    match summary.game_over {
        Some(reason) => println!("game over:      {}", reason.as_str()),
        None => println!("game over:      no"),
    }
    if let Some(log) = &log {
        println!("events logged:  {}", log.written());
    }
    println!();
    print!("{}", engine.field());

    Ok(())
}
