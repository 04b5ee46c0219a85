//! # Grimhold Sim
//!
//! Headless harness for the behavior crate. Loads a behavior config,
//! spawns one actor per species around a strafing training dummy, runs a
//! fixed span of simulated time and reports what each species managed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod report;
mod training;

use anyhow::{Context, Result};
use clap::Parser;
use grimhold_behavior::{Arena, BehaviorConfig, BehaviorEvent};
use grimhold_common::Vec2;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use report::SimReport;
use training::{Strafe, TrainingGround};

/// Run hostile behaviors against a training dummy
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Behavior config (TOML). Presets are used when missing
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 20.0)]
    seconds: f32,

    /// Only spawn this species
    #[arg(long)]
    species: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("grimhold=info".parse()?))
        .init();

    let args = Args::parse();
    info!("Grimhold sim {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => BehaviorConfig::load_from(path),
        None => BehaviorConfig::default(),
    };

    let report = run(&config, &args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn run(config: &BehaviorConfig, args: &Args) -> Result<SimReport> {
    let mut arena = Arena::new(config.clone());
    let mut ground = TrainingGround::new(Strafe::default());
    let mut report = SimReport {
        seconds: args.seconds.max(0.0),
        ..SimReport::default()
    };

    let names: Vec<String> = match &args.species {
        Some(name) => vec![name.clone()],
        None => config.species.keys().cloned().collect(),
    };

    // Alternate sides, stepping further out for each pair
    let mut actors = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        let distance = 6.0 + (i / 2) as f32 * 1.5;
        let id = arena
            .spawn_enemy(name, Vec2::new(side * distance, 0.0))
            .with_context(|| format!("spawning species `{name}`"))?;
        report.track(id, name);
        actors.push((id, name));
    }
    info!(actors = names.len(), seconds = report.seconds, "simulation started");

    let dt = arena.config().fixed_timestep;
    let frames = (report.seconds / dt).ceil() as u64;
    for _ in 0..frames {
        ground.tick(dt);
        arena.advance(dt, &mut ground);
        ground.report_contacts(&mut arena)?;

        let events = arena.drain_events();
        for event in &events {
            log_event(event);
        }
        report.record(&arena, &events);
    }

    for (id, name) in &actors {
        debug!(actor = %id, species = %name, damage = ground.damage_from(*id), "actor total");
    }
    info!(
        hits = ground.hits(),
        events = report.events,
        "simulation finished"
    );
    Ok(report)
}

fn log_event(event: &BehaviorEvent) {
    match event {
        BehaviorEvent::Animation { .. } | BehaviorEvent::PhaseChanged { .. } => {},
        BehaviorEvent::DamageDelivered {
            source, amount, instance, ..
        } => info!(%source, amount, instance, "damage delivered"),
        other => debug!(?other, "event"),
    }
}
