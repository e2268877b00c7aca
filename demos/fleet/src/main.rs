//! fleet — small end-to-end run of the plane fleet task allocator.
//!
//! Scatters a dozen planes and a few dozen tasks over a 2 km square, gives
//! every task to a random plane, and lets the planes renegotiate ownership
//! with Max-Sum while flying to their nearest task.  Output lands in
//! `output/fleet/`.  Set `RUST_LOG=debug` to watch rounds start and settle.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pl_core::{PlaneId, SimConfig, SimRng, Step};
use pl_fleet::{FleetBuilder, FleetStore, PlaneSpec, TaskStore};
use pl_maxsum::MaxSumConfig;
use pl_output::{CsvWriter, OutputWriter, SimOutputObserver};
use pl_sim::{SimBuilder, SimObserver, StepStats, StraightLine, TaskEvent, planning_stack};

// ── Constants ─────────────────────────────────────────────────────────────────

const PLANE_COUNT:           usize = 12;
const TASK_COUNT:            usize = 40;
const SEED:                  u64   = 42;
const AREA_METRES:           f64   = 2_000.0;
const SPEED_MPS:             f64   = 6.0;
const COMM_RANGE_METRES:     f64   = 600.0;
const TOTAL_STEPS:           u64   = 600;
const OUTPUT_INTERVAL_STEPS: u64   = 10;

// ── Observer wrapper to tally the run ─────────────────────────────────────────

struct TallyObserver<W: OutputWriter> {
    inner:     SimOutputObserver<W>,
    handoffs:  usize,
    bounced:   usize,
    completed: usize,
    last_done: Option<Step>,
}

impl<W: OutputWriter> TallyObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, handoffs: 0, bounced: 0, completed: 0, last_done: None }
    }
}

impl<W: OutputWriter> SimObserver for TallyObserver<W> {
    fn on_task_event(&mut self, step: Step, event: TaskEvent) {
        if matches!(event, TaskEvent::Completed { .. }) {
            self.last_done = Some(step);
        }
        self.inner.on_task_event(step, event);
    }

    fn on_step_end(&mut self, step: Step, stats: &StepStats) {
        self.handoffs += stats.handoffs;
        self.bounced += stats.bounced;
        self.completed += stats.completed;
        self.inner.on_step_end(step, stats);
    }

    fn on_snapshot(&mut self, step: Step, fleet: &FleetStore, tasks: &TaskStore) {
        self.inner.on_snapshot(step, fleet, tasks);
    }

    fn on_sim_end(&mut self, final_step: Step) {
        self.inner.on_sim_end(final_step);
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

fn scenario(seed: u64) -> Result<(FleetStore, TaskStore)> {
    let mut rng = SimRng::new(seed);
    let mut plane_rng = rng.child(0);
    let mut task_rng = rng.child(1);

    let mut builder = FleetBuilder::new();
    for _ in 0..PLANE_COUNT {
        let at = plane_rng.point_in(AREA_METRES, AREA_METRES);
        builder = builder.plane(PlaneSpec::new(at, SPEED_MPS, COMM_RANGE_METRES));
    }
    for _ in 0..TASK_COUNT {
        let at = task_rng.point_in(AREA_METRES, AREA_METRES);
        let owner = PlaneId(task_rng.gen_range(0..PLANE_COUNT as u32));
        builder = builder.task(at, Some(owner));
    }
    Ok(builder.build()?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== fleet — Max-Sum task allocation ===");
    println!("Planes: {PLANE_COUNT}  |  Tasks: {TASK_COUNT}  |  Steps: {TOTAL_STEPS}  |  Seed: {SEED}");
    println!();

    // 1. Scenario.
    let (fleet, tasks) = scenario(SEED)?;
    let initial_loads: Vec<usize> = fleet.plane_ids().map(|p| fleet.load(p)).collect();

    // 2. Behavior stacks.
    let maxsum = MaxSumConfig::default();
    let stacks = (0..fleet.count).map(|_| planning_stack(&maxsum)).collect::<Result<Vec<_>, _>>()?;

    // 3. Sim.
    let config = SimConfig {
        step_duration_secs:    1,
        total_steps:           TOTAL_STEPS,
        seed:                  SEED,
        output_interval_steps: OUTPUT_INTERVAL_STEPS,
    };
    let mut sim = SimBuilder::new(config.clone(), fleet, tasks, stacks).motion(StraightLine).build()?;

    // 4. Output.
    let out_dir = Path::new("output/fleet");
    std::fs::create_dir_all(out_dir)?;
    let writer = CsvWriter::new(out_dir)?;
    let mut obs = TallyObserver::new(SimOutputObserver::new(writer, &config));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "run finished");

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  handoffs  : {}", obs.handoffs);
    println!("  bounced   : {}", obs.bounced);
    println!("  completed : {} / {TASK_COUNT}", obs.completed);
    if let Some(step) = obs.last_done {
        println!("  last completion at step {}", step.0);
    }
    println!("  output    : {}", out_dir.display());
    println!();

    // 7. Final plane table.
    println!("{:<7} {:<18} {:<9} {:<9} {:<10}", "Plane", "Location", "Initial", "Open", "Preferred");
    println!("{}", "-".repeat(56));
    for plane in sim.fleet.plane_ids() {
        let preferred = sim
            .behavior::<pl_maxsum::MaxSumBehavior>(plane)
            .and_then(|b| b.preferred_task())
            .map(|t| t.0.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<7} {:<18} {:<9} {:<9} {:<10}",
            plane.0,
            sim.fleet.location[plane.index()].to_string(),
            initial_loads[plane.index()],
            sim.fleet.load(plane),
            preferred,
        );
    }

    Ok(())
}
