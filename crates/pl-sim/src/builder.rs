//! Fluent builder for constructing a [`Sim`].

use pl_behavior::{Behavior, BehaviorStack, TaskInbox};
use pl_core::SimConfig;
use pl_fleet::{FleetStore, TaskStore};
use pl_maxsum::{MaxSumBehavior, MaxSumConfig};
use pl_neighbors::NeighborTracker;

use crate::{Motion, Sim, SimError, SimResult, Stationary, StepStats, Transport};

/// The standard per-plane stack: task inbox, neighbor tracking and the
/// max-sum allocator.
pub fn planning_stack(config: &MaxSumConfig) -> SimResult<BehaviorStack> {
    let maxsum = MaxSumBehavior::new(config.clone())?;
    let stack = BehaviorStack::new(vec![
        Box::new(TaskInbox) as Box<dyn Behavior>,
        Box::new(NeighborTracker::new()),
        Box::new(maxsum),
    ])?;
    Ok(stack)
}

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total steps, seed, step duration, …
/// - [`FleetStore`] + [`TaskStore`] — from [`pl_fleet::FleetBuilder`]
/// - one [`BehaviorStack`] per plane
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default        |
/// |---------------|----------------|
/// | `.motion(m)`  | [`Stationary`] |
///
/// # Example
///
/// ```rust,ignore
/// let (fleet, tasks) = FleetBuilder::new().plane(..).task(..).build()?;
/// let stacks = (0..fleet.count).map(|_| planning_stack(&cfg)).collect::<SimResult<_>>()?;
/// let mut sim = SimBuilder::new(config, fleet, tasks, stacks)
///     .motion(StraightLine)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    fleet:  FleetStore,
    tasks:  TaskStore,
    stacks: Vec<BehaviorStack>,
    motion: Option<Box<dyn Motion>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, fleet: FleetStore, tasks: TaskStore, stacks: Vec<BehaviorStack>) -> Self {
        Self { config, fleet, tasks, stacks, motion: None }
    }

    pub fn motion(mut self, motion: impl Motion + 'static) -> Self {
        self.motion = Some(Box::new(motion));
        self
    }

    /// Validate inputs, run every plane's `Init` phase and the `Added` hook
    /// for each initially owned task, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let planes = self.fleet.count;
        if self.stacks.len() != planes {
            return Err(SimError::PlaneCountMismatch {
                expected: planes,
                got:      self.stacks.len(),
                what:     "behavior stacks",
            });
        }

        let mut sim = Sim {
            clock:     self.config.make_clock(),
            config:    self.config,
            fleet:     self.fleet,
            tasks:     self.tasks,
            stacks:    self.stacks,
            inboxes:   vec![Vec::new(); planes],
            transport: Transport::new(),
            motion:    self.motion.unwrap_or_else(|| Box::new(Stationary)),
            events:    Vec::new(),
            stats:     StepStats::default(),
        };
        sim.init()?;
        Ok(sim)
    }
}
