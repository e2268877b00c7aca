//! The `Sim` struct and its step loop.

use pl_behavior::{AgentView, Behavior, BehaviorStack, Effect, Message, Payload, Phase, TaskHook};
use pl_core::{PlaneId, SimClock, SimConfig, Step, TaskId};
use pl_fleet::{FleetStore, TaskStore};
use tracing::{info, trace, warn};

use crate::{Motion, SimError, SimObserver, SimResult, StepStats, TaskEvent, Transport};

/// The main simulation runner.
///
/// `Sim` holds all simulation state and drives the step loop:
///
/// 1. **PreStep** on every plane.
/// 2. **Messages**, plane by plane in ascending id order: `BeforeMessages`,
///    dispatch of every message delivered last step in arrival order, then
///    `AfterMessages`.
/// 3. **Motion** advances positions and reports completed tasks.
/// 4. **PostStep** on every plane.
/// 5. **Delivery**: everything sent this step moves into the recipients'
///    inboxes for the next step.
///
/// Effects returned by a hook are applied right after it, in emission order.
/// A handoff or accept runs the plane's task hooks and applies their effects
/// before continuing.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total steps, seed, step duration, …).
    pub config: SimConfig,

    pub clock: SimClock,

    /// Plane state.  Behaviors see it through `AgentView`.
    pub fleet: FleetStore,

    pub tasks: TaskStore,

    pub(crate) stacks:    Vec<BehaviorStack>,
    pub(crate) inboxes:   Vec<Vec<Message>>,
    pub(crate) transport: Transport,
    pub(crate) motion:    Box<dyn Motion>,

    /// Ownership changes not yet reported to an observer.
    pub(crate) events: Vec<(Step, TaskEvent)>,
    pub(crate) stats:  StepStats,
}

/// The calling plane's view of the world.  A free function so callers can
/// borrow the stores and a behavior stack at the same time.
fn view_of<'a>(fleet: &'a FleetStore, tasks: &'a TaskStore, plane: PlaneId, step: Step) -> AgentView<'a> {
    let i = plane.index();
    AgentView {
        me:             plane,
        step,
        location:       fleet.location[i],
        speed:          fleet.speed[i],
        comm_range:     fleet.comm_range[i],
        owned:          &fleet.owned[i],
        task_locations: &tasks.location,
    }
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current step to `config.end_step()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(planes = self.fleet.count, tasks = self.tasks.count, steps = self.config.total_steps, "run started");
        while self.clock.current_step < self.config.end_step() {
            self.run_one(observer)?;
        }
        observer.on_sim_end(self.clock.current_step);
        info!(step = %self.clock.current_step, open = self.tasks.open_count(), "run finished");
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores `end_step`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.run_one(observer)?;
        }
        Ok(())
    }

    #[inline]
    pub fn now(&self) -> Step {
        self.clock.current_step
    }

    /// The behavior stack of `plane`.
    pub fn stack(&self, plane: PlaneId) -> Option<&BehaviorStack> {
        self.stacks.get(plane.index())
    }

    /// The behavior of concrete type `T` on `plane`.
    pub fn behavior<T: Behavior>(&self, plane: PlaneId) -> Option<&T> {
        self.stack(plane)?.get::<T>()
    }

    /// Messages waiting in `plane`'s inbox for the next step.
    pub fn inbox(&self, plane: PlaneId) -> &[Message] {
        self.inboxes.get(plane.index()).map_or(&[], Vec::as_slice)
    }

    // ── Initialisation ────────────────────────────────────────────────────

    /// `Init` on every plane, then `Added` for every initially owned task.
    pub(crate) fn init(&mut self) -> SimResult<()> {
        for plane in self.fleet.plane_ids().collect::<Vec<_>>() {
            self.run_phase(plane, Phase::Init)?;
        }
        for plane in self.fleet.plane_ids().collect::<Vec<_>>() {
            let owned: Vec<TaskId> = self.fleet.owned[plane.index()].iter().copied().collect();
            for task in owned {
                self.events.push((self.now(), TaskEvent::Added { task, plane }));
                self.run_hook(plane, TaskHook::Added(task))?;
            }
        }
        Ok(())
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn run_one<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.now();
        observer.on_step_start(now);
        let stats = self.process_step()?;

        for (step, event) in self.events.drain(..) {
            observer.on_task_event(step, event);
        }
        observer.on_step_end(now, &stats);
        let interval = self.config.output_interval_steps;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.fleet, &self.tasks);
        }
        self.clock.advance();
        Ok(())
    }

    fn process_step(&mut self) -> SimResult<StepStats> {
        self.stats = StepStats::default();
        let planes: Vec<PlaneId> = self.fleet.plane_ids().collect();
        let current = std::mem::replace(&mut self.inboxes, vec![Vec::new(); planes.len()]);

        // ── Phase 1: pre-step ─────────────────────────────────────────────
        for &plane in &planes {
            self.run_phase(plane, Phase::PreStep)?;
        }

        // ── Phase 2: messages, one plane at a time ────────────────────────
        for (&plane, inbox) in planes.iter().zip(current) {
            self.run_phase(plane, Phase::BeforeMessages)?;
            for msg in &inbox {
                self.dispatch(plane, msg)?;
            }
            self.run_phase(plane, Phase::AfterMessages)?;
        }

        // ── Phase 3: motion ───────────────────────────────────────────────
        let now = self.now();
        let served = self.motion.advance(now, &mut self.fleet, &self.tasks);
        for (plane, task) in served {
            self.complete(plane, task)?;
        }

        // ── Phase 4: post-step ────────────────────────────────────────────
        for &plane in &planes {
            self.run_phase(plane, Phase::PostStep)?;
        }

        // ── Phase 5: delivery ─────────────────────────────────────────────
        let d = self.transport.deliver(&self.fleet, &mut self.inboxes);
        self.stats.delivered = d.delivered;
        self.stats.bounced = d.bounced;
        self.stats.dropped = d.dropped;
        trace!(step = %self.now(), delivered = d.delivered, handoffs = self.stats.handoffs, "step done");
        Ok(self.stats)
    }

    // ── Hook drivers ──────────────────────────────────────────────────────

    fn run_phase(&mut self, plane: PlaneId, phase: Phase) -> SimResult<()> {
        let mut effects = Vec::new();
        let view = view_of(&self.fleet, &self.tasks, plane, self.clock.current_step);
        self.stacks[plane.index()]
            .run_phase(phase, view, &mut effects)
            .map_err(|source| SimError::Behavior { plane, source })?;
        self.apply_effects(plane, effects)
    }

    fn run_hook(&mut self, plane: PlaneId, hook: TaskHook) -> SimResult<()> {
        let mut effects = Vec::new();
        let view = view_of(&self.fleet, &self.tasks, plane, self.clock.current_step);
        self.stacks[plane.index()]
            .task_hook(hook, view, &mut effects)
            .map_err(|source| SimError::Behavior { plane, source })?;
        self.apply_effects(plane, effects)
    }

    fn dispatch(&mut self, plane: PlaneId, msg: &Message) -> SimResult<()> {
        let mut effects = Vec::new();
        let view = view_of(&self.fleet, &self.tasks, plane, self.clock.current_step);
        self.stacks[plane.index()]
            .dispatch(msg, view, &mut effects)
            .map_err(|source| SimError::Behavior { plane, source })?;
        self.apply_effects(plane, effects)
    }

    // ── Effects ───────────────────────────────────────────────────────────

    fn apply_effects(&mut self, plane: PlaneId, effects: Vec<Effect>) -> SimResult<()> {
        for effect in effects {
            match effect {
                Effect::Send { recipient, payload } => self.send(plane, recipient, payload),
                Effect::Handoff { task, to } => self.handoff(plane, task, to)?,
                Effect::Accept { task } => self.accept(plane, task)?,
            }
        }
        Ok(())
    }

    fn send(&mut self, sender: PlaneId, recipient: Option<PlaneId>, payload: Payload) {
        let sent_at = self.now();
        self.transport.queue(Message { sender, recipient, sent_at, payload });
    }

    /// Give `task` up: the plane's behaviors tear down first, then the task
    /// leaves as a `TaskTransfer`.
    fn handoff(&mut self, plane: PlaneId, task: TaskId, to: PlaneId) -> SimResult<()> {
        self.tasks.check(task)?;
        self.fleet.check(to)?;
        if to == plane || !self.fleet.owned[plane.index()].remove(&task) {
            warn!(plane = %plane, task = %task, to = %to, "ignoring handoff of a task the plane cannot give");
            return Ok(());
        }
        self.tasks.servant[task.index()] = None;
        self.events.push((self.now(), TaskEvent::Removed { task, plane }));
        self.run_hook(plane, TaskHook::Removed(task))?;

        self.send(plane, Some(to), Payload::TaskTransfer { task });
        self.stats.handoffs += 1;
        info!(plane = %plane, task = %task, to = %to, "task handed off");
        Ok(())
    }

    fn accept(&mut self, plane: PlaneId, task: TaskId) -> SimResult<()> {
        self.tasks.check(task)?;
        let i = task.index();
        if self.tasks.completed[i] || self.tasks.servant[i].is_some() {
            warn!(plane = %plane, task = %task, servant = ?self.tasks.servant[i], "ignoring accept of a task that is not in flight");
            return Ok(());
        }
        self.fleet.owned[plane.index()].insert(task);
        self.tasks.servant[i] = Some(plane);
        self.events.push((self.now(), TaskEvent::Added { task, plane }));
        self.run_hook(plane, TaskHook::Added(task))
    }

    fn complete(&mut self, plane: PlaneId, task: TaskId) -> SimResult<()> {
        self.tasks.check(task)?;
        if !self.fleet.owned[plane.index()].remove(&task) {
            warn!(plane = %plane, task = %task, "ignoring completion of a task the plane does not own");
            return Ok(());
        }
        self.tasks.completed[task.index()] = true;
        self.stats.completed += 1;
        self.events.push((self.now(), TaskEvent::Completed { task, plane }));
        info!(plane = %plane, task = %task, "task completed");
        self.run_hook(plane, TaskHook::Completed(task))
    }
}
