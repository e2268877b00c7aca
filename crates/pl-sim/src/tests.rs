//! Integration tests for pl-sim.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use pl_behavior::{AgentCtx, Behavior, BehaviorError, BehaviorKind, BehaviorResult, BehaviorStack, Message, MessageKind, Payload, TaskInbox};
use pl_core::{PlaneId, Point, SimConfig, Step, TaskId};
use pl_fleet::{FleetBuilder, FleetStore, PlaneSpec, TaskStore};
use pl_maxsum::{MaxSumBehavior, MaxSumConfig, RoundState};

use crate::{Motion, NoopObserver, Sim, SimBuilder, SimError, SimObserver, StepStats, TaskEvent, planning_stack};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_steps: u64) -> SimConfig {
    SimConfig { step_duration_secs: 1, total_steps, seed: 42, output_interval_steps: total_steps.max(1) }
}

fn plane(x: f64, y: f64) -> PlaneSpec {
    PlaneSpec::new(Point::new(x, y), 1.0, 1000.0)
}

fn planning_sim(builder: FleetBuilder, cfg: &MaxSumConfig, motion: impl Motion + 'static) -> Sim {
    let (fleet, tasks) = builder.build().unwrap();
    let stacks = (0..fleet.count).map(|_| planning_stack(cfg).unwrap()).collect();
    SimBuilder::new(test_config(100), fleet, tasks, stacks).motion(motion).build().unwrap()
}

fn maxsum(sim: &Sim, p: u32) -> &MaxSumBehavior {
    sim.behavior::<MaxSumBehavior>(PlaneId(p)).unwrap()
}

/// Collects every task event and the per-step counters.
#[derive(Default)]
struct Recorder {
    events: Vec<(Step, TaskEvent)>,
    stats:  Vec<StepStats>,
    ended:  Option<Step>,
}

impl SimObserver for Recorder {
    fn on_task_event(&mut self, step: Step, event: TaskEvent) {
        self.events.push((step, event));
    }
    fn on_step_end(&mut self, _: Step, stats: &StepStats) {
        self.stats.push(*stats);
    }
    fn on_sim_end(&mut self, step: Step) {
        self.ended = Some(step);
    }
}

impl Recorder {
    fn handoffs(&self) -> usize {
        self.stats.iter().map(|s| s.handoffs).sum()
    }
}

type Log = Rc<RefCell<Vec<String>>>;

/// Logs phase calls as `"<plane>:<phase>"` and message receipts as
/// `"<plane>:got <sender>@<sent_at>"`.  Broadcasts once, at post-step 0.
struct PhaseLog {
    log: Log,
}

impl PhaseLog {
    fn note(&self, ctx: &AgentCtx<'_>, what: &str) {
        self.log.borrow_mut().push(format!("{}:{what}", ctx.me().0));
    }
}

impl Behavior for PhaseLog {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind("phase_log")
    }
    fn handles(&self) -> &'static [MessageKind] {
        &[MessageKind::Beacon]
    }
    fn pre_step(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.note(ctx, "pre");
        Ok(())
    }
    fn before_messages(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.note(ctx, "before");
        Ok(())
    }
    fn on_message(&mut self, _: MessageKind, msg: &Message, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.note(ctx, &format!("got {}@{}", msg.sender.0, msg.sent_at.0));
        Ok(())
    }
    fn after_messages(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.note(ctx, "after");
        Ok(())
    }
    fn post_step(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        self.note(ctx, "post");
        if ctx.view.step == Step::ZERO {
            ctx.broadcast(Payload::Beacon { location: ctx.view.location, speed: None });
        }
        Ok(())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fails on every beacon it hears.
struct Failing;

impl Behavior for Failing {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind("failing")
    }
    fn handles(&self) -> &'static [MessageKind] {
        &[MessageKind::Beacon]
    }
    fn on_message(&mut self, _: MessageKind, _: &Message, _: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        Err(BehaviorError::Handler { kind: self.kind(), source: "corrupt beacon".into() })
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Hands every owned task to `to` at step 0.
struct Giver {
    to: PlaneId,
}

impl Behavior for Giver {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind("giver")
    }
    fn handles(&self) -> &'static [MessageKind] {
        &[]
    }
    fn after_messages(&mut self, ctx: &mut AgentCtx<'_>) -> BehaviorResult<()> {
        if ctx.view.step == Step::ZERO {
            let owned: Vec<TaskId> = ctx.view.owned.iter().copied().collect();
            for task in owned {
                ctx.handoff(task, self.to);
            }
        }
        Ok(())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Moves one plane to a fixed point at a fixed step.
struct Teleport {
    plane: PlaneId,
    at:    Step,
    to:    Point,
}

impl Motion for Teleport {
    fn advance(&mut self, step: Step, fleet: &mut FleetStore, _: &TaskStore) -> Vec<(PlaneId, TaskId)> {
        if step == self.at {
            fleet.location[self.plane.index()] = self.to;
        }
        Vec::new()
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn stack_count_mismatch_errors() {
        let (fleet, tasks) = FleetBuilder::new().plane(plane(0.0, 0.0)).plane(plane(1.0, 0.0)).build().unwrap();
        let stacks = vec![planning_stack(&MaxSumConfig::default()).unwrap()];
        let result = SimBuilder::new(test_config(10), fleet, tasks, stacks).build();
        assert!(matches!(result, Err(SimError::PlaneCountMismatch { expected: 2, got: 1, .. })));
    }

    #[test]
    fn invalid_config_errors() {
        let (fleet, tasks) = FleetBuilder::new().build().unwrap();
        let config = SimConfig { output_interval_steps: 0, ..SimConfig::default() };
        let result = SimBuilder::new(config, fleet, tasks, Vec::new()).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn bad_maxsum_config_fails_stack_construction() {
        let cfg = MaxSumConfig { cost_strategy: "warp".into(), ..MaxSumConfig::default() };
        assert!(matches!(planning_stack(&cfg), Err(SimError::MaxSum(_))));
    }

    #[test]
    fn initial_owners_get_added_hooks() {
        let sim = planning_sim(
            FleetBuilder::new().plane(plane(0.0, 0.0)).task(Point::new(5.0, 0.0), Some(PlaneId(0))),
            &MaxSumConfig::default(),
            crate::Stationary,
        );
        assert_eq!(maxsum(&sim, 0).round(TaskId(0)), Some(RoundState::Unattached { added_at: Step::ZERO }));
        assert_eq!(maxsum(&sim, 0).decision(TaskId(0)), Some(PlaneId(0)));
    }
}

// ── Step loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loop_tests {
    use super::*;

    fn logged_sim(log: &Log) -> Sim {
        let (fleet, tasks) = FleetBuilder::new().plane(plane(0.0, 0.0)).plane(plane(10.0, 0.0)).build().unwrap();
        let stacks = (0..2)
            .map(|_| BehaviorStack::new(vec![Box::new(PhaseLog { log: log.clone() }) as Box<dyn Behavior>]).unwrap())
            .collect();
        SimBuilder::new(test_config(2), fleet, tasks, stacks).build().unwrap()
    }

    #[test]
    fn phases_run_in_order() {
        let log = Log::default();
        let mut sim = logged_sim(&log);
        sim.run_steps(1, &mut NoopObserver).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["0:pre", "1:pre", "0:before", "0:after", "1:before", "1:after", "0:post", "1:post"]
        );
    }

    #[test]
    fn messages_arrive_next_step() {
        let log = Log::default();
        let mut sim = logged_sim(&log);
        sim.run_steps(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.inbox(PlaneId(1)).len(), 1);
        log.borrow_mut().clear();

        sim.run_steps(1, &mut NoopObserver).unwrap();
        let log = log.borrow();
        assert!(log.contains(&"0:got 1@0".to_string()));
        assert!(log.contains(&"1:got 0@0".to_string()));
        let before = log.iter().position(|l| l == "1:before").unwrap();
        let got = log.iter().position(|l| l == "1:got 0@0").unwrap();
        let after = log.iter().position(|l| l == "1:after").unwrap();
        assert!(before < got && got < after);
    }

    #[test]
    fn run_stops_at_end_step() {
        let log = Log::default();
        let mut sim = logged_sim(&log);
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.stats.len(), 2);
        assert_eq!(rec.ended, Some(Step(2)));
        assert_eq!(rec.stats[0].delivered, 2);
    }

    #[test]
    fn handler_error_aborts_the_step() {
        let log = Log::default();
        let (fleet, tasks) = FleetBuilder::new().plane(plane(0.0, 0.0)).plane(plane(10.0, 0.0)).build().unwrap();
        let stacks = vec![
            BehaviorStack::new(vec![Box::new(PhaseLog { log: log.clone() }) as Box<dyn Behavior>]).unwrap(),
            BehaviorStack::new(vec![
                Box::new(Failing) as Box<dyn Behavior>,
                Box::new(PhaseLog { log: log.clone() }),
            ])
            .unwrap(),
        ];
        let mut sim = SimBuilder::new(test_config(10), fleet, tasks, stacks).build().unwrap();
        let mut rec = Recorder::default();
        sim.run_steps(1, &mut rec).unwrap();
        log.borrow_mut().clear();

        let err = sim.run_steps(1, &mut rec).unwrap_err();
        match err {
            SimError::Behavior { plane, source: BehaviorError::Handler { kind, .. } } => {
                assert_eq!(plane, PlaneId(1));
                assert_eq!(kind, BehaviorKind("failing"));
            }
            other => panic!("unexpected error {other}"),
        }

        // Plane 0 finished its messages; plane 1 stopped at the failing
        // handler, so the logger after it never saw the beacon.
        let log = log.borrow();
        assert!(log.contains(&"0:got 1@0".to_string()));
        assert!(log.contains(&"1:before".to_string()));
        assert!(!log.iter().any(|l| l.starts_with("1:got") || l == "1:after"));
        assert!(!log.iter().any(|l| l.ends_with(":post")));

        // The step never completed.
        assert_eq!(rec.stats.len(), 1);
        assert_eq!(sim.now(), Step(1));
    }

    #[test]
    fn transfer_out_of_range_returns_to_sender() {
        let (fleet, tasks) = FleetBuilder::new()
            .plane(PlaneSpec::new(Point::new(0.0, 0.0), 0.0, 50.0))
            .plane(PlaneSpec::new(Point::new(500.0, 0.0), 0.0, 50.0))
            .task(Point::new(1.0, 1.0), Some(PlaneId(0)))
            .build()
            .unwrap();
        let stacks = vec![
            BehaviorStack::new(vec![Box::new(TaskInbox) as Box<dyn Behavior>, Box::new(Giver { to: PlaneId(1) })]).unwrap(),
            BehaviorStack::new(vec![Box::new(TaskInbox) as Box<dyn Behavior>]).unwrap(),
        ];
        let mut sim = SimBuilder::new(test_config(10), fleet, tasks, stacks).build().unwrap();
        let mut rec = Recorder::default();

        sim.run_steps(1, &mut rec).unwrap();
        assert_eq!(sim.tasks.servant[0], None);
        assert_eq!(rec.stats[0].bounced, 1);

        sim.run_steps(1, &mut rec).unwrap();
        assert_eq!(sim.tasks.servant[0], Some(PlaneId(0)));
        assert!(sim.fleet.owned[0].contains(&TaskId(0)));
        let task = TaskId(0);
        let p0 = PlaneId(0);
        assert_eq!(rec.events, vec![
            (Step(0), TaskEvent::Added { task, plane: p0 }),
            (Step(0), TaskEvent::Removed { task, plane: p0 }),
            (Step(1), TaskEvent::Added { task, plane: p0 }),
        ]);
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod transport_tests {
    use super::*;
    use crate::{Delivery, Transport};

    fn line(xs: &[f64], range: f64) -> FleetStore {
        xs.iter()
            .fold(FleetBuilder::new(), |b, &x| b.plane(PlaneSpec::new(Point::new(x, 0.0), 0.0, range)))
            .build()
            .unwrap()
            .0
    }

    fn msg(sender: u32, recipient: Option<u32>, payload: Payload) -> Message {
        Message { sender: PlaneId(sender), recipient: recipient.map(PlaneId), sent_at: Step(3), payload }
    }

    #[test]
    fn range_is_exclusive_and_sender_is_skipped() {
        let fleet = line(&[0.0, 99.9, 100.0, -50.0], 100.0);
        let mut inboxes = vec![Vec::new(); 4];
        let mut t = Transport::new();
        t.queue(msg(0, None, Payload::Beacon { location: Point::default(), speed: None }));
        assert_eq!(t.pending(), 1);

        let d = t.deliver(&fleet, &mut inboxes);
        assert_eq!(d, Delivery { delivered: 2, bounced: 0, dropped: 0 });
        assert!(inboxes[0].is_empty());
        assert_eq!(inboxes[1].len(), 1);
        assert!(inboxes[2].is_empty());
        assert_eq!(inboxes[3].len(), 1);
        assert_eq!(t.pending(), 0);
    }

    #[test]
    fn addressed_messages_reach_everyone_in_range() {
        let fleet = line(&[0.0, 10.0, 20.0], 100.0);
        let mut inboxes = vec![Vec::new(); 3];
        let mut t = Transport::new();
        t.queue(msg(0, Some(1), Payload::Link { task: TaskId(0) }));
        t.deliver(&fleet, &mut inboxes);
        assert_eq!(inboxes[1].len(), 1);
        assert_eq!(inboxes[2].len(), 1);
        assert!(inboxes[1][0].is_for(PlaneId(1)));
        assert!(!inboxes[2][0].is_for(PlaneId(2)));
    }

    #[test]
    fn lost_transfer_bounces_and_other_mail_drops() {
        let fleet = line(&[0.0, 500.0], 100.0);
        let mut inboxes = vec![Vec::new(); 2];
        let mut t = Transport::new();
        t.queue(msg(0, Some(1), Payload::Unlink { task: TaskId(2) }));
        t.queue(msg(0, Some(1), Payload::TaskTransfer { task: TaskId(2) }));
        let d = t.deliver(&fleet, &mut inboxes);
        assert_eq!(d, Delivery { delivered: 0, bounced: 1, dropped: 1 });
        assert_eq!(inboxes[0], vec![msg(0, Some(0), Payload::TaskTransfer { task: TaskId(2) })]);
    }

    #[test]
    fn inbox_keeps_queue_order() {
        let fleet = line(&[0.0, 10.0, 20.0], 100.0);
        let mut inboxes = vec![Vec::new(); 3];
        let mut t = Transport::new();
        t.queue(msg(2, None, Payload::Link { task: TaskId(1) }));
        t.queue(msg(0, None, Payload::Link { task: TaskId(2) }));
        t.queue(msg(2, None, Payload::Link { task: TaskId(3) }));
        t.deliver(&fleet, &mut inboxes);
        let order: Vec<u32> = inboxes[1]
            .iter()
            .filter_map(|m| match m.payload {
                Payload::Link { task } => Some(task.0),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion_tests {
    use super::*;
    use crate::{Stationary, StraightLine};

    #[test]
    fn straight_line_heads_for_nearest_task() {
        let (mut fleet, tasks) = FleetBuilder::new()
            .plane(PlaneSpec::new(Point::new(0.0, 0.0), 2.0, 100.0))
            .plane(PlaneSpec::new(Point::new(9.0, 9.0), 2.0, 100.0))
            .task(Point::new(-10.0, 0.0), Some(PlaneId(0)))
            .task(Point::new(4.0, 0.0), Some(PlaneId(0)))
            .build()
            .unwrap();
        let mut m = StraightLine;

        assert!(m.advance(Step(0), &mut fleet, &tasks).is_empty());
        assert_eq!(fleet.location[0], Point::new(2.0, 0.0));
        assert_eq!(fleet.location[1], Point::new(9.0, 9.0));

        let done = m.advance(Step(1), &mut fleet, &tasks);
        assert_eq!(done, vec![(PlaneId(0), TaskId(1))]);
        assert_eq!(fleet.location[0], Point::new(4.0, 0.0));
    }

    #[test]
    fn stationary_never_moves() {
        let (mut fleet, tasks) = FleetBuilder::new()
            .plane(plane(1.0, 1.0))
            .task(Point::new(1.0, 1.0), Some(PlaneId(0)))
            .build()
            .unwrap();
        assert!(Stationary.advance(Step(0), &mut fleet, &tasks).is_empty());
        assert_eq!(fleet.location[0], Point::new(1.0, 1.0));
    }
}

// ── Allocation scenarios ──────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;
    use crate::{Stationary, StraightLine};

    #[test]
    fn equidistant_task_stays_with_owner() {
        for owner in [0, 1] {
            let mut sim = planning_sim(
                FleetBuilder::new()
                    .plane(plane(0.0, 0.0))
                    .plane(plane(100.0, 0.0))
                    .task(Point::new(50.0, 0.0), Some(PlaneId(owner))),
                &MaxSumConfig::default(),
                Stationary,
            );
            let mut rec = Recorder::default();
            sim.run_steps(40, &mut rec).unwrap();

            assert_eq!(rec.handoffs(), 0);
            assert_eq!(sim.tasks.servant[0], Some(PlaneId(owner)));
            assert_eq!(sim.fleet.load(PlaneId(owner)), 1);
            assert_eq!(sim.fleet.load(PlaneId(1 - owner)), 0);
            assert_eq!(maxsum(&sim, owner).decision(TaskId(0)), Some(PlaneId(owner)));
        }
    }

    #[test]
    fn idle_plane_in_range_takes_the_far_task() {
        let (near, far) = (TaskId(0), TaskId(1));
        let cfg = MaxSumConfig { cadence: 10, ..MaxSumConfig::default() };
        let mut sim = planning_sim(
            FleetBuilder::new()
                .plane(plane(0.0, 0.0))
                .plane(plane(2000.0, 0.0))
                .task(Point::new(10.0, 0.0), Some(PlaneId(0)))
                .task(Point::new(100.0, 0.0), Some(PlaneId(0))),
            &cfg,
            Teleport { plane: PlaneId(1), at: Step(5), to: Point::new(95.0, 0.0) },
        );
        let mut rec = Recorder::default();

        // First round settles with plane 1 still out of range.
        sim.run_steps(10, &mut rec).unwrap();
        assert_eq!(rec.handoffs(), 0);
        assert_eq!(sim.tasks.servant, vec![Some(PlaneId(0)), Some(PlaneId(0))]);

        sim.run_steps(50, &mut rec).unwrap();
        assert_eq!(rec.handoffs(), 1);
        assert_eq!(sim.tasks.servant, vec![Some(PlaneId(0)), Some(PlaneId(1))]);
        assert!(rec.events.contains(&(Step(25), TaskEvent::Removed { task: far, plane: PlaneId(0) })));
        assert!(rec.events.contains(&(Step(26), TaskEvent::Added { task: far, plane: PlaneId(1) })));

        // The new owner has renegotiated with plane 0 in range and stays.
        assert!(matches!(maxsum(&sim, 1).round(far), Some(RoundState::Settled { .. })));
        assert_eq!(maxsum(&sim, 1).decision(far), Some(PlaneId(1)));
        assert_eq!(maxsum(&sim, 0).decision(near), Some(PlaneId(0)));
        assert_eq!(maxsum(&sim, 0).round(far), None);
        assert_eq!(maxsum(&sim, 1).preferred_task(), Some(far));
    }

    #[test]
    fn proxies_pair_up_and_tear_down_on_completion() {
        let task = TaskId(0);
        let mut sim = planning_sim(
            FleetBuilder::new()
                .plane(plane(-5.5, 0.0))
                .plane(plane(0.0, 40.0))
                .plane(plane(0.0, -40.0))
                .task(Point::new(0.0, 0.0), Some(PlaneId(0))),
            &MaxSumConfig::default(),
            StraightLine,
        );

        sim.run_steps(3, &mut NoopObserver).unwrap();
        let owner = maxsum(&sim, 0).graph().unwrap();
        assert_eq!(owner.selector(task).unwrap().candidates().count(), 3);
        assert_eq!(owner.proxy_count(), 2);
        for p in 1..3 {
            let g = maxsum(&sim, p).graph().unwrap();
            assert_eq!(g.proxy_count(), 1);
            assert_eq!(g.variable().unwrap().tasks().collect::<Vec<_>>(), vec![task]);
        }
        for p in 0..3 {
            maxsum(&sim, p).graph().unwrap().check_wiring().unwrap();
        }

        // Owner arrives at step 5; candidates hear the unlink at step 6.
        let mut rec = Recorder::default();
        sim.run_steps(4, &mut rec).unwrap();
        assert!(sim.tasks.completed[0]);
        assert!(rec.events.contains(&(Step(5), TaskEvent::Completed { task, plane: PlaneId(0) })));
        for p in 0..3 {
            let g = maxsum(&sim, p).graph().unwrap();
            assert_eq!(g.proxy_count(), 0);
            assert!(!g.has_links());
            g.check_wiring().unwrap();
        }
    }
}
