//! Integration tests for pl-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AssignmentRow, StepSummaryRow, TaskEventRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(dir: &TempDir, file: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("assignments.csv").exists());
        assert!(dir.path().join("task_events.csv").exists());
        assert!(dir.path().join("step_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir, "assignments.csv"), ["step", "task", "servant", "completed"]);
        assert_eq!(headers(&dir, "task_events.csv"), ["step", "task", "plane", "event"]);
        assert_eq!(
            headers(&dir, "step_summaries.csv"),
            ["step", "elapsed_secs", "delivered", "bounced", "handoffs", "completed"]
        );
    }

    #[test]
    fn in_flight_task_has_empty_servant() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = [
            AssignmentRow { step: 7, task: 0, servant: Some(3), completed: false },
            AssignmentRow { step: 7, task: 1, servant: None, completed: false },
            AssignmentRow { step: 7, task: 2, servant: Some(1), completed: true },
        ];
        w.write_assignments(&rows).unwrap();
        w.finish().unwrap();

        let read = records(&dir, "assignments.csv");
        assert_eq!(read.len(), 3);
        assert_eq!(&read[0][2], "3");
        assert_eq!(&read[1][2], "");
        assert_eq!(&read[1][3], "0");
        assert_eq!(&read[2][3], "1");
    }

    #[test]
    fn events_and_summaries_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_task_event(&TaskEventRow { step: 4, task: 2, plane: 1, event: "removed" }).unwrap();
        w.write_step_summary(&StepSummaryRow {
            step: 4, elapsed_secs: 20, delivered: 9, bounced: 1, handoffs: 1, completed: 0,
        })
        .unwrap();
        w.finish().unwrap();

        let events = records(&dir, "task_events.csv");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].iter().collect::<Vec<_>>(), ["4", "2", "1", "removed"]);

        let summaries = records(&dir, "step_summaries.csv");
        assert_eq!(summaries[0].iter().collect::<Vec<_>>(), ["4", "20", "9", "1", "1", "0"]);
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("nope"));
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use pl_core::{PlaneId, Point, SimConfig, Step, TaskId};
    use pl_fleet::{FleetBuilder, PlaneSpec};
    use pl_maxsum::MaxSumConfig;
    use pl_sim::{SimBuilder, SimObserver, StepStats, StraightLine, TaskEvent, planning_stack};
    use tempfile::TempDir;

    use crate::row::{AssignmentRow, StepSummaryRow, TaskEventRow};
    use crate::writer::OutputWriter;
    use crate::{CsvWriter, OutputError, OutputResult, SimOutputObserver};

    /// Keeps rows in memory and can be told to fail.
    #[derive(Default)]
    struct MemWriter {
        assignments: Vec<AssignmentRow>,
        events:      Vec<TaskEventRow>,
        summaries:   Vec<StepSummaryRow>,
        finished:    usize,
        fail:        bool,
    }

    impl MemWriter {
        fn check(&self) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            Ok(())
        }
    }

    impl OutputWriter for MemWriter {
        fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()> {
            self.check()?;
            self.assignments.extend_from_slice(rows);
            Ok(())
        }
        fn write_task_event(&mut self, row: &TaskEventRow) -> OutputResult<()> {
            self.check()?;
            self.events.push(*row);
            Ok(())
        }
        fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
            self.check()?;
            self.summaries.push(*row);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn config(step_duration_secs: u32) -> SimConfig {
        SimConfig { step_duration_secs, total_steps: 6, seed: 0, output_interval_steps: 2 }
    }

    #[test]
    fn step_end_writes_summary_with_elapsed_time() {
        let mut obs = SimOutputObserver::new(MemWriter::default(), &config(30));
        let stats = StepStats { delivered: 5, bounced: 1, dropped: 2, handoffs: 1, completed: 0 };
        obs.on_step_end(Step(3), &stats);

        let w = obs.into_writer();
        assert_eq!(
            w.summaries,
            [StepSummaryRow { step: 3, elapsed_secs: 90, delivered: 5, bounced: 1, handoffs: 1, completed: 0 }]
        );
    }

    #[test]
    fn task_events_are_named() {
        let mut obs = SimOutputObserver::new(MemWriter::default(), &config(1));
        obs.on_task_event(Step(1), TaskEvent::Removed { task: TaskId(4), plane: PlaneId(0) });
        obs.on_task_event(Step(2), TaskEvent::Added { task: TaskId(4), plane: PlaneId(1) });
        obs.on_task_event(Step(9), TaskEvent::Completed { task: TaskId(4), plane: PlaneId(1) });

        let names: Vec<_> = obs.into_writer().events.iter().map(|e| (e.step, e.plane, e.event)).collect();
        assert_eq!(names, [(1, 0, "removed"), (2, 1, "added"), (9, 1, "completed")]);
    }

    #[test]
    fn first_error_is_kept() {
        let writer = MemWriter { fail: true, ..MemWriter::default() };
        let mut obs = SimOutputObserver::new(writer, &config(1));
        obs.on_step_end(Step(0), &StepStats::default());
        obs.on_step_end(Step(1), &StepStats::default());

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    /// One plane three metres from its task, one far-away bystander.
    fn run_to_completion<W: OutputWriter>(writer: W) -> SimOutputObserver<W> {
        let (fleet, tasks) = FleetBuilder::new()
            .plane(PlaneSpec::new(Point::new(0.0, 0.0), 1.0, 100.0))
            .plane(PlaneSpec::new(Point::new(5000.0, 0.0), 1.0, 100.0))
            .task(Point::new(3.0, 0.0), Some(PlaneId(0)))
            .build()
            .unwrap();
        let cfg = MaxSumConfig::default();
        let stacks = (0..fleet.count).map(|_| planning_stack(&cfg).unwrap()).collect();
        let mut sim = SimBuilder::new(config(1), fleet, tasks, stacks).motion(StraightLine).build().unwrap();

        let mut obs = SimOutputObserver::new(writer, &config(1));
        sim.run(&mut obs).unwrap();
        obs
    }

    #[test]
    fn full_run_into_memory() {
        let mut obs = run_to_completion(MemWriter::default());
        assert!(obs.take_error().is_none());
        let w = obs.into_writer();

        // Snapshots at steps 0, 2 and 4, one task each.
        let steps: Vec<_> = w.assignments.iter().map(|r| r.step).collect();
        assert_eq!(steps, [0, 2, 4]);
        assert!(w.assignments.iter().all(|r| r.servant == Some(0)));
        assert!(!w.assignments[0].completed);
        assert!(w.assignments[1].completed);

        let events: Vec<_> = w.events.iter().map(|e| (e.step, e.event)).collect();
        assert_eq!(events, [(0, "added"), (2, "completed")]);

        assert_eq!(w.summaries.len(), 6);
        assert_eq!(w.summaries.iter().map(|s| s.completed).sum::<u64>(), 1);
        assert_eq!(w.summaries.iter().map(|s| s.handoffs).sum::<u64>(), 0);
        assert_eq!(w.finished, 1);
    }

    #[test]
    fn full_run_to_csv() {
        let dir: TempDir = tempfile::tempdir().expect("create temp dir");
        let mut obs = run_to_completion(CsvWriter::new(dir.path()).unwrap());
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);

        let mut rdr = csv::Reader::from_path(dir.path().join("assignments.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].iter().collect::<Vec<_>>(), ["4", "0", "0", "1"]);
    }
}
