//! Unit tests for pl-fleet.

#[cfg(test)]
mod builder {
    use pl_core::{PlError, PlaneId, Point, TaskId};

    use crate::{FleetBuilder, PlaneSpec};

    fn spec(x: f64) -> PlaneSpec {
        PlaneSpec::new(Point::new(x, 0.0), 5.0, 100.0)
    }

    #[test]
    fn ids_follow_insertion_order() {
        let (fleet, tasks) = FleetBuilder::new()
            .plane(spec(0.0))
            .plane(spec(10.0))
            .task(Point::new(1.0, 1.0), Some(PlaneId(1)))
            .task(Point::new(2.0, 2.0), None)
            .build()
            .unwrap();

        assert_eq!(fleet.plane_ids().collect::<Vec<_>>(), vec![PlaneId(0), PlaneId(1)]);
        assert_eq!(fleet.location[1], Point::new(10.0, 0.0));
        assert!(fleet.owned[1].contains(&TaskId(0)));
        assert_eq!(fleet.load(PlaneId(0)), 0);
        assert_eq!(tasks.servant, vec![Some(PlaneId(1)), None]);
        assert_eq!(tasks.open_count(), 1);
    }

    #[test]
    fn unknown_owner_rejected() {
        let err = FleetBuilder::new()
            .plane(spec(0.0))
            .task(Point::default(), Some(PlaneId(3)))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, PlError::PlaneNotFound(PlaneId(3))));
    }

    #[test]
    fn invalid_range_rejected() {
        let bad = PlaneSpec::new(Point::default(), 1.0, 0.0);
        assert!(FleetBuilder::new().plane(bad).build().is_err());
        let bad = PlaneSpec::new(Point::default(), f64::NAN, 10.0);
        assert!(FleetBuilder::new().plane(bad).build().is_err());
    }

    #[test]
    fn empty_build() {
        let (fleet, tasks) = FleetBuilder::new().build().unwrap();
        assert!(fleet.is_empty());
        assert!(tasks.is_empty());
    }
}

#[cfg(test)]
mod stores {
    use pl_core::{PlaneId, Point, TaskId};

    use crate::{FleetBuilder, PlaneSpec};

    #[test]
    fn bounds_checks() {
        let (fleet, tasks) = FleetBuilder::new()
            .plane(PlaneSpec::new(Point::default(), 1.0, 1.0))
            .task(Point::default(), None)
            .build()
            .unwrap();
        assert!(fleet.check(PlaneId(0)).is_ok());
        assert!(fleet.check(PlaneId(1)).is_err());
        assert!(tasks.check(TaskId(0)).is_ok());
        assert!(tasks.check(TaskId::INVALID).is_err());
    }
}
