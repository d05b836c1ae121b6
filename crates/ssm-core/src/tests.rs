//! Unit tests for ssm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{GearId, SpeciesId};

    #[test]
    fn index_roundtrip() {
        let id = SpeciesId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(SpeciesId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn out_of_range_index_rejected() {
        assert!(GearId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(SpeciesId(7).to_string(), "SpeciesId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::{ProjectionClock, ProjectionConfig, Step};

    #[test]
    fn step_arithmetic() {
        let s = Step(10);
        assert_eq!(s + 5, Step(15));
        assert_eq!(s.offset(3), Step(13));
        assert_eq!(Step(15) - Step(10), 5u64);
    }

    #[test]
    fn clock_maps_steps_to_time_labels() {
        let mut clock = ProjectionClock::new(1350, 1.0);
        assert_eq!(clock.current_time(), 1350);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_time(), 1352);
        assert_eq!(clock.time_of(Step(750)), 2100);
    }

    #[test]
    fn clock_elapsed_uses_dt() {
        let mut clock = ProjectionClock::new(0, 0.5);
        for _ in 0..4 {
            clock.advance();
        }
        assert!((clock.elapsed() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn time_label_is_a_step_index_independent_of_dt() {
        let mut fine = ProjectionClock::new(1, 0.1);
        let mut yearly = ProjectionClock::new(1, 1.0);
        for _ in 0..10 {
            fine.advance();
            yearly.advance();
        }
        // One label (and one forcing row) per step for both.
        assert_eq!(fine.current_time(), 11);
        assert_eq!(yearly.current_time(), 11);
        assert!((fine.elapsed() - 1.0).abs() < 1e-12);
        assert!((yearly.elapsed() - 10.0).abs() < 1e-12);
        assert_eq!(yearly.current_time(), yearly.first_time + yearly.elapsed() as i64);
    }

    #[test]
    fn config_end_and_last_forced_time() {
        let cfg = ProjectionConfig {
            first_time:            1350,
            total_steps:           751,
            dt:                    1.0,
            output_interval_steps: 10,
        };
        assert_eq!(cfg.end_step(), Step(751));
        assert_eq!(cfg.last_forced_time(), 2100);
    }

    #[test]
    fn snapshot_interval() {
        let cfg = ProjectionConfig { output_interval_steps: 5, ..ProjectionConfig::default() };
        assert!(cfg.is_snapshot(Step(0)));
        assert!(!cfg.is_snapshot(Step(3)));
        assert!(cfg.is_snapshot(Step(10)));

        let off = ProjectionConfig { output_interval_steps: 0, ..ProjectionConfig::default() };
        assert!(!off.is_snapshot(Step(0)));
    }
}

#[cfg(test)]
mod grid {
    use crate::SizeGrid;

    #[test]
    fn consumer_bins_are_log_spaced() {
        let g = SizeGrid::new(0.001, 1000.0, 7, 0.001).unwrap();
        assert_eq!(g.len(), 7);
        assert!((g.w[0] - 0.001).abs() < 1e-12);
        assert!((g.w[6] - 1000.0).abs() < 1e-6);
        assert!((g.log_step - 1.0).abs() < 1e-12);
        for i in 1..g.len() {
            assert!((g.w[i] / g.w[i - 1] - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn widths_match_spacing() {
        let g = SizeGrid::new(0.01, 100.0, 5, 0.01).unwrap();
        for i in 0..g.len() - 1 {
            // dw[i] is the distance to the next bin.
            assert!((g.dw[i] - (g.w[i + 1] - g.w[i])).abs() < 1e-9 * g.w[i + 1]);
        }
    }

    #[test]
    fn resource_bins_extend_below_consumers() {
        let g = SizeGrid::new(0.001, 10.0, 5, 1e-6).unwrap();
        assert_eq!(g.offset, 3);
        assert_eq!(g.len_full(), 8);
        for i in 0..g.len() {
            assert!((g.w_full[g.offset + i] - g.w[i]).abs() < 1e-12 * g.w[i].max(1.0));
        }
        assert!(g.w_full[0] <= 1e-6 * 1.000_001);
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(SizeGrid::new(1.0, 0.5, 10, 0.1).is_err());
        assert!(SizeGrid::new(0.0, 10.0, 10, 0.0).is_err());
        assert!(SizeGrid::new(0.1, 10.0, 1, 0.1).is_err());
        assert!(SizeGrid::new(0.1, 10.0, 10, 1.0).is_err());
    }

    #[test]
    fn bin_lookups() {
        let g = SizeGrid::new(1.0, 1000.0, 4, 1.0).unwrap(); // 1, 10, 100, 1000
        assert_eq!(g.last_bin_below(50.0), Some(1));
        assert_eq!(g.last_bin_below(1.0), None);
        assert_eq!(g.bin_of(1.0), Some(0));
        assert_eq!(g.bin_of(100.0), Some(2));
        assert_eq!(g.bin_of(0.5), None);
    }
}
