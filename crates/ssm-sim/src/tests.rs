//! Integration tests for ssm-sim.

use std::sync::Arc;

use ndarray::{Array1, Array2};

use ssm_core::{ProjectionConfig, SizeGrid, SpeciesId, Step};
use ssm_forcing::{EffortSchedule, ForcingSeries};
use ssm_rates::{Community, EncounterRate, GrowthEnergy, RateContext, RateError, RateResult, ResourceDynamics};
use ssm_species::{SpeciesParams, SpeciesSetBuilder};

use crate::{
    NoopObserver, Projection, ProjectionBuilder, ProjectionObserver, Recorder, SimError, SimulationState,
    StepRates,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const STEPS: u64 = 20;

fn community() -> Arc<Community> {
    let (species, theta) = SpeciesSetBuilder::new()
        .species(SpeciesParams::new("small", 100.0, 10.0, 10.0, 30.0))
        .species(SpeciesParams::new("large", 10_000.0, 1_000.0, 5.0, 25.0))
        .build()
        .unwrap();
    let grid = SizeGrid::new(0.001, 10_000.0, 30, 1e-8).unwrap();
    Arc::new(Community::new(species, theta, grid).unwrap())
}

fn projection(total_steps: u64) -> ProjectionConfig {
    ProjectionConfig { first_time: 1, total_steps, dt: 0.1, output_interval_steps: 5 }
}

fn initial_abundance(c: &Community) -> Array2<f64> {
    Array2::from_shape_fn(c.shape(), |(i, j)| {
        let w = c.grid().w[j];
        if w <= c.species().get(SpeciesId(i as u16)).w_max { 1e10 * w.powf(-2.05) } else { 0.0 }
    })
}

fn resource_row(c: &Community) -> Vec<f64> {
    c.grid().w_full.iter().map(|w| 1e11 * w.powf(-2.05)).collect()
}

fn plankton(c: &Community, rows: usize) -> Arc<ForcingSeries> {
    Arc::new(ForcingSeries::constant("plankton", rows, &resource_row(c)).unwrap())
}

fn temperature(rows: usize, temps: [f64; 2]) -> Arc<ForcingSeries> {
    Arc::new(ForcingSeries::constant("temperature", rows, &temps).unwrap())
}

fn optimum(c: &Community) -> [f64; 2] {
    [c.species().thermal(SpeciesId(0)).optimum(), c.species().thermal(SpeciesId(1)).optimum()]
}

fn forced(c: &Arc<Community>, temps: [f64; 2]) -> ProjectionBuilder {
    ProjectionBuilder::new(c.clone(), projection(STEPS))
        .thermal()
        .temperature_forcing(temperature(STEPS as usize, temps))
        .plankton_forcing(plankton(c, STEPS as usize))
        .initial_abundance(initial_abundance(c))
}

/// Keeps every step's rates and resulting abundance.
#[derive(Default)]
struct StepLog {
    rates:     Vec<StepRates>,
    abundance: Vec<Array2<f64>>,
    resource:  Vec<Array1<f64>>,
    started:   Vec<(Step, i64)>,
    ended:     bool,
}

impl ProjectionObserver for StepLog {
    fn on_step_start(&mut self, step: Step, time: i64) {
        self.started.push((step, time));
    }

    fn on_step_end(&mut self, _step: Step, state: &SimulationState, rates: &StepRates) {
        self.rates.push(rates.clone());
        self.abundance.push(state.abundance.clone());
        self.resource.push(state.resource.clone());
    }

    fn on_projection_end(&mut self, _final_state: &SimulationState) {
        self.ended = true;
    }
}

struct NanEnergy;

impl GrowthEnergy for NanEnergy {
    fn name(&self) -> &'static str {
        "nan energy"
    }

    fn net_energy(&self, ctx: &RateContext<'_>, _e: &Array2<f64>, _f: &Array2<f64>) -> RateResult<Array2<f64>> {
        Ok(Array2::from_elem(ctx.community.shape(), f64::NAN))
    }
}

struct NegativeResource;

impl ResourceDynamics for NegativeResource {
    fn name(&self) -> &'static str {
        "negative resource"
    }

    fn next_resource(&self, ctx: &RateContext<'_>, _m: &Array1<f64>) -> RateResult<Array1<f64>> {
        Ok(ctx.resource.mapv(|r| -r - 1.0))
    }

    fn initial_resource(&self, community: &Community) -> RateResult<Array1<f64>> {
        Ok(Array1::ones(community.grid().len_full()))
    }
}

/// Returns a single row whatever the species count.
struct OneRowEncounter;

impl EncounterRate for OneRowEncounter {
    fn name(&self) -> &'static str {
        "one-row encounter"
    }

    fn encounter(&self, ctx: &RateContext<'_>) -> RateResult<Array2<f64>> {
        Ok(Array2::ones((1, ctx.community.grid().len())))
    }
}

struct OneRowEnergy;

impl GrowthEnergy for OneRowEnergy {
    fn name(&self) -> &'static str {
        "one-row energy"
    }

    fn net_energy(&self, ctx: &RateContext<'_>, _e: &Array2<f64>, _f: &Array2<f64>) -> RateResult<Array2<f64>> {
        Ok(Array2::zeros((1, ctx.community.grid().len())))
    }
}

/// Drops the largest resource bin on every step.
struct ShortResource;

impl ResourceDynamics for ShortResource {
    fn name(&self) -> &'static str {
        "short resource"
    }

    fn next_resource(&self, ctx: &RateContext<'_>, _m: &Array1<f64>) -> RateResult<Array1<f64>> {
        let n = ctx.resource.len() - 1;
        Ok(ctx.resource.slice(ndarray::s![..n]).to_owned())
    }

    fn initial_resource(&self, community: &Community) -> RateResult<Array1<f64>> {
        Ok(Array1::from(resource_row(community)))
    }
}

// ── ProjectionBuilder validation ──────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use ssm_forcing::{ForcingError, TimeIndexOffset};

    use super::*;

    #[test]
    fn builds_forced_configuration() {
        let c = community();
        let config = forced(&c, optimum(&c)).label("forced").build().unwrap();
        assert_eq!(config.label, "forced");
        assert_eq!(config.t_idx, TimeIndexOffset(0));
        assert!(config.rates.needs_temperature());
        // Forced resource starts from the first plankton row.
        assert_eq!(config.initial_resource.to_vec(), resource_row(&c));
    }

    #[test]
    fn builds_unforced_with_defaults() {
        let c = community();
        let config = ProjectionBuilder::new(c.clone(), projection(5))
            .initial_abundance(initial_abundance(&c))
            .build()
            .unwrap();
        assert!(!config.rates.needs_temperature());
        assert!(config.effort.is_none());
        assert_eq!(config.initial_resource.len(), c.grid().len_full());
    }

    #[test]
    fn initial_abundance_required() {
        let c = community();
        let err = ProjectionBuilder::new(c, projection(5)).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn initial_abundance_shape_checked() {
        let c = community();
        let err = ProjectionBuilder::new(c, projection(5))
            .initial_abundance(Array2::zeros((3, 30)))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::DimensionMismatch { what: "initial abundance", .. }));
    }

    #[test]
    fn thermal_without_temperature_errors() {
        let c = community();
        let err = ProjectionBuilder::new(c.clone(), projection(5))
            .thermal()
            .initial_abundance(initial_abundance(&c))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::MissingForcing { forcing: "temperature", .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn short_temperature_table_errors() {
        let c = community();
        let err = forced(&c, optimum(&c))
            .temperature_forcing(temperature(STEPS as usize - 1, optimum(&c)))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Forcing(ForcingError::HorizonOutOfRange { .. })));
        assert!(err.is_configuration());
    }

    #[test]
    fn short_plankton_table_errors() {
        let c = community();
        let err = forced(&c, optimum(&c)).plankton_forcing(plankton(&c, 3)).build().unwrap_err();
        assert!(matches!(err, SimError::Rate(RateError::Forcing(ForcingError::HorizonOutOfRange { .. }))));
    }

    #[test]
    fn temperature_column_count_checked() {
        let c = community();
        let three = Arc::new(ForcingSeries::constant("temperature", STEPS as usize, &[20.0; 3]).unwrap());
        let err = forced(&c, optimum(&c)).temperature_forcing(three).build().unwrap_err();
        assert!(matches!(err, SimError::Forcing(ForcingError::Shape { expected: 2, got: 3, .. })));
    }

    #[test]
    fn unknown_gear_errors() {
        let c = community();
        let effort = Arc::new(EffortSchedule::zero(&["Purse seine"], STEPS as usize).unwrap());
        let err = forced(&c, optimum(&c)).effort(effort).build().unwrap_err();
        assert!(matches!(err, SimError::UnknownGear { ref gear, .. } if gear == "Longline"));
    }

    #[test]
    fn short_effort_schedule_errors() {
        let c = community();
        let effort = Arc::new(EffortSchedule::zero(&["Longline"], 2).unwrap());
        assert!(forced(&c, optimum(&c)).effort(effort).build().is_err());
    }

    #[test]
    fn spin_up_axis_from_1350_covers_751_steps() {
        let c = community();
        let real = ForcingSeries::constant("temperature", 151, &optimum(&c)).unwrap();
        let temps = Arc::new(real.with_spin_up(600));
        let base = ProjectionConfig { first_time: 1350, total_steps: 751, dt: 1.0, output_interval_steps: 0 };
        let build = |steps| {
            ProjectionBuilder::new(c.clone(), ProjectionConfig { total_steps: steps, ..base.clone() })
                .thermal()
                .temperature_forcing(temps.clone())
                .initial_abundance(initial_abundance(&c))
                .build()
        };
        let config = build(751).unwrap();
        assert_eq!(config.t_idx, TimeIndexOffset(-1349));
        assert!(build(752).is_err());
    }
}

// ── Projection behaviour ──────────────────────────────────────────────────────

#[cfg(test)]
mod projection_tests {
    use super::*;

    #[test]
    fn optimum_temperature_without_fishing_never_starves() {
        let c = community();
        let effort = Arc::new(EffortSchedule::zero(&["Longline"], STEPS as usize).unwrap());
        let config = forced(&c, optimum(&c)).effort(effort).build().unwrap();
        let mut log = StepLog::default();
        Projection::new(config).run(&mut log).unwrap();

        assert_eq!(log.rates.len(), STEPS as usize);
        for (k, rates) in log.rates.iter().enumerate() {
            assert!(rates.fishing_mortality.iter().all(|&f| f == 0.0), "step {k}: fishing");
            assert!(rates.starvation.iter().all(|&s| s == 0.0), "step {k}: starvation");
            assert!(rates.net_energy.iter().all(|&e| e >= 0.0), "step {k}: energy deficit");
            assert!(rates.growth.iter().all(|&g| g >= 0.0));
        }
    }

    #[test]
    fn out_of_band_temperature_only_removes_fish() {
        let c = community();
        let config = forced(&c, [40.0, 40.0]).build().unwrap();
        let mut log = StepLog::default();
        let mut projection = Projection::new(config);
        let mut previous = projection.state().abundance.clone();
        projection.run(&mut log).unwrap();

        for (k, (rates, n)) in log.rates.iter().zip(&log.abundance).enumerate() {
            assert!(rates.encounter.iter().all(|&e| e == 0.0), "step {k}");
            assert!(rates.net_energy.iter().all(|&e| e == 0.0), "step {k}");
            assert!(rates.rdd.iter().all(|&r| r == 0.0), "step {k}");
            for (now, before) in n.iter().zip(previous.iter()) {
                assert!(now <= before, "step {k}: {now} > {before}");
            }
            previous = n.clone();
        }
        assert!(log.ended);
    }

    #[test]
    fn forced_resource_follows_table_not_state() {
        let c = community();
        let rows = STEPS as usize;
        let values = Array2::from_shape_fn((rows, c.grid().len_full()), |(i, k)| {
            (1.0 + i as f64) * 1e11 * c.grid().w_full[k].powf(-2.05)
        });
        let table = Arc::new(ForcingSeries::new("plankton", values).unwrap());

        let run = |initial: Array1<f64>| {
            let config = forced(&c, optimum(&c))
                .plankton_forcing(table.clone())
                .initial_resource(initial)
                .build()
                .unwrap();
            let mut log = StepLog::default();
            Projection::new(config).run_steps(3, &mut log).unwrap();
            log.resource
        };
        let a = run(Array1::from(resource_row(&c)));
        let b = run(Array1::from(resource_row(&c)).mapv(|v| v * 0.01));
        assert_eq!(a, b);
        for (k, r) in a.iter().enumerate() {
            assert_eq!(r, &table.values().row(k));
        }
    }

    #[test]
    fn fishing_follows_selectivity_and_effort() {
        let c = community();
        let effort = Arc::new(EffortSchedule::constant(&["Longline"], STEPS as usize, 0.5).unwrap());
        let config = forced(&c, optimum(&c)).effort(effort).build().unwrap();
        let mut projection = Projection::new(config);
        let rates = projection.step().unwrap();
        let expected = c.selectivity().mapv(|s| s * 0.5);
        assert_eq!(rates.fishing_mortality, expected);
        assert_eq!(projection.state().fishing_mortality, expected);
        // Knife edge at w_mat: nothing below maturity is fished.
        let w_mat = c.species().get(SpeciesId(0)).w_mat;
        for (j, &w) in c.grid().w.iter().enumerate() {
            if w < w_mat {
                assert_eq!(rates.fishing_mortality[[0, j]], 0.0);
            }
        }
    }

    #[test]
    fn unforced_projection_stays_non_negative() {
        let c = community();
        let config = ProjectionBuilder::new(c.clone(), projection(STEPS))
            .initial_abundance(initial_abundance(&c))
            .build()
            .unwrap();
        let mut projection = Projection::new(config);
        projection.run(&mut NoopObserver).unwrap();
        let state = projection.state();
        assert_eq!(state.step, Step(STEPS));
        assert_eq!(state.time, 1 + STEPS as i64);
        assert!(state.abundance.iter().all(|&n| n >= 0.0 && n.is_finite()));
        assert!(state.biomass(&c).iter().all(|&b| b > 0.0));
    }

    #[test]
    fn step_times_follow_first_time() {
        let c = community();
        let mut log = StepLog::default();
        Projection::new(forced(&c, optimum(&c)).build().unwrap()).run_steps(3, &mut log).unwrap();
        assert_eq!(log.started, vec![(Step(0), 1), (Step(1), 2), (Step(2), 3)]);
        assert!(!log.ended);
    }

    #[test]
    fn recorder_keeps_snapshots_at_interval() {
        let c = community();
        let mut recorder = Recorder::new();
        Projection::new(forced(&c, optimum(&c)).build().unwrap()).run(&mut recorder).unwrap();
        let trajectory = recorder.into_trajectory();
        assert_eq!(trajectory.steps, vec![Step(0), Step(5), Step(10), Step(15), Step(20)]);
        assert_eq!(trajectory.times, vec![1, 6, 11, 16, 21]);
        assert_eq!(trajectory.biomass(&c).dim(), (5, 2));
    }

    #[test]
    fn nan_energy_aborts_before_state_changes() {
        let c = community();
        let config = forced(&c, optimum(&c)).energy(Arc::new(NanEnergy)).build().unwrap();
        let mut projection = Projection::new(config);
        let err = projection.step().unwrap_err();
        assert!(matches!(err, SimError::Numerical { step: Step(0), bin: 0, .. }));
        assert!(!err.is_configuration());
        assert_eq!(projection.state().step, Step(0));
    }

    #[test]
    fn negative_resource_is_a_numerical_failure() {
        let c = community();
        let config = ProjectionBuilder::new(c.clone(), projection(5))
            .resource(Arc::new(NegativeResource))
            .initial_abundance(initial_abundance(&c))
            .build()
            .unwrap();
        let err = Projection::new(config).run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Numerical { ref what, .. } if what == "resource"));
    }

    #[test]
    fn wrong_shape_energy_is_a_rate_error() {
        let c = community();
        let config = forced(&c, optimum(&c)).energy(Arc::new(OneRowEnergy)).build().unwrap();
        let mut projection = Projection::new(config);
        let err = projection.step().unwrap_err();
        assert!(matches!(
            err,
            SimError::Rate(RateError::Shape { what: "net energy", got: (1, _), .. })
        ));
        assert_eq!(projection.state().step, Step(0));
    }

    #[test]
    fn wrong_shape_encounter_is_a_rate_error() {
        let c = community();
        let config = forced(&c, optimum(&c)).encounter(Arc::new(OneRowEncounter)).build().unwrap();
        let err = Projection::new(config).step().unwrap_err();
        assert!(matches!(err, SimError::Rate(RateError::Shape { what: "encounter", .. })));
    }

    #[test]
    fn short_resource_is_rejected_before_commit() {
        let c = community();
        let config = ProjectionBuilder::new(c.clone(), projection(5))
            .resource(Arc::new(ShortResource))
            .initial_abundance(initial_abundance(&c))
            .build()
            .unwrap();
        let mut projection = Projection::new(config);
        let before = projection.state().clone();
        let err = projection.step().unwrap_err();
        assert!(matches!(err, SimError::Rate(RateError::Shape { what: "next resource", .. })));
        assert_eq!(projection.state(), &before);
    }

    #[test]
    fn wrong_shape_run_does_not_stop_the_batch() {
        let c = community();
        let bad = forced(&c, optimum(&c)).label("bad").energy(Arc::new(OneRowEnergy)).build().unwrap();
        let good = forced(&c, optimum(&c)).label("good").build().unwrap();
        let runs = crate::run_batch(&[bad, good]);
        assert!(runs[0].result.is_err());
        assert!(runs[1].result.is_ok());
    }

    #[test]
    fn initial_snapshot_reported_once() {
        let c = community();
        let mut recorder = Recorder::new();
        let mut projection = Projection::new(forced(&c, optimum(&c)).build().unwrap());
        projection.run_steps(0, &mut recorder).unwrap();
        projection.run_steps(0, &mut recorder).unwrap();
        projection.run(&mut recorder).unwrap();
        let steps = &recorder.trajectory().steps;
        assert_eq!(steps, &vec![Step(0), Step(5), Step(10), Step(15), Step(20)]);
    }

    #[test]
    fn catch_uses_abundance_at_step_start() {
        let c = community();
        let effort = Arc::new(EffortSchedule::constant(&["Longline"], STEPS as usize, 0.5).unwrap());
        let config = forced(&c, optimum(&c)).effort(effort).build().unwrap();
        let mut projection = Projection::new(config);
        let start = projection.state().abundance.clone();
        let rates = projection.step().unwrap();

        let weight = &c.grid().w * &c.grid().dw;
        for i in 0..c.species_count() {
            let expected = (&rates.fishing_mortality.row(i) * &start.row(i) * &weight).sum();
            let after = (&rates.fishing_mortality.row(i) * &projection.state().abundance.row(i) * &weight).sum();
            assert_eq!(rates.catch[i], expected);
            assert!(expected > 0.0);
            assert_ne!(rates.catch[i], after);
        }
    }

    #[test]
    fn forcing_rows_advance_once_per_step_for_any_dt() {
        let c = community();
        let rows = STEPS as usize;
        let values = Array2::from_shape_fn((rows, c.grid().len_full()), |(i, k)| {
            (1.0 + i as f64) * 1e11 * c.grid().w_full[k].powf(-2.05)
        });
        let table = Arc::new(ForcingSeries::new("plankton", values).unwrap());

        for dt in [0.1, 0.5, 1.0] {
            let config = ProjectionBuilder::new(
                c.clone(),
                ProjectionConfig { dt, ..projection(STEPS) },
            )
            .thermal()
            .temperature_forcing(temperature(rows, optimum(&c)))
            .plankton_forcing(table.clone())
            .initial_abundance(initial_abundance(&c))
            .build()
            .unwrap();
            let mut projection = Projection::new(config);
            let mut log = StepLog::default();
            projection.run_steps(4, &mut log).unwrap();

            assert_eq!(projection.state().time, 5, "dt {dt}");
            assert!((projection.clock.elapsed() - 4.0 * dt).abs() < 1e-12, "dt {dt}");
            assert_eq!(projection.state().resource, table.values().row(3), "dt {dt}");
        }
    }

    #[test]
    fn plankton_and_custom_resource_conflict() {
        let c = community();
        let err = forced(&c, optimum(&c)).resource(Arc::new(NegativeResource)).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}

// ── Batch ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod batch_tests {
    use super::*;
    use crate::run_batch;

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let c = community();
        let good = forced(&c, optimum(&c)).label("good").build().unwrap();
        let bad = forced(&c, optimum(&c)).label("bad").energy(Arc::new(NanEnergy)).build().unwrap();
        let warm = forced(&c, [40.0, 40.0]).label("warm").build().unwrap();

        let runs = run_batch(&[good, bad, warm]);
        let labels: Vec<_> = runs.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["good", "bad", "warm"]);
        assert_eq!(runs[0].result.as_ref().unwrap().len(), 5);
        assert!(runs[1].result.is_err());
        assert!(runs[2].result.is_ok());
    }

    #[test]
    fn batch_runs_are_independent_and_deterministic() {
        let c = community();
        let make = || forced(&c, optimum(&c)).build().unwrap();
        let runs = run_batch(&[make(), make()]);
        let a = runs[0].result.as_ref().unwrap();
        let b = runs[1].result.as_ref().unwrap();
        assert_eq!(a, b);
    }
}
