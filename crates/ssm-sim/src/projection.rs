//! The `Projection` struct and its step loop.

use ndarray::{Array1, Array2, Axis, Zip};

use ssm_core::{ProjectionClock, SpeciesId, Step};
use ssm_rates::{RateContext, StepForcing, kernels, sweep};

use crate::{ModelConfiguration, ProjectionObserver, SimError, SimResult, SimulationState, StepRates};

/// Fraction of body mass that can be respired before a deficit becomes
/// mortality: starvation mortality is `max(−e, 0) / (xi · w)`.
pub const STARVATION_XI: f64 = 0.1;

/// One running scenario.
///
/// Each step:
///
/// 1. **Forcing** — resolve the temperature row and tolerance mask for the
///    step's time label; read the step's effort row.
/// 2. **Rates** — encounter → feeding level → net energy (bound strategies),
///    then predation from the default kernels and the next resource density
///    from the bound resource strategy.
/// 3. **Advance** — recruitment, then the implicit upwind sweep over size
///    for every species.
/// 4. **Check** — any NaN, infinite or negative density aborts with
///    [`SimError::Numerical`] before the state is replaced.
///
/// Create via [`ProjectionBuilder`][crate::ProjectionBuilder] and
/// [`Projection::new`].
pub struct Projection {
    pub config:       ModelConfiguration,
    pub clock:        ProjectionClock,
    state:            SimulationState,
    initial_reported: bool,
}

impl Projection {
    pub fn new(config: ModelConfiguration) -> Self {
        let state = SimulationState::initial(
            config.projection.first_time,
            config.initial_abundance.clone(),
            config.initial_resource.clone(),
        );
        Self { clock: config.projection.make_clock(), config, state, initial_reported: false }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current step to `config.projection.end_step()`.
    pub fn run<O: ProjectionObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        log::info!(
            "{:?}: projecting {} steps from time {}",
            self.config.label,
            self.config.projection.total_steps,
            self.config.projection.first_time,
        );
        let remaining = self.config.projection.end_step().0.saturating_sub(self.clock.current_step.0);
        self.run_steps(remaining, observer)?;
        observer.on_projection_end(&self.state);
        log::info!("{:?}: projection finished at {}", self.config.label, self.clock);
        Ok(())
    }

    /// Run exactly `n` steps from the current position.
    ///
    /// The step-0 state goes to `on_snapshot` on the first call only.
    ///
    /// Steps past the end of the validated horizon fail with a forcing error
    /// rather than reading outside a table.
    pub fn run_steps<O: ProjectionObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        if !self.initial_reported {
            self.initial_reported = true;
            if self.clock.current_step == Step::ZERO && self.config.projection.is_snapshot(Step::ZERO) {
                observer.on_snapshot(&self.state);
            }
        }
        for _ in 0..n {
            let now = self.clock.current_step;
            observer.on_step_start(now, self.clock.current_time());
            let rates = self.step()?;
            observer.on_step_end(now, &self.state, &rates);
            if self.config.projection.is_snapshot(self.state.step) {
                log::debug!("{:?}: snapshot at {}", self.config.label, self.state.step);
                observer.on_snapshot(&self.state);
            }
        }
        Ok(())
    }

    /// Advance one step and return the rates it used.
    pub fn step(&mut self) -> SimResult<StepRates> {
        let step = self.clock.current_step;
        let time = self.clock.current_time();
        let community = self.config.community.as_ref();
        let grid = community.grid();
        let dt = self.config.projection.dt;

        // ── Forcing ───────────────────────────────────────────────────────
        let forcing = match &self.config.temperature {
            Some(series) => {
                StepForcing::from_temperature(series.row_at(time, self.config.t_idx)?, community.species())
            }
            None => StepForcing::unforced(community.species_count()),
        };
        let fishing = self.fishing_mortality(step)?;

        let ctx = RateContext {
            step,
            time,
            dt,
            community,
            abundance: &self.state.abundance,
            resource: &self.state.resource,
            forcing: &forcing,
        };

        // ── Rates ─────────────────────────────────────────────────────────
        let encounter = self.config.rates.encounter.encounter(&ctx)?;
        sweep::require_shape("encounter", &encounter, community.shape())?;
        let feeding_level = kernels::feeding_level(community, &encounter)?;
        let net_energy = self.config.rates.energy.net_energy(&ctx, &encounter, &feeding_level)?;
        sweep::require_shape("net energy", &net_energy, community.shape())?;
        for (i, sp) in community.species().params().iter().enumerate() {
            if let Some((bin, &value)) = net_energy.row(i).iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(self.numerical(step, time, format!("{} net energy", sp.name), bin, value));
            }
        }

        let surplus = net_energy.mapv(|e| e.max(0.0));
        let e_repro = &surplus * community.psi();
        let growth = &surplus - &e_repro;
        let mut starvation = net_energy.mapv(|e| (-e).max(0.0));
        Zip::from(starvation.columns_mut()).and(&grid.w).for_each(|mut col, &w| {
            col /= STARVATION_XI * w;
        });

        let pred_rate = kernels::predation_rate(community, &self.state.abundance, &feeding_level)?;
        let predation_mortality = kernels::predation_mortality(community, &pred_rate)?;
        let resource_mortality = kernels::resource_mortality(community, &pred_rate)?;
        let next_resource = self.config.rates.resource.next_resource(&ctx, &resource_mortality)?;
        sweep::require_shape_1d("next resource", &next_resource, grid.len_full())?;

        let mut total_mortality = &predation_mortality + &fishing + &starvation;
        for (mut row, sp) in total_mortality.rows_mut().into_iter().zip(community.species().params()) {
            row += sp.z0;
        }

        let weight = &grid.w * &grid.dw;
        let catch = (&fishing * &self.state.abundance * &weight).sum_axis(Axis(1));

        // ── Recruitment ───────────────────────────────────────────────────
        let n_sp = community.species_count();
        let mut rdi = Array1::<f64>::zeros(n_sp);
        let mut rdd = Array1::<f64>::zeros(n_sp);
        for (i, sp) in community.species().params().iter().enumerate() {
            let invested = (&e_repro.row(i) * &self.state.abundance.row(i) * &grid.dw).sum();
            rdi[i] = 0.5 * sp.erepro * invested / sp.w_min;
            rdd[i] = if sp.r_max.is_infinite() { rdi[i] } else { sp.r_max * rdi[i] / (sp.r_max + rdi[i]) };
        }

        // ── Advance ───────────────────────────────────────────────────────
        let mut next = Array2::<f64>::zeros(self.state.abundance.dim());
        for i in 0..n_sp {
            let recruit = community.recruit_bin(SpeciesId(i as u16));
            let n = self.state.abundance.row(i);
            let g = growth.row(i);
            let mu = total_mortality.row(i);
            let mut out = next.row_mut(i);
            for j in recruit..grid.len() {
                let inflow = if j == recruit {
                    rdd[i] * dt / grid.dw[j]
                } else {
                    g[j - 1] * dt / grid.dw[j] * out[j - 1]
                };
                out[j] = (n[j] + inflow) / (1.0 + g[j] * dt / grid.dw[j] + mu[j] * dt);
            }
        }

        // ── Check ─────────────────────────────────────────────────────────
        for (i, sp) in community.species().params().iter().enumerate() {
            if let Some((bin, &value)) = next.row(i).iter().enumerate().find(|(_, v)| !is_density(**v)) {
                return Err(self.numerical(step, time, sp.name.clone(), bin, value));
            }
        }
        if let Some((bin, &value)) = next_resource.iter().enumerate().find(|(_, v)| !is_density(**v)) {
            return Err(self.numerical(step, time, "resource".to_string(), bin, value));
        }

        // ── Commit ────────────────────────────────────────────────────────
        self.state.abundance = next;
        self.state.resource = next_resource;
        self.state.fishing_mortality = fishing.clone();
        self.state.feeding_level = feeding_level.clone();
        self.clock.advance();
        self.state.step = self.clock.current_step;
        self.state.time = self.clock.current_time();

        Ok(StepRates {
            encounter,
            feeding_level,
            net_energy,
            e_repro,
            growth,
            starvation,
            predation_mortality,
            fishing_mortality: fishing,
            catch,
            total_mortality,
            resource_mortality,
            rdi,
            rdd,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// `selectivity · catchability · effort[gear]`, zero without a schedule.
    fn fishing_mortality(&self, step: Step) -> SimResult<Array2<f64>> {
        let community = self.config.community.as_ref();
        let mut fishing = community.selectivity().clone();
        match &self.config.effort {
            Some(schedule) => {
                let effort = schedule.effort_at(step)?;
                for ((mut row, sp), &col) in fishing
                    .rows_mut()
                    .into_iter()
                    .zip(community.species().params())
                    .zip(&self.config.gear_columns)
                {
                    row *= sp.catchability * effort[col];
                }
            }
            None => fishing.fill(0.0),
        }
        Ok(fishing)
    }

    fn numerical(&self, step: Step, time: i64, what: String, bin: usize, value: f64) -> SimError {
        log::error!("{:?}: {what} bin {bin} became {value} at {step}", self.config.label);
        SimError::Numerical { step, time, what, bin, value }
    }
}

#[inline]
fn is_density(v: f64) -> bool {
    v >= 0.0 && v.is_finite()
}
