//! scenarios — the reference scenario grid for the ssm projection engine.
//!
//! Projects three tuna species under 2 climate models × 3 climate scenarios
//! × 2 fishing scenarios = 12 independent runs sharing one community.  The
//! forcing tables are synthetic stand-ins with the shapes of the real
//! inputs: one temperature column per species and log10 plankton biomass
//! per `w_full` bin, with a spin-up period prepended.
//!
//! Set `RUST_LOG=info` (or `debug`) to see engine progress.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use ndarray::{Array1, Array2};
use serde_json::json;

use ssm_core::{ProjectionConfig, SizeGrid};
use ssm_forcing::{EffortSchedule, ForcingSeries, TimeIndexOffset};
use ssm_output::{CsvWriter, ProjectionOutputObserver};
use ssm_rates::Community;
use ssm_sim::{ModelConfiguration, Projection, ProjectionBuilder, run_batch};
use ssm_species::{SpeciesSetBuilder, load_interaction_reader, load_species_reader};

// ── Constants ─────────────────────────────────────────────────────────────────

const ORIGIN:        i64   = 1950; // first year of the real forcing series
const YEARS:         usize = 100;
const SPIN_UP:       usize = 50;
const DT:            f64   = 1.0;   // one forcing row per step: one year per step
const OUTPUT_EVERY:  u64   = 10;
const FISHED_EFFORT: f64   = 0.2;

const CLIMATE_MODELS: [(&str, f64); 2] = [("gfdl", 0.0), ("ipsl", 0.6)];
/// (scenario, warming by the end of the series in °C, plankton change factor)
const CLIMATE_SCENARIOS: [(&str, f64, f64); 3] =
    [("historical", 0.0, 1.0), ("ssp126", 1.2, 0.95), ("ssp585", 4.0, 0.8)];
const FISHING_SCENARIOS: [(&str, f64); 2] = [("nofishing", 0.0), ("fishing", FISHED_EFFORT)];

// ── Inputs ────────────────────────────────────────────────────────────────────

const SPECIES_CSV: &str = "\
species,w_max,w_mat,temp_min,temp_max,gear,catchability,sel_func,knife_edge_size,knife_edge_size1,knife_edge_size2\n\
skipjack,30000,1500,17,33,Longline,1,knife_edge_phased,,500,3000\n\
yellowfin,200000,25000,15,31,Longline,1,knife_edge_phased,,5000,30000\n\
bigeye,200000,30000,6,30,Longline,1,knife_edge,20000,,\n\
";

const INTERACTION_CSV: &str = "\
predator,skipjack,yellowfin,bigeye\n\
skipjack,1.0,0.8,0.5\n\
yellowfin,1.0,1.0,0.7\n\
bigeye,0.6,0.8,1.0\n\
";

/// Mean temperature each species experiences at the start of the series.
const BASE_TEMPERATURE: [f64; 3] = [26.0, 24.5, 18.0];

/// Background resource: `kappa · w^-lambda` below `RESOURCE_CUTOFF` grams.
const KAPPA:           f64 = 1e11;
const LAMBDA:          f64 = 2.05;
const RESOURCE_CUTOFF: f64 = 10.0;

fn community() -> Result<Arc<Community>> {
    let params = load_species_reader(Cursor::new(SPECIES_CSV))?;
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    let theta = load_interaction_reader(Cursor::new(INTERACTION_CSV), &names)?;
    let (species, theta) = SpeciesSetBuilder::new()
        .extend(params)
        .interaction(theta.as_array().clone())
        .build()?;
    let grid = SizeGrid::new(0.001, 3e5, 80, 1e-10)?;
    Ok(Arc::new(Community::new(species, theta, grid)?))
}

/// Linear 0 → 1 ramp over the real (post spin-up) years.
fn ramp(year: usize) -> f64 {
    year as f64 / (YEARS - 1) as f64
}

fn temperature(offset: f64, warming: f64) -> Result<ForcingSeries> {
    let values = Array2::from_shape_fn((YEARS, BASE_TEMPERATURE.len()), |(t, i)| {
        BASE_TEMPERATURE[i] + offset + warming * ramp(t)
    });
    Ok(ForcingSeries::new("temperature", values)?.with_spin_up(SPIN_UP))
}

fn plankton(grid: &SizeGrid, change: f64) -> Result<ForcingSeries> {
    let log10_biomass = Array2::from_shape_fn((YEARS, grid.len_full()), |(t, j)| {
        let w = grid.w_full[j];
        let factor = 1.0 + (change - 1.0) * ramp(t);
        if w < RESOURCE_CUTOFF {
            (KAPPA * factor * w.powf(-LAMBDA) * grid.dw_full[j]).log10()
        } else {
            -30.0
        }
    });
    Ok(ForcingSeries::plankton_from_log10("plankton", log10_biomass, &grid.dw_full)?.with_spin_up(SPIN_UP))
}

/// Zero effort through the spin-up period, `effort` afterwards.
fn effort(effort: f64) -> Result<EffortSchedule> {
    let values = Array2::from_shape_fn((SPIN_UP + YEARS, 1), |(t, _)| if t < SPIN_UP { 0.0 } else { effort });
    Ok(EffortSchedule::new(vec!["Longline".to_string()], values)?)
}

fn initial_abundance(c: &Community) -> Array2<f64> {
    let grid = c.grid();
    Array2::from_shape_fn(c.shape(), |(i, j)| {
        let sp = &c.species().params()[i];
        let w = grid.w[j];
        if w >= sp.w_min && w <= sp.w_max { 0.1 * KAPPA * w.powf(-LAMBDA) } else { 0.0 }
    })
}

fn configurations(community: &Arc<Community>) -> Result<Vec<ModelConfiguration>> {
    let first_time = ORIGIN - SPIN_UP as i64;
    let projection = ProjectionConfig {
        first_time,
        total_steps: (SPIN_UP + YEARS) as u64,
        dt: DT,
        output_interval_steps: OUTPUT_EVERY,
    };
    let t_idx = TimeIndexOffset::from_origin(first_time);
    let n0 = initial_abundance(community);

    let mut configs = Vec::new();
    for (model, offset) in CLIMATE_MODELS {
        for (scenario, warming, change) in CLIMATE_SCENARIOS {
            // Shared by both fishing scenarios of this (model, scenario) pair.
            let temperature = Arc::new(temperature(offset, warming)?);
            let plankton = Arc::new(plankton(community.grid(), change)?);
            for (fishing, level) in FISHING_SCENARIOS {
                let config = ProjectionBuilder::new(community.clone(), projection.clone())
                    .label(format!("{model}_{scenario}_{fishing}"))
                    .thermal()
                    .temperature_forcing(temperature.clone())
                    .plankton_forcing(plankton.clone())
                    .effort(Arc::new(effort(level)?))
                    .time_offset(t_idx)
                    .initial_abundance(n0.clone())
                    .build()
                    .with_context(|| format!("configuring {model} {scenario} {fishing}"))?;
                configs.push(config);
            }
        }
    }
    Ok(configs)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("=== scenarios — forced size-spectrum projections ===");
    let community = community()?;
    println!(
        "Community: {} species on {} consumer bins ({} resource bins)",
        community.species_count(),
        community.grid().len(),
        community.grid().len_full(),
    );
    println!(
        "Horizon: {} steps ({SPIN_UP} spin-up, {YEARS} forced) from time {}",
        SPIN_UP + YEARS,
        ORIGIN - SPIN_UP as i64,
    );
    println!();

    // 1. Build the 12 configurations over one shared community.
    let configs = configurations(&community)?;
    println!("Built {} configurations", configs.len());

    // 2. Run them as independent tasks.
    let t0 = Instant::now();
    let runs = run_batch(&configs);
    println!("Batch complete in {:.3} s", t0.elapsed().as_secs_f64());
    println!();

    // 3. Summary table and JSON.
    let names: Vec<&str> = community.species().names().collect();
    print!("{:<28}", "Run");
    for name in &names {
        print!(" {name:>14}");
    }
    println!();
    println!("{}", "-".repeat(28 + 15 * names.len()));

    let mut summary = Vec::with_capacity(runs.len());
    let mut failed = 0;
    for run in &runs {
        match &run.result {
            Ok(trajectory) => {
                let biomass = trajectory.biomass(&community);
                let last: Array1<f64> = biomass
                    .rows()
                    .into_iter()
                    .last()
                    .map(|row| row.to_owned())
                    .unwrap_or_else(|| Array1::zeros(names.len()));
                print!("{:<28}", run.label);
                for b in &last {
                    print!(" {b:>14.4e}");
                }
                println!();
                let final_biomass: serde_json::Map<String, serde_json::Value> =
                    names.iter().zip(&last).map(|(name, b)| (name.to_string(), json!(b))).collect();
                summary.push(json!({
                    "label":         run.label,
                    "snapshots":     trajectory.len(),
                    "final_biomass": final_biomass,
                }));
            }
            Err(e) => {
                failed += 1;
                println!("{:<28} failed: {e}", run.label);
                summary.push(json!({ "label": run.label, "error": e.to_string() }));
            }
        }
    }

    let out_dir = Path::new("output/scenarios");
    std::fs::create_dir_all(out_dir)?;
    std::fs::write(out_dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;

    // 4. Full per-step output for the first run.
    let Some(reference) = configs.first() else {
        bail!("no configurations built");
    };
    let writer = CsvWriter::new(out_dir)?;
    let mut obs = ProjectionOutputObserver::new(writer, reference.community.clone());
    Projection::new(reference.clone()).run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    println!();
    println!("  summary.json : {} runs ({failed} failed)", runs.len());
    println!("  biomass.csv  : {} (per step)", reference.label);
    println!("  spectra.csv  : {} (every {OUTPUT_EVERY} steps)", reference.label);

    if failed > 0 {
        bail!("{failed} of {} runs failed", runs.len());
    }
    Ok(())
}
