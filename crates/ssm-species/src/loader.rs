//! CSV loaders for species parameters and interaction matrices.
//!
//! # Species CSV format
//!
//! One row per species.  Only the first five columns are required; empty or
//! missing optional columns take the [`SpeciesParams::new`] defaults.
//!
//! ```csv
//! species,w_max,w_mat,temp_min,temp_max,w_min,beta,sigma,gamma,q,h,n,alpha,ks,p,z0,erepro,r_max,gear,catchability,sel_func,knife_edge_size,knife_edge_size1,knife_edge_size2
//! skipjack,30000,1500,17,33,,,,,,,,,,,,,,Longline,1,knife_edge_phased,,500,3000
//! ```
//!
//! **`sel_func`** field: `knife_edge` (default) or `knife_edge_phased`.
//!
//! # Interaction CSV format
//!
//! Header row `predator,<prey>,<prey>,…`; one row per predator.  Rows and
//! columns may be in any order; they are re-ordered to the species order.

use std::io::Read;
use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;

use crate::{InteractionMatrix, Selectivity, SpeciesError, SpeciesParams, SpeciesResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SpeciesRecord {
    species:              String,
    w_max:                f64,
    w_mat:                f64,
    temp_min:             f64,
    temp_max:             f64,
    #[serde(default)]
    w_min:                Option<f64>,
    #[serde(default)]
    beta:                 Option<f64>,
    #[serde(default)]
    sigma:                Option<f64>,
    #[serde(default)]
    gamma:                Option<f64>,
    #[serde(default)]
    q:                    Option<f64>,
    #[serde(default)]
    h:                    Option<f64>,
    #[serde(default)]
    n:                    Option<f64>,
    #[serde(default)]
    alpha:                Option<f64>,
    #[serde(default)]
    ks:                   Option<f64>,
    #[serde(default)]
    p:                    Option<f64>,
    #[serde(default)]
    z0:                   Option<f64>,
    #[serde(default)]
    erepro:               Option<f64>,
    #[serde(default)]
    r_max:                Option<f64>,
    #[serde(default)]
    interaction_resource: Option<f64>,
    #[serde(default)]
    gear:                 Option<String>,
    #[serde(default)]
    catchability:         Option<f64>,
    #[serde(default)]
    sel_func:             Option<String>,
    #[serde(default)]
    knife_edge_size:      Option<f64>,
    #[serde(default)]
    knife_edge_size1:     Option<f64>,
    #[serde(default)]
    knife_edge_size2:     Option<f64>,
}

impl SpeciesRecord {
    fn into_params(self) -> SpeciesResult<SpeciesParams> {
        let mut p = SpeciesParams::new(self.species, self.w_max, self.w_mat, self.temp_min, self.temp_max);
        if let Some(v) = self.w_min {
            p.w_min = v;
        }
        if let Some(v) = self.beta {
            p.beta = v;
        }
        if let Some(v) = self.sigma {
            p.sigma = v;
        }
        if let Some(v) = self.gamma {
            p.gamma = v;
        }
        if let Some(v) = self.q {
            p.q = v;
        }
        if let Some(v) = self.h {
            p.h = v;
        }
        if let Some(v) = self.n {
            p.n = v;
        }
        if let Some(v) = self.alpha {
            p.alpha = v;
        }
        if let Some(v) = self.ks {
            p.ks = v;
        }
        if let Some(v) = self.p {
            p.p = v;
        }
        if let Some(v) = self.z0 {
            p.z0 = v;
        }
        if let Some(v) = self.erepro {
            p.erepro = v;
        }
        if let Some(v) = self.r_max {
            p.r_max = v;
        }
        if let Some(v) = self.interaction_resource {
            p.interaction_resource = v;
        }
        if let Some(v) = self.catchability {
            p.catchability = v;
        }
        if let Some(g) = self.gear.filter(|g| !g.trim().is_empty()) {
            p.gear = g.trim().to_string();
        }

        p.selectivity = match self.sel_func.as_deref().map(str::trim) {
            None | Some("") | Some("knife_edge") => Selectivity::KnifeEdge {
                knife_edge_size: self.knife_edge_size.unwrap_or(p.w_mat),
            },
            Some("knife_edge_phased") => {
                let missing = |col: &str| {
                    SpeciesError::Parse(format!("species {:?}: knife_edge_phased needs {col}", p.name))
                };
                Selectivity::KnifeEdgePhased {
                    knife_edge_size1: self.knife_edge_size1.ok_or_else(|| missing("knife_edge_size1"))?,
                    knife_edge_size2: self.knife_edge_size2.ok_or_else(|| missing("knife_edge_size2"))?,
                }
            }
            Some(other) => {
                return Err(SpeciesError::Parse(format!(
                    "species {:?}: unknown sel_func {other:?}: expected \"knife_edge\" or \"knife_edge_phased\"",
                    p.name
                )));
            }
        };
        Ok(p)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load species parameter records from a CSV file.
pub fn load_species_csv(path: &Path) -> SpeciesResult<Vec<SpeciesParams>> {
    let file = std::fs::File::open(path)?;
    load_species_reader(file)
}

/// Like [`load_species_csv`] but accepts any `Read` source.
pub fn load_species_reader<R: Read>(reader: R) -> SpeciesResult<Vec<SpeciesParams>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<SpeciesRecord>()
        .map(|row| {
            row.map_err(|e| SpeciesError::Parse(e.to_string()))
                .and_then(SpeciesRecord::into_params)
        })
        .collect()
}

/// Load an interaction matrix from a CSV file, ordered by `species_names`.
pub fn load_interaction_csv(path: &Path, species_names: &[&str]) -> SpeciesResult<InteractionMatrix> {
    let file = std::fs::File::open(path)?;
    load_interaction_reader(file, species_names)
}

/// Like [`load_interaction_csv`] but accepts any `Read` source.
pub fn load_interaction_reader<R: Read>(
    reader:        R,
    species_names: &[&str],
) -> SpeciesResult<InteractionMatrix> {
    let n = species_names.len();
    let position = |name: &str| -> SpeciesResult<usize> {
        species_names
            .iter()
            .position(|s| *s == name.trim())
            .ok_or_else(|| SpeciesError::Parse(format!("unknown species {name:?} in interaction matrix")))
    };

    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(|e| SpeciesError::Parse(e.to_string()))?.clone();
    if headers.len() != n + 1 {
        return Err(SpeciesError::DimensionMismatch {
            what:     "interaction matrix columns",
            expected: n,
            got:      headers.len().saturating_sub(1),
        });
    }
    let prey_cols: Vec<usize> = headers.iter().skip(1).map(position).collect::<SpeciesResult<_>>()?;

    let mut theta = Array2::<f64>::zeros((n, n));
    let mut seen = vec![false; n];
    for record in csv_reader.records() {
        let record = record.map_err(|e| SpeciesError::Parse(e.to_string()))?;
        let predator = position(record.get(0).unwrap_or_default())?;
        if std::mem::replace(&mut seen[predator], true) {
            return Err(SpeciesError::Parse(format!(
                "predator {:?} appears twice in interaction matrix",
                species_names[predator]
            )));
        }
        for (field, &prey) in record.iter().skip(1).zip(&prey_cols) {
            theta[[predator, prey]] = field
                .trim()
                .parse::<f64>()
                .map_err(|e| SpeciesError::Parse(format!("interaction value {field:?}: {e}")))?;
        }
    }

    let rows = seen.iter().filter(|s| **s).count();
    if rows != n {
        return Err(SpeciesError::DimensionMismatch {
            what:     "interaction matrix rows",
            expected: n,
            got:      rows,
        });
    }
    InteractionMatrix::new(theta, n)
}
