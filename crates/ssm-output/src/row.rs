//! Plain data row types written by output backends.

/// Totals of one species after a step.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomassRow {
    /// Step number of the state (the first row of a run has step 1).
    pub step:       u64,
    pub time:       i64,
    pub species:    String,
    /// `Σ N · w · dw`, grams per unit volume.
    pub biomass:    f64,
    /// `Σ N · dw`.
    pub numbers:    f64,
    /// `Σ F · N · w · dw` of the step, over the abundance it started from.
    pub catch_rate: f64,
}

/// One size bin of a snapshot spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRow {
    pub step:    u64,
    pub time:    i64,
    /// Species name, or `"resource"` for the background spectrum.
    pub species: String,
    pub bin:     u32,
    /// Body size of the bin, grams.
    pub w:       f64,
    pub density: f64,
}
