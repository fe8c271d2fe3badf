//! Combination of sample attribute lists into runs
//!
//! A layout is declared as parallel lists of samples, platform units,
//! batches and populations. These are combined either positionally
//! ([`Strategy::Zip`]) or as a full Cartesian product
//! ([`Strategy::Product`]) into an ordered list of [`Run`]s.

use crate::alias;
use crate::error::{FixtureError, Result};
use serde::Deserialize;

/// One sample/platform unit/batch/population combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Position of the sample in the input sample list
    pub slot: usize,
    /// Logical name (alias, or the sample itself)
    pub sample: String,
    /// Dataset backing this run's files
    pub canonical_sample: String,
    pub platform_unit: Option<String>,
    pub batch: Option<String>,
    pub population: Option<String>,
    pub paired_end: bool,
}

/// How attribute lists are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Positional pairing; every given list is as long as the sample list
    #[default]
    Zip,
    /// Cartesian product; samples vary slowest, populations fastest
    Product,
}

/// The parallel attribute lists a layout is declared with.
///
/// An empty list, or one containing only `None`, means the attribute is absent.
#[derive(Debug, Clone, Default)]
pub struct RunLists {
    pub samples: Vec<Option<String>>,
    pub aliases: Vec<String>,
    pub platform_units: Vec<Option<String>>,
    pub batches: Vec<Option<String>>,
    pub populations: Vec<Option<String>>,
    pub paired_end: Vec<bool>,
}

/// Combine `lists` into runs. Validation is complete before anything is returned,
/// so callers can rely on a successful result before touching the filesystem.
pub fn combine(lists: &RunLists, strategy: Strategy) -> Result<Vec<Run>> {
    let samples = checked_samples(&lists.samples)?;
    let aliases = alias::resolve(&samples, &lists.aliases)?;
    let n = samples.len();
    let paired_end = broadcast_paired_end(&lists.paired_end, n)?;

    let mut runs = Vec::new();
    match strategy {
        Strategy::Zip => {
            let pus = zip_labels("platform units", &lists.platform_units, n)?;
            let batches = zip_labels("batches", &lists.batches, n)?;
            let pops = zip_labels("populations", &lists.populations, n)?;
            for (slot, entry) in aliases.entries().iter().enumerate() {
                runs.push(Run {
                    slot,
                    sample: entry.alias.clone(),
                    canonical_sample: entry.canonical.clone(),
                    platform_unit: pus[slot].clone(),
                    batch: batches[slot].clone(),
                    population: pops[slot].clone(),
                    paired_end: paired_end[slot],
                });
            }
        }
        Strategy::Product => {
            let pus = product_axis(&lists.platform_units);
            let batches = product_axis(&lists.batches);
            let pops = product_axis(&lists.populations);
            for (slot, entry) in aliases.entries().iter().enumerate() {
                for pu in &pus {
                    for batch in &batches {
                        for pop in &pops {
                            runs.push(Run {
                                slot,
                                sample: entry.alias.clone(),
                                canonical_sample: entry.canonical.clone(),
                                platform_unit: pu.clone(),
                                batch: batch.clone(),
                                population: pop.clone(),
                                paired_end: paired_end[slot],
                            });
                        }
                    }
                }
            }
        }
    }

    Ok(runs)
}

fn checked_samples(samples: &[Option<String>]) -> Result<Vec<String>> {
    if samples.is_empty() {
        return Err(FixtureError::Sample("no samples given".to_string()));
    }
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| match s.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(FixtureError::Sample(format!(
                "sample name at position {i} is missing"
            ))),
        })
        .collect()
}

fn is_absent(list: &[Option<String>]) -> bool {
    list.iter().all(|v| v.as_deref().map_or(true, str::is_empty))
}

fn normalized(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn zip_labels(name: &str, list: &[Option<String>], n: usize) -> Result<Vec<Option<String>>> {
    if is_absent(list) {
        return Ok(vec![None; n]);
    }
    if list.len() != n {
        return Err(FixtureError::Sample(format!(
            "length of {name} ({}) and samples ({n}) must be equal",
            list.len()
        )));
    }
    Ok(list.iter().map(normalized).collect())
}

fn product_axis(list: &[Option<String>]) -> Vec<Option<String>> {
    if is_absent(list) {
        vec![None]
    } else {
        list.iter().map(normalized).collect()
    }
}

fn broadcast_paired_end(paired_end: &[bool], n: usize) -> Result<Vec<bool>> {
    match paired_end.len() {
        0 => Ok(vec![true; n]),
        1 => Ok(vec![paired_end[0]; n]),
        len if len == n => Ok(paired_end.to_vec()),
        len => Err(FixtureError::Sample(format!(
            "length of paired_end ({len}) must be 1 or equal to samples ({n})"
        ))),
    }
}
