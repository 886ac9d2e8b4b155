//! Where network weights come from: a named catalog or an evolved population.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::network::WeightSet;
use crate::utils::{Stats, vec_stats};

/// Pretrained weight sets keyed by name.
#[derive(Clone, Debug, Default)]
pub struct WeightCatalog {
    entries: BTreeMap<String, WeightSet>,
}

impl WeightCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, set: WeightSet) {
        self.entries.insert(name.into(), set);
    }

    pub fn get(&self, name: &str) -> Result<&WeightSet> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::UnknownWeights(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads rows of `name, num_features, num_hidden, w0, w1, ...`; `#` lines are comments.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        let catalog = Self::from_reader(file)?;
        info!(path = %path.display(), entries = catalog.len(), "weight catalog loaded");
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut catalog = Self::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let malformed = |reason: String| Error::MalformedRecord { line: line + 1, reason };
            if record.len() < 3 {
                return Err(malformed(format!("expected at least 3 fields, got {}", record.len())));
            }
            let name = record[0].to_string();
            let feature_count = record[1]
                .parse::<usize>()
                .map_err(|e| malformed(format!("num_features: {e}")))?;
            let hidden_count = record[2]
                .parse::<usize>()
                .map_err(|e| malformed(format!("num_hidden: {e}")))?;
            let weights = record
                .iter()
                .skip(3)
                .map(|w| w.parse::<f64>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| malformed(format!("weight: {e}")))?;
            catalog.insert(
                name,
                WeightSet {
                    feature_count,
                    hidden_count,
                    weights,
                },
            );
        }
        Ok(catalog)
    }
}

/// One evolved candidate: `id, avg_score, pstdev, best_score, encoded_weights`.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateRecord {
    pub id: String,
    pub avg_score: f64,
    pub pstdev: f64,
    pub best_score: f64,
    pub encoded: String,
}

impl CandidateRecord {
    /// base64 -> pickle -> weight set.
    pub fn decode(&self) -> Result<WeightSet> {
        let bytes = STANDARD.decode(self.encoded.trim())?;
        let set: WeightSet = serde_pickle::from_slice(&bytes, serde_pickle::DeOptions::new())?;
        Ok(set)
    }
}

#[derive(Deserialize)]
struct RawCandidate(String, f64, f64, f64, String);

pub fn read_population(path: impl AsRef<Path>) -> Result<Vec<CandidateRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut population = Vec::new();
    for row in rdr.deserialize::<RawCandidate>() {
        let RawCandidate(id, avg_score, pstdev, best_score, encoded) = row?;
        population.push(CandidateRecord {
            id,
            avg_score,
            pstdev,
            best_score,
            encoded,
        });
    }
    debug!(path = %path.display(), candidates = population.len(), "population read");
    Ok(population)
}

/// Index of the highest average score; the first one wins ties. NaN scores are skipped.
pub fn best_index(population: &[CandidateRecord]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.avg_score.is_nan())
        .rev()
        .max_by(|(_, a), (_, b)| a.avg_score.total_cmp(&b.avg_score))
        .map(|(i, _)| i)
}

/// Picks the best candidate of an evolved population and decodes its weights.
pub fn load_best_from_population(path: impl AsRef<Path>) -> Result<(CandidateRecord, WeightSet)> {
    let path = path.as_ref();
    let mut population = read_population(path)?;
    let idx = best_index(&population).ok_or_else(|| Error::EmptyPopulation(path.to_path_buf()))?;
    let best = population.swap_remove(idx);
    info!(
        id = %best.id,
        avg_score = best.avg_score,
        pstdev = best.pstdev,
        best_score = best.best_score,
        "selected best candidate"
    );
    let set = best.decode()?;
    Ok((best, set))
}

/// How to obtain the weights of the network under study.
#[derive(Clone, Debug)]
pub enum WeightSource {
    Catalog { catalog: WeightCatalog, name: String },
    Population { path: PathBuf },
}

impl WeightSource {
    pub fn load(&self) -> Result<WeightSet> {
        match self {
            WeightSource::Catalog { catalog, name } => catalog.get(name).cloned(),
            WeightSource::Population { path } => load_best_from_population(path).map(|(_, set)| set),
        }
    }

    pub fn label(&self) -> String {
        match self {
            WeightSource::Catalog { name, .. } => name.clone(),
            WeightSource::Population { path } => path.display().to_string(),
        }
    }
}

/// Overview of a population file, for eyeballing before a run.
#[derive(Clone, Debug)]
pub struct PopulationSummary {
    pub size: usize,
    pub first: CandidateRecord,
    pub first_weights: WeightSet,
    pub best_index: usize,
    pub best_avg_score: f64,
    pub avg_scores: Stats,
}

impl PopulationSummary {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let population = read_population(path)?;
        let best = best_index(&population).ok_or_else(|| Error::EmptyPopulation(path.to_path_buf()))?;
        let scores: Vec<f64> = population.iter().map(|c| c.avg_score).collect();
        let first = population[0].clone();
        let first_weights = first.decode()?;
        Ok(Self {
            size: population.len(),
            first,
            first_weights,
            best_index: best,
            best_avg_score: population[best].avg_score,
            avg_scores: vec_stats(&scores),
        })
    }
}
