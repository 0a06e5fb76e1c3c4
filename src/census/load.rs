//! Census loading functionality

use super::{normalize, CensusDataset, CensusError, CensusRecord, Centroid, RawCensusTable};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// How many dropped rows get listed one by one before the log is summarized.
const MAX_LOGGED_PROBLEMS: usize = 20;

/// What the map header shows about the loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub dropped_rows: usize,
    pub centroid: Centroid,
    pub first_survey_date: Option<NaiveDate>,
    pub last_survey_date: Option<NaiveDate>,
}

impl DatasetSummary {
    pub fn of(dataset: &CensusDataset) -> DatasetSummary {
        let dates = dataset
            .records
            .iter()
            .filter_map(|r: &CensusRecord| r.date.calendar_date());
        let (first, last) = dates.fold((None, None), |(first, last), date| {
            (
                Some(first.map_or(date, |f: NaiveDate| f.min(date))),
                Some(last.map_or(date, |l: NaiveDate| l.max(date))),
            )
        });

        DatasetSummary {
            records: dataset.records.len(),
            dropped_rows: dataset.dropped_rows,
            centroid: dataset.centroid,
            first_survey_date: first,
            last_survey_date: last,
        }
    }
}

/// Reads, repairs and filters the census CSV at `path`.
///
/// Dropped rows are logged and counted; a missing column or a table with no
/// usable rows fails the load.
pub fn load_census<P: AsRef<Path>>(path: P) -> Result<CensusDataset> {
    let path = path.as_ref();
    info!("Reading census table from {:?}...", path);
    let file = File::open(path)
        .map_err(CensusError::from)
        .with_context(|| format!("Could not open census file {:?}", path))?;
    let table = RawCensusTable::from_reader(file)
        .with_context(|| format!("Could not parse census file {:?}", path))?;
    info!("Read {} raw rows, normalizing...", table.len());

    let result = normalize(&table)?;
    let problems = &result.problems;

    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter().take(MAX_LOGGED_PROBLEMS) {
            info!("- {:?}", problem);
        }
        if problems.len() > MAX_LOGGED_PROBLEMS {
            info!("- ... and {} more", problems.len() - MAX_LOGGED_PROBLEMS);
        }
    }

    let dataset = CensusDataset::from_normalized(result)
        .with_context(|| format!("Census file {:?} has no usable rows", path))?;

    if dataset.dropped_rows > 0 {
        warn!(
            "Census was loaded, but {} rows were dropped, check the issues above.",
            dataset.dropped_rows
        );
    } else {
        info!("Census checked, no issues found.");
    }
    info!(
        "Census has {} records centered at ({:.5}, {:.5})",
        dataset.records.len(),
        dataset.centroid.latitude,
        dataset.centroid.longitude
    );

    Ok(dataset)
}
