//! Raw census rows to clean `CensusRecord`s.
//!
//! The steps run in a fixed order: drop the columns the map never shows,
//! rename the coordinate columns, repair the categorical cells the census
//! commonly leaves blank, then drop whatever row still has a hole in it.

use super::record::{
    is_valid_position, Activities, AgeCategory, CensusRecord, Interactions, LocationCategory,
    Shift, SurveyDate, Vocalizations, UNKNOWN,
};
use super::{CensusError, RawCensusTable};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Sighting-measurement detail, free-text notes and the duplicated coordinate
/// representation.
pub const DROPPED_COLUMNS: [&str; 9] = [
    "Hectare",
    "Above Ground Sighter Measurement",
    "Hectare Squirrel Number",
    "Combination of Primary and Highlight Color",
    "Color notes",
    "Specific Location",
    "Other Activities",
    "Other Interactions",
    "Lat/Long",
];

/// Provider column name -> canonical name.
pub const RENAMED_COLUMNS: [(&str, &str); 2] = [("X", COL_LONGITUDE), ("Y", COL_LATITUDE)];

pub const COL_LONGITUDE: &str = "longitude";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_ID: &str = "Unique Squirrel ID";
pub const COL_SHIFT: &str = "Shift";
pub const COL_DATE: &str = "Date";
pub const COL_AGE: &str = "Age";
pub const COL_PRIMARY_FUR: &str = "Primary Fur Color";
pub const COL_HIGHLIGHT_FUR: &str = "Highlight Fur Color";
pub const COL_LOCATION: &str = "Location";

pub const ACTIVITY_COLUMNS: [&str; 5] = ["Running", "Chasing", "Climbing", "Eating", "Foraging"];
pub const VOCALIZATION_COLUMNS: [&str; 3] = ["Kuks", "Quaas", "Moans"];
pub const INTERACTION_COLUMNS: [&str; 5] = [
    "Tail flags",
    "Tail twitches",
    "Approaches",
    "Indifferent",
    "Runs from",
];

const REQUIRED_COLUMNS: [&str; 9] = [
    COL_LONGITUDE,
    COL_LATITUDE,
    COL_ID,
    COL_SHIFT,
    COL_DATE,
    COL_AGE,
    COL_PRIMARY_FUR,
    COL_HIGHLIGHT_FUR,
    COL_LOCATION,
];

/// Columns whose missing cells become `"Unknown"` instead of dropping the row.
const UNKNOWN_FILLED_COLUMNS: [&str; 4] = [COL_AGE, COL_PRIMARY_FUR, COL_HIGHLIGHT_FUR, COL_LOCATION];

/// Placeholder the census uses for an age nobody could tell.
const AGE_PLACEHOLDER: &str = "?";

/// Why a raw row did not become a record. Rows are numbered from 1, header
/// excluded.
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    MissingValue { row: usize, column: String },
    InvalidGeometry { row: usize, id: String, reason: String },
    MalformedFlag { row: usize, column: String, value: String },
    DuplicateId { row: usize, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub latitude: f64,
    pub longitude: f64,
}

pub struct NormalizeResult {
    pub records: Vec<CensusRecord>,
    pub problems: Vec<Problem>,
}

/// Cleaned dataset, ready for encoding.
#[derive(Debug, Clone)]
pub struct CensusDataset {
    pub records: Vec<CensusRecord>,
    pub centroid: Centroid,
    pub dropped_rows: usize,
}

/// Column layout after the drop/rename steps, resolved once per table.
struct Columns {
    /// Header width; every repaired row is at least this long.
    width: usize,
    index: HashMap<&'static str, usize>,
    /// Every surviving column, checked for holes after repairs.
    remaining: Vec<(String, usize)>,
}

impl Columns {
    fn resolve(table: &RawCensusTable) -> Result<Columns, CensusError> {
        let mut remaining = Vec::new();
        for (position, name) in table.columns().iter().enumerate() {
            if DROPPED_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            let canonical = RENAMED_COLUMNS
                .iter()
                .find(|(from, _)| *from == name.as_str())
                .map(|(_, to)| (*to).to_owned())
                .unwrap_or_else(|| name.clone());
            remaining.push((canonical, position));
        }

        let lookup = |name: &str| {
            remaining
                .iter()
                .find(|(column, _)| column == name)
                .map(|(_, position)| *position)
        };

        let mut index = HashMap::new();
        for name in REQUIRED_COLUMNS.iter().chain(ACTIVITY_COLUMNS.iter()) {
            let position =
                lookup(*name).ok_or_else(|| CensusError::MissingColumn((*name).to_owned()))?;
            index.insert(*name, position);
        }
        for name in VOCALIZATION_COLUMNS
            .iter()
            .chain(INTERACTION_COLUMNS.iter())
        {
            if let Some(position) = lookup(*name) {
                index.insert(*name, position);
            }
        }

        Ok(Columns {
            width: table.columns().len(),
            index,
            remaining,
        })
    }
}

/// One row after the unknown-filling repairs.
struct RepairedRow<'a> {
    number: usize,
    cells: Vec<Option<&'a str>>,
}

impl<'a> RepairedRow<'a> {
    fn repair(number: usize, raw: &'a [Option<String>], columns: &Columns) -> RepairedRow<'a> {
        let mut cells: Vec<Option<&'a str>> = raw.iter().map(|c| c.as_deref()).collect();
        if cells.len() < columns.width {
            cells.resize(columns.width, None);
        }

        for name in UNKNOWN_FILLED_COLUMNS {
            let position = columns.index[name];
            let cell = &mut cells[position];
            let needs_fill = match cell {
                None => true,
                Some(value) => name == COL_AGE && *value == AGE_PLACEHOLDER,
            };
            if needs_fill {
                *cell = Some(UNKNOWN);
            }
        }

        RepairedRow { number, cells }
    }

    fn first_missing(&self, columns: &Columns) -> Option<String> {
        columns
            .remaining
            .iter()
            .find(|(_, position)| self.cells[*position].is_none())
            .map(|(name, _)| name.clone())
    }

    fn text(&self, columns: &Columns, name: &str) -> &'a str {
        columns
            .index
            .get(name)
            .and_then(|position| self.cells[*position])
            .unwrap_or(UNKNOWN)
    }

    fn flag(&self, columns: &Columns, name: &str) -> Result<bool, Problem> {
        let Some(position) = columns.index.get(name) else {
            return Ok(false);
        };
        let value = self.cells[*position].unwrap_or_default();
        parse_flag(value).ok_or_else(|| Problem::MalformedFlag {
            row: self.number,
            column: name.to_owned(),
            value: value.to_owned(),
        })
    }

    fn into_record(self, columns: &Columns) -> Result<CensusRecord, Problem> {
        let id = self.text(columns, COL_ID).to_owned();

        let coordinate = |name: &str| -> Result<f64, Problem> {
            let value = self.text(columns, name);
            value
                .parse::<f64>()
                .map_err(|_| Problem::InvalidGeometry {
                    row: self.number,
                    id: id.clone(),
                    reason: format!("{} is not a number: {:?}", name, value),
                })
        };
        let latitude = coordinate(COL_LATITUDE)?;
        let longitude = coordinate(COL_LONGITUDE)?;
        if !is_valid_position(latitude, longitude) {
            return Err(Problem::InvalidGeometry {
                row: self.number,
                id,
                reason: format!("out of range: lat={}, lon={}", latitude, longitude),
            });
        }

        let activities = Activities {
            running: self.flag(columns, ACTIVITY_COLUMNS[0])?,
            chasing: self.flag(columns, ACTIVITY_COLUMNS[1])?,
            climbing: self.flag(columns, ACTIVITY_COLUMNS[2])?,
            eating: self.flag(columns, ACTIVITY_COLUMNS[3])?,
            foraging: self.flag(columns, ACTIVITY_COLUMNS[4])?,
        };
        let vocalizations = Vocalizations {
            kuks: self.flag(columns, VOCALIZATION_COLUMNS[0])?,
            quaas: self.flag(columns, VOCALIZATION_COLUMNS[1])?,
            moans: self.flag(columns, VOCALIZATION_COLUMNS[2])?,
        };
        let interactions = Interactions {
            tail_flags: self.flag(columns, INTERACTION_COLUMNS[0])?,
            tail_twitches: self.flag(columns, INTERACTION_COLUMNS[1])?,
            approaches: self.flag(columns, INTERACTION_COLUMNS[2])?,
            indifferent: self.flag(columns, INTERACTION_COLUMNS[3])?,
            runs_from: self.flag(columns, INTERACTION_COLUMNS[4])?,
        };

        Ok(CensusRecord {
            id,
            latitude,
            longitude,
            age: AgeCategory::from_raw(self.text(columns, COL_AGE)),
            primary_fur_color: self.text(columns, COL_PRIMARY_FUR).to_owned(),
            highlight_fur_color: self.text(columns, COL_HIGHLIGHT_FUR).to_owned(),
            location: LocationCategory::from_raw(self.text(columns, COL_LOCATION)),
            activities,
            vocalizations,
            interactions,
            date: SurveyDate::from_raw(self.text(columns, COL_DATE)),
            shift: Shift::from_raw(self.text(columns, COL_SHIFT)),
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Repairs and filters the raw rows. Per-row anomalies end up in `problems`;
/// only a missing required column fails the whole table.
pub fn normalize(table: &RawCensusTable) -> Result<NormalizeResult, CensusError> {
    let columns = Columns::resolve(table)?;

    let mut records = Vec::with_capacity(table.len());
    let mut problems = Vec::new();
    let mut seen_ids = HashSet::new();

    for (i, raw) in table.rows().iter().enumerate() {
        let row = RepairedRow::repair(i + 1, raw, &columns);

        if let Some(column) = row.first_missing(&columns) {
            problems.push(Problem::MissingValue {
                row: row.number,
                column,
            });
            continue;
        }

        let number = row.number;
        match row.into_record(&columns) {
            Ok(record) => {
                if seen_ids.insert(record.id.clone()) {
                    records.push(record);
                } else {
                    problems.push(Problem::DuplicateId {
                        row: number,
                        id: record.id,
                    });
                }
            }
            Err(problem) => problems.push(problem),
        }
    }

    Ok(NormalizeResult { records, problems })
}

/// Arithmetic mean of the positions. Never divides by zero: an empty slice is
/// `EmptyDataset`.
pub fn compute_centroid(records: &[CensusRecord]) -> Result<Centroid, CensusError> {
    if records.is_empty() {
        return Err(CensusError::EmptyDataset);
    }
    let count = records.len() as f64;
    let latitude = records.iter().map(|r| r.latitude).sum::<f64>() / count;
    let longitude = records.iter().map(|r| r.longitude).sum::<f64>() / count;
    Ok(Centroid {
        latitude,
        longitude,
    })
}

impl CensusDataset {
    pub fn from_normalized(result: NormalizeResult) -> Result<CensusDataset, CensusError> {
        let centroid = compute_centroid(&result.records)?;
        Ok(CensusDataset {
            records: result.records,
            centroid,
            dropped_rows: result.problems.len(),
        })
    }
}
