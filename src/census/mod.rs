mod error;
mod load;
mod normalize;
mod record;
mod table;

pub use error::CensusError;
pub use load::{load_census, DatasetSummary};
pub use normalize::{
    compute_centroid, normalize, CensusDataset, Centroid, NormalizeResult,
    Problem as LoadCensusProblem, DROPPED_COLUMNS,
};
pub use record::{
    is_valid_position, Activities, AgeCategory, CensusRecord, Interactions, LocationCategory,
    Shift, SurveyDate, Vocalizations, UNKNOWN,
};
pub use table::RawCensusTable;

#[cfg(test)]
pub(crate) use record::test_record;
