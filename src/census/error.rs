use thiserror::Error;

/// Errors raised while turning the raw census table into records and features.
///
/// Only `InvalidGeometry` is recoverable: it is reported per row and the row is
/// dropped. The others abort the load.
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("No valid census records left after cleaning")]
    EmptyDataset,

    #[error("Invalid geometry for {id}: lat={latitude}, lon={longitude}")]
    InvalidGeometry {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Required column missing from census table: {0}")]
    MissingColumn(String),

    #[error("Census table could not be parsed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Census file could not be read: {0}")]
    Io(#[from] std::io::Error),
}
