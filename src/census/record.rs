use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CensusError;

/// Sentinel used wherever the census left a categorical value blank.
pub const UNKNOWN: &str = "Unknown";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum AgeCategory {
    Adult,
    Juvenile,
    Unknown,
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 3] = [Self::Adult, Self::Juvenile, Self::Unknown];

    /// Anything that is not a known age, `"?"` included, is `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "Adult" => Self::Adult,
            "Juvenile" => Self::Juvenile,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adult => "Adult",
            Self::Juvenile => "Juvenile",
            Self::Unknown => UNKNOWN,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum LocationCategory {
    GroundPlane,
    AboveGround,
    Unknown,
}

impl LocationCategory {
    pub const ALL: [LocationCategory; 3] = [Self::GroundPlane, Self::AboveGround, Self::Unknown];

    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "Ground Plane" => Self::GroundPlane,
            "Above Ground" => Self::AboveGround,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroundPlane => "GroundPlane",
            Self::AboveGround => "AboveGround",
            Self::Unknown => UNKNOWN,
        }
    }

    /// Label as written in the census sheet.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GroundPlane => "Ground Plane",
            Self::AboveGround => "Above Ground",
            Self::Unknown => UNKNOWN,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Shift {
    AM,
    PM,
    Unknown,
}

impl Shift {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "AM" => Self::AM,
            "PM" => Self::PM,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AM => "AM",
            Self::PM => "PM",
            Self::Unknown => UNKNOWN,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Activities {
    pub running: bool,
    pub chasing: bool,
    pub climbing: bool,
    pub eating: bool,
    pub foraging: bool,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Vocalizations {
    pub kuks: bool,
    pub quaas: bool,
    pub moans: bool,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Interactions {
    pub tail_flags: bool,
    pub tail_twitches: bool,
    pub approaches: bool,
    pub indifferent: bool,
    pub runs_from: bool,
}

/// Observation date as recorded by the census: eight digits, `MMDDYYYY`.
///
/// The raw digits are kept as-is. A calendar view is derived on demand and is
/// `None` when the digits don't form a real date.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SurveyDate(String);

impl SurveyDate {
    /// Numeric cells lose their leading zero when exported (`7062018`), so
    /// seven-digit values are padded back to eight.
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.len() == 7 && raw.chars().all(|c| c.is_ascii_digit()) {
            return SurveyDate(format!("0{}", raw));
        }
        SurveyDate(raw.to_owned())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        if self.0.len() != 8 || !self.0.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(&self.0, "%m%d%Y").ok()
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CensusRecord {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub age: AgeCategory,
    pub primary_fur_color: String,
    pub highlight_fur_color: String,
    pub location: LocationCategory,
    pub activities: Activities,
    pub vocalizations: Vocalizations,
    pub interactions: Interactions,
    pub date: SurveyDate,
    pub shift: Shift,
}

impl CensusRecord {
    pub fn has_valid_position(&self) -> bool {
        is_valid_position(self.latitude, self.longitude)
    }

    pub fn check_geometry(&self) -> Result<(), CensusError> {
        if self.has_valid_position() {
            return Ok(());
        }
        Err(CensusError::InvalidGeometry {
            id: self.id.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

pub fn is_valid_position(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
pub(crate) fn test_record(id: &str, latitude: f64, longitude: f64) -> CensusRecord {
    CensusRecord {
        id: id.to_owned(),
        latitude,
        longitude,
        age: AgeCategory::Adult,
        primary_fur_color: "Gray".to_owned(),
        highlight_fur_color: UNKNOWN.to_owned(),
        location: LocationCategory::GroundPlane,
        activities: Activities::default(),
        vocalizations: Vocalizations::default(),
        interactions: Interactions::default(),
        date: SurveyDate::from_raw("10142018"),
        shift: Shift::PM,
    }
}
