//! Selected census record to the detail panel descriptor.
//!
//! Every visual choice is a table lookup keyed by category, and every lookup
//! has a fallback, so rendering never fails.

use crate::audio::SoundChannel;
use crate::census::{AgeCategory, CensusRecord, LocationCategory};
use serde::Serialize;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub enum Swatch {
    Gray,
    Cinnamon,
    Black,
    White,
}

impl Swatch {
    pub const DEFAULT: Swatch = Swatch::Gray;

    pub fn key(&self) -> &'static str {
        match self {
            Swatch::Gray => "color:Gray",
            Swatch::Cinnamon => "color:Cinnamon",
            Swatch::Black => "color:Black",
            Swatch::White => "color:White",
        }
    }
}

const PALETTE: [(&str, Swatch); 4] = [
    ("Gray", Swatch::Gray),
    ("Cinnamon", Swatch::Cinnamon),
    ("Black", Swatch::Black),
    ("White", Swatch::White),
];

pub fn primary_swatch(color: &str) -> Swatch {
    PALETTE
        .iter()
        .find(|(name, _)| *name == color)
        .map_or(Swatch::DEFAULT, |(_, swatch)| *swatch)
}

/// Highlights can list several colors (`"Cinnamon, White"`); the first wins.
pub fn highlight_swatch(color: &str) -> Swatch {
    PALETTE
        .iter()
        .find(|(name, _)| color.starts_with(name))
        .map_or(Swatch::DEFAULT, |(_, swatch)| *swatch)
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct ColorSwatch {
    pub key: &'static str,
    /// Color as written in the census, before palette matching.
    pub raw: String,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Badge {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

const AGE_BADGES: [(AgeCategory, &str, &str); 3] = [
    (AgeCategory::Adult, "age:Adult", "Adult"),
    (AgeCategory::Juvenile, "age:Juvenile", "Juvenile"),
    (AgeCategory::Unknown, "age:Unknown", "Unknown"),
];

const ELEVATION_BADGES: [(LocationCategory, &str, &str); 3] = [
    (LocationCategory::GroundPlane, "elevation:GroundPlane", "Ground Plane"),
    (LocationCategory::AboveGround, "elevation:AboveGround", "Above Ground"),
    (LocationCategory::Unknown, "elevation:Unknown", "Unknown"),
];

/// Mutually exclusive: exactly the row matching `value` is active.
fn exclusive<T: PartialEq + Copy>(table: &[(T, &'static str, &'static str)], value: T) -> Vec<Badge> {
    table
        .iter()
        .map(|(category, key, label)| Badge {
            key: *key,
            label: *label,
            active: *category == value,
        })
        .collect()
}

fn flags(table: &[(&'static str, &'static str, bool)]) -> Vec<Badge> {
    table
        .iter()
        .map(|(key, label, active)| Badge {
            key: *key,
            label: *label,
            active: *active,
        })
        .collect()
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct DetailView {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub primary_color: ColorSwatch,
    pub highlight_color: ColorSwatch,
    pub age: Vec<Badge>,
    pub elevation: Vec<Badge>,
    pub activities: Vec<Badge>,
    pub vocalizations: Vec<Badge>,
    pub interactions: Vec<Badge>,
    /// `MM.DD.YY` when the survey date is 8 digits, otherwise the census
    /// value exactly as written (possibly empty).
    pub date: String,
    pub shift: &'static str,
}

/// `MMDDYYYY` sliced to `MM.DD.YY`; anything that isn't eight ASCII digits
/// is shown as recorded.
pub fn format_survey_date(raw: &str) -> String {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_owned();
    }
    format!("{}.{}.{}", &raw[0..2], &raw[2..4], &raw[6..8])
}

pub fn render_detail(record: &CensusRecord) -> DetailView {
    let activities = &record.activities;
    let vocalizations = &record.vocalizations;
    let interactions = &record.interactions;

    DetailView {
        id: record.id.clone(),
        latitude: record.latitude,
        longitude: record.longitude,
        primary_color: ColorSwatch {
            key: primary_swatch(&record.primary_fur_color).key(),
            raw: record.primary_fur_color.clone(),
        },
        highlight_color: ColorSwatch {
            key: highlight_swatch(&record.highlight_fur_color).key(),
            raw: record.highlight_fur_color.clone(),
        },
        age: exclusive(&AGE_BADGES, record.age),
        elevation: exclusive(&ELEVATION_BADGES, record.location),
        activities: flags(&[
            ("activity:Running", "Running", activities.running),
            ("activity:Chasing", "Chasing", activities.chasing),
            ("activity:Climbing", "Climbing", activities.climbing),
            ("activity:Eating", "Eating", activities.eating),
            ("activity:Foraging", "Foraging", activities.foraging),
        ]),
        vocalizations: flags(&[
            (SoundChannel::Kuks.key(), "Kuks", vocalizations.kuks),
            (SoundChannel::Quaas.key(), "Quaas", vocalizations.quaas),
            (SoundChannel::Moans.key(), "Moans", vocalizations.moans),
        ]),
        interactions: flags(&[
            ("interaction:TailFlags", "Tail flags", interactions.tail_flags),
            ("interaction:TailTwitches", "Tail twitches", interactions.tail_twitches),
            ("interaction:Approaches", "Approaches", interactions.approaches),
            ("interaction:Indifferent", "Indifferent", interactions.indifferent),
            ("interaction:RunsFrom", "Runs from", interactions.runs_from),
        ]),
        date: format_survey_date(record.date.raw()),
        shift: record.shift.as_str(),
    }
}
