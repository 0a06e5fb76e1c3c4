//! Census and asset fixtures written to temporary directories

use super::constants::*;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CENSUS_HEADER: &str = "X,Y,Unique Squirrel ID,Hectare,Shift,Date,Hectare Squirrel Number,Age,Primary Fur Color,Highlight Fur Color,Combination of Primary and Highlight Color,Color notes,Location,Above Ground Sighter Measurement,Specific Location,Running,Chasing,Climbing,Eating,Foraging,Other Activities,Kuks,Quaas,Moans,Tail flags,Tail twitches,Approaches,Indifferent,Runs from,Other Interactions,Lat/Long";

/// Builds one census line. `flags` covers Running through Runs from, in header order.
#[allow(clippy::too_many_arguments)]
fn census_row(
    x: &str,
    y: &str,
    id: &str,
    shift: &str,
    date: &str,
    age: &str,
    primary: &str,
    highlight: &str,
    location: &str,
    flags: [bool; 13],
) -> String {
    let flags: Vec<String> = flags.iter().map(|f| f.to_string().to_uppercase()).collect();
    let (activities, rest) = flags.split_at(5);
    format!(
        "{x},{y},{id},1A,{shift},{date},1,{age},{primary},{highlight},,,{location},,,{},,{},,POINT ({x} {y})",
        activities.join(","),
        rest.join(","),
    )
}

fn census_csv() -> String {
    let mut running_kuks = [false; 13];
    running_kuks[0] = true;
    running_kuks[5] = true;

    let mut eating_approaches = [false; 13];
    eating_approaches[3] = true;
    eating_approaches[10] = true;

    let rows = [
        census_row(
            "-73.9600", "40.7800", CLUSTERED_ADULT_ID, "PM", "10142018",
            "Adult", "Gray", "Cinnamon", "Above Ground", running_kuks,
        ),
        census_row(
            "-73.9601", "40.7801", CLUSTERED_JUVENILE_ID, "PM", "10142018",
            "Juvenile", "Cinnamon", "", "Ground Plane", [false; 13],
        ),
        census_row(
            "-73.9599", "40.7802", CLUSTERED_UNKNOWN_ID, "PM", "10142018",
            "?", "Black", "\"Cinnamon, White\"", "", eating_approaches,
        ),
        census_row(
            "-73.9800", "40.7650", LONE_SQUIRREL_ID, "AM", "7062018",
            "Adult", "Gray", "", "Ground Plane", [false; 13],
        ),
        census_row(
            "", "40.7700", "5C-AM-1010-02", "AM", "10102018",
            "Adult", "Gray", "", "Ground Plane", [false; 13],
        ),
    ];

    let mut csv = String::from(CENSUS_HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(&row);
    }
    csv.push('\n');
    csv
}

/// A RIFF/WAVE header with an empty data chunk, enough for type sniffing.
fn tiny_wav() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&36u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&8u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

/// Writes the census CSV and an assets dir holding only the kuk clip.
/// Returns (temp_dir, census_path, assets_dir)
pub fn create_test_census() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;

    let census_path = dir.path().join("census.csv");
    fs::write(&census_path, census_csv())?;

    let assets_dir = dir.path().join("assets");
    fs::create_dir_all(&assets_dir)?;
    fs::write(assets_dir.join("squirrel-kuk.wav"), tiny_wav())?;

    Ok((dir, census_path, assets_dir))
}
