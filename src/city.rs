//! City connectivity data and its JSON loader.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

/// Why a city data file could not be loaded.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading or projecting city data.
#[derive(Debug, Error)]
pub enum MapError {
    /// The city data file is missing, unreadable, or malformed.
    #[error("failed to load city data from `{path}`: {source}")]
    DataLoad {
        path: PathBuf,
        #[source]
        source: DataLoadError,
    },
    /// No map is defined for the named province.
    #[error("unknown province `{0}`; expected `West Java`")]
    UnknownProvince(String),
    /// Writing a CSV table failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    /// Serialising the layer description failed.
    #[error("failed to serialise map layers: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Latitude/longitude pair, stored in JSON as `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(coords: Coordinates) -> Self {
        (coords.lat, coords.lon)
    }
}

/// One city entry: its position and the names of the cities it links to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub coords: Coordinates,
    pub connections: Vec<String>,
}

/// City records keyed by name, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityData(BTreeMap<String, CityRecord>);

impl CityData {
    /// Parses city data from a JSON object.
    ///
    /// # Errors
    /// Returns [`serde_json::Error`] when `json` is not a valid city mapping.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CityRecord> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CityRecord> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a CityData {
    type Item = (&'a String, &'a CityRecord);
    type IntoIter = btree_map::Iter<'a, String, CityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, CityRecord)> for CityData {
    fn from_iter<I: IntoIterator<Item = (String, CityRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reads and parses a city data file.
///
/// # Errors
/// Returns [`MapError::DataLoad`] if the file cannot be read or is not a
/// valid city mapping.
#[instrument(name = "city.load", err, fields(path = %path.display()))]
pub fn load_city_data(path: &Path) -> Result<CityData, MapError> {
    let data_load = |source: DataLoadError| MapError::DataLoad {
        path: path.to_path_buf(),
        source,
    };
    let raw = fs::read_to_string(path).map_err(|err| data_load(err.into()))?;
    let data = CityData::from_json_str(&raw).map_err(|err| data_load(err.into()))?;
    info!(cities = data.len(), "city data loaded");
    Ok(data)
}

/// Provinces with a map definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Province {
    WestJava,
}

impl Province {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WestJava => "West Java",
        }
    }

    /// City data file read when none is given explicitly.
    #[must_use]
    pub const fn default_data_file(self) -> &'static str {
        match self {
            Self::WestJava => "city_data.json",
        }
    }

    /// Map centre as `(latitude, longitude)`.
    #[must_use]
    pub const fn centre(self) -> (f64, f64) {
        match self {
            // Bandung
            Self::WestJava => (-6.9175, 107.6191),
        }
    }
}

impl FromStr for Province {
    type Err = MapError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "West Java" => Ok(Self::WestJava),
            other => Err(MapError::UnknownProvince(other.to_owned())),
        }
    }
}
