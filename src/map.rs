//! Projection of city data into tabular rows and map layers.

use std::io;

use serde::Serialize;
use tracing::debug;

use crate::city::{CityData, MapError, Province};

/// One row per city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    #[serde(rename = "City")]
    pub name: String,
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Lon")]
    pub lon: f64,
}

/// One row per drawn connection, endpoints as coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectionRow {
    #[serde(rename = "Lat1")]
    pub lat1: f64,
    #[serde(rename = "Lon1")]
    pub lon1: f64,
    #[serde(rename = "Lat2")]
    pub lat2: f64,
    #[serde(rename = "Lon2")]
    pub lon2: f64,
}

impl ConnectionRow {
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.lat1, self.lon1, self.lat2, self.lon2]
    }
}

/// Tabular form of a city network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityMap {
    pub cities: Vec<CityRow>,
    pub connections: Vec<ConnectionRow>,
    /// Connections that named a city missing from the data.
    pub skipped: usize,
}

impl CityMap {
    /// Builds city and connection rows from `data`.
    ///
    /// A connection to a city absent from `data` is skipped. A pair listed
    /// from both ends yields one row per direction.
    #[must_use]
    pub fn from_data(data: &CityData) -> Self {
        let mut map = Self::default();

        for (name, record) in data {
            map.cities.push(CityRow {
                name: name.clone(),
                lat: record.coords.lat,
                lon: record.coords.lon,
            });

            for target in &record.connections {
                let Some(other) = data.get(target) else {
                    debug!(
                        city = name.as_str(),
                        connection = target.as_str(),
                        "unknown connection skipped"
                    );
                    map.skipped += 1;
                    continue;
                };
                map.connections.push(ConnectionRow {
                    lat1: record.coords.lat,
                    lon1: record.coords.lon,
                    lat2: other.coords.lat,
                    lon2: other.coords.lon,
                });
            }
        }
        map
    }

    /// Writes `City,Lat,Lon` rows.
    ///
    /// # Errors
    /// Returns [`MapError::Csv`] if serialisation or the writer fails.
    pub fn write_cities_csv(&self, writer: impl io::Write) -> Result<(), MapError> {
        write_rows(writer, &self.cities)
    }

    /// Writes `Lat1,Lon1,Lat2,Lon2` rows.
    ///
    /// # Errors
    /// Returns [`MapError::Csv`] if serialisation or the writer fails.
    pub fn write_connections_csv(&self, writer: impl io::Write) -> Result<(), MapError> {
        write_rows(writer, &self.connections)
    }
}

fn write_rows<T: Serialize>(writer: impl io::Write, rows: &[T]) -> Result<(), MapError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Initial camera for a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
}

impl ViewState {
    #[must_use]
    pub const fn for_province(province: Province) -> Self {
        let (latitude, longitude) = province.centre();
        Self {
            latitude,
            longitude,
            zoom: 10.0,
            pitch: 0.0,
        }
    }
}

/// Presentation options for a city map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStyle {
    pub city_radius: u32,
    pub city_color: [u8; 4],
    pub line_color: [u8; 4],
    pub line_width: u32,
    pub view: ViewState,
    pub map_style: String,
}

impl MapStyle {
    #[must_use]
    pub fn for_province(province: Province) -> Self {
        Self {
            city_radius: 5000,
            city_color: [0, 255, 255, 140],
            line_color: [255, 0, 0, 255],
            line_width: 3,
            view: ViewState::for_province(province),
            map_style: "mapbox://styles/mapbox/streets-v11".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterplotLayer {
    pub data: Vec<CityRow>,
    pub get_position: [&'static str; 2],
    pub get_radius: u32,
    pub get_fill_color: [u8; 4],
    pub pickable: bool,
    pub auto_highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLayer {
    pub data: Vec<ConnectionRow>,
    pub get_source_position: [&'static str; 2],
    pub get_target_position: [&'static str; 2],
    pub get_color: [u8; 4],
    pub get_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@@type")]
pub enum Layer {
    #[serde(rename = "ScatterplotLayer")]
    Scatterplot(ScatterplotLayer),
    #[serde(rename = "LineLayer")]
    Line(LineLayer),
}

/// Serialisable deck description: city dots, connection lines and the
/// initial view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSpec {
    pub layers: Vec<Layer>,
    pub initial_view_state: ViewState,
    pub map_style: String,
}

impl DeckSpec {
    #[must_use]
    pub fn for_map(map: &CityMap, style: &MapStyle) -> Self {
        let cities = Layer::Scatterplot(ScatterplotLayer {
            data: map.cities.clone(),
            get_position: ["Lon", "Lat"],
            get_radius: style.city_radius,
            get_fill_color: style.city_color,
            pickable: true,
            auto_highlight: true,
        });
        let lines = Layer::Line(LineLayer {
            data: map.connections.clone(),
            get_source_position: ["Lon1", "Lat1"],
            get_target_position: ["Lon2", "Lat2"],
            get_color: style.line_color,
            get_width: style.line_width,
        });
        Self {
            layers: vec![cities, lines],
            initial_view_state: style.view,
            map_style: style.map_style.clone(),
        }
    }

    /// Writes the description as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`MapError::Serialize`] if serialisation or the writer fails.
    pub fn write_json(&self, writer: impl io::Write) -> Result<(), MapError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
