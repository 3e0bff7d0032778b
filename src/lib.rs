//! Random simple-graph generation with Graphviz rendering, plus a static
//! city connectivity map.
//!
//! The generator is pure: it takes a node count, an edge count and a random
//! source, and returns an immutable [`SimpleGraph`]. Rendering, city data
//! loading and the CLI are thin adapters around it.

pub mod city;
pub mod cli;
pub mod generator;
pub mod graph;
pub mod logging;
pub mod map;
pub mod render;

pub use city::{
    CityData, CityRecord, Coordinates, DataLoadError, MapError, Province, load_city_data,
};
pub use generator::{
    ArgumentError, GraphError, RandomSimpleGraphGenerator, SamplingStrategy, generate, max_edges,
    validate_request,
};
pub use graph::{Edge, SimpleGraph};
pub use map::{CityMap, CityRow, ConnectionRow, DeckSpec, MapStyle, ViewState};
pub use render::{GraphStyle, RenderError, render_dot};
