//! Graphviz rendering for generated graphs.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use petgraph::dot::{Config, Dot};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::graph::SimpleGraph;

const DEFAULT_NODE_COLOR: &str = "skyblue";
const DEFAULT_NODE_SIZE: u32 = 500;
const DEFAULT_FONT_SIZE: u32 = 10;
// Node size is an area in square points; Graphviz widths are inches.
const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Failed {
        program: &'static str,
        status: ExitStatus,
    },
}

/// Presentation options for a rendered graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStyle {
    pub node_color: String,
    /// Node area in square points.
    pub node_size: u32,
    pub font_size: u32,
    /// Overrides the generated "Graph with N Nodes and M Edges" caption.
    pub title: Option<String>,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            node_color: DEFAULT_NODE_COLOR.to_owned(),
            node_size: DEFAULT_NODE_SIZE,
            font_size: DEFAULT_FONT_SIZE,
            title: None,
        }
    }
}

impl GraphStyle {
    #[must_use]
    pub fn title_for(&self, graph: &SimpleGraph) -> String {
        self.title.clone().unwrap_or_else(|| {
            format!(
                "Graph with {} Nodes and {} Edges",
                graph.node_count(),
                graph.edge_count()
            )
        })
    }

    fn node_width(&self) -> f64 {
        f64::from(self.node_size).sqrt() / POINTS_PER_INCH
    }
}

/// Renders `graph` as Graphviz DOT text.
#[must_use]
pub fn render_dot(graph: &SimpleGraph, style: &GraphStyle) -> String {
    let width = style.node_width();
    let body = format!(
        "{:?}",
        Dot::with_attr_getters(
            graph.as_petgraph(),
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, _| String::new(),
            &|_, (_, id)| {
                format!(
                    "label=\"{id}\", shape=circle, style=filled, fillcolor=\"{}\", \
                     fixedsize=true, width={width:.2}, fontsize={}, fontname=\"Helvetica-Bold\"",
                    style.node_color, style.font_size
                )
            },
        )
    );
    let title = style.title_for(graph).replace('"', "\\\"");
    match body.split_once('\n') {
        Some((head, rest)) => {
            format!("{head}\n    label=\"{title}\"\n    labelloc=t\n{rest}")
        }
        None => body,
    }
}

/// Writes DOT text for `graph` to `path`.
#[instrument(name = "render.save_dot", err, skip(graph, style), fields(path = %path.display()))]
pub fn save_dot(graph: &SimpleGraph, style: &GraphStyle, path: &Path) -> Result<(), RenderError> {
    std::fs::write(path, render_dot(graph, style)).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Converts a DOT file to PNG with the Graphviz `dot` binary.
#[instrument(name = "render.png", err)]
pub fn render_png(dot_file: &Path, output_image: &Path) -> Result<(), RenderError> {
    let status = Command::new("dot")
        .arg("-Tpng")
        .arg(dot_file)
        .arg("-o")
        .arg(output_image)
        .status()
        .map_err(|source| RenderError::Spawn {
            program: "dot",
            source,
        })?;
    check_status("dot", status)?;
    debug!(image = %output_image.display(), "graph image rendered");
    Ok(())
}

/// Opens `image` in the platform's default viewer.
#[instrument(name = "render.open", err)]
pub fn open_image(image: &Path) -> Result<(), RenderError> {
    let opener = platform_opener();
    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", opener, ""]);
        command
    } else {
        Command::new(opener)
    };
    let status = command
        .arg(image)
        .status()
        .map_err(|source| RenderError::Spawn {
            program: opener,
            source,
        })?;
    check_status(opener, status)
}

const fn platform_opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "start"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

fn check_status(program: &'static str, status: ExitStatus) -> Result<(), RenderError> {
    if status.success() {
        Ok(())
    } else {
        Err(RenderError::Failed { program, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::generator::RandomSimpleGraphGenerator;

    #[test]
    fn default_title_names_counts() {
        let graph = RandomSimpleGraphGenerator::seeded(1)
            .generate(5, 5)
            .expect("valid request");
        assert_eq!(
            GraphStyle::default().title_for(&graph),
            "Graph with 5 Nodes and 5 Edges"
        );
    }

    #[test]
    fn title_quotes_are_escaped() {
        let graph = RandomSimpleGraphGenerator::seeded(1)
            .generate(2, 1)
            .expect("valid request");
        let style = GraphStyle {
            title: Some("say \"hi\"".to_owned()),
            ..GraphStyle::default()
        };
        let dot = render_dot(&graph, &style);
        assert!(dot.contains("label=\"say \\\"hi\\\"\""));
    }

    #[test]
    fn node_width_follows_area() {
        let style = GraphStyle {
            node_size: 5184,
            ..GraphStyle::default()
        };
        assert!((style.node_width() - 1.0).abs() < f64::EPSILON);
    }
}
