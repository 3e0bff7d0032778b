//! Random simple-graph generation.
//!
//! [`RandomSimpleGraphGenerator`] picks `num_edges` distinct unordered node
//! pairs out of `0..num_nodes`. Every accepted draw is uniform over the pairs
//! that are still unused; the request is validated against the simple-graph
//! edge bound before any sampling starts, so an impossible request fails
//! instead of spinning forever.

use std::collections::HashSet;

use rand::rngs::{StdRng, ThreadRng};
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng, thread_rng};
use thiserror::Error;
use tracing::{Span, debug, field, instrument};

use crate::graph::{Edge, SimpleGraph};

/// Reasons a generation request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A graph needs at least one node.
    #[error("node count must be at least 1")]
    ZeroNodes,
    /// At least one edge must be requested.
    #[error("edge count must be at least 1")]
    ZeroEdges,
    /// More edges were requested than a simple graph on `nodes` can hold.
    #[error("{requested} edges requested but a simple graph on {nodes} nodes holds at most {max}")]
    TooManyEdges {
        /// Requested node count.
        nodes: usize,
        /// Requested edge count.
        requested: usize,
        /// `nodes * (nodes - 1) / 2`.
        max: usize,
    },
}

/// Errors raised by graph generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The requested node or edge count cannot produce a simple graph.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
}

/// How unused node pairs are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Draw a fresh random pair each iteration and retry on collision.
    #[default]
    Rejection,
    /// Enumerate every pair once and take a random prefix of a partial
    /// shuffle. Never retries, but allocates all `n(n-1)/2` candidates, so
    /// sparse requests with more than 2^24 candidate pairs use rejection.
    CandidatePool,
    /// Rejection while the request fills at most half of the possible pairs,
    /// candidate pool above that.
    Auto,
}

impl SamplingStrategy {
    /// Name used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rejection => "rejection",
            Self::CandidatePool => "candidate-pool",
            Self::Auto => "auto",
        }
    }

    const fn resolve(self, num_edges: usize, max: usize) -> Sampler {
        let sparse = num_edges <= max / 2;
        match self {
            Self::Rejection => Sampler::Rejection,
            Self::CandidatePool if sparse && max > MAX_CANDIDATE_POOL => Sampler::Rejection,
            Self::CandidatePool => Sampler::CandidatePool,
            Self::Auto if sparse => Sampler::Rejection,
            Self::Auto => Sampler::CandidatePool,
        }
    }
}

// Dense requests above this still enumerate the pool: the output itself holds
// at least half as many edges.
const MAX_CANDIDATE_POOL: usize = 1 << 24;

/// Sampling loop actually run for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sampler {
    Rejection,
    CandidatePool,
}

impl Sampler {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Rejection => "rejection",
            Self::CandidatePool => "candidate-pool",
        }
    }
}

/// Largest number of edges a simple undirected graph on `num_nodes` nodes
/// can hold. Saturates at `usize::MAX` rather than overflowing.
#[must_use]
pub fn max_edges(num_nodes: usize) -> usize {
    if num_nodes < 2 {
        return 0;
    }
    // Halve the even factor first so the product only overflows when the
    // result itself does.
    let (a, b) = if num_nodes % 2 == 0 {
        (num_nodes / 2, num_nodes - 1)
    } else {
        (num_nodes, (num_nodes - 1) / 2)
    };
    a.checked_mul(b).unwrap_or(usize::MAX)
}

/// Checks that `(num_nodes, num_edges)` describes a satisfiable request.
///
/// # Errors
/// Returns [`GraphError::InvalidArgument`] when either count is zero or the
/// edge count exceeds [`max_edges`].
pub fn validate_request(num_nodes: usize, num_edges: usize) -> Result<(), GraphError> {
    if num_nodes == 0 {
        return Err(ArgumentError::ZeroNodes.into());
    }
    if num_edges == 0 {
        return Err(ArgumentError::ZeroEdges.into());
    }
    let max = max_edges(num_nodes);
    if num_edges > max {
        return Err(ArgumentError::TooManyEdges {
            nodes: num_nodes,
            requested: num_edges,
            max,
        }
        .into());
    }
    Ok(())
}

/// Generates a random simple graph with the thread-local RNG and the
/// default strategy.
///
/// # Errors
/// Returns [`GraphError::InvalidArgument`] for unsatisfiable requests.
///
/// # Examples
/// ```
/// let graph = graph_demo::generate(5, 5)?;
/// assert_eq!(graph.node_count(), 5);
/// assert_eq!(graph.edge_count(), 5);
/// # Ok::<(), graph_demo::GraphError>(())
/// ```
pub fn generate(num_nodes: usize, num_edges: usize) -> Result<SimpleGraph, GraphError> {
    RandomSimpleGraphGenerator::new().generate(num_nodes, num_edges)
}

/// Samples simple graphs from an owned random source.
#[derive(Debug, Clone)]
pub struct RandomSimpleGraphGenerator<R = ThreadRng> {
    rng: R,
    strategy: SamplingStrategy,
}

impl RandomSimpleGraphGenerator<ThreadRng> {
    /// Generator backed by the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(thread_rng())
    }
}

impl Default for RandomSimpleGraphGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSimpleGraphGenerator<StdRng> {
    /// Reproducible generator: equal seeds yield equal graphs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSimpleGraphGenerator<R> {
    /// Generator drawing from a caller-supplied RNG.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            strategy: SamplingStrategy::Rejection,
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub const fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Produces a simple graph on nodes `0..num_nodes` with exactly
    /// `num_edges` edges.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidArgument`] when `num_nodes` or
    /// `num_edges` is zero, or when `num_edges` exceeds [`max_edges`].
    #[instrument(
        name = "generator.generate",
        level = "debug",
        err,
        skip(self),
        fields(strategy = field::Empty, rejected = field::Empty),
    )]
    pub fn generate(
        &mut self,
        num_nodes: usize,
        num_edges: usize,
    ) -> Result<SimpleGraph, GraphError> {
        validate_request(num_nodes, num_edges)?;
        let sampler = self.strategy.resolve(num_edges, max_edges(num_nodes));
        let span = Span::current();
        span.record("strategy", field::display(sampler.as_str()));

        let edges = match sampler {
            Sampler::CandidatePool => self.sample_from_pool(num_nodes, num_edges),
            Sampler::Rejection => {
                let (edges, rejected) = self.sample_with_rejection(num_nodes, num_edges);
                span.record("rejected", rejected);
                edges
            }
        };

        debug!(edges = edges.len(), "graph generated");
        Ok(SimpleGraph::from_edges(num_nodes, &edges))
    }

    // Caller guarantees `2 <= num_nodes` and `num_edges <= max_edges(num_nodes)`.
    fn sample_with_rejection(&mut self, num_nodes: usize, num_edges: usize) -> (Vec<Edge>, u64) {
        let mut seen = HashSet::with_capacity(num_edges);
        let mut edges = Vec::with_capacity(num_edges);
        let mut rejected = 0_u64;
        while edges.len() < num_edges {
            let pair = index::sample(&mut self.rng, num_nodes, 2);
            let Some(edge) = Edge::new(pair.index(0), pair.index(1)) else {
                continue;
            };
            if seen.insert(edge) {
                edges.push(edge);
            } else {
                rejected += 1;
            }
        }
        (edges, rejected)
    }

    fn sample_from_pool(&mut self, num_nodes: usize, num_edges: usize) -> Vec<Edge> {
        let mut pool: Vec<Edge> = (0..num_nodes)
            .flat_map(|low| ((low + 1)..num_nodes).filter_map(move |high| Edge::new(low, high)))
            .collect();
        let (chosen, _) = pool.partial_shuffle(&mut self.rng, num_edges);
        chosen.to_vec()
    }
}
