//! Behavioural tests for random simple-graph generation.

use std::collections::HashSet;

use graph_demo::{
    ArgumentError, GraphError, RandomSimpleGraphGenerator, SamplingStrategy, SimpleGraph,
    generate, max_edges,
};
use proptest::prelude::*;
use rstest::rstest;

fn assert_simple(graph: &SimpleGraph, nodes: usize, edges: usize) {
    assert_eq!(graph.nodes().collect::<Vec<_>>(), (0..nodes).collect::<Vec<_>>());
    assert_eq!(graph.edge_count(), edges);

    let mut seen = HashSet::new();
    for edge in graph.edges() {
        let (a, b) = edge.endpoints();
        assert_ne!(a, b, "self-loop {edge}");
        assert!(b < nodes, "endpoint out of range in {edge}");
        assert!(seen.insert(edge), "duplicate edge {edge}");
    }
}

#[test]
fn five_nodes_five_edges() {
    let graph = generate(5, 5).expect("request fits");
    assert_simple(&graph, 5, 5);
}

#[test]
fn two_nodes_have_a_single_possible_edge() {
    let graph = generate(2, 1).expect("request fits");
    assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(
        graph.edges().map(|edge| edge.endpoints()).collect::<Vec<_>>(),
        vec![(0, 1)]
    );
}

#[rstest]
#[case::over_complete(3, 4)]
#[case::single_node(1, 1)]
#[case::huge_request(10, usize::MAX)]
fn over_bound_requests_fail(#[case] nodes: usize, #[case] edges: usize) {
    let err = generate(nodes, edges).expect_err("request exceeds bound");
    assert!(matches!(
        err,
        GraphError::InvalidArgument(ArgumentError::TooManyEdges { .. })
    ));
}

#[rstest]
#[case(0, 1, ArgumentError::ZeroNodes)]
#[case(5, 0, ArgumentError::ZeroEdges)]
fn zero_counts_fail(#[case] nodes: usize, #[case] edges: usize, #[case] expected: ArgumentError) {
    assert_eq!(
        generate(nodes, edges).expect_err("zero count"),
        GraphError::InvalidArgument(expected)
    );
}

#[rstest]
#[case(SamplingStrategy::Rejection)]
#[case(SamplingStrategy::CandidatePool)]
#[case(SamplingStrategy::Auto)]
fn complete_graph_is_reachable(#[case] strategy: SamplingStrategy) {
    let graph = RandomSimpleGraphGenerator::seeded(5)
        .with_strategy(strategy)
        .generate(8, max_edges(8))
        .expect("complete graph fits");
    assert_simple(&graph, 8, 28);
    assert_eq!(graph.isolated_nodes().count(), 0);
}

#[test]
fn sparse_request_keeps_isolated_nodes() {
    let graph = RandomSimpleGraphGenerator::seeded(13)
        .generate(50, 1)
        .expect("request fits");
    assert_eq!(graph.node_count(), 50);
    assert_eq!(graph.isolated_nodes().count(), 48);
}

#[rstest]
#[case(SamplingStrategy::Rejection)]
#[case(SamplingStrategy::CandidatePool)]
fn equal_seeds_give_equal_graphs(#[case] strategy: SamplingStrategy) {
    let edges_for = |seed| {
        RandomSimpleGraphGenerator::seeded(seed)
            .with_strategy(strategy)
            .generate(20, 40)
            .expect("request fits")
            .edges()
            .collect::<Vec<_>>()
    };
    assert_eq!(edges_for(42), edges_for(42));
}

#[test]
fn explicit_pool_handles_sparse_request_on_huge_graph() {
    let graph = RandomSimpleGraphGenerator::seeded(3)
        .with_strategy(SamplingStrategy::CandidatePool)
        .generate(1_000_000, 1)
        .expect("request fits");
    assert_simple(&graph, 1_000_000, 1);
}

// Every pair of K4 should be picked `runs * edges / 6` times; the band is
// several standard deviations wide, and the seed fixes the outcome.
#[rstest]
#[case::rejection_single(SamplingStrategy::Rejection, 1)]
#[case::rejection_half(SamplingStrategy::Rejection, 3)]
#[case::pool_single(SamplingStrategy::CandidatePool, 1)]
#[case::pool_half(SamplingStrategy::CandidatePool, 3)]
fn pairs_are_drawn_uniformly(#[case] strategy: SamplingStrategy, #[case] edges: usize) {
    const RUNS: usize = 30_000;
    let mut generator = RandomSimpleGraphGenerator::seeded(2024).with_strategy(strategy);
    let mut counts = [[0_usize; 4]; 4];
    for _ in 0..RUNS {
        let graph = generator.generate(4, edges).expect("request fits");
        for edge in graph.edges() {
            counts[edge.low()][edge.high()] += 1;
        }
    }

    let expected = RUNS * edges / max_edges(4);
    let tolerance = expected * 8 / 100;
    for low in 0..4 {
        for high in (low + 1)..4 {
            let seen = counts[low][high];
            assert!(
                seen.abs_diff(expected) <= tolerance,
                "pair ({low}, {high}) drawn {seen} times, expected {expected} +/- {tolerance}"
            );
        }
    }
}

proptest! {
    #[test]
    fn generated_graphs_are_simple(
        nodes in 2_usize..40,
        fraction in 0.0_f64..=1.0,
        seed in any::<u64>(),
        pool in any::<bool>(),
    ) {
        let max = max_edges(nodes);
        let edges = ((max as f64 * fraction).round() as usize).clamp(1, max);
        let strategy = if pool { SamplingStrategy::CandidatePool } else { SamplingStrategy::Rejection };
        let graph = RandomSimpleGraphGenerator::seeded(seed)
            .with_strategy(strategy)
            .generate(nodes, edges)
            .expect("request fits");
        assert_simple(&graph, nodes, edges);
    }

    #[test]
    fn requests_beyond_bound_always_fail(nodes in 1_usize..40, extra in 1_usize..100) {
        let edges = max_edges(nodes) + extra;
        prop_assert!(matches!(
            generate(nodes, edges),
            Err(GraphError::InvalidArgument(ArgumentError::TooManyEdges { .. }))
        ), "expected TooManyEdges error");
    }
}
