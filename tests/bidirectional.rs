use meeting_paths::{
    error::SearchError,
    graphs::{
        road_graph::{Coordinate, RoadGraph},
        vec_vec_graph::VecVecGraph,
        Graph, Vertex, WeightedEdge,
    },
    search::{
        alt::{geographic::GeographicHeuristic, landmark::Landmarks},
        bidirectional::{BidirectionalSearch, QueueKind, SearchConfig, WorkerOutcome},
        dijkstra::Dijkstra,
        DistanceHeuristic, PathFinding, TrivialHeuristic,
    },
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const A: Vertex = 0;
const E: Vertex = 1;
const B: Vertex = 2;
const C: Vertex = 3;
const D: Vertex = 4;

// A - B - C - D and A - E - D, every segment has weight one
fn two_routes() -> VecVecGraph {
    VecVecGraph::from_edges(&[
        WeightedEdge::bidirectional(A, B, 1.0),
        WeightedEdge::bidirectional(B, C, 1.0),
        WeightedEdge::bidirectional(C, D, 1.0),
        WeightedEdge::bidirectional(A, E, 1.0),
        WeightedEdge::bidirectional(E, D, 1.0),
    ])
}

fn configs() -> Vec<SearchConfig> {
    [QueueKind::Keyed, QueueKind::BinaryHeap]
        .into_iter()
        .map(|queue| SearchConfig {
            queue,
            ..SearchConfig::default()
        })
        .collect()
}

fn random_tree(number_of_vertices: u32, rng: &mut StdRng) -> VecVecGraph {
    let edges: Vec<_> = (1..number_of_vertices)
        .map(|vertex| {
            let parent = rng.gen_range(0..vertex);
            WeightedEdge::bidirectional(vertex, parent, rng.gen_range(1..10) as f64)
        })
        .collect();
    VecVecGraph::from_edges(&edges)
}

fn random_grid(side: u32, rng: &mut StdRng) -> RoadGraph {
    let mut edges = Vec::new();
    let mut coordinates = Vec::new();
    for row in 0..side {
        for column in 0..side {
            let vertex = row * side + column;
            coordinates.push(Coordinate::new(
                48.0 + row as f64 * 0.001,
                9.0 + column as f64 * 0.001,
            ));
            if column + 1 < side {
                edges.push(WeightedEdge::bidirectional(
                    vertex,
                    vertex + 1,
                    rng.gen_range(100..200) as f64,
                ));
            }
            if row + 1 < side {
                edges.push(WeightedEdge::bidirectional(
                    vertex,
                    vertex + side,
                    rng.gen_range(100..200) as f64,
                ));
            }
        }
    }
    RoadGraph::from_edges(&edges, coordinates)
}

#[test]
fn short_route_wins_under_every_interleaving() {
    let graph = two_routes();

    for config in configs() {
        let search = BidirectionalSearch::with_config(&graph, &TrivialHeuristic {}, config);
        for _ in 0..50 {
            let report = search.search(A, D).unwrap();
            let path = report.path.unwrap();

            assert_eq!(path.vertices, vec![A, E, D]);
            assert_eq!(path.distance, 2.0);
            assert!(report.forward.is_success() || report.backward.is_success());
            assert_eq!(report.completed, 2);
            assert_eq!(report.notifications, 1);
        }
    }
}

// Same graph with A to E numbered 0 to 4. B now comes before E in the
// adjacency of A, so under first meeting termination both routes are legal.
#[test]
fn natural_labels_return_a_connected_route() {
    let graph = VecVecGraph::from_edges(&[
        WeightedEdge::bidirectional(0, 1, 1.0),
        WeightedEdge::bidirectional(1, 2, 1.0),
        WeightedEdge::bidirectional(2, 3, 1.0),
        WeightedEdge::bidirectional(0, 4, 1.0),
        WeightedEdge::bidirectional(4, 3, 1.0),
    ]);

    for config in configs() {
        let search = BidirectionalSearch::with_config(&graph, &TrivialHeuristic {}, config);
        for _ in 0..50 {
            let report = search.search(0, 3).unwrap();
            let path = report.path.unwrap();

            assert!(
                path.vertices == vec![0, 4, 3] || path.vertices == vec![0, 1, 2, 3],
                "unexpected route {:?}",
                path.vertices
            );
            assert_eq!(graph.get_path_distance(&path.vertices), Some(path.distance));
            assert!(report.forward.is_success() || report.backward.is_success());
            assert_eq!(report.completed, 2);
            assert_eq!(report.notifications, 1);
        }
    }
}

#[test]
fn disconnected_vertices() {
    let graph = VecVecGraph::from_edges(&[
        WeightedEdge::bidirectional(0, 1, 1.0),
        WeightedEdge::bidirectional(2, 3, 1.0),
    ]);
    let search = BidirectionalSearch::new(&graph, &TrivialHeuristic {});

    for _ in 0..20 {
        let report = search.search(0, 3).unwrap();
        assert_eq!(report.path, None);
        assert_eq!(report.forward, WorkerOutcome::NoPathFound);
        assert_eq!(report.backward, WorkerOutcome::NoPathFound);
        assert_eq!(report.meeting, None);
        assert_eq!(report.completed, 2);
        assert_eq!(report.notifications, 1);
    }

    assert!(matches!(
        search.find_path(0, 3),
        Err(SearchError::NoPathFound {
            from: 0,
            target: 3
        })
    ));
    assert_eq!(search.shortest_path(0, 3), None);
    assert_eq!(
        search.find_path(0, 3).unwrap_err().to_string(),
        "no path from 0 to 3"
    );
}

#[test]
fn one_way_edge_against_travel_direction() {
    let graph = VecVecGraph::from_edges(&[WeightedEdge::one_way(0, 1, 1.0)]);
    let search = BidirectionalSearch::new(&graph, &TrivialHeuristic {});

    let report = search.search(1, 0).unwrap();
    assert_eq!(report.path, None);
    assert_eq!(report.forward, WorkerOutcome::NoPathFound);
    assert_eq!(report.backward, WorkerOutcome::NoPathFound);
}

#[test]
fn one_way_chain_is_found_by_forward_search() {
    let graph = VecVecGraph::from_edges(&[
        WeightedEdge::one_way(0, 1, 2.0),
        WeightedEdge::one_way(1, 2, 3.0),
    ]);
    let search = BidirectionalSearch::new(&graph, &TrivialHeuristic {});

    for _ in 0..20 {
        let report = search.search(0, 2).unwrap();
        let path = report.path.unwrap();
        assert_eq!(path.vertices, vec![0, 1, 2]);
        assert_eq!(path.distance, 5.0);
        // the backward search cannot use a single edge
        assert_ne!(report.backward, WorkerOutcome::Met);
        assert!(report.forward.is_success());
    }
}

#[test]
fn source_equals_target() {
    let graph = two_routes();
    let search = BidirectionalSearch::new(&graph, &TrivialHeuristic {});

    for vertex in graph.vertices() {
        let report = search.search(vertex, vertex).unwrap();
        let path = report.path.unwrap();
        assert_eq!(path.vertices, vec![vertex]);
        assert_eq!(path.distance, 0.0);
        assert_eq!(report.completed, 2);
    }

    let isolated = VecVecGraph::new(1);
    let search = BidirectionalSearch::new(&isolated, &TrivialHeuristic {});
    assert_eq!(search.find_path(0, 0).unwrap().vertices, vec![0]);
}

#[test]
fn out_of_range_is_rejected() {
    let graph = two_routes();
    let search = BidirectionalSearch::new(&graph, &TrivialHeuristic {});

    assert!(matches!(
        search.search(5, 0),
        Err(SearchError::VertexOutOfRange {
            vertex: 5,
            number_of_vertices: 5
        })
    ));
    assert!(matches!(
        search.find_path(0, Vertex::MAX),
        Err(SearchError::VertexOutOfRange { .. })
    ));
}

#[test]
fn unique_paths_match_dijkstra() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..5 {
        let graph = random_tree(40, &mut rng);
        let dijkstra = Dijkstra::new(&graph);

        for config in configs() {
            let search = BidirectionalSearch::with_config(&graph, &TrivialHeuristic {}, config);
            for _ in 0..20 {
                let source = rng.gen_range(0..graph.number_of_vertices());
                let target = rng.gen_range(0..graph.number_of_vertices());

                let path = search.shortest_path(source, target).unwrap();
                let expected = dijkstra.shortest_path(source, target).unwrap();
                assert_eq!(path.vertices, expected.vertices);
                assert!((path.distance - expected.distance).abs() < 1e-9);
            }
        }
    }
}

fn assert_valid_paths(graph: &RoadGraph, heuristic: &dyn DistanceHeuristic, rng: &mut StdRng) {
    let dijkstra = Dijkstra::new(graph);
    let search = BidirectionalSearch::new(graph, heuristic);

    for _ in 0..30 {
        let source = rng.gen_range(0..graph.number_of_vertices());
        let target = rng.gen_range(0..graph.number_of_vertices());

        let report = search.search(source, target).unwrap();
        let path = report.path.unwrap();
        let exact = dijkstra.shortest_path_distance(source, target).unwrap();

        assert_eq!(path.vertices.first(), Some(&source));
        assert_eq!(path.vertices.last(), Some(&target));
        assert_eq!(graph.get_path_distance(&path.vertices), Some(path.distance));
        assert!(path.distance >= exact - 1e-9);
        assert_eq!(report.completed, 2);
        assert_eq!(report.notifications, 1);
    }
}

#[test]
fn grid_paths_are_valid_for_every_heuristic() {
    let mut rng = StdRng::seed_from_u64(1);
    let graph = random_grid(8, &mut rng);

    assert_valid_paths(&graph, &TrivialHeuristic {}, &mut rng);

    // neighbouring vertices are roughly 75 to 110 meters apart
    let geographic = GeographicHeuristic::new(graph.coordinates(), 0.5);
    assert_valid_paths(&graph, &geographic, &mut rng);

    let landmarks = Landmarks::random(&graph, 4, &mut rng);
    assert_valid_paths(&graph, &landmarks, &mut rng);
}
