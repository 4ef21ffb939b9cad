//! Tour planning and point-to-point routing over small synthetic graphs

use verdigris::prelude::*;

fn node(graph: &mut RouteGraph, id: NodeId, lat: f64, lon: f64) {
    let mut n = RouteNode::new(id, lat, lon);
    n.modes.pedestrian = true;
    graph.add_node(n);
}

fn ring(ids: &[NodeId]) -> RouteGraph {
    let mut graph = RouteGraph::new();
    for (k, &id) in ids.iter().enumerate() {
        node(&mut graph, id, 44.6 + k as f64 * 0.001, 10.9);
    }
    for k in 0..ids.len() {
        let a = ids[k];
        let b = ids[(k + 1) % ids.len()];
        graph
            .add_edge_with_distance(a, b, 1.0, RoadClass::Footway, None)
            .unwrap();
    }
    graph
}

#[test]
fn tour_over_a_ring_walks_the_perimeter() {
    let graph = ring(&[1, 2, 3, 4, 5]);
    let tour = plan_tour(
        &graph,
        &DijkstraEngine,
        &[1, 2, 3, 4, 5],
        Channel::Distance,
        &TourConfig::default(),
    )
    .unwrap();

    assert!((tour.total_cost - 5.0).abs() < 1e-9);
    assert_eq!(tour.waypoints.len(), 6);
    assert_eq!(tour.waypoints.first(), tour.waypoints.last());

    // stitched hops close the ring with no duplicate except the ends
    assert_eq!(tour.path.len(), 6);
    assert_eq!(tour.path.first(), tour.path.last());
    let mut middle = tour.path[..5].to_vec();
    middle.sort_unstable();
    middle.dedup();
    assert_eq!(middle.len(), 5);
}

#[test]
fn square_tour_visits_the_corners_in_ring_order() {
    let graph = ring(&[10, 20, 30, 40]);
    let tour = plan_tour(
        &graph,
        &DijkstraEngine,
        &[10, 20, 30, 40],
        Channel::Distance,
        &TourConfig::default(),
    )
    .unwrap();

    assert!((tour.total_cost - 4.0).abs() < 1e-9);
    assert_eq!(tour.waypoints[0], 10);
    // either direction around the square is optimal
    assert!(
        tour.waypoints == vec![10, 20, 30, 40, 10] || tour.waypoints == vec![10, 40, 30, 20, 10]
    );
}

#[test]
fn dynamic_search_matches_the_exact_tour() {
    let graph = ring(&[1, 2, 3, 4, 5, 6]);
    let exact = plan_tour(
        &graph,
        &DijkstraEngine,
        &[1, 2, 3, 4, 5, 6],
        Channel::Distance,
        &TourConfig::default(),
    )
    .unwrap();
    let dynamic = plan_tour(
        &graph,
        &DijkstraEngine,
        &[1, 2, 3, 4, 5, 6],
        Channel::Distance,
        &TourConfig {
            exact_search_limit: 2,
            ..TourConfig::default()
        },
    )
    .unwrap();
    assert!((exact.total_cost - dynamic.total_cost).abs() < 1e-9);
}

#[test]
fn intermediate_hops_are_expanded_into_the_path() {
    // chain 1 - 2 - 3; visiting {1, 3} must pass through 2 both ways
    let mut graph = RouteGraph::new();
    for id in 1..=3 {
        node(&mut graph, id, 44.6 + id as f64 * 0.001, 10.9);
    }
    graph
        .add_edge_with_distance(1, 2, 1.0, RoadClass::Footway, None)
        .unwrap();
    graph
        .add_edge_with_distance(2, 3, 1.0, RoadClass::Footway, None)
        .unwrap();

    let tour = plan_tour(
        &graph,
        &DijkstraEngine,
        &[1, 3],
        Channel::Distance,
        &TourConfig::default(),
    )
    .unwrap();
    assert!((tour.total_cost - 4.0).abs() < 1e-9);
    assert_eq!(tour.path, vec![1, 2, 3, 2, 1]);
}

#[test]
fn stranded_waypoint_fails_the_whole_request() {
    let mut graph = ring(&[1, 2, 3, 4]);
    node(&mut graph, 99, 44.7, 10.8);

    let result = plan_tour(
        &graph,
        &DijkstraEngine,
        &[1, 3, 99],
        Channel::Distance,
        &TourConfig::default(),
    );
    match result {
        Err(Error::DisconnectedWaypoint { source: _, target }) => assert_eq!(target, 99),
        other => panic!("expected DisconnectedWaypoint, got {other:?}"),
    }
}

#[test]
fn waypoint_sets_are_validated() {
    let graph = ring(&[1, 2, 3, 4]);

    assert!(matches!(
        plan_tour(
            &graph,
            &DijkstraEngine,
            &[1],
            Channel::Distance,
            &TourConfig::default()
        ),
        Err(Error::InvalidWaypoints(_))
    ));
    assert!(matches!(
        plan_tour(
            &graph,
            &DijkstraEngine,
            &[1, 2, 2],
            Channel::Distance,
            &TourConfig::default()
        ),
        Err(Error::InvalidWaypoints(_))
    ));
    assert!(matches!(
        plan_tour(
            &graph,
            &DijkstraEngine,
            &[1, 2, 7],
            Channel::Distance,
            &TourConfig::default()
        ),
        Err(Error::UnknownNode(7))
    ));
}

#[test]
fn tour_respects_the_chosen_channel() {
    // square with a heavily polluted southern edge; blended weights route
    // the 10-30 leg around the north even though distances are equal
    let mut graph = ring(&[10, 20, 30, 40]);
    graph.edge_between_mut(10, 20).unwrap().pollutant = Some(90.0);
    let mut config = ComposeConfig::default();
    config.green_ratio = 0.0;
    compose_all(&mut graph, &config).unwrap();

    let route = find_route(
        &graph,
        &DijkstraEngine,
        10,
        20,
        Channel::AirGreenBlend,
    )
    .unwrap();
    assert_eq!(route.nodes, vec![10, 40, 30, 20]);
}

#[test]
fn point_to_point_route_reports_nodes_edges_and_cost() {
    let graph = ring(&[1, 2, 3, 4, 5]);
    let route = find_route(&graph, &DijkstraEngine, 1, 3, Channel::Distance).unwrap();
    assert!((route.total_cost - 2.0).abs() < 1e-9);
    assert_eq!(route.nodes, vec![1, 2, 3]);
    assert_eq!(route.edges.len(), 2);

    assert!(matches!(
        find_route(&graph, &DijkstraEngine, 1, 42, Channel::Distance),
        Err(Error::UnknownNode(42))
    ));
}

#[test]
fn disconnected_endpoints_surface_as_an_error() {
    let mut graph = ring(&[1, 2, 3]);
    node(&mut graph, 9, 44.7, 10.8);
    assert!(matches!(
        find_route(&graph, &DijkstraEngine, 1, 9, Channel::Distance),
        Err(Error::DisconnectedWaypoint { source: 1, target: 9 })
    ));
}

#[test]
fn bounded_worker_pool_produces_the_same_tour() {
    let graph = ring(&[1, 2, 3, 4, 5]);
    let pooled = plan_tour(
        &graph,
        &DijkstraEngine,
        &[1, 2, 3, 4, 5],
        Channel::Distance,
        &TourConfig {
            threads: Some(2),
            ..TourConfig::default()
        },
    )
    .unwrap();
    assert!((pooled.total_cost - 5.0).abs() < 1e-9);
}

#[test]
fn tour_exports_geojson() {
    let graph = ring(&[1, 2, 3, 4]);
    let tour = plan_tour(
        &graph,
        &DijkstraEngine,
        &[1, 2, 3, 4],
        Channel::Distance,
        &TourConfig::default(),
    )
    .unwrap();

    let collection = tour.to_geojson(&graph);
    // the hop line plus one point per waypoint entry
    assert_eq!(collection.features.len(), 1 + tour.waypoints.len());
}
