use criterion::{Criterion, criterion_group, criterion_main};

use verdigris::prelude::*;

/// Square lattice of footways with a sprinkling of raw signals.
fn lattice(side: usize) -> RouteGraph {
    let mut graph = RouteGraph::with_capacity(side * side, 2 * side * side);
    let id = |row: usize, col: usize| (row * side + col) as NodeId;
    for row in 0..side {
        for col in 0..side {
            let mut n = RouteNode::new(id(row, col), 44.6 + row as f64 * 1e-4, 10.9 + col as f64 * 1e-4);
            n.modes.pedestrian = true;
            n.green_area = (row + col) % 7 == 0;
            graph.add_node(n);
        }
    }
    for row in 0..side {
        for col in 0..side {
            if col + 1 < side {
                graph
                    .add_edge_with_distance(id(row, col), id(row, col + 1), 10.0, RoadClass::Footway, None)
                    .unwrap();
            }
            if row + 1 < side {
                graph
                    .add_edge_with_distance(id(row, col), id(row + 1, col), 10.0, RoadClass::Footway, None)
                    .unwrap();
            }
        }
    }
    let mut pollutant = 5.0;
    for row in 0..side {
        let edge = graph.edge_between_mut(id(row, 0), id(row, 1)).unwrap();
        edge.pollutant = Some(pollutant);
        pollutant += 3.0;
    }
    graph
}

fn bench_compose(c: &mut Criterion) {
    c.bench_function("compose_all lattice 30x30", |b| {
        b.iter_with_setup(
            || lattice(30),
            |mut graph| compose_all(&mut graph, &ComposeConfig::default()).unwrap(),
        );
    });
}

fn bench_tour(c: &mut Criterion) {
    let mut graph = lattice(20);
    compose_all(&mut graph, &ComposeConfig::default()).unwrap();
    let waypoints: Vec<NodeId> = vec![0, 19, 399, 380, 210, 95];

    c.bench_function("plan_tour 6 waypoints lattice 20x20", |b| {
        b.iter(|| {
            plan_tour(
                &graph,
                &DijkstraEngine,
                &waypoints,
                Channel::Distance,
                &TourConfig::default(),
            )
            .unwrap()
        });
    });
}

criterion_group!(benches, bench_compose, bench_tour);
criterion_main!(benches);
