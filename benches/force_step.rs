use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use std::time::Duration;

use egui_linkgraph::layouts::force_directed::{step, ForceSettings};
use egui_linkgraph::layouts::{seed, LayoutSnapshot};
use egui_linkgraph::{Entity, EntityKind, Link, LinkKind, Subgraph, VisibleGraph};

fn make_graph(num_nodes: usize, num_links: usize, clusters: u32) -> VisibleGraph {
    let entities = (0..num_nodes)
        .map(|i| {
            let e = Entity::new(format!("E{i}"), EntityKind::Person, format!("entity {i}"));
            if clusters > 0 && i % 3 != 0 {
                e.with_cluster(i as u32 % clusters)
            } else {
                e
            }
        })
        .collect();

    // a simple chain for determinism
    let mut links: Vec<Link> = (1..num_nodes)
        .map(|i| {
            Link::new(
                format!("L{i}"),
                format!("E{}", i - 1),
                format!("E{i}"),
                LinkKind::Call,
                (i % 10 + 1) as f32,
            )
        })
        .collect();
    // sprinkle some extra links up to num_links
    let mut i = 0usize;
    while links.len() < num_links && num_nodes >= 2 {
        let a = i % num_nodes;
        let b = (i * 37 + 11) % num_nodes;
        if a != b {
            links.push(Link::new(
                format!("X{i}"),
                format!("E{a}"),
                format!("E{b}"),
                LinkKind::Transfer,
                1.,
            ));
        }
        i += 1;
    }

    VisibleGraph::from_subgraph(Subgraph { entities, links })
}

fn seeded(g: &VisibleGraph, settings: &ForceSettings) -> LayoutSnapshot {
    let mut rng = StdRng::seed_from_u64(42);
    seed(&LayoutSnapshot::default(), g, settings, &mut rng)
}

fn bench_force_step(c: &mut Criterion) {
    let settings = ForceSettings::default();
    let canvas = settings.canvas_rect();
    let mut group = c.benchmark_group("force_steps");
    group.sample_size(10);
    group.measurement_time(Duration::from_millis(600));
    group.warm_up_time(Duration::from_millis(200));

    group.bench_function("n60_m90_steps100", |b| {
        let g = make_graph(60, 90, 6);
        b.iter_batched(
            || seeded(&g, &settings),
            |mut snapshot| {
                for _ in 0..100 {
                    snapshot = step(&snapshot, &g, &settings, canvas, None);
                }
                black_box(snapshot);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("n1000_m2000_steps1", |b| {
        let g = make_graph(1000, 2000, 6);
        b.iter_batched(
            || seeded(&g, &settings),
            |snapshot| {
                black_box(step(&snapshot, &g, &settings, canvas, None));
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().configure_from_args();
    targets = bench_force_step
}
criterion_main!(benches);
