use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use family_atlas_layout::config::LayoutConfig;
use family_atlas_layout::ir::{Graph, RelationKind};
use family_atlas_layout::layout::{LayoutMode, compute_layout};

/// Complete binary descendancy with a partner for every second person.
fn synthetic_tree(people: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 1..=people {
        graph.ensure_person(&format!("p{i}"), Some(format!("Person {i}")));
    }
    for i in 1..=people {
        for child in [i * 2, i * 2 + 1] {
            if child <= people {
                graph.add_relationship(
                    &format!("p{i}"),
                    &format!("p{child}"),
                    RelationKind::ParentChild,
                );
            }
        }
        if i % 2 == 0 {
            let partner = format!("s{i}");
            graph.ensure_person(&partner, Some(format!("Spouse {i}")));
            graph.add_relationship(&format!("p{i}"), &partner, RelationKind::Partnership);
        }
    }
    graph
}

fn bench_modes(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let graph = synthetic_tree(255);
    let mut group = c.benchmark_group("modes");
    for mode in [
        LayoutMode::Vertical,
        LayoutMode::Horizontal,
        LayoutMode::Circular,
        LayoutMode::Fan,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(mode.as_str()), &mode, |b, mode| {
            b.iter(|| compute_layout(&graph, *mode, &config));
        });
    }
    group.finish();
}

fn bench_sizes(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let mut group = c.benchmark_group("vertical");
    for size in [15usize, 127, 511] {
        let graph = synthetic_tree(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| compute_layout(graph, LayoutMode::Vertical, &config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_modes, bench_sizes);
criterion_main!(benches);
