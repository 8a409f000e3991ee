use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use ontosim::{AnnotationGraph, Predictor, RankLimits, Taxonomy, TaxonomyReducer, TermRecord};

fn synthetic_annotations(n_terms: usize, n_entities: usize) -> AnnotationGraph {
    let records = (0..n_terms).map(|idx| {
        let record = TermRecord::new(format!("T:{idx:05}"), format!("Term {idx}"));
        if idx == 0 {
            record
        } else {
            record.with_parents([format!("T:{:05}", (idx - 1) / 3)])
        }
    });
    let taxonomy = Taxonomy::load(records).expect("synthetic taxonomy is valid");

    let mut annotations = AnnotationGraph::new(taxonomy);
    let mut seed = 7usize;
    for entity in 0..n_entities {
        let id = format!("E:{entity:04}");
        for _ in 0..3 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            let term = format!("T:{:05}", (seed >> 33) % n_terms);
            annotations.add_direct_annotation(&id, &id, &term);
        }
    }
    annotations.propagate_closure();
    annotations
}

fn reduce_benchmark(c: &mut Criterion) {
    let annotations = synthetic_annotations(400, 60);
    let limits = RankLimits::pool(&Predictor::new(&annotations));

    c.bench_function("reduce 400 terms", |b| {
        b.iter_batched(
            || (annotations.clone(), limits.clone()),
            |(annotations, limits)| TaxonomyReducer::new(annotations, limits).run().removed_nodes,
            BatchSize::LargeInput,
        )
    });
}

criterion_group! {
    name = reduce;
    config = Criterion::default().sample_size(10).measurement_time(Duration::from_secs(20));
    targets = reduce_benchmark
}
criterion_main!(reduce);
