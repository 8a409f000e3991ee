use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rayon::prelude::*;

use ontosim::similarity::Builtins;
use ontosim::{AnnotationGraph, Predictor, Taxonomy, TermGroup, TermRecord};

/// A taxonomy of `n_terms` with a branching factor of 3 and some
/// secondary parents, each entity carries 5 pseudo-random terms
fn synthetic_annotations(n_terms: usize, n_entities: usize) -> AnnotationGraph {
    let records = (0..n_terms).map(|idx| {
        let record = TermRecord::new(format!("T:{idx:07}"), format!("Term {idx}"));
        match idx {
            0 => record,
            idx if idx % 7 == 0 && (idx - 1) / 5 != (idx - 1) / 3 => record.with_parents([
                format!("T:{:07}", (idx - 1) / 3),
                format!("T:{:07}", (idx - 1) / 5),
            ]),
            idx => record.with_parents([format!("T:{:07}", (idx - 1) / 3)]),
        }
    });
    let taxonomy = Taxonomy::load(records).expect("synthetic taxonomy is valid");

    let mut annotations = AnnotationGraph::new(taxonomy);
    let mut seed = 42usize;
    for entity in 0..n_entities {
        let id = format!("E:{entity:05}");
        for _ in 0..5 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            let term = format!("T:{:07}", (seed >> 33) % n_terms);
            annotations.add_direct_annotation(&id, &id, &term);
        }
    }
    annotations.propagate_closure();
    annotations
}

fn rank_sequential(predictor: &Predictor<'_>, queries: &[TermGroup]) -> usize {
    queries
        .iter()
        .map(|query| predictor.ranked_matches(query).len())
        .sum()
}

fn rank_parallel(predictor: &Predictor<'_>, queries: &[TermGroup]) -> usize {
    queries
        .par_iter()
        .map(|query| predictor.ranked_matches(query).len())
        .sum()
}

fn similarity_benchmark(c: &mut Criterion) {
    let annotations = synthetic_annotations(2_000, 300);
    let queries: Vec<TermGroup> = annotations
        .entities()
        .take(20)
        .map(|entity| entity.original_terms().clone())
        .collect();

    let resnik = Predictor::new(&annotations);
    let cumulative = Predictor::with_similarity(&annotations, Builtins::Cumulative);
    let (a, b) = (&queries[0], &queries[1]);

    c.bench_function("resnik set similarity", |bench| {
        bench.iter(|| resnik.symmetric_similarity(black_box(a), black_box(b)))
    });

    c.bench_function("cumulative set similarity", |bench| {
        bench.iter(|| cumulative.symmetric_similarity(black_box(a), black_box(b)))
    });

    c.bench_function("ranked matches 20 queries", |bench| {
        bench.iter(|| rank_sequential(black_box(&resnik), black_box(&queries)))
    });

    c.bench_function("ranked matches 20 queries parallel", |bench| {
        bench.iter(|| rank_parallel(black_box(&resnik), black_box(&queries)))
    });
}

criterion_group!(similarity, similarity_benchmark);
criterion_main!(similarity);
