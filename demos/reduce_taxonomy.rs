//! Reduces the demo taxonomy and prints the result as mermaid chart
//!
//! ```bash
//! RUST_LOG=debug cargo run --example reduce_taxonomy -- cumulative 10
//! ```
//!
//! The first argument selects the similarity (`resnik` or `cumulative`),
//! the second one a time limit in seconds.
use std::env;
use std::time::Duration;

use ontosim::similarity::Builtins;
use ontosim::{Predictor, RankLimits, ReducerConfig, TaxonomyReducer};

mod common;

fn main() {
    simple_logger::init_with_env().unwrap();
    let mut args = env::args().skip(1);

    let similarity = args
        .next()
        .map(|name| Builtins::new(&name).expect("similarity must be `resnik` or `cumulative`"))
        .unwrap_or_default();
    let mut config = ReducerConfig::default().with_similarity(similarity);
    if let Some(seconds) = args.next() {
        let seconds: u64 = seconds.parse().expect("time limit must be given in seconds");
        config = config.with_time_limit(Duration::from_secs(seconds));
    }

    let annotations = common::annotations();
    let limits = RankLimits::pool(&Predictor::with_similarity(&annotations, similarity));
    let before = annotations.taxonomy().stats();

    let reduction = TaxonomyReducer::with_config(annotations, limits, config).run();
    let after = reduction.taxonomy().stats();

    println!("Terms:  {} -> {}", before.size, after.size);
    println!("Leaves: {} -> {}", before.leaves, after.leaves);
    println!(
        "Removed {} terms, {} arcs and {} annotations in {} levels{}",
        reduction.removed_nodes,
        reduction.removed_arcs,
        reduction.removed_annotations,
        reduction.levels,
        if reduction.completed { "" } else { " (stopped by time limit)" }
    );

    for entity in reduction.annotations.entities() {
        let terms: Vec<&str> = entity.original_terms().iter().map(|t| t.as_str()).collect();
        println!("  {}\t{}", entity.name(), terms.join(", "));
    }
    println!("\n{}", reduction.taxonomy().as_mermaid());
}
