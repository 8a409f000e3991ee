//! Ranks the demo diseases by a set of query terms
//!
//! ```bash
//! cargo run --example rank_entities -- PH:0000112,PH:0000311
//! ```
use std::env;
use std::time::SystemTime;

use rayon::prelude::*;

use ontosim::{Predictor, TermGroup};

mod common;

fn main() {
    simple_logger::init_with_env().unwrap();

    let annotations = common::annotations();
    let predictor = Predictor::new(&annotations);

    let query: TermGroup = env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("PH:0000112,PH:0000311"))
        .split(',')
        .map(str::trim)
        .collect();

    println!("Query:");
    for term_id in &query {
        match annotations.taxonomy().get(term_id.as_str()) {
            Some(term) => println!("  {}\t{}\tIC {:.3}", term.id(), term.name(), predictor.information_content(term_id.as_str())),
            None => println!("  {term_id}\tunknown term"),
        }
    }

    println!("\nRanked matches:");
    for (idx, result) in predictor.ranked_matches(&query).iter().enumerate() {
        println!("{:>3}. {}\t{:.4}\t{}", idx + 1, result.id(), result.score(), result.name());
    }

    println!("\nTerms that would tell the best matches apart:");
    for result in predictor.differential_terms(&query).iter().take(5) {
        println!("  {}\t{:.4}\t{}", result.id(), result.score(), result.name());
    }

    let start = SystemTime::now();
    let entities: Vec<_> = annotations.entities().collect();
    let mut scores: Vec<(&str, f64)> = entities
        .par_iter()
        .map(|entity| (entity.id().as_str(), predictor.match_score(&query, entity.id().as_str())))
        .collect();
    scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let duration = start.elapsed().unwrap();

    println!("\nNormalized match scores ({} entities in {} µs):", scores.len(), duration.as_micros());
    for (id, score) in scores {
        let own_rank = predictor.own_pool_rank(id).unwrap_or_default();
        println!("  {id}\t{score:.4}\town pool rank {own_rank}");
    }
}
