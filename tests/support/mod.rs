#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use iterplot::stats::{BoundaryScores, IterationSample, IterationStatistics};

/// Fresh, empty scratch directory unique to `name` and this test process.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("iterplot-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Statistics of a small run: 3 epochs of 2 operations with 2 iterations each.
pub fn sample_statistics(with_gold: bool) -> IterationStatistics {
    let mut stats = IterationStatistics::new(Some("sample run".to_owned()))
        .with_categories(["PRE", "STM", "SUF", "ZZZ"])
        .with_word_tokens(1_000.0);

    let mut cost = 50_000.0;
    for epoch in 0..3 {
        for operation in 0..2 {
            for iteration in 0..2 {
                cost = if cost > 40_000.0 { 12_000.0 } else { cost * 0.97 };
                let step = f64::from(epoch * 4 + operation * 2 + iteration);
                stats
                    .record(IterationSample {
                        epoch,
                        operation,
                        iteration,
                        cost,
                        cost_parts: IndexMap::from([
                            ("lexicon".to_owned(), cost * 0.4),
                            ("corpus".to_owned(), cost * 0.6),
                        ]),
                        tag_counts: vec![100.0 + step, 400.0 - step, 250.0, 12.0],
                        morph_types: 800 - u64::from(epoch) * 20,
                        morph_tokens: 2_400 + u64::from(epoch) * 10,
                        duration_secs: 0.25 + step * 0.01,
                        average_morph_length: 4.0 + step * 0.05,
                        changes: 40 - u64::from(epoch) * 10,
                        changes_op: 20,
                        violated_annotations: None,
                        gold_bpr: with_gold.then(|| BoundaryScores::new(0.6 + step * 0.01, 0.5)),
                    })
                    .expect("valid sample");
            }
        }
    }
    stats
}
