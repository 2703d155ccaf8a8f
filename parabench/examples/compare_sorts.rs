//! Compare sorting strategies across input sizes.
//!
//! Demonstrates the full pipeline: register variants, screen them with
//! `check`, sweep with a per-variant time budget, and flatten the raw
//! samples into plot-ready series.
//!
//! Run with:
//!   cargo run --release --example compare_sorts

use std::time::Duration;

use anyhow::Context;
use parabench::TeardownInfo;
use parabench::prelude::*;

fn insertion_sort(input: &[u64]) -> Vec<u64> {
    let mut v = input.to_vec();
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && v[j - 1] > v[j] {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
    v
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let bench = ParaBench::with_setup(|n| {
        // Reverse-sorted input: worst case for insertion sort.
        (0..n).rev().collect::<Vec<u64>>()
    })
    .teardown(|info: TeardownInfo<Vec<u64>, Vec<u64>>| {
        (!info.output.is_sorted()).then(|| "output not sorted".to_string())
    })
    .progress(|p| {
        eprintln!(
            "[{:>5.1}%] {} n={} time={:.6}s",
            100.0 * p.total_time / p.total_max_time.max(f64::MIN_POSITIVE),
            p.name,
            p.n,
            p.result.time,
        );
    })
    .add("insertion_sort", |input| insertion_sort(&input))
    .add("std_sort", |mut v| {
        v.sort();
        v
    })
    .add("std_sort_unstable", |mut v| {
        v.sort_unstable();
        v
    });

    // Catch hangs and wrong outputs before burning a time budget on them.
    if let Some(bad) = bench.check(Duration::from_millis(500), 64).await {
        anyhow::bail!("broken variants: {bad:?}");
    }

    let raw = bench
        .compare(&CompareOptions {
            max_arg: Some(1 << 16),
            max_time: Some(2.0),
            repeat: 5,
            ..Default::default()
        })
        .await
        .context("sweep failed")?;

    let flat = flatten_data(&raw, &FlattenOptions::default());
    println!("{}", serde_json::to_string_pretty(&flat)?);

    Ok(())
}
