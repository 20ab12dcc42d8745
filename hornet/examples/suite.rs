//! Example suite binary hosting its benchmark pages in-process.
//!
//! ```text
//! cargo run --example suite -- --definitions hornet/examples/benchmarks.json list
//! cargo run --example suite -- --definitions hornet/examples/benchmarks.json run --select et=string
//! ```

use hornet::prelude::*;
use std::hint::black_box;

fn size(arg: &serde_json::Value) -> usize {
    arg.as_u64().unwrap_or(1000) as usize
}

fn sort_reversed() -> BenchmarkPage {
    BenchmarkPage::new().with_test(|arg| {
        let mut values: Vec<u64> = (0..size(arg) as u64).rev().collect();
        values.sort_unstable();
        black_box(values);
    })
}

fn string_join() -> BenchmarkPage {
    BenchmarkPage::new().with_test(|arg| {
        let parts: Vec<String> = (0..size(arg)).map(|i| i.to_string()).collect();
        black_box(parts.join(","));
    })
}

fn substring_search() -> BenchmarkPage {
    BenchmarkPage::new().with_test_async(|deferred, arg| {
        let n = size(arg);
        std::thread::spawn(move || {
            let haystack = "abcab".repeat(n);
            black_box(haystack.matches("cab").count());
            deferred.resolve();
        });
    })
}

fn binary_search() -> BenchmarkPage {
    BenchmarkPage::new().with_test(|arg| {
        let values: Vec<usize> = (0..size(arg)).collect();
        let found = values.iter().filter(|v| values.binary_search(v).is_ok()).count();
        black_box(found);
    })
}

fn main() -> anyhow::Result<()> {
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/sortreversed.html", sort_reversed)
        .with_page("benchmarks/stringjoin.html", string_join)
        .with_page("benchmarks/substring.html", substring_search)
        .with_page("benchmarks/binarysearch.html", binary_search);

    hornet::run(launcher)
}
