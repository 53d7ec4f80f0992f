use criterion::{criterion_group, criterion_main, Criterion};
use vsm_core::{build_index, build_index_parallel, search, SearchOptions};

const WORDS: &[&str] = &[
    "ancient", "family", "heiress", "land", "warwickshire", "robert", "rupert", "marriage", "licence", "records",
    "church", "parish", "london", "theatre", "globe", "company", "play", "sonnet", "king", "queen",
];

fn corpus(n: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|i| {
            let text: Vec<&str> = (0..50).map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()]).collect();
            (format!("doc{i:05}"), text.join(" "))
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let docs = corpus(2_000);
    c.bench_function("build_index_2k", |b| b.iter(|| build_index(docs.iter().map(|(id, t)| (id.as_str(), t.as_str()))).unwrap()));
    c.bench_function("build_index_parallel_2k", |b| b.iter(|| build_index_parallel(&docs).unwrap()));
}

fn bench_search(c: &mut Criterion) {
    let index = build_index(corpus(2_000)).unwrap();
    let opts = SearchOptions::default();
    c.bench_function("search_known_terms", |b| b.iter(|| search(&index, "ancient family heiress land", &opts)));
    c.bench_function("search_phonetic_fallback", |b| b.iter(|| search(&index, "robbert warwikshire", &opts)));
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
