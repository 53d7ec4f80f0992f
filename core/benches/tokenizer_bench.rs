use criterion::{criterion_group, criterion_main, Criterion};
use vsm_core::soundex::soundex;
use vsm_core::tokenizer::tokenize;

const TEXT: &str = "Warwickshire, came from an ancient family and was the heiress to some land. \
    Robert and Rupert met in 1582; the marriage licence survives in the Worcester records.";

fn bench_tokenize(c: &mut Criterion) {
    let text = TEXT.repeat(64);
    c.bench_function("tokenize_paragraphs", |b| b.iter(|| tokenize(&text).count()));
}

fn bench_soundex(c: &mut Criterion) {
    let tokens: Vec<String> = tokenize(TEXT).collect();
    c.bench_function("soundex_tokens", |b| b.iter(|| tokens.iter().filter_map(|t| soundex(t)).count()));
}

criterion_group!(benches, bench_tokenize, bench_soundex);
criterion_main!(benches);
