use criterion::{criterion_group, criterion_main, Criterion};
use keyword_core::tokenizer::{Stopwords, Tokenizer};

const TEXT: &str = "In a post-apocalyptic wasteland, a drifter reluctantly agrees to help a group of \
    survivors escape a tyrannical warlord. Along the way, friendships are tested, engines roar, \
    and the desert itself becomes the most dangerous adversary of all.";

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = Tokenizer::new(Stopwords::from_text("a\nthe\nof\nto\nand\nare\nin\nall\n"));
    c.bench_function("tokenize_description", |b| b.iter(|| tokenizer.tokenize(TEXT)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
