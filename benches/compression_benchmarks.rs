use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huff_compress::frequency::FrequencyTable;
use huff_compress::{compress, decompress, HuffmanTrie};
use rand::{Rng, SeedableRng};

fn sample_text(len: usize) -> String {
    let words = ["lorem", "ipsum", "ação", "coração", "日本語", "😀", "the", "fox", "—", "über"];
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut text = String::with_capacity(len + 16);
    while text.len() < len {
        text.push_str(words[rng.gen_range(0..words.len())]);
        text.push(' ');
    }
    text
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        let text = sample_text(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| compress(black_box(text.as_bytes())).unwrap())
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        let packed = compress(sample_text(size).as_bytes()).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &packed, |b, packed| {
            b.iter(|| decompress(black_box(packed)).unwrap())
        });
    }
    group.finish();
}

fn bench_trie_build(c: &mut Criterion) {
    let text = sample_text(256 * 1024);
    let table = FrequencyTable::from_bytes(text.as_bytes()).unwrap();
    c.bench_function("trie_and_codes", |b| {
        b.iter(|| {
            let trie = HuffmanTrie::from_frequencies(black_box(&table)).unwrap();
            trie.code_table().unwrap()
        })
    });
}

criterion_group!(benches, bench_compress, bench_decompress, bench_trie_build);
criterion_main!(benches);
