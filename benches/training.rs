use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput};
use subtok::{Trainer, TrainerConfig};

fn build_corpus() -> String {
    let lexicon = [
        "low", "lower", "lowest", "new", "newer", "newest", "wide", "wider", "widest",
    ];
    let mut corpus = String::with_capacity(1 << 20);
    let mut index = 0usize;
    while corpus.len() < 1 << 20 {
        corpus.push_str(lexicon[index % lexicon.len()]);
        corpus.push(' ');
        index = index.wrapping_mul(31).wrapping_add(7);
    }
    corpus
}

fn bench_training(c: &mut Criterion) {
    let corpus = build_corpus();
    let total_bytes = corpus.len();

    let mut group = c.benchmark_group("train_text_corpus");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.sampling_mode(SamplingMode::Flat);
    group.sample_size(10);
    for merges in [32usize, 128] {
        let cfg = TrainerConfig::builder()
            .num_merges(merges)
            .show_progress(false)
            .build()
            .expect("configuration");
        group.bench_function(BenchmarkId::from_parameter(merges), |b| {
            b.iter(|| {
                let trainer = Trainer::new(cfg.clone());
                let artifacts = trainer.train_from_text(&corpus).expect("training");
                let _ = black_box(artifacts);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_training);
criterion_main!(benches);
