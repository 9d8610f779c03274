use ark_bn254::Fr;
use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use placeholder::bench::BenchmarkCtx;
use placeholder_transcript::{HashTranscript, SpongeTranscript};

pub fn bench_proof_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Proof creation");
    group.sample_size(10).sampling_mode(SamplingMode::Flat); // for slow benchmarks

    let ctx = BenchmarkCtx::<Fr, HashTranscript<Fr>>::new(10);
    group.bench_function("proof creation (2^10, hash)", |b| {
        b.iter(|| black_box(ctx.create_proof()))
    });

    let ctx = BenchmarkCtx::<Fr, SpongeTranscript<Fr>>::new(10);
    group.bench_function("proof creation (2^10, sponge)", |b| {
        b.iter(|| black_box(ctx.create_proof()))
    });
}

pub fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Proof verification");
    group.sample_size(10).sampling_mode(SamplingMode::Flat);

    let ctx = BenchmarkCtx::<Fr, HashTranscript<Fr>>::new(6);
    let proof = ctx.create_proof().unwrap();
    group.bench_function("proof verification", |b| {
        b.iter(|| assert!(ctx.verify(black_box(&proof))))
    });
}

criterion_group!(benches, bench_proof_creation, bench_proof_verification);
criterion_main!(benches);
