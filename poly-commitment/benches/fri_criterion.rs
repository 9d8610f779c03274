use ark_bn254::Fr;
use ark_ff::UniformRand;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use placeholder_commitment::{
    lpc::{self, LpcParams},
    FriParams,
};
use placeholder_transcript::HashTranscript;
use rand::{rngs::StdRng, SeedableRng};

fn benchmark_lpc_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("LPC");
    group.sample_size(10);
    let mut rng = StdRng::seed_from_u64(0);

    for log_n in [8, 12].into_iter() {
        let n = 1 << log_n;
        let params = LpcParams {
            lambda: 10,
            grinding_bits: 0,
            fri: FriParams::<Fr>::new(2, 4, n - 1, n << 3).unwrap(),
        };
        let polys: Vec<_> = (0..4)
            .map(|_| DensePolynomial::<Fr>::rand(n - 1, &mut rng))
            .collect();
        let points: Vec<Vec<Fr>> = (0..4).map(|_| vec![Fr::rand(&mut rng)]).collect();
        let pre = lpc::precommit(&polys, params.domain()).unwrap();

        group.bench_with_input(BenchmarkId::new("LPC open", n), &n, |b, _| {
            b.iter_batched(
                || HashTranscript::<Fr>::new(b"bench"),
                |mut transcript| {
                    black_box(lpc::proof_eval(&points, &pre, &polys, &params, &mut transcript))
                },
                BatchSize::SmallInput,
            );
        });

        let proof = lpc::proof_eval(
            &points,
            &pre,
            &polys,
            &params,
            &mut HashTranscript::<Fr>::new(b"bench"),
        )
        .unwrap();
        let root = lpc::commit(&pre);
        group.bench_with_input(BenchmarkId::new("LPC verify", n), &n, |b, _| {
            b.iter_batched(
                || HashTranscript::<Fr>::new(b"bench"),
                |mut transcript| {
                    black_box(lpc::verify_eval(
                        &points,
                        &root,
                        &proof,
                        &params,
                        &mut transcript,
                    ))
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, benchmark_lpc_open);
criterion_main!(benches);
