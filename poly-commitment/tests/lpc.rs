use ark_bn254::Fr;
use ark_ff::UniformRand;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, EvaluationDomain};
use placeholder_commitment::{
    lpc::{self, LpcParams},
    FriParams, Grinding, LpcProof,
};
use placeholder_transcript::{HashTranscript, SpongeTranscript, Transcript};
use rand::{rngs::StdRng, SeedableRng};

struct Instance {
    params: LpcParams<Fr>,
    polys: Vec<DensePolynomial<Fr>>,
    points: Vec<Vec<Fr>>,
}

fn instance(grinding_bits: u32) -> Instance {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(42);
    let params = LpcParams {
        lambda: 3,
        grinding_bits,
        fri: FriParams::new(2, 3, 31, 256).unwrap(),
    };
    let polys = (0..4)
        .map(|i| DensePolynomial::<Fr>::rand(31 - i, &mut rng))
        .collect();
    let zeta = Fr::rand(&mut rng);
    let omega = params.domain().element(1);
    let points = vec![
        vec![zeta],
        vec![zeta, zeta * omega],
        vec![Fr::rand(&mut rng)],
        vec![zeta, Fr::rand(&mut rng), Fr::rand(&mut rng)],
    ];
    Instance {
        params,
        polys,
        points,
    }
}

fn round_trip<T: Grinding<Fr>>(instance: &Instance, transcript: T) -> LpcProof<Fr, T::Nonce> {
    let Instance {
        params,
        polys,
        points,
    } = instance;
    let pre = lpc::precommit(polys, params.domain()).unwrap();
    let root = lpc::commit(&pre);

    let mut prover = transcript.clone();
    let proof = lpc::proof_eval(points, &pre, polys, params, &mut prover).unwrap();

    let mut verifier = transcript;
    assert!(lpc::verify_eval(points, &root, &proof, params, &mut verifier));
    assert_eq!(prover.challenge(), verifier.challenge());
    proof
}

#[test]
fn test_hash_transcript() {
    let instance = instance(8);
    round_trip(&instance, HashTranscript::<Fr>::new(b"lpc"));
}

#[test]
fn test_sponge_transcript() {
    let instance = instance(4);
    round_trip(&instance, SpongeTranscript::<Fr>::default());
}

#[test]
fn test_wrong_points_are_rejected() {
    let instance = instance(0);
    let proof = round_trip(&instance, HashTranscript::<Fr>::new(b"lpc"));
    let root = lpc::commit(&lpc::precommit(&instance.polys, instance.params.domain()).unwrap());

    let mut points = instance.points.clone();
    points[2][0] += Fr::from(1u64);
    assert!(!lpc::verify_eval(
        &points,
        &root,
        &proof,
        &instance.params,
        &mut HashTranscript::<Fr>::new(b"lpc"),
    ));
}

#[test]
fn test_wrong_nonce_is_rejected() {
    let instance = instance(16);
    let mut proof = round_trip(&instance, HashTranscript::<Fr>::new(b"lpc"));
    let root = lpc::commit(&lpc::precommit(&instance.polys, instance.params.domain()).unwrap());

    proof.grinding_nonce += 1;
    // the next nonce passes a 16-bit gate with probability 2^-16
    assert!(!lpc::verify_eval(
        &instance.points,
        &root,
        &proof,
        &instance.params,
        &mut HashTranscript::<Fr>::new(b"lpc"),
    ));
}

#[test]
fn test_serde_round_trip() {
    let instance = instance(0);
    let proof = round_trip(&instance, SpongeTranscript::<Fr>::default());
    let root = lpc::commit(&lpc::precommit(&instance.polys, instance.params.domain()).unwrap());

    let bytes = rmp_serde::to_vec(&proof).unwrap();
    let decoded: LpcProof<Fr, Fr> = rmp_serde::from_slice(&bytes).unwrap();
    assert_eq!(decoded, proof);
    assert!(lpc::verify_eval(
        &instance.points,
        &root,
        &decoded,
        &instance.params,
        &mut SpongeTranscript::<Fr>::default(),
    ));
}
