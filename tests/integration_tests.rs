//! Integration tests for trit-matmul.
//!
//! Algebraic laws of the ternary matmul across both backends, small
//! hand-computed products, and the error paths of the loaders.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use trit_matmul::{
    ternary_matmul, ternary_matmul_alloc, ternary_matmul_with, KernelConfig, MatmulBackend,
    ParallelBackend, ScalarBackend, TernaryError, TernaryMatrix, Trit,
};

/// Shapes covering degenerate, tiny and non-square cases.
const SHAPES: [(usize, usize, usize); 7] = [
    (1, 1, 1),
    (1, 256, 256),
    (3, 7, 5),
    (17, 33, 9),
    (32, 16, 64),
    (2, 0, 3),
    (0, 4, 4),
];

/// Random activations where roughly a third are zero.
fn sparse_activations(len: usize, seed: u64) -> Vec<i8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| if rng.gen_bool(0.33) { 0 } else { rng.gen() })
        .collect()
}

/// Every kernel configuration that must agree bit for bit.
fn all_configs() -> Vec<KernelConfig> {
    let mut configs = Vec::new();
    for skip in [true, false] {
        configs.push(KernelConfig::scalar().with_skip_zero_activations(skip));
        configs.push(KernelConfig::parallel().with_skip_zero_activations(skip));
        configs.push(
            KernelConfig::default()
                .with_skip_zero_activations(skip)
                .with_parallel_threshold(4),
        );
    }
    configs
}

/// Straightforward definition: C[m,n] = Σ_k A[m,k] * B[k,n].
fn reference(a: &[i8], b: &TernaryMatrix, m: usize, k: usize, n: usize) -> Vec<i32> {
    let mut c = vec![0i32; m * n];
    for row in 0..m {
        for col in 0..n {
            c[row * n + col] = (0..k)
                .map(|i| i32::from(a[row * k + i]) * i32::from(b.get(i, col)))
                .sum();
        }
    }
    c
}

#[test]
fn test_matches_reference_definition() {
    for (seed, &(m, k, n)) in SHAPES.iter().enumerate() {
        let b = TernaryMatrix::random(k, n, seed as u64);
        let a = sparse_activations(m * k, 100 + seed as u64);
        let expected = reference(&a, &b, m, k, n);

        for config in all_configs() {
            let mut c = vec![0i32; m * n];
            ternary_matmul_with(&config, &a, &b, m, k, n, &mut c).unwrap();
            assert_eq!(c, expected, "shape ({m}, {k}, {n}), config {config:?}");
        }
    }
}

#[test]
fn test_shape_law_output_fully_reset() {
    for &(m, k, n) in &SHAPES {
        let b = TernaryMatrix::new(k, n);
        let a = vec![1i8; m * k];

        for config in all_configs() {
            let mut c = vec![i32::MAX; m * n];
            ternary_matmul_with(&config, &a, &b, m, k, n, &mut c).unwrap();
            assert_eq!(c.len(), m * n);
            assert!(c.iter().all(|&v| v == 0), "stale output for ({m}, {k}, {n})");
        }
    }
}

#[test]
fn test_zero_weight_law() {
    let (m, k, n) = (5, 40, 12);
    let b = TernaryMatrix::new(k, n);
    let a: Vec<i8> = (0..m * k).map(|i| (i as i32 % 256 - 128) as i8).collect();

    assert_eq!(
        ternary_matmul_alloc(&a, &b, m, k, n).unwrap(),
        vec![0; m * n]
    );
}

#[test]
fn test_all_positive_law() {
    let (m, k, n) = (4, 31, 6);
    let b = TernaryMatrix::from_trits(vec![Trit::P; k * n], k, n).unwrap();
    let a = sparse_activations(m * k, 9);

    let c = ternary_matmul_alloc(&a, &b, m, k, n).unwrap();
    for row in 0..m {
        let row_sum: i32 = a[row * k..(row + 1) * k].iter().map(|&v| i32::from(v)).sum();
        for col in 0..n {
            assert_eq!(c[row * n + col], row_sum, "cell ({row}, {col})");
        }
    }
}

#[test]
fn test_sign_law() {
    let (m, k, n) = (3, 10, 4);
    let mut b = TernaryMatrix::from_trits(vec![Trit::P; k * n], k, n).unwrap();
    let a = sparse_activations(m * k, 77);
    let before = ternary_matmul_alloc(&a, &b, m, k, n).unwrap();

    let (flip_k, flip_n) = (6, 2);
    b.set(flip_k, flip_n, Trit::N);
    let after = ternary_matmul_alloc(&a, &b, m, k, n).unwrap();

    for row in 0..m {
        for col in 0..n {
            let idx = row * n + col;
            if col == flip_n {
                let term = i32::from(a[row * k + flip_k]);
                assert_eq!(after[idx], before[idx] - 2 * term);
            } else {
                assert_eq!(after[idx], before[idx]);
            }
        }
    }
}

#[test]
fn test_sparsity_shortcut_equivalence() {
    let (m, k, n) = (9, 128, 24);
    let b = TernaryMatrix::random(k, n, 4);
    let a = sparse_activations(m * k, 8);

    let mut with_skip = vec![0i32; m * n];
    let mut without_skip = vec![0i32; m * n];
    ScalarBackend::new(true)
        .matmul(&a, &b, m, k, n, &mut with_skip)
        .unwrap();
    ScalarBackend::new(false)
        .matmul(&a, &b, m, k, n, &mut without_skip)
        .unwrap();

    assert_eq!(with_skip, without_skip);
}

#[test]
fn test_determinism() {
    let (m, k, n) = (20, 64, 32);
    let b = TernaryMatrix::random(k, n, 31337);
    let a = sparse_activations(m * k, 1);

    let first = ternary_matmul_alloc(&a, &b, m, k, n).unwrap();
    for _ in 0..3 {
        assert_eq!(ternary_matmul_alloc(&a, &b, m, k, n).unwrap(), first);
    }

    let mut c = vec![0i32; m * n];
    ParallelBackend::default()
        .matmul(&a, &b, m, k, n, &mut c)
        .unwrap();
    assert_eq!(c, first);
}

#[test]
fn test_shared_weights_across_threads() {
    let (m, k, n) = (4, 48, 16);
    let b = TernaryMatrix::random(k, n, 5);
    let a = sparse_activations(m * k, 6);
    let expected = ternary_matmul_alloc(&a, &b, m, k, n).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| ternary_matmul_alloc(&a, &b, m, k, n).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_sign_driven_accumulation() {
    // A = [3, -2], B(0,0) = +1, B(1,0) = -1 -> 3*1 + (-2)*(-1)
    let b = TernaryMatrix::from_trits(vec![Trit::P, Trit::N], 2, 1).unwrap();
    let mut c = [0i32; 1];
    ternary_matmul(&[3, -2], &b, 1, 2, 1, &mut c).unwrap();
    assert_eq!(c, [5]);
}

#[test]
fn test_zero_activation_skips_row() {
    let b = TernaryMatrix::from_trits(vec![Trit::P, Trit::P], 2, 1).unwrap();
    for config in all_configs() {
        let mut c = [0i32; 1];
        ternary_matmul_with(&config, &[0, 5], &b, 1, 2, 1, &mut c).unwrap();
        assert_eq!(c, [5]);
    }
}

#[test]
fn test_all_zero_weights_small() {
    let b = TernaryMatrix::new(2, 2);
    let mut c = [0i32; 4];
    ternary_matmul(&[1, 2, 3, 4], &b, 2, 2, 2, &mut c).unwrap();
    assert_eq!(c, [0, 0, 0, 0]);
}

#[test]
fn test_empty_inner_dimension() {
    let b = TernaryMatrix::new(0, 3);
    let mut c = [42i32; 6];
    ternary_matmul(&[], &b, 2, 0, 3, &mut c).unwrap();
    assert_eq!(c, [0; 6]);
}

#[test]
fn test_dimension_mismatch_fails_fast() {
    let b = TernaryMatrix::random(3, 2, 0);
    let cases: [(&[i8], usize, usize, usize, usize, &str); 4] = [
        (&[1, 2, 3, 4, 5], 2, 3, 2, 4, "activations"),
        (&[1, 2, 3, 4], 2, 2, 2, 4, "weight rows"),
        (&[1, 2, 3, 4, 5, 6], 2, 3, 3, 6, "weight cols"),
        (&[1, 2, 3, 4, 5, 6], 2, 3, 2, 5, "output"),
    ];

    for (a, m, k, n, c_len, operand) in cases {
        for config in all_configs() {
            let mut c = vec![-7i32; c_len];
            let err = ternary_matmul_with(&config, a, &b, m, k, n, &mut c).unwrap_err();
            match err {
                TernaryError::InvalidDimension { operand: got, .. } => assert_eq!(got, operand),
                other => panic!("expected InvalidDimension, got {other:?}"),
            }
            assert!(c.iter().all(|&v| v == -7), "partial write on {operand} mismatch");
        }
    }
}

#[test]
fn test_overflowing_shape_rejected() {
    let b = TernaryMatrix::new(2, 3);

    for config in all_configs() {
        let mut c = vec![-7i32; 6];
        let err = ternary_matmul_with(&config, &[], &b, usize::MAX, 2, 3, &mut c).unwrap_err();
        assert!(
            matches!(err, TernaryError::ShapeOverflow { rows: usize::MAX, cols: 2 }),
            "got {err:?}"
        );
        assert!(c.iter().all(|&v| v == -7));
    }

    assert!(matches!(
        ternary_matmul_alloc(&[], &b, usize::MAX, 2, 3),
        Err(TernaryError::ShapeOverflow { .. })
    ));
}

#[test]
fn test_invalid_weights_rejected_at_load() {
    assert!(matches!(
        TernaryMatrix::from_i8(&[0, 1, -1, 2], 2, 2),
        Err(TernaryError::InvalidWeight { value: 2, index: 3 })
    ));
    assert!(matches!(
        TernaryMatrix::from_packed_bytes(&[0b11], 1, 1),
        Err(TernaryError::InvalidWeight { value: 3, index: 0 })
    ));
    assert!(serde_yaml::from_str::<TernaryMatrix>("rows: 1\ncols: 1\nweights: [-2]\n").is_err());
}

#[test]
fn test_randomize_never_produces_invalid_weights() {
    let mut b = TernaryMatrix::new(64, 64);
    for seed in 0..4 {
        b.randomize_with_seed(seed);
        let reloaded = TernaryMatrix::from_i8(&b.to_i8(), 64, 64).unwrap();
        assert_eq!(reloaded, b);
    }
}
