//! Basic usage of trit-matmul.
//!
//! Run with: `cargo run --example basic`

use trit_matmul::{
    get_backend, ternary_matmul, ternary_matmul_alloc, KernelConfig, MatmulBackend, TernaryMatrix,
    Trit,
};

fn main() {
    println!("=== trit-matmul Basic Example ===\n");

    // Trit values
    println!("1. Trits");
    for t in Trit::ALL {
        println!("   {} (value: {}) applied to 7 = {}", t, t.value(), t.apply(7));
    }

    // Sign-driven accumulation
    println!("\n2. Sign-driven accumulation");
    let b = TernaryMatrix::from_i8(&[1, -1], 2, 1).unwrap();
    let mut c = [0i32; 1];
    ternary_matmul(&[3, -2], &b, 1, 2, 1, &mut c).unwrap();
    println!("   [3, -2] x [+1, -1]^T = {} (should be 5)", c[0]);

    // Zero activations skip their weight row
    println!("\n3. Zero-activation shortcut");
    let b = TernaryMatrix::from_i8(&[1, 1], 2, 1).unwrap();
    ternary_matmul(&[0, 5], &b, 1, 2, 1, &mut c).unwrap();
    println!("   [0, 5] x [+1, +1]^T = {} (should be 5)", c[0]);

    // Random weights, both backends
    println!("\n4. Random 256x256 weights");
    let (m, k, n) = (4, 256, 256);
    let weights = TernaryMatrix::random(k, n, 2026);
    println!(
        "   +1: {}  -1: {}  0: {}  sparsity: {:.3}",
        weights.count_positive(),
        weights.count_negative(),
        weights.len() - weights.count_nonzero(),
        weights.sparsity()
    );

    let input: Vec<i8> = (0..m * k).map(|i| ((i % 255) as i32 - 128) as i8).collect();
    let reference = ternary_matmul_alloc(&input, &weights, m, k, n).unwrap();

    let backend = get_backend(&KernelConfig::parallel());
    let mut output = vec![0i32; m * n];
    backend.matmul(&input, &weights, m, k, n, &mut output).unwrap();
    println!("   {} backend Output[0] = {}", backend.name(), output[0]);
    println!("   matches scalar reference: {}", output == reference);

    // Packed storage
    println!("\n5. Packed storage (2 bits per weight)");
    let bytes = weights.to_packed_bytes();
    let loaded = TernaryMatrix::from_packed_bytes(&bytes, k, n).unwrap();
    println!("   {} weights -> {} bytes", weights.len(), bytes.len());
    println!("   round trip equal: {}", loaded == weights);

    // Shape errors are reported, never silently truncated
    println!("\n6. Shape checking");
    let err = ternary_matmul(&[1, 2, 3], &weights, 1, k, n, &mut output).unwrap_err();
    println!("   {err}");

    println!("\n=== Example Complete ===");
}
