//! BitLinear forward pass on quantized activations and ternary weights.
//!
//! Run with: `cargo run --example bitlinear`

use trit_matmul::quantize::{dequantize_activations, quantize_activations, DEFAULT_EPS};
use trit_matmul::{BitLinear, KernelConfig};

fn main() {
    println!("=== trit-matmul BitLinear Example ===\n");

    let (batch, in_features, out_features) = (4, 128, 64);

    // Deterministic pseudo-weights in [-1, 1]
    let weight: Vec<f32> = (0..in_features * out_features)
        .map(|i| ((i * 37) % 101) as f32 / 50.0 - 1.0)
        .collect();
    let input: Vec<f32> = (0..batch * in_features)
        .map(|i| ((i * 13) % 29) as f32 / 7.0 - 2.0)
        .collect();

    // 1. Activation quantization
    println!("1. AbsMax activation quantization");
    let q = quantize_activations(&input, batch, in_features, DEFAULT_EPS).unwrap();
    let back = dequantize_activations(&q);
    let max_err = input
        .iter()
        .zip(&back)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    println!("   row 0 scale: {:.6}", q.scales[0]);
    println!("   first values: {:?}", &q.row(0)[..8]);
    println!("   max round-trip error: {max_err:.6}");

    // 2. Layer construction
    println!("\n2. AbsMean ternary weights");
    let layer = BitLinear::from_weight(&weight, in_features, out_features)
        .unwrap()
        .with_kernel_config(KernelConfig::default().with_parallel_threshold(2));
    println!("   shape: {} -> {}", layer.in_features(), layer.out_features());
    println!("   weight scale: {:.6}", layer.weight().scale);
    println!("   sparsity: {:.3}", layer.sparsity());
    println!("   compression vs f32: {:.1}x", layer.compression_ratio());

    // 3. Forward pass against a float reference
    println!("\n3. Forward pass");
    let y = layer.forward(&input, batch).unwrap();
    let wq = layer.weight().dequantize();
    let reference: Vec<f32> = (0..batch * out_features)
        .map(|idx| {
            let (row, col) = (idx / out_features, idx % out_features);
            (0..in_features)
                .map(|i| back[row * in_features + i] * wq[i * out_features + col])
                .sum()
        })
        .collect();
    let worst = y
        .iter()
        .zip(&reference)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    println!("   y[0..4] = {:?}", &y[..4]);
    println!("   max deviation from dequantized reference: {worst:.6}");

    println!("\n=== Example Complete ===");
}
