//! CLI entry point for trit-matmul.

use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trit_matmul::{
    get_backend_for_size, BackendPreference, DemoConfig, MatmulBackend, Result, TernaryMatrix,
};

#[derive(Parser)]
#[command(name = "trit-matmul")]
#[command(about = "Multiplication-free INT8 x ternary matrix multiply")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one ternary matmul on dummy activations and random weights
    Run {
        /// Path to a YAML demo configuration
        #[arg(long)]
        config: Option<String>,
        /// Activation rows
        #[arg(short, long)]
        m: Option<usize>,
        /// Inner dimension
        #[arg(short, long)]
        k: Option<usize>,
        /// Output columns
        #[arg(short, long)]
        n: Option<usize>,
        /// Seed for reproducible weights
        #[arg(long)]
        seed: Option<u64>,
        /// Kernel backend
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
        /// Disable the zero-activation shortcut
        #[arg(long)]
        no_skip_zero: bool,
    },
    /// Generate a sample configuration file
    Init {
        /// Output path for config file
        #[arg(default_value = "demo.yaml")]
        output: String,
    },
    /// Validate a configuration file
    Validate {
        /// Path to configuration file
        config: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Auto,
    Scalar,
    Parallel,
}

impl From<BackendArg> for BackendPreference {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendPreference::Auto,
            BackendArg::Scalar => BackendPreference::Scalar,
            BackendArg::Parallel => BackendPreference::Parallel,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            m,
            k,
            n,
            seed,
            backend,
            no_skip_zero,
        } => {
            let mut demo = match config {
                Some(path) => {
                    tracing::info!("Loading demo configuration: {}", path);
                    DemoConfig::from_file(&path)?
                }
                None => DemoConfig::default(),
            };
            demo.m = m.unwrap_or(demo.m);
            demo.k = k.unwrap_or(demo.k);
            demo.n = n.unwrap_or(demo.n);
            demo.seed = seed.or(demo.seed);
            if let Some(backend) = backend {
                demo.kernel.backend = backend.into();
            }
            if no_skip_zero {
                demo.kernel.skip_zero_activations = false;
            }
            demo.validate()?;
            run(&demo)?;
        }
        Commands::Init { output } => {
            tracing::info!("Generating demo config: {}", output);
            DemoConfig::default().to_file(&output)?;
            println!("✓ Configuration written to: {output}");
        }
        Commands::Validate { config } => {
            tracing::info!("Validating configuration: {}", config);
            let demo = DemoConfig::from_file(&config)?;
            demo.validate()?;
            println!("✓ Configuration is valid");
            println!("  Shape: [{}x{}] * [{}x{}]", demo.m, demo.k, demo.k, demo.n);
            println!("  Backend: {:?}", demo.kernel.backend);
        }
    }

    Ok(())
}

fn run(demo: &DemoConfig) -> Result<()> {
    let DemoConfig { m, k, n, .. } = *demo;

    // Dummy INT8 activations cycling through the full range
    let input: Vec<i8> = (0..m * k).map(|i| ((i % 255) as i32 - 128) as i8).collect();

    let mut weights = TernaryMatrix::new(k, n);
    match demo.seed {
        Some(seed) => weights.randomize_with_seed(seed),
        None => weights.randomize(),
    }

    let mut output = vec![0i32; m * n];
    let backend = get_backend_for_size(&demo.kernel, m);
    tracing::info!(backend = backend.name(), m, k, n, "running ternary matmul");

    let start = Instant::now();
    backend.matmul(&input, &weights, m, k, n, &mut output)?;
    let elapsed = start.elapsed();

    println!("Matrix shape: [{m}x{k}] * [{k}x{n}]");
    println!("Backend: {}", backend.name());
    println!("Time taken: {:.4} ms", elapsed.as_secs_f64() * 1000.0);
    match output.first() {
        Some(first) => println!("Output[0]: {first}"),
        None => println!("Output is empty"),
    }

    Ok(())
}
