//! Command-line front end for the teleportation simulator.
//!
//! Runs the four protocol phases on the given amplitudes and prints the
//! register's basis probabilities after each phase as a text bar chart.

use anyhow::Context;
use clap::Parser;
use qteleport::{Sampler, StateVector, TeleportConfig, Teleporter, protocols::teleportation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const BAR_WIDTH: usize = 40;

/// Teleport a single qubit from Alice to Bob
#[derive(Parser, Debug)]
#[command(name = "teleport")]
#[command(author, version, about = "Quantum teleportation state-vector simulator")]
struct Cli {
    /// Amplitude of |0>, real or complex (e.g. 0.6, 1+2j)
    #[arg(long, default_value = "0.6", allow_hyphen_values = true)]
    alpha: String,

    /// Amplitude of |1>, real or complex
    #[arg(long, default_value = "0.8", allow_hyphen_values = true)]
    beta: String,

    /// Seed for Alice's measurement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Additionally sample Alice's measurement this many times
    #[arg(long, default_value_t = 0)]
    shots: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = TeleportConfig {
        seed: cli.seed,
        ..Default::default()
    };
    let mut teleporter = Teleporter::with_config(config.clone());

    let init = teleporter
        .initialize(&cli.alpha, &cli.beta)
        .context("failed to initialize")?;
    println!("Normalized |ψ> = {}", init.psi);
    print_chart("Initial combined state |ψ> ⊗ Bell pair", &init.state);

    let alice = teleporter.alice_ops()?;
    print_chart("After Alice's CNOT + Hadamard", &alice.state);

    if cli.shots > 0 {
        let mut source = qteleport::RngSource::from_seed_option(config.seed);
        let counts = Sampler::new().run(
            &alice.state,
            &teleportation::ALICE_QUBITS,
            cli.shots,
            &mut source,
        )?;
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort();
        println!("Alice's outcome histogram over {} shots:", cli.shots);
        for (bits, count) in counts {
            println!("  {bits}: {count}");
        }
        println!();
    }

    let measured = teleporter.measure()?;
    print_chart(
        &format!("After Alice measures {}", measured.bits),
        &measured.state,
    );

    let corrected = teleporter.bob_correction()?;
    print_chart("After Bob's correction", &corrected.state);
    println!("Bob's final qubit: {}", corrected.bob);
    println!("Original |ψ>:      {}", corrected.original);
    println!(
        "Fidelity: {:.9} ({})",
        corrected.fidelity,
        if corrected.teleported {
            "teleported"
        } else {
            "mismatch"
        }
    );

    Ok(())
}

fn print_chart(title: &str, state: &StateVector) {
    println!("{title}");
    for (label, p) in state.basis_probabilities() {
        let bar = "█".repeat((p * BAR_WIDTH as f64).round() as usize);
        println!("  {label} {p:>6.4} {bar}");
    }
    println!();
}
