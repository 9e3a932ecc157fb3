//! Application configuration from CLI flags and environment.

use clap::{Parser, ValueEnum};

use gcdlab_core::constants::{
    DEFAULT_CYCLE_COUNT, DEFAULT_ITERATIONS_PER_CYCLE, DEFAULT_PRIME_CANDIDATES,
};

/// Which workload to run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Barrier-synchronized GCD races only.
    Gcd,
    /// Pooled primality checks only.
    Primes,
    /// Both workloads, GCD races first.
    All,
}

impl Mode {
    /// Stable lowercase name, matching the CLI value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gcd => "gcd",
            Self::Primes => "primes",
            Self::All => "all",
        }
    }
}

/// gcdlab: barrier-synchronized GCD races and pooled primality checks.
#[derive(Parser, Debug)]
#[command(name = "gcdlab", version, about)]
pub struct AppConfig {
    /// Workload to run: gcd, primes, or all.
    #[arg(long, value_enum, default_value_t = Mode::All)]
    pub mode: Mode,

    /// Number of barrier cycles to run.
    #[arg(short, long, default_value_t = DEFAULT_CYCLE_COUNT, env = "GCDLAB_CYCLES")]
    pub cycles: u32,

    /// Operand pairs computed per cycle, by every algorithm.
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS_PER_CYCLE, env = "GCDLAB_ITERATIONS")]
    pub iterations: usize,

    /// Number of primality candidates to check.
    #[arg(short = 'n', long, default_value_t = DEFAULT_PRIME_CANDIDATES, env = "GCDLAB_COUNT")]
    pub count: usize,

    /// Worker threads for the primality pool (default: cores + 1).
    #[arg(long)]
    pub pool_size: Option<usize>,

    /// RNG seed for operand and candidate generation.
    #[arg(short, long, default_value_t = 0, env = "GCDLAB_SEED")]
    pub seed: u64,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (warnings and errors only).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write a JSON run summary to this file.
    #[arg(short, long)]
    pub output: Option<String>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
