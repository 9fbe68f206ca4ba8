mod compare;
mod findup;
mod massage;
mod matrix;
mod sh;

use clap::{Parser, Subcommand};

pub(crate) type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// xtask command-line interface
#[derive(Parser)]
#[command(name = "xtask", version, about = "Harmonic workspace auxiliary tasks")]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Command,
}

/// Supported subcommands
#[derive(Subcommand)]
enum Command {
    /// Run the 'massage' task
    Massage(massage::MassageArgs),
    /// Run a command across the feature matrix in matrix.yaml
    Matrix(matrix::MatrixArgs),
    /// Compare results across kernel modes
    Compare(compare::CompareArgs),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Massage(args) => massage::run(args),
        Command::Matrix(args) => matrix::run(args),
        Command::Compare(args) => compare::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
