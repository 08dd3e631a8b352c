use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    build_model::{self, BuildModelArgs},
    corner::{self, CornerArgs},
    infer::{self, InferArgs},
    sensitivity::{self, SensitivityArgs},
    simulate::{self, SimulateArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "pure-sim", about = "PURE transcription model builder, simulator and fitter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile the PURE transcription mixture into a model description.
    BuildModel(BuildModelArgs),
    /// Simulate a model description and write its trajectory.
    Simulate(SimulateArgs),
    /// Run a full fit from a YAML driver configuration.
    Infer(InferArgs),
    /// Render a corner plot from a samples file.
    Corner(CornerArgs),
    /// Compute normalized parameter sensitivities of one species.
    Sensitivity(SensitivityArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::BuildModel(args) => build_model::run(&args),
        Command::Simulate(args) => simulate::run(&args),
        Command::Infer(args) => infer::run(&args),
        Command::Corner(args) => corner::run(&args),
        Command::Sensitivity(args) => sensitivity::run(&args),
    }
}
