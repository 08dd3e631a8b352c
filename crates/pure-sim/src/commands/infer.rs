use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::info;
use pure_infer::{run_driver, DriverConfig, MassActionSimulator, MetropolisEnsemble};

#[derive(Args, Debug)]
pub struct InferArgs {
    /// YAML driver configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Overrides the sampler's master seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: &InferArgs) -> Result<(), Box<dyn Error>> {
    let mut config = DriverConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.sampler.seed = seed;
    }
    let simulator = MassActionSimulator::new(config.integrator.clone());
    let report = run_driver(&config, &simulator, &MetropolisEnsemble)?;
    for (name, value) in &report.posterior_mean {
        info!("{name} = {value}");
    }
    println!("{}", report.outputs.manifest.display());
    Ok(())
}
