use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::info;
use pure_infer::{SimType, Simulator};
use pure_plot::{render_overlay_svg, write_svg, Curve, FigureConfig};

use super::{ModelInput, SolverArgs, TimeGrid};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub input: ModelInput,
    #[command(flatten)]
    pub grid: TimeGrid,
    #[command(flatten)]
    pub solver: SolverArgs,
    /// Output trajectory CSV.
    #[arg(long)]
    pub out: PathBuf,
    /// Species drawn in the optional figure.
    #[arg(long)]
    pub species: Option<String>,
    /// Optional SVG of `--species` over time.
    #[arg(long, requires = "species")]
    pub svg: Option<PathBuf>,
}

pub fn run(args: &SimulateArgs) -> Result<(), Box<dyn Error>> {
    let model = args.input.load()?;
    let timepoints = args.grid.timepoints();
    let trajectory =
        args.solver.simulator().simulate(&model, &timepoints, SimType::Deterministic)?;
    trajectory.write_csv(&args.out)?;
    if let (Some(species), Some(svg)) = (&args.species, &args.svg) {
        let curve = Curve::new(
            species.clone(),
            trajectory.time.clone(),
            trajectory.series(species)?.to_vec(),
        );
        let figure = render_overlay_svg(
            &format!("{species} over time"),
            species,
            &curve,
            &[],
            &FigureConfig::default(),
        );
        write_svg(svg, &figure)?;
    }
    info!(
        "simulated {} over {} timepoints into {}",
        model.name(),
        trajectory.len(),
        args.out.display()
    );
    Ok(())
}
