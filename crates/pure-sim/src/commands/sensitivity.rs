use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use pure_core::SECONDS_PER_HOUR;
use pure_infer::{normalized_sensitivity, DEFAULT_RELATIVE_STEP};
use pure_plot::{render_heatmap_svg, write_svg, FigureConfig};

use super::{ModelInput, SolverArgs, TimeGrid};

#[derive(Args, Debug)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub input: ModelInput,
    #[command(flatten)]
    pub grid: TimeGrid,
    #[command(flatten)]
    pub solver: SolverArgs,
    /// Species whose response is analysed.
    #[arg(long)]
    pub species: String,
    /// Relative parameter perturbation.
    #[arg(long, default_value_t = DEFAULT_RELATIVE_STEP)]
    pub relative_step: f64,
    /// Output sensitivity table.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional heatmap SVG.
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

pub fn run(args: &SensitivityArgs) -> Result<(), Box<dyn Error>> {
    let model = args.input.load()?;
    let matrix = normalized_sensitivity(
        &args.solver.simulator(),
        &model,
        &args.species,
        &args.grid.timepoints(),
        args.relative_step,
    )?;
    matrix.write_csv(&args.out)?;
    if let Some(svg) = &args.svg {
        let hours: Vec<f64> = matrix
            .timepoints
            .iter()
            .map(|t| t / SECONDS_PER_HOUR)
            .collect();
        let figure = render_heatmap_svg(
            &matrix.parameters,
            &hours,
            &matrix.values,
            &FigureConfig {
                width: 720,
                ..FigureConfig::default()
            },
        );
        write_svg(svg, &figure)?;
    }
    Ok(())
}
