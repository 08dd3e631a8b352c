use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use pure_infer::PosteriorSamples;
use log::info;
use pure_plot::{render_corner_svg, render_histogram_svg, write_svg, FigureConfig};

#[derive(Args, Debug)]
pub struct CornerArgs {
    /// Headerless samples file.
    #[arg(long)]
    pub samples: PathBuf,
    /// Column labels in file order.
    #[arg(long, value_delimiter = ',', required = true)]
    pub names: Vec<String>,
    /// Only plot the last N rows.
    #[arg(long)]
    pub tail: Option<usize>,
    /// Output SVG.
    #[arg(long)]
    pub out: PathBuf,
    /// Also write one `<name>_marginal.svg` histogram per column into this directory.
    #[arg(long)]
    pub marginals: Option<PathBuf>,
}

pub fn run(args: &CornerArgs) -> Result<(), Box<dyn Error>> {
    let samples = PosteriorSamples::load(&args.samples, &args.names)?;
    let rows = match args.tail {
        Some(window) => samples.tail(window),
        None => samples.rows(),
    };
    let config = FigureConfig::default();
    write_svg(&args.out, &render_corner_svg(samples.names(), rows, &config))?;
    if let Some(dir) = &args.marginals {
        for (column, name) in samples.names().iter().enumerate() {
            let values: Vec<f64> = rows.iter().map(|row| row[column]).collect();
            write_svg(
                &dir.join(format!("{name}_marginal.svg")),
                &render_histogram_svg(&values, &config),
            )?;
        }
        info!("wrote {} marginals to {}", samples.names().len(), dir.display());
    }
    Ok(())
}
