use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use log::info;
use pure_crn::{ParameterStore, PureTranscription, Species};

use super::parse_assignment;

#[derive(Args, Debug)]
pub struct BuildModelArgs {
    /// YAML file renaming mixture roles; defaults apply when absent.
    #[arg(long)]
    pub mixture: Option<PathBuf>,
    /// Parameter table with header `mechanism_id,part_id,param_name,param_val`.
    #[arg(long)]
    pub params: Option<PathBuf>,
    /// Global parameter default as NAME=VALUE.
    #[arg(long = "global", value_parser = parse_assignment)]
    pub globals: Vec<(String, f64)>,
    /// DNA template to transcribe; repeatable.
    #[arg(long = "template", required = true)]
    pub templates: Vec<String>,
    /// Output model description JSON.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &BuildModelArgs) -> Result<(), Box<dyn Error>> {
    let names: PureTranscription = match &args.mixture {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => PureTranscription::default(),
    };
    let mut mixture = names.build()?;
    if let Some(path) = &args.params {
        mixture.parameters_mut().extend(ParameterStore::from_csv(path)?);
    }
    for (name, value) in &args.globals {
        mixture.parameters_mut().set_global(name.clone(), *value);
    }
    let templates: Vec<Species> = args.templates.iter().map(Species::dna).collect();
    let model = mixture.compile(&templates)?.to_model_description()?;
    model.store(&args.out)?;
    info!(
        "wrote {} species, {} parameters and {} reactions to {}",
        model.species().len(),
        model.parameters().len(),
        model.reactions().len(),
        args.out.display()
    );
    Ok(())
}
