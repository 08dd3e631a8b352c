use indexmap::IndexMap;
use pure_core::errors::{ErrorInfo, PureError};
use pure_core::RngHandle;
use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, LogNormal, Normal, Uniform};

/// Bounded number of rejection attempts when drawing on a positive support.
pub const MAX_DRAW_ATTEMPTS: usize = 10_000;

/// Parametric family of a prior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PriorFamily {
    /// Normal distribution.
    Gaussian {
        /// Mean.
        center: f64,
        /// Standard deviation.
        spread: f64,
    },
    /// Flat density on `[min, max]`.
    Uniform {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Log-normal distribution; `center` and `spread` are on the log scale.
    LogGaussian {
        /// Mean of the logarithm.
        center: f64,
        /// Standard deviation of the logarithm.
        spread: f64,
    },
}

/// Prior of one estimated parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorSpec {
    /// Distribution family and its parameters.
    #[serde(flatten)]
    pub family: PriorFamily,
    /// Restricts the support to strictly positive values.
    #[serde(default)]
    pub positive: bool,
}

enum Density {
    Normal(Normal),
    Uniform(Uniform),
    LogNormal(LogNormal),
}

impl Density {
    fn ln_pdf(&self, x: f64) -> f64 {
        match self {
            Density::Normal(dist) => dist.ln_pdf(x),
            Density::Uniform(dist) => dist.ln_pdf(x),
            Density::LogNormal(dist) => dist.ln_pdf(x),
        }
    }

    fn sample(&self, rng: &mut RngHandle) -> f64 {
        match self {
            Density::Normal(dist) => dist.sample(rng.inner_mut()),
            Density::Uniform(dist) => dist.sample(rng.inner_mut()),
            Density::LogNormal(dist) => dist.sample(rng.inner_mut()),
        }
    }
}

impl PriorSpec {
    /// Gaussian prior on the whole real line.
    pub fn gaussian(center: f64, spread: f64) -> Self {
        Self {
            family: PriorFamily::Gaussian { center, spread },
            positive: false,
        }
    }

    /// Uniform prior on `[min, max]`.
    pub fn uniform(min: f64, max: f64) -> Self {
        Self {
            family: PriorFamily::Uniform { min, max },
            positive: false,
        }
    }

    /// Log-normal prior.
    pub fn log_gaussian(center: f64, spread: f64) -> Self {
        Self {
            family: PriorFamily::LogGaussian { center, spread },
            positive: false,
        }
    }

    /// Restricts the prior to strictly positive values.
    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    fn density(&self) -> Result<Density, PureError> {
        let built = match self.family {
            PriorFamily::Gaussian { center, spread } => {
                Normal::new(center, spread).map(Density::Normal)
            }
            PriorFamily::Uniform { min, max } => Uniform::new(min, max).map(Density::Uniform),
            PriorFamily::LogGaussian { center, spread } => {
                LogNormal::new(center, spread).map(Density::LogNormal)
            }
        };
        built.map_err(|err| {
            PureError::Validation(
                ErrorInfo::new("prior-invalid", err.to_string())
                    .with_context("family", format!("{:?}", self.family)),
            )
        })
    }

    /// Log density at `x`; `-inf` outside the support.
    pub fn log_density(&self, x: f64) -> Result<f64, PureError> {
        if !x.is_finite() || (self.positive && x <= 0.0) {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(self.density()?.ln_pdf(x))
    }

    /// Draws one value, rejecting non-positive draws on a positive support.
    pub fn draw(&self, rng: &mut RngHandle) -> Result<f64, PureError> {
        let density = self.density()?;
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let value = density.sample(rng);
            if value.is_finite() && (!self.positive || value > 0.0) {
                return Ok(value);
            }
        }
        Err(PureError::Inference(
            ErrorInfo::new("prior-draw", "prior puts too little mass on its support")
                .with_context("attempts", MAX_DRAW_ATTEMPTS.to_string())
                .with_context("family", format!("{:?}", self.family)),
        ))
    }

    /// Natural length scale of the prior, used to size random-walk proposals.
    pub fn width(&self) -> f64 {
        match self.family {
            PriorFamily::Gaussian { spread, .. } => spread,
            PriorFamily::Uniform { min, max } => (max - min) / 12f64.sqrt(),
            PriorFamily::LogGaussian { center, spread } => center.exp() * spread,
        }
    }
}

/// Priors keyed by parameter name, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorSet {
    priors: IndexMap<String, PriorSpec>,
}

impl PriorSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the prior for `name`.
    pub fn insert(&mut self, name: impl Into<String>, prior: PriorSpec) {
        self.priors.insert(name.into(), prior);
    }

    /// Builder form of [`PriorSet::insert`].
    pub fn with(mut self, name: impl Into<String>, prior: PriorSpec) -> Self {
        self.insert(name, prior);
        self
    }

    /// Prior for `name`, if declared.
    pub fn get(&self, name: &str) -> Option<&PriorSpec> {
        self.priors.get(name)
    }

    /// Number of priors.
    pub fn len(&self) -> usize {
        self.priors.len()
    }

    /// Whether no prior is declared.
    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }

    /// Priors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PriorSpec)> {
        self.priors.iter()
    }

    /// Priors for `names` in the given order.
    ///
    /// Every name must have an entry and every entry must describe a valid
    /// distribution.
    pub fn require(&self, names: &[String]) -> Result<Vec<&PriorSpec>, PureError> {
        names
            .iter()
            .map(|name| {
                let prior = self.priors.get(name).ok_or_else(|| {
                    PureError::Inference(
                        ErrorInfo::new("prior-missing", format!("no prior declared for {name}"))
                            .with_context("parameter", name.clone())
                            .with_hint("add an entry under `priors` for every estimated parameter"),
                    )
                })?;
                prior.density()?;
                Ok(prior)
            })
            .collect()
    }
}
