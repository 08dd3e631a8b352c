//! Reference deterministic backend: mass-action rate equations integrated
//! with the `ode_solvers` Dormand-Prince 5(4) stepper.

use log::trace;
use ode_solvers::dop_shared::{IntegrationError, OutputType, System};
use ode_solvers::dopri5::Dopri5;
use ode_solvers::DVector;
use pure_core::errors::{ErrorInfo, PureError};
use pure_crn::{ModelDescription, TermDescription};
use serde::{Deserialize, Serialize};

use crate::simulate::{SimType, Simulator, Trajectory};

type State = DVector<f64>;

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-9
}

fn default_max_steps() -> u32 {
    100_000
}

/// Step-size control of [`MassActionSimulator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorSettings {
    /// Relative tolerance of the local error estimate.
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    /// Absolute tolerance of the local error estimate.
    #[serde(default = "default_atol")]
    pub atol: f64,
    /// First trial step in seconds; the solver picks one when absent.
    #[serde(default)]
    pub initial_step: Option<f64>,
    /// Upper bound on the step in seconds; the output interval when absent.
    #[serde(default)]
    pub max_step: Option<f64>,
    /// Steps allowed between two consecutive output times.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            rtol: default_rtol(),
            atol: default_atol(),
            initial_step: None,
            max_step: None,
            max_steps: default_max_steps(),
        }
    }
}

/// Deterministic ODE simulator for mass-action networks.
#[derive(Debug, Clone, Default)]
pub struct MassActionSimulator {
    settings: IntegratorSettings,
}

impl MassActionSimulator {
    /// Creates a simulator with the given step control.
    pub fn new(settings: IntegratorSettings) -> Self {
        Self { settings }
    }

    /// Step control in use.
    pub fn settings(&self) -> &IntegratorSettings {
        &self.settings
    }

    /// Integrates `state` from `from` to `to`.
    fn advance(
        &self,
        equations: &RateEquations,
        state: State,
        from: f64,
        to: f64,
    ) -> Result<State, PureError> {
        let span = to - from;
        if span == 0.0 {
            return Ok(state);
        }
        let mut stepper = Dopri5::from_param(
            RateSystem { equations },
            from,
            to,
            span,
            state,
            self.settings.rtol,
            self.settings.atol,
            0.9,
            0.04,
            0.2,
            10.0,
            self.settings.max_step.unwrap_or(span).min(span),
            self.settings.initial_step.unwrap_or(0.0).min(span),
            self.settings.max_steps,
            // Stiffness is not reported; `max_steps` bounds the work instead.
            u32::MAX,
            OutputType::Sparse,
        );
        stepper
            .integrate()
            .map_err(|err| integration_error(&err, from, to, self.settings.max_steps))?;
        let reached = stepper.x_out().last().copied().unwrap_or(from);
        let end = stepper.y_out().last().cloned();
        match end {
            Some(end) if (reached - to).abs() <= 1e-9 * to.abs().max(1.0) => {
                if end.iter().any(|value| !value.is_finite()) {
                    return Err(non_finite(to));
                }
                Ok(end)
            }
            _ => Err(PureError::Simulation(
                ErrorInfo::new("integration-failed", "solver stopped before the output time")
                    .with_context("reached", reached.to_string())
                    .with_context("time", to.to_string()),
            )),
        }
    }
}

struct CompiledReaction {
    reactants: Vec<(usize, i32)>,
    changes: Vec<(usize, f64)>,
    rate: f64,
}

struct RateEquations {
    reactions: Vec<CompiledReaction>,
}

fn simulation_error(code: &str, message: impl Into<String>) -> PureError {
    PureError::Simulation(ErrorInfo::new(code, message))
}

fn index_of(model: &ModelDescription, term: &TermDescription) -> Result<usize, PureError> {
    model.species_index(&term.species).ok_or_else(|| {
        PureError::Simulation(
            ErrorInfo::new("unknown-species", format!("reaction references {}", term.species))
                .with_context("species", term.species.clone()),
        )
    })
}

impl RateEquations {
    fn compile(model: &ModelDescription) -> Result<Self, PureError> {
        let mut reactions = Vec::with_capacity(model.reactions().len());
        for reaction in model.reactions() {
            let rate = model.parameter(&reaction.rate_parameter)?;
            let mut reactants = Vec::with_capacity(reaction.reactants.len());
            let mut changes: Vec<(usize, f64)> = Vec::new();
            for term in &reaction.reactants {
                let index = index_of(model, term)?;
                reactants.push((index, term.multiplicity as i32));
                accumulate(&mut changes, index, -(term.multiplicity as f64));
            }
            for term in &reaction.products {
                let index = index_of(model, term)?;
                accumulate(&mut changes, index, term.multiplicity as f64);
            }
            changes.retain(|(_, change)| *change != 0.0);
            reactions.push(CompiledReaction {
                reactants,
                changes,
                rate,
            });
        }
        Ok(Self { reactions })
    }

    fn derivative(&self, state: &[f64], out: &mut [f64]) {
        out.iter_mut().for_each(|value| *value = 0.0);
        for reaction in &self.reactions {
            let flux = reaction
                .reactants
                .iter()
                .fold(reaction.rate, |acc, (index, power)| acc * state[*index].powi(*power));
            for (index, change) in &reaction.changes {
                out[*index] += change * flux;
            }
        }
    }
}

fn accumulate(changes: &mut Vec<(usize, f64)>, index: usize, delta: f64) {
    match changes.iter_mut().find(|(existing, _)| *existing == index) {
        Some((_, change)) => *change += delta,
        None => changes.push((index, delta)),
    }
}

struct RateSystem<'a> {
    equations: &'a RateEquations,
}

impl System<f64, State> for RateSystem<'_> {
    fn system(&self, _time: f64, y: &State, dy: &mut State) {
        self.equations.derivative(y.as_slice(), dy.as_mut_slice());
    }
}

fn integration_error(err: &IntegrationError, from: f64, to: f64, max_steps: u32) -> PureError {
    let info = match err {
        IntegrationError::MaxNumStepReached { .. } => {
            ErrorInfo::new("step-budget", "integrator exceeded its step budget")
                .with_context("max_steps", max_steps.to_string())
                .with_hint("loosen the tolerances or raise max_steps")
        }
        other => ErrorInfo::new("integration-failed", format!("{other:?}")),
    };
    PureError::Simulation(
        info.with_context("from", from.to_string())
            .with_context("time", to.to_string()),
    )
}

fn non_finite(time: f64) -> PureError {
    PureError::Simulation(
        ErrorInfo::new("non-finite-state", "state became non-finite during integration")
            .with_context("time", time.to_string()),
    )
}

fn check_timepoints(timepoints: &[f64]) -> Result<(), PureError> {
    if timepoints.is_empty() {
        return Err(simulation_error("timepoints", "no output timepoints requested"));
    }
    if timepoints.iter().any(|t| !t.is_finite()) {
        return Err(simulation_error("timepoints", "timepoints must be finite"));
    }
    if timepoints.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(simulation_error("timepoints", "timepoints must be non-decreasing"));
    }
    Ok(())
}

impl Simulator for MassActionSimulator {
    fn simulate(
        &self,
        model: &ModelDescription,
        timepoints: &[f64],
        sim_type: SimType,
    ) -> Result<Trajectory, PureError> {
        if sim_type != SimType::Deterministic {
            return Err(PureError::Simulation(
                ErrorInfo::new(
                    "unsupported-sim-type",
                    format!("mass-action simulator cannot run {sim_type} simulations"),
                )
                .with_context("sim_type", sim_type.as_str()),
            ));
        }
        check_timepoints(timepoints)?;
        let equations = RateEquations::compile(model)?;
        let mut state = State::from_vec(model.species().values().copied().collect());
        if state.iter().any(|value| !value.is_finite()) {
            return Err(non_finite(timepoints[0]));
        }

        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(timepoints.len());
        let mut time = timepoints[0];
        for &target in timepoints {
            if !equations.reactions.is_empty() && !state.is_empty() {
                state = self.advance(&equations, state, time, target)?;
            }
            time = target;
            rows.push(state.as_slice().to_vec());
        }
        trace!(
            "simulated {} species over {} timepoints",
            state.len(),
            timepoints.len()
        );

        let species = model
            .species()
            .keys()
            .enumerate()
            .map(|(index, name)| (name.clone(), rows.iter().map(|row| row[index]).collect()))
            .collect();
        Ok(Trajectory {
            time: timepoints.to_vec(),
            species,
        })
    }
}
