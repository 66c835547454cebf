use thiserror::Error;

use crate::math::ode::OdeError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid parameter `{name}` = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("integration failed: {0}")]
    IntegrationFailure(#[from] OdeError),
}

impl SimulationError {
    pub fn invalid(name: &'static str, value: f64, expected: &'static str) -> Self {
        SimulationError::InvalidParameter { name, value, expected }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Fails with `InvalidParameter` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, value, "a finite value > 0"))
    }
}
