use crate::SimError;

/// Floating point type used throughout system
pub type Real = f64;

/// Smallest RC time constant (s).
pub const MIN_TIME_CONSTANT_S: Real = 1e-3;
/// Smallest lumped cell mass (kg).
pub const MIN_MASS_KG: Real = 1e-6;
/// Smallest specific heat capacity (J/kg/K).
pub const MIN_HEAT_CAPACITY_J_PER_KG_K: Real = 1e-3;
/// Smallest cell-to-ambient thermal resistance (K/W).
pub const MIN_THERMAL_RESISTANCE_K_PER_W: Real = 1e-3;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &str) -> Result<Real, SimError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SimError::configuration(format!(
            "non-finite value for {what}: {v}"
        )))
    }
}

/// Replace zero, negative or NaN parameters with `floor`.
///
/// Degenerate parameters are never rejected, only floored.
pub fn floor_at(v: Real, floor: Real) -> Real {
    if v.is_nan() { floor } else { v.max(floor) }
}

pub fn clamp_unit(v: Real) -> Real {
    v.clamp(0.0, 1.0)
}
