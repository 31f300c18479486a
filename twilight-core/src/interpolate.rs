use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::{FieldKind, FieldSpec, FieldValue, FIELDS};
use crate::state::{wrap_cyclical, ParameterState};

/// Which way cyclical fields travel around their cycle.
///
/// This belongs to the traversal, not to the endpoints: `Forward` from 350°
/// to 10° sweeps 20° through 0°, `Backward` sweeps the other 340°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        })
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            other => Err(CoreError::invalid(
                "direction",
                format!("expected `forward` or `backward`, got `{other}`"),
            )),
        }
    }
}

/// Linear blend `a + (b - a) * t`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Blend two values on a cycle of length `cycle`, travelling in `direction`.
///
/// Both inputs are expected in `[0, cycle)`; the result is too.
pub fn lerp_cyclical(a: f64, b: f64, t: f64, cycle: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Forward => {
            let delta = (b - a).rem_euclid(cycle);
            wrap_cyclical(a + delta * t, cycle)
        }
        Direction::Backward => {
            let delta = (a - b).rem_euclid(cycle);
            wrap_cyclical(a - delta * t, cycle)
        }
    }
}

/// Interpolate every field of two states at blend factor `t`.
///
/// Linear fields blend straight (integral ones rounded to nearest), cyclical
/// fields follow [`lerp_cyclical`] in the given direction, and opaque fields
/// keep `a`'s value. `t` outside `[0, 1]` extrapolates; that can push an
/// integral field out of its domain, in which case the offending field is
/// reported as [`CoreError::InvalidParameter`].
pub fn interpolate(
    a: &ParameterState,
    b: &ParameterState,
    t: f64,
    direction: Direction,
) -> crate::Result<ParameterState> {
    let mut out = a.clone();
    for field in FIELDS.iter() {
        let value = match field.kind {
            FieldKind::Opaque => continue,
            FieldKind::Linear { integral } => {
                let (va, vb) = numeric_pair(field, a, b)?;
                let v = lerp(va, vb, t);
                if integral {
                    FieldValue::Int(v.round() as i64)
                } else {
                    FieldValue::Float(v)
                }
            }
            FieldKind::Cyclical { cycle } => {
                let (va, vb) = numeric_pair(field, a, b)?;
                FieldValue::Float(lerp_cyclical(va, vb, t, cycle, direction))
            }
        };
        (field.set)(&mut out, value)?;
    }
    Ok(out)
}

fn numeric_pair(
    field: &FieldSpec,
    a: &ParameterState,
    b: &ParameterState,
) -> crate::Result<(f64, f64)> {
    match ((field.get)(a).as_f64(), (field.get)(b).as_f64()) {
        (Some(va), Some(vb)) => Ok((va, vb)),
        _ => Err(CoreError::invalid(field.name, "field is not numeric")),
    }
}
