//! Static description of every [`ParameterState`] field.
//!
//! Generic consumers (the interpolator, UI bindings) walk [`FIELDS`] rather
//! than naming each field by hand. The table order is the canonical field
//! order.

use crate::error::CoreError;
use crate::state::{ParameterState, RenderType};

/// A single field value, as read from or written to a [`ParameterState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    RenderType(RenderType),
}

impl FieldValue {
    /// The value as a float, if it is numeric.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            Self::RenderType(_) => None,
        }
    }
}

/// How a field behaves under interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Plain numeric value. `integral` fields are rounded after blending.
    Linear { integral: bool },
    /// Numeric value that wraps every `cycle` units.
    Cyclical { cycle: f64 },
    /// Never interpolated; the start value is carried through.
    Opaque,
}

/// Name, kind and accessors for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub get: fn(&ParameterState) -> FieldValue,
    pub set: fn(&mut ParameterState, FieldValue) -> crate::Result<()>,
}

pub static FIELDS: [FieldSpec; 9] = [
    FieldSpec {
        name: "width",
        kind: FieldKind::Linear { integral: true },
        get: get_width,
        set: set_width,
    },
    FieldSpec {
        name: "height",
        kind: FieldKind::Linear { integral: true },
        get: get_height,
        set: set_height,
    },
    FieldSpec {
        name: "seed",
        kind: FieldKind::Linear { integral: true },
        get: get_seed,
        set: set_seed,
    },
    FieldSpec {
        name: "time_of_day",
        kind: FieldKind::Cyclical {
            cycle: ParameterState::HOURS_PER_DAY,
        },
        get: get_time_of_day,
        set: set_time_of_day,
    },
    FieldSpec {
        name: "star_density",
        kind: FieldKind::Linear { integral: false },
        get: get_star_density,
        set: set_star_density,
    },
    FieldSpec {
        name: "transition_ratio",
        kind: FieldKind::Linear { integral: false },
        get: get_transition_ratio,
        set: set_transition_ratio,
    },
    FieldSpec {
        name: "latitude",
        kind: FieldKind::Cyclical {
            cycle: ParameterState::DEGREES_PER_TURN,
        },
        get: get_latitude,
        set: set_latitude,
    },
    FieldSpec {
        name: "longitude",
        kind: FieldKind::Cyclical {
            cycle: ParameterState::DEGREES_PER_TURN,
        },
        get: get_longitude,
        set: set_longitude,
    },
    FieldSpec {
        name: "render_type",
        kind: FieldKind::Opaque,
        get: get_render_type,
        set: set_render_type,
    },
];

// ---------------------------------------------------------------------------
// Argument conversion
// ---------------------------------------------------------------------------

fn integer_arg(field: &'static str, value: FieldValue) -> crate::Result<u32> {
    let raw = match value {
        FieldValue::Int(v) => v,
        FieldValue::Float(v) if v.is_finite() && v.fract() == 0.0 => v as i64,
        other => {
            return Err(CoreError::invalid(
                field,
                format!("expected an integer, got {other:?}"),
            ))
        }
    };
    u32::try_from(raw).map_err(|_| CoreError::invalid(field, format!("out of range: {raw}")))
}

fn float_arg(field: &'static str, value: FieldValue) -> crate::Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| CoreError::invalid(field, format!("expected a number, got {value:?}")))
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

fn get_width(s: &ParameterState) -> FieldValue {
    FieldValue::Int(i64::from(s.width()))
}

fn set_width(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_width(integer_arg("width", v)?)
}

fn get_height(s: &ParameterState) -> FieldValue {
    FieldValue::Int(i64::from(s.height()))
}

fn set_height(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_height(integer_arg("height", v)?)
}

fn get_seed(s: &ParameterState) -> FieldValue {
    FieldValue::Int(i64::from(s.seed()))
}

fn set_seed(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_seed(integer_arg("seed", v)?)
}

fn get_time_of_day(s: &ParameterState) -> FieldValue {
    FieldValue::Float(s.time_of_day())
}

fn set_time_of_day(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_time_of_day(float_arg("time_of_day", v)?)
}

fn get_star_density(s: &ParameterState) -> FieldValue {
    FieldValue::Float(s.star_density())
}

fn set_star_density(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_star_density(float_arg("star_density", v)?)
}

fn get_transition_ratio(s: &ParameterState) -> FieldValue {
    FieldValue::Float(s.transition_ratio())
}

fn set_transition_ratio(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_transition_ratio(float_arg("transition_ratio", v)?)
}

fn get_latitude(s: &ParameterState) -> FieldValue {
    FieldValue::Float(s.latitude())
}

fn set_latitude(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_latitude(float_arg("latitude", v)?)
}

fn get_longitude(s: &ParameterState) -> FieldValue {
    FieldValue::Float(s.longitude())
}

fn set_longitude(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    s.set_longitude(float_arg("longitude", v)?)
}

fn get_render_type(s: &ParameterState) -> FieldValue {
    FieldValue::RenderType(s.render_type())
}

fn set_render_type(s: &mut ParameterState, v: FieldValue) -> crate::Result<()> {
    match v {
        FieldValue::RenderType(r) => {
            s.set_render_type(r);
            Ok(())
        }
        other => Err(CoreError::invalid(
            "render_type",
            format!("expected a render type, got {other:?}"),
        )),
    }
}
