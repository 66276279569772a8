// src/field.rs

use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;

/// Selects one of the three simulated fields.
///
/// The set is closed, so every dispatch on a `Field` is exhaustive. Tags coming
/// from outside the crate (strings, integer codes) go through `FromStr` /
/// `TryFrom<i32>`, which is the only place an unknown field can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Density,
    VelocityU,
    VelocityV,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Density, Field::VelocityU, Field::VelocityV];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::VelocityU => "u",
            Self::VelocityV => "v",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "density" | "dens" | "d" => Ok(Self::Density),
            "u" | "velocity_u" | "vx" => Ok(Self::VelocityU),
            "v" | "velocity_v" | "vy" => Ok(Self::VelocityV),
            _ => Err(SolverError::UnknownField(s.to_string())),
        }
    }
}

/// Integer codes 0, 1, 2 in declaration order.
impl TryFrom<i32> for Field {
    type Error = SolverError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Density),
            1 => Ok(Self::VelocityU),
            2 => Ok(Self::VelocityV),
            other => Err(SolverError::UnknownField(other.to_string())),
        }
    }
}
