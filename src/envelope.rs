// src/envelope.rs
//
// Near/far floor distances reachable by the camera's field of view.

use std::fmt;

use crate::error::{ensure, Result};

/// A floor distance in meters, or one of the two non-numeric outcomes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distance {
    Finite(f64),
    /// The bound never meets the floor (the cone's edge is at or above the horizon).
    Infinite,
    /// No valid range exists (the far bound would be closer than the near bound).
    Invalid,
}

impl Distance {
    pub fn finite(self) -> Option<f64> {
        match self {
            Distance::Finite(meters) => Some(meters),
            _ => None,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Distance::Infinite)
    }

    pub fn is_invalid(self) -> bool {
        matches!(self, Distance::Invalid)
    }

    /// Applies `f` to a finite value; `Infinite` and `Invalid` pass through.
    pub fn map_finite(self, f: impl FnOnce(f64) -> f64) -> Distance {
        match self {
            Distance::Finite(meters) => Distance::Finite(f(meters)),
            other => other,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(meters) => write!(f, "{meters:.1}"),
            Distance::Infinite => f.write_str("Inf"),
            Distance::Invalid => f.write_str("Invalid"),
        }
    }
}

/// Rounds half away from zero to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Camera mounting and orientation.
///
/// `tilt_deg` is 0 when looking at the horizon and 90 when looking straight down. `pan_deg`
/// turns the view across the room: 90 faces the opposite wall, 0 and 180 face along the
/// camera's wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub tilt_deg: f64,
    pub pan_deg: f64,
    pub height_cm: f64,
    pub x_position_cm: f64,
}

impl CameraPose {
    pub fn validate(&self) -> Result<()> {
        ensure("tilt_deg", self.tilt_deg, "a tilt in [0, 90] degrees", |v| {
            (0.0..=90.0).contains(&v)
        })?;
        ensure("pan_deg", self.pan_deg, "a pan in [0, 180] degrees", |v| {
            (0.0..=180.0).contains(&v)
        })?;
        ensure("height_cm", self.height_cm, "a positive camera height", |v| v > 0.0)?;
        ensure("x_position_cm", self.x_position_cm, "a non-negative x position", |v| {
            v >= 0.0
        })
    }

    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }

    pub fn x_position_m(&self) -> f64 {
        self.x_position_cm / 100.0
    }
}

/// Half angles of the lens field of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FovSpec {
    pub half_horizontal_deg: f64,
    pub half_vertical_deg: f64,
}

impl FovSpec {
    pub fn new(half_horizontal_deg: f64, half_vertical_deg: f64) -> Result<Self> {
        let fov = Self {
            half_horizontal_deg,
            half_vertical_deg,
        };
        fov.validate()?;
        Ok(fov)
    }

    pub fn validate(&self) -> Result<()> {
        let open_quadrant = |v: f64| v > 0.0 && v < 90.0;
        ensure(
            "half_horizontal_deg",
            self.half_horizontal_deg,
            "a half angle in (0, 90) degrees",
            open_quadrant,
        )?;
        ensure(
            "half_vertical_deg",
            self.half_vertical_deg,
            "a half angle in (0, 90) degrees",
            open_quadrant,
        )
    }
}

impl Default for FovSpec {
    // 120 degree lens measured at 90 horizontally, 52 vertically.
    fn default() -> Self {
        Self {
            half_horizontal_deg: 45.0,
            half_vertical_deg: 26.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEnvelope {
    pub near_vertical: Distance,
    pub far_vertical: Distance,
    pub near_horizontal: Distance,
    pub far_horizontal: Distance,
}

impl VisibilityEnvelope {
    pub const INVALID: VisibilityEnvelope = VisibilityEnvelope {
        near_vertical: Distance::Invalid,
        far_vertical: Distance::Invalid,
        near_horizontal: Distance::Invalid,
        far_horizontal: Distance::Invalid,
    };

    pub fn is_invalid(&self) -> bool {
        self.near_vertical.is_invalid() || self.far_vertical.is_invalid()
    }
}

/// Where the vertical FOV cone meets the floor, by tilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TiltRegime {
    /// `tilt <= half_vfov`: the upper edge of the cone never reaches the floor.
    FarUnbounded,
    /// `tilt + half_vfov > 90`: the lower edge is past the nadir; near is pinned to 0.
    NearPinned,
    /// Both edges hit the floor in front of the camera.
    Bounded,
}

impl TiltRegime {
    pub fn classify(tilt_deg: f64, half_vertical_deg: f64) -> Self {
        if tilt_deg <= half_vertical_deg {
            TiltRegime::FarUnbounded
        } else if tilt_deg + half_vertical_deg > 90.0 {
            TiltRegime::NearPinned
        } else {
            TiltRegime::Bounded
        }
    }
}

pub struct VisibilityEnvelopeCalculator;

impl VisibilityEnvelopeCalculator {
    pub fn calculate(pose: &CameraPose, fov: &FovSpec) -> Result<VisibilityEnvelope> {
        pose.validate()?;
        fov.validate()?;

        let height_m = pose.height_m();
        let tilt = pose.tilt_deg;
        let half_v = fov.half_vertical_deg;
        let regime = TiltRegime::classify(tilt, half_v);
        log::debug!("tilt {tilt} deg, half vfov {half_v} deg: {regime:?}");

        // A wide lens can look past the nadir while its far edge is above the horizon, so the
        // pin applies in FarUnbounded too.
        let near_pinned = tilt + half_v > 90.0;
        let (near_vertical, near_horizontal) = if near_pinned {
            (Distance::Finite(0.0), Distance::Finite(0.0))
        } else {
            let near = Distance::Finite(Self::near_vertical(height_m, tilt, half_v));
            (near, Self::horizontal(near, height_m, fov.half_horizontal_deg))
        };
        let far_vertical = match regime {
            TiltRegime::FarUnbounded => Distance::Infinite,
            _ => Distance::Finite(Self::far_vertical(height_m, tilt, half_v)),
        };

        Ok(VisibilityEnvelope {
            near_vertical,
            far_vertical,
            near_horizontal,
            far_horizontal: Self::horizontal(far_vertical, height_m, fov.half_horizontal_deg),
        })
    }

    /// Floor distance to where the upper edge of the cone lands, rounded to 0.1 m.
    pub fn far_vertical(height_m: f64, tilt_deg: f64, half_vertical_deg: f64) -> f64 {
        round_tenth(height_m * (90.0 - (tilt_deg - half_vertical_deg)).to_radians().tan())
    }

    /// Floor distance to where the lower edge of the cone lands, rounded to 0.1 m.
    pub fn near_vertical(height_m: f64, tilt_deg: f64, half_vertical_deg: f64) -> f64 {
        round_tenth(height_m * (90.0 - (tilt_deg + half_vertical_deg)).to_radians().tan())
    }

    /// Width of the horizontal FOV at floor distance `vertical_m`, measured along the slant
    /// line from the lens.
    pub fn horizontal_extent(vertical_m: f64, height_m: f64, half_horizontal_deg: f64) -> f64 {
        let slant = vertical_m.hypot(height_m);
        2.0 * slant * half_horizontal_deg.to_radians().tan()
    }

    /// [`Self::horizontal_extent`] rounded to 0.1 m, for a finite vertical distance.
    pub fn horizontal(vertical: Distance, height_m: f64, half_horizontal_deg: f64) -> Distance {
        vertical.map_finite(|v| round_tenth(Self::horizontal_extent(v, height_m, half_horizontal_deg)))
    }
}
