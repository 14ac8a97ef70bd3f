// src/human_height.rs

use crate::envelope::{
    round_tenth, CameraPose, Distance, FovSpec, VisibilityEnvelope, VisibilityEnvelopeCalculator,
};
use crate::error::{ensure, Result};

/// Narrows an envelope to the floor range where a standing target of a given height is seen
/// head to toe.
pub struct HumanHeightAdjuster;

impl HumanHeightAdjuster {
    pub fn adjust(
        target_height_cm: f64,
        pose: &CameraPose,
        fov: &FovSpec,
        prior: &VisibilityEnvelope,
    ) -> Result<VisibilityEnvelope> {
        ensure(
            "target_height_cm",
            target_height_cm,
            "a positive target height",
            |v| v > 0.0,
        )?;
        pose.validate()?;
        fov.validate()?;

        let camera_cm = pose.height_cm;
        let tilt = pose.tilt_deg;
        let half_v = fov.half_vertical_deg;

        let (near_vertical, far_vertical) = if camera_cm > target_height_cm {
            // Only the far edge moves: the cone is cut at the target's head height.
            let far = if tilt <= half_v {
                Distance::Infinite
            } else {
                prior
                    .far_vertical
                    .map_finite(|far| round_tenth(far * (1.0 - target_height_cm / camera_cm)))
            };
            match (prior.near_vertical, far) {
                (Distance::Finite(near), Distance::Finite(far)) if far < near => {
                    log::debug!("target {target_height_cm} cm: far {far} m closer than near {near} m");
                    return Ok(VisibilityEnvelope::INVALID);
                }
                (near, far) => (near, far),
            }
        } else if camera_cm == target_height_cm {
            if tilt <= half_v {
                (prior.near_vertical, Distance::Infinite)
            } else {
                return Ok(VisibilityEnvelope::INVALID);
            }
        } else if tilt < half_v {
            // Camera below the head: the upper cone edge has to rise past it first.
            let rise_m = (target_height_cm - camera_cm) / 100.0;
            let near = round_tenth(rise_m / (half_v - tilt).to_radians().tan());
            (Distance::Finite(near), Distance::Infinite)
        } else {
            return Ok(VisibilityEnvelope::INVALID);
        };

        let height_m = pose.height_m();
        Ok(VisibilityEnvelope {
            near_vertical,
            far_vertical,
            near_horizontal: VisibilityEnvelopeCalculator::horizontal(
                near_vertical,
                height_m,
                fov.half_horizontal_deg,
            ),
            far_horizontal: VisibilityEnvelopeCalculator::horizontal(
                far_vertical,
                height_m,
                fov.half_horizontal_deg,
            ),
        })
    }
}
