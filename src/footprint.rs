// src/footprint.rs

use crate::envelope::{CameraPose, FovSpec, VisibilityEnvelope, VisibilityEnvelopeCalculator};
use crate::error::Result;
use crate::human_height::HumanHeightAdjuster;
use crate::region::{RoomRectangle, VisibilityRegionAssembler, VisibleRegion};

/// Everything one footprint computation depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootprintRequest {
    pub pose: CameraPose,
    pub fov: FovSpec,
    pub room: RoomRectangle,
    /// When set, the region is built from the envelope adjusted for a target of this height.
    pub target_height_cm: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    /// Bounds of the bare FOV cone on the floor.
    pub theoretical: VisibilityEnvelope,
    /// Bounds for seeing the whole target, when a target height was requested.
    pub adjusted: Option<VisibilityEnvelope>,
    pub region: VisibleRegion,
}

impl Footprint {
    pub fn compute(request: &FootprintRequest) -> Result<Footprint> {
        let FootprintRequest {
            pose,
            fov,
            room,
            target_height_cm,
        } = request;

        let theoretical = VisibilityEnvelopeCalculator::calculate(pose, fov)?;
        let adjusted = target_height_cm
            .map(|target| HumanHeightAdjuster::adjust(target, pose, fov, &theoretical))
            .transpose()?;
        let region = VisibilityRegionAssembler::assemble(
            adjusted.as_ref().unwrap_or(&theoretical),
            pose,
            fov,
            room,
        )?;

        Ok(Footprint {
            theoretical,
            adjusted,
            region,
        })
    }

    /// The envelope the region was built from.
    pub fn effective_envelope(&self) -> &VisibilityEnvelope {
        self.adjusted.as_ref().unwrap_or(&self.theoretical)
    }
}

/// Remembers the last request and its result, recomputing only when the request changes.
#[derive(Debug, Default)]
pub struct FootprintCache {
    last: Option<(FootprintRequest, Result<Footprint>)>,
}

impl FootprintCache {
    pub fn get(&mut self, request: FootprintRequest) -> &Result<Footprint> {
        if self.last.as_ref().is_some_and(|(cached, _)| *cached != request) {
            self.last = None;
        }
        let (_, result) = self.last.get_or_insert_with(|| {
            log::debug!("recomputing footprint for {request:?}");
            (request, Footprint::compute(&request))
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Distance;

    fn request(target_height_cm: Option<f64>) -> FootprintRequest {
        FootprintRequest {
            pose: CameraPose {
                tilt_deg: 45.0,
                pan_deg: 90.0,
                height_cm: 250.0,
                x_position_cm: 500.0,
            },
            fov: FovSpec::default(),
            room: RoomRectangle::new(10.0, 10.0).unwrap(),
            target_height_cm,
        }
    }

    #[test]
    fn without_target_region_follows_theoretical_envelope() {
        let footprint = Footprint::compute(&request(None)).unwrap();
        assert!(footprint.adjusted.is_none());
        assert_eq!(footprint.effective_envelope(), &footprint.theoretical);
        assert!(footprint.region.is_fillable());
    }

    #[test]
    fn target_height_shrinks_the_region() {
        let bare = Footprint::compute(&request(None)).unwrap();
        let with_target = Footprint::compute(&request(Some(170.0))).unwrap();
        let adjusted = with_target.adjusted.unwrap();
        assert_eq!(adjusted.near_vertical, bare.theoretical.near_vertical);
        assert!(matches!(adjusted.far_vertical, Distance::Finite(_)));
        assert!(with_target.region.polygon.area() < bare.region.polygon.area());
    }

    #[test]
    fn invalid_adjustment_is_data_not_an_error() {
        let footprint = Footprint::compute(&request(Some(250.0))).unwrap();
        assert!(footprint.adjusted.unwrap().is_invalid());
        assert!(footprint.region.polygon.is_empty());
    }

    #[test]
    fn cache_recomputes_only_on_change() {
        let mut cache = FootprintCache::default();
        let first = cache.get(request(None)).as_ref().unwrap().clone();
        let again = cache.get(request(None)).as_ref().unwrap().clone();
        assert_eq!(first, again);

        let mut moved = request(None);
        moved.pose.pan_deg = 120.0;
        let changed = cache.get(moved).as_ref().unwrap().clone();
        assert_ne!(changed.region, first.region);
    }

    #[test]
    fn bad_input_surfaces_as_error() {
        let mut bad = request(None);
        bad.pose.tilt_deg = 120.0;
        assert!(Footprint::compute(&bad).is_err());
    }
}
