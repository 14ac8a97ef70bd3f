// src/lib.rs

pub mod config;
pub mod edge;
pub mod envelope;
pub mod error;
pub mod footprint;
pub mod generator;
pub mod geometry;
pub mod human_height;
pub mod intersection;
pub mod region;

pub use envelope::{CameraPose, Distance, FovSpec, VisibilityEnvelope, VisibilityEnvelopeCalculator};
pub use error::{FovError, Result};
pub use footprint::{Footprint, FootprintCache, FootprintRequest};
pub use geometry::{ConvexPolygon, Point2, MAX_VERTICES};
pub use human_height::HumanHeightAdjuster;
pub use intersection::ConvexIntersection;
pub use region::{RoomRectangle, VisibilityRegionAssembler, VisibleRegion};
