//! Geodetic Anchor Relocation Engine
//!
//! Anchors a digital object at the real-world position where it was created
//! and computes, for any observer somewhere else, the local offset at which
//! that object must render so it appears in the same absolute place. Pure
//! coordinate math (geodetic, ECEF, and local East-North-Up frames) plus a
//! small per-session decision procedure that notices when an observer has
//! wandered far enough from their reference point to need a refreshed set
//! of nearby anchors.

pub mod algorithms;
pub mod api;
pub mod core;
pub mod precision;
pub mod session;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use algorithms::{haversine_distance_m, FrameConverter, VectorResolver};
pub use api::{
    AnchorStore, FailingRefinement, MemoryAnchorStore, PassthroughRefinement, RawFix, RefinedFix,
    RefinementProvider, ResolvedAnchor, SessionApi, SessionUpdate,
};
pub use self::core::{Anchor, EcefDelta, EcefPosition, EnuVector, FramedVector, GeodeticPosition};
pub use precision::WideFloat;
pub use session::{ObserverSession, PositionEvent, ProximityMonitor, SessionState};
pub use utils::EngineConfig;
pub use validation::{GeoError, GeoResult};
