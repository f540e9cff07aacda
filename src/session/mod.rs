//! Observer session state and proximity tracking

pub mod proximity;

pub use proximity::{ObserverSession, PositionEvent, ProximityMonitor, SessionState};
