//! Function-call-level interfaces to the engine
//!
//! The engine owns no transport: callers deliver samples and forward the
//! returned updates. External systems plug in behind the collaborator
//! traits; in-memory reference implementations back tests and the demo.

pub mod collaborators;
pub mod mock;
pub mod session_api;
pub mod types;

pub use collaborators::{AnchorStore, RefinementProvider};
pub use mock::{FailingRefinement, MemoryAnchorStore, PassthroughRefinement};
pub use session_api::SessionApi;
pub use types::{RawFix, RefinedFix, ResolvedAnchor, SessionUpdate};
