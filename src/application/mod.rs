//! Application layer: tree store, projection and session
//!
//! This layer owns the in-memory tree state and depends on I/O boundary traits
//! only for loading seeds.

pub mod error;
pub mod error_ext;
pub mod projector;
pub mod services;
pub mod session;
pub mod store;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use projector::{FlatteningProjector, NodePath};
pub use services::SeedService;
pub use session::TreeSession;
pub use store::{IdAllocator, Outcome, SubscriptionId, TreeStore};
