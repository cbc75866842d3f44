//! Business logic services
//!
//! The service layer orchestrates the reaction and counter stores under
//! one transaction per write.

pub mod context;
pub mod error;
pub mod likeable;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use likeable::{LikeableService, RebuildReport, ReactionOutcome};
