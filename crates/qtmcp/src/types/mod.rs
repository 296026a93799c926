/*! Shared types: ids, errors, geometry. */

mod error;
mod geometry;
mod ids;

pub use error::{ProbeError, ProbeResult};
pub use geometry::{Color, Point, Rect, Size};
pub use ids::{AccessRef, ObjectId, ObjectRef, SubscriptionId};
