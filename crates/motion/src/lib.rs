//! Player motion for the platformer: ray-cast collision resolution and the
//! character movement model built on it.
//!
//! # Invariants
//! - `KinematicController::move_by` never returns a displacement longer than
//!   the requested one on either axis, and never reverses its sign.
//! - Horizontal collisions resolve before vertical ones; vertical rays start
//!   from the horizontally resolved position.
//! - Contact flags describe the most recent move only.

pub mod character;
pub mod controller;
pub mod geometry;
pub mod session;
pub mod smooth;

pub use character::{CharacterMotion, JumpKind, JumpPhysics, MotionStep};
pub use controller::{CollisionInfo, KinematicController};
pub use geometry::{Aabb, RayCaster, RayHit, TileGeometry, ray_aabb_distance};
pub use session::{PlayerFrame, PlaySession, SessionError};
pub use smooth::SmoothDamp;
