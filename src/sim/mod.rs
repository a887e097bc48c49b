//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed ticks only (no time deltas)
//! - No randomness
//! - Stable iteration order (list order, ties broken by list order)
//! - No rendering, audio or platform dependencies

pub mod animation;
pub mod claim;
pub mod motion;
pub mod stadium;
pub mod state;
pub mod tick;

pub use claim::{Claim, resolve_claims};
pub use motion::has_completed_lap;
pub use stadium::{PathSegment, StadiumGeometry, chair_position, path_segment, position_on_track};
pub use state::{
    Chair, Column, GameEvent, GamePhase, JudgedOutReason, Player, assign_track_positions,
    create_initial_chairs, create_initial_players, remove_one_chair, seat_remaining_players,
};
pub use tick::{Command, GameEngine, GameSnapshot};
