//! Musical Chairs - a round-based elimination game
//!
//! Core modules:
//! - `sim`: Deterministic tick-based simulation (track geometry, motion, chair claims, rounds)
//! - `autoplay`: Seeded autopilot that plays the game headlessly
//! - `settings`: Runner settings loaded from JSON

pub mod autoplay;
pub mod settings;
pub mod sim;

pub use autoplay::Autopilot;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (ticks are fixed, not time-delta based)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Number of chairs (and players) at game start
    pub const TOTAL_CHAIRS: usize = 10;

    /// Chair layout
    pub const CHAIR_WIDTH: f32 = 90.0;
    pub const CHAIR_HEIGHT: f32 = 72.0;
    pub const CHAIR_SPACING: f32 = 80.0;
    pub const COLUMN_GAP: f32 = 70.0;
    /// Row whose seats sit on the canvas center line
    pub const MIDDLE_ROW: i32 = 2;

    pub const PLAYER_RADIUS: f32 = 32.4;

    /// Stadium track: half width equals the arc radius so segments join smoothly
    pub const TRACK_HALF_WIDTH: f32 = 180.0;
    /// Extra straight length above and below the outermost chair rows
    pub const TRACK_BUFFER: f32 = 40.0;

    /// Track parameter advanced per tick while moving
    pub const MOVE_STEP: f32 = 0.004;

    /// Max vertical distance between a player and a seat for a claim
    pub const CLAIM_TOLERANCE: f32 = CHAIR_HEIGHT / 2.0 + PLAYER_RADIUS;

    /// Elimination animation progress per tick
    pub const ELIMINATION_ANIMATION_SPEED: f32 = 0.03;

    /// Canvas the track is laid out on
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Eliminated players line up this far from the right edge
    pub const ELIMINATED_AREA_INSET: f32 = 90.0;
    pub const ELIMINATED_AREA_TOP: f32 = 75.0;
    pub const ELIMINATED_SLOT_SPACING: f32 = 67.5;

    /// Player colors (0xRRGGBB), indexed by player id
    pub const PLAYER_COLORS: [u32; TOTAL_CHAIRS] = [
        0xE74C3C, // Red
        0x3498DB, // Blue
        0x2ECC71, // Green
        0xF39C12, // Orange
        0x9B59B6, // Purple
        0x1ABC9C, // Teal
        0xE91E63, // Pink
        0x00BCD4, // Cyan
        0xFFEB3B, // Yellow
        0xFF5722, // Deep Orange
    ];
}

/// Wrap a track parameter into [0, 1)
#[inline]
pub fn wrap_unit(t: f32) -> f32 {
    let wrapped = t.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Ease-out cubic: fast start, gentle landing
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
