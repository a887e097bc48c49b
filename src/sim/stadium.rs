//! Stadium track geometry
//!
//! The track is a closed "stadium": two vertical straights joined by two
//! semicircular arcs. Its straight length and vertical offset follow the
//! surviving chair rows, so geometry is always derived from the current
//! chair set and never cached across a removal.
//!
//! Track parameter `t` starts at the middle of the right straight and runs
//! down the right side, through the bottom arc, up the left side, through the
//! top arc and back down to the start.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Chair, Column};
use crate::consts::*;

/// Which piece of the stadium a track parameter falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSegment {
    RightStraight,
    BottomSemi,
    LeftStraight,
    TopSemi,
}

impl PathSegment {
    /// Chair column reachable from this segment (arcs reach nothing)
    pub fn reachable_column(self) -> Option<Column> {
        match self {
            PathSegment::RightStraight => Some(Column::Right),
            PathSegment::LeftStraight => Some(Column::Left),
            PathSegment::BottomSemi | PathSegment::TopSemi => None,
        }
    }
}

/// Derived dimensions of the track for one chair set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StadiumGeometry {
    pub half_width: f32,
    /// Arc radius (always equals `half_width`)
    pub radius: f32,
    pub straight_length: f32,
    pub half_straight: f32,
    pub perimeter: f32,
    /// End of the lower half of the right straight
    pub seg1_end: f32,
    /// End of the bottom arc
    pub seg2_end: f32,
    /// End of the left straight
    pub seg3_end: f32,
    /// End of the top arc; the rest wraps back onto the right straight
    pub seg4_end: f32,
    /// Vertical offset of the track center from the canvas center
    pub center_offset: f32,
}

/// Vertical offset of a chair row's seats from the canvas center
#[inline]
fn row_offset(row: u32) -> f32 {
    (MIDDLE_ROW - row as i32) as f32 * CHAIR_SPACING
}

impl StadiumGeometry {
    /// Compute the track for the chairs that are still in play
    pub fn from_chairs(chairs: &[Chair]) -> Self {
        let half_width = TRACK_HALF_WIDTH;

        // No chairs left: fall back to the full five-row layout
        let rows = || chairs.iter().filter(|c| !c.is_removed).map(|c| c.row);
        let min_row = rows().min().unwrap_or(0);
        let max_row = rows().max().unwrap_or(4);

        // Higher rows sit further up the canvas (smaller y)
        let top_y = row_offset(max_row);
        let bottom_y = row_offset(min_row);

        let half_straight = (bottom_y - top_y) / 2.0 + TRACK_BUFFER;
        let straight_length = half_straight * 2.0;
        let radius = half_width;
        let arc_length = PI * radius;
        let perimeter = 2.0 * straight_length + 2.0 * arc_length;

        Self {
            half_width,
            radius,
            straight_length,
            half_straight,
            perimeter,
            seg1_end: half_straight / perimeter,
            seg2_end: (half_straight + arc_length) / perimeter,
            seg3_end: (half_straight + arc_length + straight_length) / perimeter,
            seg4_end: (half_straight + arc_length + straight_length + arc_length) / perimeter,
            center_offset: (top_y + bottom_y) / 2.0,
        }
    }

    /// Length of one semicircular arc
    #[inline]
    pub fn arc_length(&self) -> f32 {
        PI * self.radius
    }

    /// Classify a track parameter
    pub fn segment_at(&self, t: f32) -> PathSegment {
        if t < self.seg1_end {
            PathSegment::RightStraight
        } else if t < self.seg2_end {
            PathSegment::BottomSemi
        } else if t < self.seg3_end {
            PathSegment::LeftStraight
        } else if t < self.seg4_end {
            PathSegment::TopSemi
        } else {
            PathSegment::RightStraight
        }
    }

    /// Map a track parameter to canvas coordinates around `center`
    pub fn point_at(&self, t: f32, center: Vec2) -> Vec2 {
        let distance = t * self.perimeter;
        let cy = center.y + self.center_offset;

        let seg1 = self.half_straight;
        let seg2 = seg1 + self.arc_length();
        let seg3 = seg2 + self.straight_length;
        let seg4 = seg3 + self.arc_length();

        if distance < seg1 {
            // Right straight, heading down from the middle
            Vec2::new(center.x + self.half_width, cy + distance)
        } else if distance < seg2 {
            // Bottom arc, right to left
            let angle = (distance - seg1) / self.radius;
            Vec2::new(
                center.x + self.radius * angle.cos(),
                cy + self.half_straight + self.radius * angle.sin(),
            )
        } else if distance < seg3 {
            // Left straight, heading up
            Vec2::new(
                center.x - self.half_width,
                cy + self.half_straight - (distance - seg2),
            )
        } else if distance < seg4 {
            // Top arc, left to right
            let angle = PI + (distance - seg3) / self.radius;
            Vec2::new(
                center.x + self.radius * angle.cos(),
                cy - self.half_straight + self.radius * angle.sin(),
            )
        } else {
            // Right straight, heading down from the top back to the start
            Vec2::new(
                center.x + self.half_width,
                cy - self.half_straight + (distance - seg4),
            )
        }
    }
}

/// Segment for parameter `t` on the track shaped by `chairs`
pub fn path_segment(t: f32, chairs: &[Chair]) -> PathSegment {
    StadiumGeometry::from_chairs(chairs).segment_at(t)
}

/// Canvas position for parameter `t` on the track shaped by `chairs`
pub fn position_on_track(t: f32, center: Vec2, chairs: &[Chair]) -> Vec2 {
    StadiumGeometry::from_chairs(chairs).point_at(t, center)
}

/// Center of the fixed canvas the game is laid out on
#[inline]
pub fn canvas_center() -> Vec2 {
    Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0)
}

/// Seat position of a chair (independent of the track offset)
pub fn chair_position(chair: &Chair, center: Vec2) -> Vec2 {
    let dx = COLUMN_GAP / 2.0 + CHAIR_WIDTH / 2.0;
    let x = match chair.column {
        Column::Left => center.x - dx,
        Column::Right => center.x + dx,
    };
    Vec2::new(x, center.y + row_offset(chair.row))
}

/// Resting slot in the eliminated-players area for the given elimination order
pub fn elimination_slot(order: u32, screen_width: f32) -> Vec2 {
    Vec2::new(
        screen_width - ELIMINATED_AREA_INSET,
        ELIMINATED_AREA_TOP + order as f32 * ELIMINATED_SLOT_SPACING,
    )
}
