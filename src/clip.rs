//! Cohen-Sutherland clipping of a single segment against the NDC cube `[-1, 1]^3`.

use crate::camera::Segment;
use crate::math::Vec3;

/// Refinement rounds before a segment is given up on.
pub const MAX_CLIP_ITERATIONS: usize = 9;

/// Bitmask of the half-spaces a point lies outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutCode(u8);

impl OutCode {
    pub const INSIDE: OutCode = OutCode(0);
    pub const RIGHT: OutCode = OutCode(1 << 0);
    pub const LEFT: OutCode = OutCode(1 << 1);
    pub const TOP: OutCode = OutCode(1 << 2);
    pub const BOTTOM: OutCode = OutCode(1 << 3);
    pub const FAR: OutCode = OutCode(1 << 4);
    pub const NEAR: OutCode = OutCode(1 << 5);

    pub fn of(p: Vec3) -> OutCode {
        let mut bits = 0;
        if p.x > 1.0 {
            bits |= Self::RIGHT.0;
        }
        if p.x < -1.0 {
            bits |= Self::LEFT.0;
        }
        if p.y > 1.0 {
            bits |= Self::TOP.0;
        }
        if p.y < -1.0 {
            bits |= Self::BOTTOM.0;
        }
        if p.z > 1.0 {
            bits |= Self::FAR.0;
        }
        if p.z < -1.0 {
            bits |= Self::NEAR.0;
        }
        OutCode(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: OutCode) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: OutCode) -> bool {
        self.0 & other.0 != 0
    }

    /// The first violated plane in check order `+x, -x, +y, -y, +z, -z`.
    pub fn first_plane(self) -> Option<ClipPlane> {
        ClipPlane::ORDER
            .into_iter()
            .find(|plane| self.contains(plane.out_code()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipPlane {
    Right,
    Left,
    Top,
    Bottom,
    Far,
    Near,
}

impl ClipPlane {
    pub const ORDER: [ClipPlane; 6] = [
        ClipPlane::Right,
        ClipPlane::Left,
        ClipPlane::Top,
        ClipPlane::Bottom,
        ClipPlane::Far,
        ClipPlane::Near,
    ];

    pub fn out_code(self) -> OutCode {
        match self {
            ClipPlane::Right => OutCode::RIGHT,
            ClipPlane::Left => OutCode::LEFT,
            ClipPlane::Top => OutCode::TOP,
            ClipPlane::Bottom => OutCode::BOTTOM,
            ClipPlane::Far => OutCode::FAR,
            ClipPlane::Near => OutCode::NEAR,
        }
    }

    fn axis(self, p: Vec3) -> f32 {
        match self {
            ClipPlane::Right | ClipPlane::Left => p.x,
            ClipPlane::Top | ClipPlane::Bottom => p.y,
            ClipPlane::Far | ClipPlane::Near => p.z,
        }
    }

    fn set_axis(self, p: &mut Vec3, value: f32) {
        match self {
            ClipPlane::Right | ClipPlane::Left => p.x = value,
            ClipPlane::Top | ClipPlane::Bottom => p.y = value,
            ClipPlane::Far | ClipPlane::Near => p.z = value,
        }
    }

    fn boundary(self) -> f32 {
        match self {
            ClipPlane::Right | ClipPlane::Top | ClipPlane::Far => 1.0,
            ClipPlane::Left | ClipPlane::Bottom | ClipPlane::Near => -1.0,
        }
    }

    /// Moves `outside` along the segment towards `other` until it lies on this plane.
    ///
    /// `other` must not violate this plane, which keeps the denominator non-zero.
    fn intersect(self, outside: Vec3, other: Vec3) -> Vec3 {
        let boundary = self.boundary();
        let alpha = (boundary - self.axis(outside)) / (self.axis(other) - self.axis(outside));
        let mut point = outside.lerp(other, alpha);
        self.set_axis(&mut point, boundary);
        point
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipResult {
    /// The (possibly shortened) segment lies inside the cube.
    Accepted(Segment),
    /// Both endpoints share an outside half-space.
    Rejected,
    /// The iteration budget ran out. Callers draw nothing.
    Unconverged,
}

impl ClipResult {
    pub fn segment(self) -> Option<Segment> {
        match self {
            ClipResult::Accepted(segment) => Some(segment),
            ClipResult::Rejected | ClipResult::Unconverged => None,
        }
    }
}

pub fn clip_line(segment: Segment) -> ClipResult {
    clip_line_rounds(segment).0
}

/// Clips like [`clip_line`] and also returns how many rounds ran, counting the
/// final accept or reject test.
///
/// Every clip pins one coordinate and clears one bit, so a segment needs at most
/// six clips plus the accepting round.
pub fn clip_line_rounds(segment: Segment) -> (ClipResult, usize) {
    let [mut p1, mut p2] = segment;

    for round in 1..=MAX_CLIP_ITERATIONS {
        let code1 = OutCode::of(p1);
        let code2 = OutCode::of(p2);

        if code1.is_inside() && code2.is_inside() {
            return (ClipResult::Accepted([p1, p2]), round);
        }
        if code1.intersects(code2) {
            return (ClipResult::Rejected, round);
        }

        if let Some(plane) = code1.first_plane() {
            p1 = plane.intersect(p1, p2);
        } else if let Some(plane) = code2.first_plane() {
            p2 = plane.intersect(p2, p1);
        }
    }

    log::warn!(
        "clip did not converge after {} iterations: {:?}",
        MAX_CLIP_ITERATIONS,
        segment
    );
    (ClipResult::Unconverged, MAX_CLIP_ITERATIONS)
}
