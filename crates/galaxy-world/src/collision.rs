//! Circle-versus-box collision and axis-separated resolution.

use galaxy_common::{Rect, Vec2};

/// True when a circle at `center` overlaps `rect`. Touching is not a hit.
pub fn circle_hits_rect(center: Vec2, radius: f64, rect: &Rect) -> bool {
    let nearest = rect.clamp_point(center);
    center.distance_squared(nearest) < radius * radius
}

pub fn collides(center: Vec2, radius: f64, obstacles: &[Rect]) -> bool {
    obstacles
        .iter()
        .any(|rect| circle_hits_rect(center, radius, rect))
}

/// Resolve a proposed move from `prev` to `proposed`.
///
/// Tries the full move, then reverts the horizontal part. If that still
/// collides the vertical part is reverted too, leaving `prev`.
pub fn resolve(prev: Vec2, proposed: Vec2, radius: f64, obstacles: &[Rect]) -> Vec2 {
    [proposed, Vec2::new(prev.x, proposed.y)]
        .into_iter()
        .find(|p| !collides(*p, radius, obstacles))
        .unwrap_or(prev)
}
