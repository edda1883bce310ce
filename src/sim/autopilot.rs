//! Idle/demo mode: a simple AI that plays the game

use glam::Vec2;

use super::state::World;

/// Pointer position that puts the bucket under the lowest raindrop still
/// above the bucket's bottom edge. `None` when nothing is catchable.
pub fn autopilot_target(world: &World) -> Option<Vec2> {
    let bucket_bottom = world.bucket.pos.y;
    world
        .raindrops
        .iter()
        .filter(|d| d.pos.y + d.size > bucket_bottom)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|d| d.rect().center())
}
