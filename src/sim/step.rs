//! Per-frame simulation step
//!
//! Called once per rendered frame by the host with the real frame delta.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Raindrop, World};

/// Input sampled by the host for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer/touch position in world coordinates, if the screen is touched
    pub pointer: Option<Vec2>,
}

impl FrameInput {
    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            pointer: Some(Vec2::new(x, y)),
        }
    }
}

/// One-shot sounds the audio layer knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    /// A raindrop landed in the bucket
    Drop,
}

/// Side effects produced by a frame, for the host to act on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FrameEvent {
    PlaySound(Sound),
    /// Raindrop landed in the bucket and was removed
    Caught { id: u32 },
    /// Raindrop fell past the bottom edge and was removed
    Missed { id: u32 },
    /// New raindrop entered at the top edge
    Spawned { id: u32, pos: Vec2 },
}

/// Advance the world by `dt` seconds.
///
/// Negative or non-finite deltas are treated as zero. At most one raindrop
/// spawns per call, however large `dt` is.
pub fn advance(world: &mut World, input: &FrameInput, dt: f32) -> Vec<FrameEvent> {
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
    let mut events = Vec::new();

    world.clock_ns = world.clock_ns.saturating_add(crate::secs_to_nanos(dt));

    // Bucket follows the pointer, then always stays on screen
    if let Some(pointer) = input.pointer {
        world.bucket.follow(pointer.x);
    }
    world.bucket.clamp_to(&world.tuning);

    let bucket = world.bucket.rect();
    let fall = world.tuning.fall_speed * dt;

    let falling = std::mem::take(&mut world.raindrops);
    let mut kept: Vec<Raindrop> = Vec::with_capacity(falling.len() + 1);
    for mut drop in falling {
        drop.pos.y -= fall;

        if drop.rect().overlaps(&bucket) {
            events.push(FrameEvent::PlaySound(Sound::Drop));
            events.push(FrameEvent::Caught { id: drop.id });
            world.drops_gathered += 1;
        } else if drop.is_below_viewport() {
            events.push(FrameEvent::Missed { id: drop.id });
            world.drops_missed += 1;
        } else {
            kept.push(drop);
        }
    }
    world.raindrops = kept;

    if world.spawn_timer.is_due(world.clock_ns) {
        let drop = world.spawn_raindrop();
        events.push(FrameEvent::Spawned {
            id: drop.id,
            pos: drop.pos,
        });
    }

    events
}

/// Number of sound events in a frame's output
pub fn count_sounds(events: &[FrameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, FrameEvent::PlaySound(_)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Raindrop;
    use proptest::prelude::*;

    /// World with the starting raindrop removed so tests place their own
    fn empty_world(seed: u64) -> World {
        let mut world = World::new(seed);
        world.raindrops.clear();
        world
    }

    fn drop_at(world: &mut World, x: f32, y: f32) -> u32 {
        let id = world.next_entity_id();
        world.raindrops.push(Raindrop {
            id,
            pos: Vec2::new(x, y),
            size: RAINDROP_SIZE,
        });
        id
    }

    #[test]
    fn test_pointer_centers_bucket() {
        let mut world = empty_world(1);
        assert_eq!(world.bucket.pos, Vec2::new(368.0, 20.0));

        advance(&mut world, &FrameInput::touch(400.0, 240.0), 1.0 / 60.0);
        assert_eq!(world.bucket.pos.x, 368.0);

        advance(&mut world, &FrameInput::touch(100.0, 240.0), 1.0 / 60.0);
        assert_eq!(world.bucket.pos.x, 68.0);
    }

    #[test]
    fn test_pointer_outside_viewport_is_clamped() {
        let mut world = empty_world(1);
        advance(&mut world, &FrameInput::touch(5.0, 0.0), 0.016);
        assert_eq!(world.bucket.pos.x, 0.0);

        advance(&mut world, &FrameInput::touch(2_000.0, 0.0), 0.016);
        assert_eq!(world.bucket.pos.x, VIEWPORT_WIDTH - BUCKET_SIZE);
    }

    #[test]
    fn test_no_pointer_leaves_bucket() {
        let mut world = empty_world(1);
        advance(&mut world, &FrameInput::touch(200.0, 0.0), 0.016);
        advance(&mut world, &FrameInput::default(), 0.016);
        assert_eq!(world.bucket.pos.x, 168.0);
    }

    #[test]
    fn test_raindrop_falls_and_leaves_viewport() {
        let mut world = empty_world(1);
        let id = drop_at(&mut world, 600.0, 70.0);

        let events = advance(&mut world, &FrameInput::default(), 1.0);

        // 70 - 200 = -130, and -130 + 64 < 0
        assert!(world.raindrops.iter().all(|d| d.id != id));
        assert!(events.contains(&FrameEvent::Missed { id }));
        assert_eq!(count_sounds(&events), 0);
        assert_eq!(world.drops_missed, 1);
    }

    #[test]
    fn test_raindrop_moves_at_fall_speed() {
        let mut world = empty_world(1);
        let id = drop_at(&mut world, 600.0, 400.0);

        advance(&mut world, &FrameInput::default(), 0.5);
        let drop = world.raindrops.iter().find(|d| d.id == id).unwrap();
        assert_eq!(drop.pos.y, 300.0);
        assert_eq!(drop.pos.x, 600.0);
    }

    #[test]
    fn test_full_overlap_is_caught() {
        let mut world = empty_world(1);
        world.bucket.pos = Vec2::new(100.0, 20.0);
        let id = drop_at(&mut world, 100.0, 20.0);

        let events = advance(&mut world, &FrameInput::default(), 0.0);

        assert!(world.raindrops.is_empty());
        assert_eq!(count_sounds(&events), 1);
        assert!(events.contains(&FrameEvent::PlaySound(Sound::Drop)));
        assert!(events.contains(&FrameEvent::Caught { id }));
        assert!(!events.contains(&FrameEvent::Missed { id }));
        assert_eq!(world.drops_gathered, 1);
    }

    #[test]
    fn test_each_caught_drop_plays_once() {
        let mut world = empty_world(1);
        world.bucket.pos = Vec2::new(300.0, 20.0);
        drop_at(&mut world, 280.0, 60.0);
        drop_at(&mut world, 320.0, 40.0);
        drop_at(&mut world, 700.0, 300.0);

        let events = advance(&mut world, &FrameInput::default(), 0.0);

        assert_eq!(count_sounds(&events), 2);
        assert_eq!(world.drops_gathered, 2);
        assert_eq!(world.raindrops.len(), 1);
    }

    #[test]
    fn test_caught_below_edge_counts_as_catch_only() {
        let mut world = empty_world(1);
        world.bucket.pos = Vec2::new(100.0, -100.0);
        let id = drop_at(&mut world, 100.0, -80.0);

        let events = advance(&mut world, &FrameInput::default(), 0.0);
        assert!(events.contains(&FrameEvent::Caught { id }));
        assert!(!events.contains(&FrameEvent::Missed { id }));
        assert_eq!(world.drops_missed, 0);
    }

    #[test]
    fn test_spawns_after_one_second() {
        let mut world = empty_world(1);

        let events = advance(&mut world, &FrameInput::default(), 1.0);
        // Exactly one second is not enough
        assert!(!events.iter().any(|e| matches!(e, FrameEvent::Spawned { .. })));

        let events = advance(&mut world, &FrameInput::default(), 0.01);
        let spawned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                FrameEvent::Spawned { pos, .. } => Some(*pos),
                _ => None,
            })
            .collect();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].y, VIEWPORT_HEIGHT);
        assert!(spawned[0].x >= 0.0 && spawned[0].x <= VIEWPORT_WIDTH - RAINDROP_SIZE);
        assert_eq!(world.spawn_timer.last_spawn_ns, world.clock_ns);
    }

    #[test]
    fn test_large_delta_spawns_once() {
        let mut world = empty_world(1);
        let events = advance(&mut world, &FrameInput::default(), 5.0);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, FrameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_bad_delta_is_ignored() {
        let mut world = empty_world(1);
        let id = drop_at(&mut world, 600.0, 300.0);

        advance(&mut world, &FrameInput::default(), -1.0);
        advance(&mut world, &FrameInput::default(), f32::NAN);
        advance(&mut world, &FrameInput::default(), f32::INFINITY);

        assert_eq!(world.clock_ns, 0);
        let drop = world.raindrops.iter().find(|d| d.id == id).unwrap();
        assert_eq!(drop.pos.y, 300.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = World::new(2024);
        let mut b = World::new(2024);
        let inputs = [
            FrameInput::touch(100.0, 10.0),
            FrameInput::default(),
            FrameInput::touch(650.0, 10.0),
        ];

        for frame in 0..600 {
            let input = &inputs[frame % inputs.len()];
            let ea = advance(&mut a, input, 1.0 / 60.0);
            let eb = advance(&mut b, input, 1.0 / 60.0);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.raindrops, b.raindrops);
        assert_eq!(a.drops_gathered, b.drops_gathered);
    }

    proptest! {
        #[test]
        fn prop_bucket_stays_in_bounds(
            pointers in prop::collection::vec(prop::option::of(-2_000.0f32..2_000.0), 1..50),
            dt in 0.0f32..0.2,
        ) {
            let mut world = World::new(3);
            for pointer in pointers {
                let input = FrameInput { pointer: pointer.map(|x| Vec2::new(x, 0.0)) };
                advance(&mut world, &input, dt);
                prop_assert!(world.bucket.pos.x >= 0.0);
                prop_assert!(world.bucket.pos.x <= VIEWPORT_WIDTH - BUCKET_SIZE);
            }
        }

        #[test]
        fn prop_no_drop_left_below_viewport(
            ys in prop::collection::vec(-300.0f32..480.0, 0..20),
            dt in 0.0f32..2.0,
        ) {
            let mut world = empty_world(5);
            for y in ys {
                drop_at(&mut world, 600.0, y);
            }
            advance(&mut world, &FrameInput::default(), dt);
            prop_assert!(world.raindrops.iter().all(|d| d.pos.y + d.size >= 0.0));
        }

        #[test]
        fn prop_one_sound_per_catch(
            xs in prop::collection::vec(0.0f32..736.0, 0..20),
            bucket_x in 0.0f32..736.0,
        ) {
            let mut world = empty_world(9);
            world.bucket.pos.x = bucket_x;
            for x in xs {
                drop_at(&mut world, x, 40.0);
            }
            let events = advance(&mut world, &FrameInput::default(), 0.0);
            let caught = events
                .iter()
                .filter(|e| matches!(e, FrameEvent::Caught { .. }))
                .count();
            prop_assert_eq!(count_sounds(&events), caught);
            prop_assert_eq!(world.drops_gathered as usize, caught);
        }

        #[test]
        fn prop_at_most_one_spawn_per_second(frame_ms in 1u32..250) {
            let dt = frame_ms as f32 / 1000.0;
            let mut world = World::new(11);
            let mut spawn_times: Vec<u64> = vec![0];

            while world.clock_ns < 10_000_000_000 {
                let events = advance(&mut world, &FrameInput::default(), dt);
                if events.iter().any(|e| matches!(e, FrameEvent::Spawned { .. })) {
                    spawn_times.push(world.clock_ns);
                }
            }

            for pair in spawn_times.windows(2) {
                prop_assert!(pair[1] - pair[0] > SPAWN_INTERVAL_NS);
            }
            // Ten simulated seconds always produce more spawns than just the first
            prop_assert!(spawn_times.len() >= 5);
        }
    }
}
