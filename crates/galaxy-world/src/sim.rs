//! Per-frame client simulation.

use galaxy_common::protocol::MoveUpdate;
use galaxy_common::{ServerEvent, Vec2};
use galaxy_config::schema::WorldConfig;
use tracing::trace;

use crate::animation::Animator;
use crate::collision;
use crate::input::InputState;
use crate::render::{self, AssetCatalog, AssetKeys, DrawCommand};
use crate::world::WorldState;

/// Movement and animation tuning.
#[derive(Debug, Clone, Copy)]
pub struct SimSettings {
    pub move_speed: f64,
    pub avatar_radius: f64,
    pub animation_frames: u32,
    pub animation_speed: u32,
}

impl SimSettings {
    pub fn from_config(world: &WorldConfig) -> Self {
        Self {
            move_speed: world.move_speed,
            avatar_radius: world.avatar_radius,
            animation_frames: world.animation_frames,
            animation_speed: world.animation_speed,
        }
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

#[derive(Debug, Default)]
pub struct TickOutput {
    /// At most one movement update per frame.
    pub outgoing: Option<MoveUpdate>,
    pub frame: Vec<DrawCommand>,
}

pub struct Simulation {
    world: WorldState,
    input: InputState,
    animator: Animator,
    settings: SimSettings,
    keys: AssetKeys,
    was_moving: bool,
}

impl Simulation {
    pub fn new(world: WorldState, settings: SimSettings, keys: AssetKeys) -> Self {
        Self {
            world,
            input: InputState::new(),
            animator: Animator::new(settings.animation_frames, settings.animation_speed),
            settings,
            keys,
            was_moving: false,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Run one frame: move the local avatar, merge `inbound`, then draw.
    pub fn tick(&mut self, inbound: &[ServerEvent], assets: &dyn AssetCatalog) -> TickOutput {
        self.animator.tick();
        let outgoing = self.step_local();
        for event in inbound {
            self.world.apply(event);
        }
        let frame = render::draw_frame(&self.world, &self.animator, assets, &self.keys);
        TickOutput { outgoing, frame }
    }

    fn step_local(&mut self) -> Option<MoveUpdate> {
        let speed = self.settings.move_speed;
        let radius = self.settings.avatar_radius;
        let obstacles = self.world.obstacles();
        let delta = self.input.displacement(speed);

        let local = self.world.local_mut()?;
        let prev = local.position;
        let position = if delta == Vec2::default() {
            prev
        } else {
            let proposed = Vec2::new(prev.x + delta.x, prev.y + delta.y);
            collision::resolve(prev, proposed, radius, &obstacles)
        };
        let moved = position != prev;

        local.position = position;
        local.direction = self.input.facing(local.direction);
        local.is_moving = moved;

        let update = MoveUpdate {
            x: position.x,
            y: position.y,
            direction: local.direction,
            is_moving: moved,
        };
        let stopped = self.was_moving && !moved;
        self.was_moving = moved;

        if moved || stopped {
            trace!(x = update.x, y = update.y, moving = moved, "Local move");
            Some(update)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::render::NoAssets;
    use crate::scenery::{default_office, SceneObject};
    use galaxy_common::protocol::{SessionReady, UserDescriptor};
    use galaxy_common::{ConnId, Direction, ObjectKind};
    use std::collections::BTreeMap;

    fn sim(scenery: Vec<SceneObject>) -> Simulation {
        let world = WorldState::new(
            "lobby",
            UserDescriptor {
                user_id: "u".into(),
                username: "me".into(),
                avatar_url: String::new(),
            },
            Vec2::new(400.0, 300.0),
            scenery,
        );
        let mut sim = Simulation::new(world, SimSettings::default(), AssetKeys::default());
        let seat = [
            ServerEvent::SessionReady(SessionReady {
                conn_id: ConnId::from("me"),
            }),
            ServerEvent::ExistingUsers(BTreeMap::new()),
        ];
        sim.tick(&seat, &NoAssets);
        sim
    }

    #[test]
    fn nothing_is_emitted_before_seating() {
        let world = WorldState::new(
            "lobby",
            UserDescriptor {
                user_id: "u".into(),
                username: "me".into(),
                avatar_url: String::new(),
            },
            Vec2::new(400.0, 300.0),
            Vec::new(),
        );
        let mut sim = Simulation::new(world, SimSettings::default(), AssetKeys::default());
        sim.input_mut().press(Key::Right);
        assert!(sim.tick(&[], &NoAssets).outgoing.is_none());
    }

    #[test]
    fn moving_then_stopping_emits_one_final_update() {
        let mut sim = sim(Vec::new());
        sim.input_mut().press(Key::Right);

        let first = sim.tick(&[], &NoAssets).outgoing.unwrap();
        assert_eq!((first.x, first.y), (405.0, 300.0));
        assert_eq!(first.direction, Direction::Right);
        assert!(first.is_moving);

        let second = sim.tick(&[], &NoAssets).outgoing.unwrap();
        assert_eq!(second.x, 410.0);

        sim.input_mut().release(Key::Right);
        let stop = sim.tick(&[], &NoAssets).outgoing.unwrap();
        assert!(!stop.is_moving);
        assert_eq!(stop.x, 410.0);
        assert_eq!(stop.direction, Direction::Right);

        assert!(sim.tick(&[], &NoAssets).outgoing.is_none());
    }

    #[test]
    fn blocked_movement_is_not_a_move() {
        // Wall directly to the right of spawn, touching the avatar.
        let desk = SceneObject::new("wall", ObjectKind::Desk, Vec2::new(464.0, 320.0));
        let mut sim = sim(vec![desk]);
        assert_eq!(sim.world().local().unwrap().position, Vec2::new(400.0, 300.0));

        sim.input_mut().press(Key::Right);
        let out = sim.tick(&[], &NoAssets);
        assert!(out.outgoing.is_none());
        let local = sim.world().local().unwrap();
        assert_eq!(local.position, Vec2::new(400.0, 300.0));
        assert!(!local.is_moving);
    }

    #[test]
    fn walking_into_scenery_stops_at_its_edge() {
        let mut sim = sim(default_office());
        sim.input_mut().press(Key::Left);
        let mut last = None;
        for _ in 0..40 {
            if let Some(update) = sim.tick(&[], &NoAssets).outgoing {
                last = Some(update);
            }
        }
        // chair-1's right edge is at x 324; the avatar stops one radius away.
        let last = last.unwrap();
        assert!(!last.is_moving);
        assert!(last.x >= 340.0);
        assert_eq!(sim.world().local().unwrap().position.x, last.x);
    }

    #[test]
    fn suspended_input_does_not_move() {
        let mut sim = sim(Vec::new());
        sim.input_mut().press(Key::Up);
        sim.input_mut().set_suspended(true);
        assert!(sim.tick(&[], &NoAssets).outgoing.is_none());
        assert_eq!(sim.world().local().unwrap().position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn remote_updates_are_drawn_in_the_same_frame() {
        let mut sim = sim(Vec::new());
        let joined = ServerEvent::UserJoined(galaxy_common::protocol::SessionSnapshot {
            conn_id: ConnId::from("b"),
            user_id: "ub".into(),
            username: "bob".into(),
            avatar_url: String::new(),
            room_id: "lobby".into(),
            x: 100.0,
            y: 100.0,
            direction: Direction::Down,
            is_moving: false,
        });
        let out = sim.tick(&[joined], &NoAssets);
        let labels: Vec<&str> = out
            .frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["bob", "me"]);
    }
}
