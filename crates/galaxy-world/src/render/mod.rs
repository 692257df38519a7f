//! Depth ordering and draw command generation.
//!
//! Entities are collected as objects, then the local avatar, then remote
//! avatars, and stably sorted by their y anchor so that things lower on
//! screen are painted over things above them. Ties keep collection order.

mod assets;
mod types;

pub use assets::*;
pub use types::*;

use galaxy_common::{Rect, Vec2};

use crate::animation::Animator;
use crate::scenery::SceneObject;
use crate::world::{Avatar, WorldState};

#[derive(Debug, Clone, Copy)]
pub enum Renderable<'a> {
    Object(&'a SceneObject),
    Avatar { avatar: &'a Avatar, is_local: bool },
}

impl Renderable<'_> {
    pub fn depth(&self) -> f64 {
        match self {
            Renderable::Object(obj) => obj.position.y,
            Renderable::Avatar { avatar, .. } => avatar.position.y,
        }
    }
}

/// Everything to draw this frame, back to front.
pub fn render_list(world: &WorldState) -> Vec<Renderable<'_>> {
    let mut items: Vec<Renderable<'_>> = world.objects().map(Renderable::Object).collect();
    if let Some(local) = world.local() {
        items.push(Renderable::Avatar {
            avatar: local,
            is_local: true,
        });
    }
    items.extend(world.remotes().values().map(|avatar| Renderable::Avatar {
        avatar,
        is_local: false,
    }));
    // sort_by is stable
    items.sort_by(|a, b| a.depth().total_cmp(&b.depth()));
    items
}

/// Produce the full frame. Missing images degrade to placeholders.
pub fn draw_frame(
    world: &WorldState,
    animator: &Animator,
    assets: &dyn AssetCatalog,
    keys: &AssetKeys,
) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear {
        color: BACKGROUND_COLOR,
    }];
    let background = keys.background();
    if assets.is_ready(&background) {
        out.push(DrawCommand::Pattern { image: background });
    } else {
        out.push(DrawCommand::Grid {
            spacing: GRID_SPACING,
            color: GRID_COLOR,
        });
    }

    let sheet = keys.sprite_sheet();
    let sheet_ready = assets.is_ready(&sheet);
    for item in render_list(world) {
        match item {
            Renderable::Object(obj) => draw_object(&mut out, obj, assets, keys),
            Renderable::Avatar { avatar, is_local } => {
                let column = animator.column(avatar.is_moving);
                draw_avatar(&mut out, avatar, is_local, column, sheet_ready.then_some(&sheet));
            }
        }
    }
    out
}

fn draw_object(
    out: &mut Vec<DrawCommand>,
    obj: &SceneObject,
    assets: &dyn AssetCatalog,
    keys: &AssetKeys,
) {
    let image = keys.object(obj.kind);
    let dest = obj.draw_rect();
    if assets.is_ready(&image) {
        out.push(DrawCommand::Sprite {
            image,
            source: None,
            dest,
        });
    } else {
        out.push(DrawCommand::Rectangle {
            rect: dest,
            color: OBJECT_PLACEHOLDER_COLOR,
        });
    }
}

fn draw_avatar(
    out: &mut Vec<DrawCommand>,
    avatar: &Avatar,
    is_local: bool,
    column: u32,
    sheet: Option<&String>,
) {
    let p = avatar.position;
    match sheet {
        Some(sheet) => out.push(DrawCommand::Sprite {
            image: sheet.clone(),
            source: Some(Rect {
                x: column as f64 * SPRITE_SOURCE_SIZE,
                y: avatar.direction.row() as f64 * SPRITE_SOURCE_SIZE,
                width: SPRITE_SOURCE_SIZE,
                height: SPRITE_SOURCE_SIZE,
            }),
            dest: Rect {
                x: p.x - SPRITE_DISPLAY_SIZE / 2.0,
                y: p.y - SPRITE_DISPLAY_SIZE / 2.0,
                width: SPRITE_DISPLAY_SIZE,
                height: SPRITE_DISPLAY_SIZE,
            },
        }),
        None => out.push(DrawCommand::Circle {
            center: p,
            radius: PLACEHOLDER_RADIUS,
            color: if is_local {
                LOCAL_AVATAR_COLOR
            } else {
                REMOTE_AVATAR_COLOR
            },
        }),
    }
    out.push(DrawCommand::Label {
        text: avatar.username.clone(),
        position: Vec2::new(p.x, p.y + LABEL_OFFSET),
        color: LABEL_COLOR,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::protocol::{SessionReady, SessionSnapshot, UserDescriptor};
    use galaxy_common::{ConnId, Direction, ObjectKind, ServerEvent, Vec2};
    use std::collections::BTreeMap;

    fn snapshot(id: &str, x: f64, y: f64, moving: bool) -> SessionSnapshot {
        SessionSnapshot {
            conn_id: ConnId::from(id),
            user_id: format!("u-{id}"),
            username: id.into(),
            avatar_url: String::new(),
            room_id: "lobby".into(),
            x,
            y,
            direction: Direction::Left,
            is_moving: moving,
        }
    }

    fn world_with(scenery: Vec<SceneObject>, remotes: &[(&str, f64, f64)]) -> WorldState {
        let mut w = WorldState::new(
            "lobby",
            UserDescriptor {
                user_id: "u-me".into(),
                username: "me".into(),
                avatar_url: String::new(),
            },
            Vec2::new(400.0, 300.0),
            scenery,
        );
        w.apply(&ServerEvent::SessionReady(SessionReady {
            conn_id: ConnId::from("me"),
        }));
        let users: BTreeMap<_, _> = remotes
            .iter()
            .map(|(id, x, y)| (ConnId::from(*id), snapshot(id, *x, *y, false)))
            .collect();
        w.apply(&ServerEvent::ExistingUsers(users));
        w
    }

    #[test]
    fn list_is_sorted_by_y() {
        let w = world_with(
            crate::scenery::default_office(),
            &[("a", 0.0, 500.0), ("b", 0.0, 100.0)],
        );
        let depths: Vec<f64> = render_list(&w).iter().map(|r| r.depth()).collect();
        let mut sorted = depths.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(depths, sorted);
        assert_eq!(depths.len(), 6 + 3);
    }

    #[test]
    fn equal_depth_keeps_collection_order() {
        let desk = SceneObject::new("desk", ObjectKind::Desk, Vec2::new(100.0, 300.0));
        let w = world_with(vec![desk], &[("a", 50.0, 300.0)]);
        let list = render_list(&w);
        assert!(matches!(list[0], Renderable::Object(_)));
        assert!(matches!(list[1], Renderable::Avatar { is_local: true, .. }));
        assert!(matches!(list[2], Renderable::Avatar { is_local: false, .. }));
    }

    #[test]
    fn missing_assets_fall_back_to_placeholders() {
        let desk = SceneObject::new("desk", ObjectKind::Desk, Vec2::new(100.0, 100.0));
        let w = world_with(vec![desk], &[("a", 50.0, 400.0)]);
        let frame = draw_frame(&w, &Animator::default(), &NoAssets, &AssetKeys::default());

        assert!(matches!(frame[1], DrawCommand::Grid { .. }));
        assert!(matches!(frame[2], DrawCommand::Rectangle { .. }));
        assert_eq!(
            frame[3],
            DrawCommand::Circle {
                center: Vec2::new(400.0, 300.0),
                radius: PLACEHOLDER_RADIUS,
                color: LOCAL_AVATAR_COLOR,
            }
        );
        assert_eq!(
            frame[4],
            DrawCommand::Label {
                text: "me".into(),
                position: Vec2::new(400.0, 335.0),
                color: LABEL_COLOR,
            }
        );
        assert!(matches!(
            frame[5],
            DrawCommand::Circle {
                color: REMOTE_AVATAR_COLOR,
                ..
            }
        ));
    }

    #[test]
    fn sprite_uses_direction_row_and_animation_column() {
        let keys = AssetKeys::default();
        let mut assets = LoadedAssets::new();
        assets.mark_ready(keys.sprite_sheet());
        assets.mark_ready(keys.background());

        let mut w = world_with(Vec::new(), &[]);
        w.apply(&ServerEvent::UserJoined(snapshot("a", 10.0, 700.0, true)));

        let mut animator = Animator::new(4, 1);
        animator.tick();
        animator.tick();

        let frame = draw_frame(&w, &animator, &assets, &keys);
        assert!(matches!(frame[1], DrawCommand::Pattern { .. }));
        let sources: Vec<Rect> = frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { source, .. } => *source,
                _ => None,
            })
            .collect();
        // Local avatar idle facing down; remote walking left.
        assert_eq!(sources[0].x, 0.0);
        assert_eq!(sources[0].y, 0.0);
        assert_eq!(sources[1].x, 2.0 * SPRITE_SOURCE_SIZE);
        assert_eq!(sources[1].y, 1.0 * SPRITE_SOURCE_SIZE);
    }

    #[test]
    fn object_sprite_is_bottom_anchored() {
        let keys = AssetKeys::new("/static/");
        let mut assets = LoadedAssets::new();
        assets.mark_ready(keys.object(ObjectKind::Plant));
        let plant = SceneObject::new("p", ObjectKind::Plant, Vec2::new(150.0, 200.0));
        let w = world_with(vec![plant], &[]);
        let frame = draw_frame(&w, &Animator::default(), &assets, &keys);
        assert_eq!(
            frame[2],
            DrawCommand::Sprite {
                image: "/static/plant.png".into(),
                source: None,
                dest: Rect {
                    x: 126.0,
                    y: 136.0,
                    width: 48.0,
                    height: 64.0
                },
            }
        );
    }
}
