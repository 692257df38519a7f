mod core;
mod object;

pub use self::core::*;
pub use object::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
        };
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn rect_clamp_point_inside_is_identity() {
        let r = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let p = Vec2::new(3.0, 7.0);
        assert_eq!(r.clamp_point(p), p);
    }

    #[test]
    fn rect_clamp_point_outside_snaps_to_edge() {
        let r = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        assert_eq!(r.clamp_point(Vec2::new(-5.0, 20.0)), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn direction_wire_values() {
        assert_eq!(serde_json::to_string(&Direction::Down).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Direction::Right).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "3");
    }

    #[test]
    fn direction_rejects_out_of_range() {
        assert!(serde_json::from_str::<Direction>("4").is_err());
        assert_eq!(serde_json::from_str::<Direction>("3").unwrap(), Direction::Up);
    }

    #[test]
    fn object_kind_lowercase_on_wire() {
        assert_eq!(serde_json::to_string(&ObjectKind::Plant).unwrap(), "\"plant\"");
        let kind: ObjectKind = serde_json::from_str("\"desk\"").unwrap();
        assert_eq!(kind, ObjectKind::Desk);
        assert!(serde_json::from_str::<ObjectKind>("\"sofa\"").is_err());
    }

    #[test]
    fn placed_object_uses_type_field() {
        let obj = PlacedObject {
            id: "o-1".into(),
            kind: ObjectKind::Chair,
            x: 1.0,
            y: 2.0,
        };
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["type"], "chair");
        assert_eq!(json["id"], "o-1");
    }
}
