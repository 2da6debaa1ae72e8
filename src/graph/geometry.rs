use eframe::egui::{Pos2, Vec2};

/// Attachment side of a connector endpoint on a node rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// A node viewed as an axis-aligned rectangle centered on its position.
#[derive(Clone, Copy, Debug)]
pub struct RectEntity {
    pub center: Pos2,
    pub half: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct Connector {
    pub a_point: Pos2,
    pub b_point: Pos2,
    pub a_side: Side,
    pub b_side: Side,
}

// Absorbs float error when matching a boundary point back to a side.
const SIDE_TOLERANCE: f32 = 1.0;

/// Computes both anchor points for a connector between two rectangles: the
/// point where the center-to-center line crosses each rectangle's boundary,
/// plus the side it crosses. Positions and sizes change every frame under
/// layout and dragging, so nothing here is cached.
pub fn resolve_connector(a: &RectEntity, b: &RectEntity) -> Connector {
    let (a_point, a_side) = boundary_point(a, b.center);
    let (b_point, b_side) = boundary_point(b, a.center);
    Connector {
        a_point,
        b_point,
        a_side,
        b_side,
    }
}

fn boundary_point(rect: &RectEntity, toward: Pos2) -> (Pos2, Side) {
    let delta = toward - rect.center;

    // Degenerate rectangles and coincident centers resolve to the center
    // itself, deterministically.
    if rect.half.x <= 0.0 || rect.half.y <= 0.0 {
        return (rect.center, Side::Top);
    }
    let scaled = Vec2::new(delta.x / rect.half.x, delta.y / rect.half.y);
    if scaled.x.abs() <= f32::EPSILON && scaled.y.abs() <= f32::EPSILON {
        return (rect.center, Side::Top);
    }

    // In half-extent units the boundary is the unit square; the larger
    // scaled component decides whether the crossing is on a vertical or a
    // horizontal edge.
    let t = 1.0 / scaled.x.abs().max(scaled.y.abs());
    let point = rect.center + delta * t;
    (point, classify_side(rect, point))
}

fn classify_side(rect: &RectEntity, point: Pos2) -> Side {
    if (point.x - (rect.center.x - rect.half.x)).abs() <= SIDE_TOLERANCE {
        Side::Left
    } else if (point.x - (rect.center.x + rect.half.x)).abs() <= SIDE_TOLERANCE {
        Side::Right
    } else if (point.y - (rect.center.y - rect.half.y)).abs() <= SIDE_TOLERANCE {
        Side::Top
    } else if (point.y - (rect.center.y + rect.half.y)).abs() <= SIDE_TOLERANCE {
        Side::Bottom
    } else {
        Side::Top
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn rect(x: f32, y: f32, hw: f32, hh: f32) -> RectEntity {
        RectEntity {
            center: pos2(x, y),
            half: vec2(hw, hh),
        }
    }

    #[test]
    fn horizontal_neighbors_anchor_on_facing_sides() {
        let a = rect(0.0, 0.0, 40.0, 20.0);
        let b = rect(200.0, 0.0, 30.0, 15.0);

        let connector = resolve_connector(&a, &b);
        assert_eq!(connector.a_side, Side::Right);
        assert_eq!(connector.b_side, Side::Left);
        assert_eq!(connector.a_point, pos2(40.0, 0.0));
        assert_eq!(connector.b_point, pos2(170.0, 0.0));
    }

    #[test]
    fn vertical_neighbors_anchor_on_facing_sides() {
        let a = rect(0.0, 0.0, 40.0, 20.0);
        let b = rect(0.0, 160.0, 40.0, 20.0);

        let connector = resolve_connector(&a, &b);
        assert_eq!(connector.a_side, Side::Bottom);
        assert_eq!(connector.b_side, Side::Top);
        assert_eq!(connector.a_point, pos2(0.0, 20.0));
        assert_eq!(connector.b_point, pos2(0.0, 140.0));
    }

    #[test]
    fn diagonal_target_crosses_the_dominant_axis_edge() {
        // Wide, flat rectangle: a 45° line leaves through the top/bottom.
        let a = rect(0.0, 0.0, 60.0, 15.0);
        let b = rect(100.0, 100.0, 10.0, 10.0);

        let connector = resolve_connector(&a, &b);
        assert_eq!(connector.a_side, Side::Bottom);
        assert_eq!(connector.a_point, pos2(15.0, 15.0));
    }

    #[test]
    fn boundary_point_lies_on_the_rectangle_bounds() {
        let a = rect(12.0, -7.0, 35.0, 18.0);
        let b = rect(-140.0, 90.0, 22.0, 22.0);

        let connector = resolve_connector(&a, &b);
        let on_vertical = ((connector.a_point.x - (a.center.x - a.half.x)).abs() <= 1.0)
            || ((connector.a_point.x - (a.center.x + a.half.x)).abs() <= 1.0);
        let on_horizontal = ((connector.a_point.y - (a.center.y - a.half.y)).abs() <= 1.0)
            || ((connector.a_point.y - (a.center.y + a.half.y)).abs() <= 1.0);
        assert!(on_vertical || on_horizontal);
    }

    #[test]
    fn coincident_centers_return_the_center_with_top_side() {
        let a = rect(5.0, 5.0, 20.0, 10.0);
        let b = rect(5.0, 5.0, 30.0, 12.0);

        let connector = resolve_connector(&a, &b);
        assert_eq!(connector.a_point, pos2(5.0, 5.0));
        assert_eq!(connector.a_side, Side::Top);
        assert_eq!(connector.b_point, pos2(5.0, 5.0));
        assert_eq!(connector.b_side, Side::Top);
    }

    #[test]
    fn zero_size_rectangle_never_panics() {
        let a = rect(0.0, 0.0, 0.0, 0.0);
        let b = rect(50.0, 50.0, 10.0, 10.0);

        let connector = resolve_connector(&a, &b);
        assert_eq!(connector.a_point, pos2(0.0, 0.0));
        assert_eq!(connector.a_side, Side::Top);
    }

    #[test]
    fn resolution_is_deterministic_across_calls() {
        let a = rect(3.0, 9.0, 41.0, 17.0);
        let b = rect(-80.0, 44.0, 25.0, 13.0);

        let first = resolve_connector(&a, &b);
        let second = resolve_connector(&a, &b);
        assert_eq!(first.a_point, second.a_point);
        assert_eq!(first.a_side, second.a_side);
        assert_eq!(first.b_point, second.b_point);
        assert_eq!(first.b_side, second.b_side);
    }
}
