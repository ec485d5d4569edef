use folio_protocol::{Effect, NodeGroup, Point, Rect, Target};

use crate::config::TiltConfig;

/// Pointer-following 3D tilt for `[data-tilt]` cards.
#[derive(Debug, Clone)]
pub struct Tilt {
    config: TiltConfig,
}

impl Tilt {
    pub fn new(config: TiltConfig) -> Self {
        Self { config }
    }

    /// Tilt needs a precise pointer and is pure decoration, so it stays off
    /// for touch devices and reduced motion.
    pub fn enabled(pointer_fine: bool, reduced_motion: bool) -> bool {
        pointer_fine && !reduced_motion
    }

    /// Rotation `(x, y)` in degrees for a pointer over `rect`.
    pub fn rotation(&self, rect: &Rect, pointer: Point) -> Option<(f64, f64)> {
        if rect.is_degenerate() {
            return None;
        }
        let px = (pointer.x - rect.left()) / rect.w;
        let py = (pointer.y - rect.top()) / rect.h;
        let rotate_y = (px - 0.5) * self.config.max_deg;
        let rotate_x = -(py - 0.5) * self.config.max_deg;
        Some((rotate_x, rotate_y))
    }

    pub fn on_move(&self, index: usize, rect: &Rect, pointer: Point) -> Vec<Effect> {
        match self.rotation(rect, pointer) {
            Some((x, y)) => vec![self.transform(index, x, y)],
            None => Vec::new(),
        }
    }

    pub fn on_leave(&self, index: usize) -> Vec<Effect> {
        vec![Effect::SetStyle {
            target: Target::node(NodeGroup::Tilt, index),
            property: "transform".into(),
            value: format!(
                "perspective({}px) rotateX(0deg) rotateY(0deg)",
                self.config.perspective_px
            ),
        }]
    }

    fn transform(&self, index: usize, x: f64, y: f64) -> Effect {
        Effect::SetStyle {
            target: Target::node(NodeGroup::Tilt, index),
            property: "transform".into(),
            value: format!(
                "perspective({}px) rotateX({}deg) rotateY({}deg)",
                self.config.perspective_px,
                to_fixed(x),
                to_fixed(y)
            ),
        }
    }
}

/// Two-decimal rendering for CSS values. Exact zero never prints a sign.
pub(crate) fn to_fixed(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilt() -> Tilt {
        Tilt::new(TiltConfig::default())
    }

    fn style(effects: &[Effect]) -> &str {
        match effects {
            [Effect::SetStyle { value, .. }] => value,
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn centre_is_flat() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        let effects = tilt().on_move(0, &rect, Point::new(200.0, 150.0));
        assert_eq!(
            style(&effects),
            "perspective(1200px) rotateX(0.00deg) rotateY(0.00deg)"
        );
    }

    #[test]
    fn corners_hit_half_the_max() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        // top-left: tilt back on X, left on Y
        let (x, y) = tilt().rotation(&rect, Point::new(0.0, 0.0)).unwrap();
        assert_eq!((x, y), (4.0, -4.0));
        let (x, y) = tilt().rotation(&rect, Point::new(100.0, 100.0)).unwrap();
        assert_eq!((x, y), (-4.0, 4.0));
    }

    #[test]
    fn each_move_is_absolute() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let t = tilt();
        let first = t.on_move(1, &rect, Point::new(75.0, 25.0));
        t.on_move(1, &rect, Point::new(0.0, 0.0));
        let again = t.on_move(1, &rect, Point::new(75.0, 25.0));
        assert_eq!(first, again);
        assert_eq!(
            style(&first),
            "perspective(1200px) rotateX(2.00deg) rotateY(2.00deg)"
        );
    }

    #[test]
    fn zero_sized_rect_is_ignored() {
        let rect = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert!(tilt().on_move(0, &rect, Point::new(1.0, 1.0)).is_empty());
    }

    #[test]
    fn leave_resets() {
        assert_eq!(
            style(&tilt().on_leave(2)),
            "perspective(1200px) rotateX(0deg) rotateY(0deg)"
        );
    }

    #[test]
    fn gated_on_pointer_and_motion() {
        assert!(Tilt::enabled(true, false));
        assert!(!Tilt::enabled(true, true));
        assert!(!Tilt::enabled(false, false));
    }

    #[test]
    fn fixed_formatting() {
        assert_eq!(to_fixed(-0.0), "0.00");
        assert_eq!(to_fixed(1.005), "1.00");
        assert_eq!(to_fixed(-3.456), "-3.46");
    }
}
