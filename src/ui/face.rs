//! The happiness face widget.
//!
//! A circular face whose mouth curvature tracks a single happiness value in
//! [0, 100]. Dragging the mouse upward over the face raises the value,
//! dragging downward lowers it. Rendering goes through a ratatui canvas so
//! the circles and the mouth curve come out as braille dots rather than
//! whole cells.

use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Context, Line, Painter, Shape},
        Widget,
    },
};

use crate::state::SavedState;

/// Happiness value a brand-new face starts with.
pub const DEFAULT_HAPPINESS: f32 = 100.0;

/// Rows of vertical drag per point of happiness.
const GESTURE_SCALE: f32 = 4.0;

/// Fraction of the widget's smaller dimension used for the face radius.
const FACE_SCALE: f64 = 0.9;

/// Line segments used to rasterize the mouth curve.
const MOUTH_SEGMENTS: usize = 32;

/// Derived face geometry, recomputed whenever the widget is resized.
///
/// Pure function of the widget dimensions; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl FaceGeometry {
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            center_x: width / 2.0,
            center_y: height / 2.0,
            radius: width.min(height) / 2.0 * FACE_SCALE,
        }
    }
}

/// Drag gesture state. Each press re-anchors, so a stale anchor can never
/// leak into a new gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragGesture {
    Idle,
    Dragging { anchor_y: f32 },
}

pub struct FaceWidget {
    happiness: f32,
    geometry: FaceGeometry,
    gesture: DragGesture,
    face_color: Color,
    marker: Marker,
    dirty: bool,
}

impl FaceWidget {
    pub fn new(face_color: Color, marker: Marker) -> Self {
        Self {
            happiness: DEFAULT_HAPPINESS,
            geometry: FaceGeometry::default(),
            gesture: DragGesture::Idle,
            face_color,
            marker,
            dirty: false,
        }
    }

    /// Set the displayed happiness value directly and request a repaint.
    ///
    /// The value is not clamped here; out-of-range values are harmless
    /// because the smile fraction clamps at draw time.
    pub fn set_happiness(&mut self, value: f32) {
        self.happiness = value;
        self.dirty = true;
    }

    /// Apply a happiness delta, clamped to [0, 100], and request a repaint.
    fn change_happiness(&mut self, delta: f32) {
        self.happiness = (self.happiness + delta).clamp(0.0, 100.0);
        self.dirty = true;
    }

    /// Nudge happiness through the clamped delta path (keyboard controls).
    pub fn nudge(&mut self, delta: f32) {
        self.change_happiness(delta);
    }

    /// Recompute the face geometry for the new widget size.
    ///
    /// Terminal cells are roughly twice as tall as wide, so height is
    /// measured in half-rows; at braille resolution (2x4 dots per cell)
    /// that makes the units square and the face round.
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.geometry = FaceGeometry::from_size(f64::from(cols), f64::from(rows) * 2.0);
        self.dirty = true;
    }

    pub fn geometry(&self) -> FaceGeometry {
        self.geometry
    }

    /// Take the pending repaint request, if any.
    ///
    /// Mutations between frames only mark the widget dirty, so any number
    /// of them coalesce into a single repaint showing the latest value.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Route a mouse event to the drag gesture.
    ///
    /// Returns true when the event was consumed. Unrecognized kinds (scroll,
    /// right button, hover moves) are left to the caller's default handling,
    /// as is a drag-move that arrives without a preceding press.
    pub fn handle_mouse(&mut self, kind: MouseEventKind, row: u16) -> bool {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                tracing::trace!(row, "drag gesture started");
                self.gesture = DragGesture::Dragging {
                    anchor_y: f32::from(row),
                };
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let DragGesture::Dragging { anchor_y } = self.gesture else {
                    return false;
                };
                let y = f32::from(row);
                let delta = -(y - anchor_y) / GESTURE_SCALE;
                self.gesture = DragGesture::Dragging { anchor_y: y };
                if delta != 0.0 {
                    self.change_happiness(delta);
                }
                true
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.gesture = DragGesture::Idle;
                true
            }
            _ => false,
        }
    }

    /// Package the widget's state for persistence.
    pub fn save_state(&self, cols: u16, rows: u16) -> SavedState {
        SavedState::capture(cols, rows, self.happiness)
    }

    /// Apply a previously saved state through the direct setter.
    pub fn restore_state(&mut self, saved: &SavedState) {
        self.set_happiness(saved.happiness);
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let geometry = self.geometry;
        let happiness = self.happiness;
        let color = self.face_color;

        let canvas = Canvas::default()
            .marker(self.marker)
            .x_bounds([0.0, f64::from(area.width)])
            .y_bounds([0.0, f64::from(area.height) * 2.0])
            .paint(|ctx| paint_face(ctx, &geometry, happiness, color));

        canvas.render(area, buf);
    }
}

/// Map happiness onto [-1, 1]: 0 is the maximum frown, 50 neutral, 100 the
/// maximum smile. Out-of-range values clamp here rather than at assignment.
fn smile_fraction(happiness: f32) -> f32 {
    ((happiness - 50.0) / 50.0).clamp(-1.0, 1.0)
}

/// Paint the whole face: outline, two eyes, and the mouth curve.
///
/// Pure function of the geometry and happiness; canvas y grows upward, so
/// "above center" means a larger y.
fn paint_face(ctx: &mut Context, geometry: &FaceGeometry, happiness: f32, color: Color) {
    let r = geometry.radius;
    if r <= 0.0 {
        return;
    }

    ctx.draw(&Circle {
        x: geometry.center_x,
        y: geometry.center_y,
        radius: r,
        color,
    });

    let eye_radius = r / 10.0;
    let eye_y = geometry.center_y + r / 3.0;
    let eye_separation = r / 1.5;
    for side in [-1.0, 1.0] {
        ctx.draw(&Circle {
            x: geometry.center_x + side * eye_separation / 2.0,
            y: eye_y,
            radius: eye_radius,
            color,
        });
    }

    let mouth_width = r;
    let mouth_height = r / 3.0;
    let mouth_y = geometry.center_y - r / 3.0;
    let smile_height = f64::from(smile_fraction(happiness)) * mouth_height;

    ctx.draw(&MouthCurve {
        start: (geometry.center_x - mouth_width / 2.0, mouth_y),
        control1: (geometry.center_x - mouth_width / 6.0, mouth_y - smile_height),
        control2: (geometry.center_x + mouth_width / 6.0, mouth_y - smile_height),
        end: (geometry.center_x + mouth_width / 2.0, mouth_y),
        color,
    })
}

/// Cubic Bezier curve rendered as a polyline of canvas line segments.
struct MouthCurve {
    start: (f64, f64),
    control1: (f64, f64),
    control2: (f64, f64),
    end: (f64, f64),
    color: Color,
}

impl MouthCurve {
    fn point_at(&self, t: f64) -> (f64, f64) {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        (
            b0 * self.start.0 + b1 * self.control1.0 + b2 * self.control2.0 + b3 * self.end.0,
            b0 * self.start.1 + b1 * self.control1.1 + b2 * self.control2.1 + b3 * self.end.1,
        )
    }
}

impl Shape for MouthCurve {
    fn draw(&self, painter: &mut Painter) {
        let mut prev = self.point_at(0.0);
        for step in 1..=MOUTH_SEGMENTS {
            let t = step as f64 / MOUTH_SEGMENTS as f64;
            let next = self.point_at(t);
            Line {
                x1: prev.0,
                y1: prev.1,
                x2: next.0,
                y2: next.1,
                color: self.color,
            }
            .draw(painter);
            prev = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_face() -> FaceWidget {
        FaceWidget::new(Color::Blue, Marker::Braille)
    }

    #[test]
    fn test_change_happiness_clamps_at_bounds() {
        let mut face = test_face();
        assert_eq!(face.happiness, 100.0);

        face.change_happiness(5.0);
        assert_eq!(face.happiness, 100.0);

        face.set_happiness(0.0);
        face.change_happiness(-5.0);
        assert_eq!(face.happiness, 0.0);

        face.set_happiness(50.0);
        face.change_happiness(12.5);
        assert_eq!(face.happiness, 62.5);
    }

    #[test]
    fn test_set_happiness_is_unclamped() {
        let mut face = test_face();
        face.set_happiness(150.0);
        assert_eq!(face.happiness, 150.0);

        // The smile still tops out at the maximum; clamping happens at draw
        // time, not at assignment time.
        assert_eq!(smile_fraction(150.0), 1.0);
        assert_eq!(smile_fraction(-30.0), -1.0);
    }

    #[test]
    fn test_smile_fraction_is_odd_around_neutral() {
        assert_eq!(smile_fraction(50.0), 0.0);
        assert_eq!(smile_fraction(100.0), 1.0);
        assert_eq!(smile_fraction(0.0), -1.0);
        assert_eq!(smile_fraction(75.0), -smile_fraction(25.0));
    }

    #[test]
    fn test_geometry_from_size() {
        let geometry = FaceGeometry::from_size(200.0, 100.0);
        assert_eq!(geometry.radius, 45.0);
        assert_eq!(geometry.center_x, 100.0);
        assert_eq!(geometry.center_y, 50.0);
    }

    #[test]
    fn test_resize_recomputes_geometry() {
        let mut face = test_face();
        face.on_resize(100, 100);
        // Height doubles to half-row units: min(100, 200) / 2 * 0.9
        assert_eq!(face.geometry().radius, 45.0);
        assert_eq!(face.geometry().center_x, 50.0);
        assert_eq!(face.geometry().center_y, 100.0);
        assert!(face.take_dirty());
    }

    #[test]
    fn test_drag_up_increases_happiness() {
        let mut face = test_face();
        face.set_happiness(50.0);

        assert!(face.handle_mouse(MouseEventKind::Down(MouseButton::Left), 20));
        assert!(face.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 0));
        // 20 rows up at 4 rows per point
        assert_eq!(face.happiness, 55.0);
    }

    #[test]
    fn test_drag_down_decreases_happiness() {
        let mut face = test_face();
        face.set_happiness(50.0);

        face.handle_mouse(MouseEventKind::Down(MouseButton::Left), 0);
        face.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 20);
        assert_eq!(face.happiness, 45.0);
    }

    #[test]
    fn test_drag_deltas_accumulate_and_clamp() {
        let mut face = test_face();
        face.set_happiness(4.0);

        face.handle_mouse(MouseEventKind::Down(MouseButton::Left), 100);
        face.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 108);
        assert_eq!(face.happiness, 2.0);
        face.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 140);
        assert_eq!(face.happiness, 0.0);
    }

    #[test]
    fn test_release_returns_gesture_to_idle() {
        let mut face = test_face();
        face.set_happiness(50.0);

        face.handle_mouse(MouseEventKind::Down(MouseButton::Left), 10);
        assert!(matches!(face.gesture, DragGesture::Dragging { .. }));

        assert!(face.handle_mouse(MouseEventKind::Up(MouseButton::Left), 10));
        assert_eq!(face.gesture, DragGesture::Idle);

        // A drag without a preceding press is not consumed and moves nothing
        assert!(!face.handle_mouse(MouseEventKind::Drag(MouseButton::Left), 30));
        assert_eq!(face.happiness, 50.0);
    }

    #[test]
    fn test_unrecognized_mouse_kinds_fall_through() {
        let mut face = test_face();
        assert!(!face.handle_mouse(MouseEventKind::ScrollUp, 5));
        assert!(!face.handle_mouse(MouseEventKind::Moved, 5));
        assert!(!face.handle_mouse(MouseEventKind::Down(MouseButton::Right), 5));
    }

    #[test]
    fn test_repaint_requests_coalesce() {
        let mut face = test_face();
        face.set_happiness(10.0);
        face.nudge(5.0);
        face.nudge(5.0);

        assert!(face.take_dirty());
        assert!(!face.take_dirty());
    }

    #[test]
    fn test_mouth_curve_is_symmetric() {
        let curve = MouthCurve {
            start: (-30.0, 10.0),
            control1: (-10.0, 25.0),
            control2: (10.0, 25.0),
            end: (30.0, 10.0),
            color: Color::Blue,
        };

        assert_eq!(curve.point_at(0.0), (-30.0, 10.0));
        assert_eq!(curve.point_at(1.0), (30.0, 10.0));

        let (mid_x, mid_y) = curve.point_at(0.5);
        assert!(mid_x.abs() < 1e-9);
        // At t = 0.5 the curve sits three quarters of the way to the controls
        assert!((mid_y - 21.25).abs() < 1e-9);
    }

    #[test]
    fn test_render_paints_dots() {
        let mut face = test_face();
        face.on_resize(40, 20);

        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        face.render(area, &mut buf);

        let painted = buf
            .content
            .iter()
            .filter(|cell| cell.symbol() != " ")
            .count();
        assert!(painted > 0, "expected the face to paint at least one cell");
    }
}
