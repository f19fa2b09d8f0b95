//! Computes the target frame for a window action on a given screen.
//!
//! All rectangles here share one coordinate space with a top-left origin:
//! `bounds.min_y()` is the top edge of the usable area.

use crate::action::{Anchor, PositionMode, SizeMode, Unit, WindowAction};
use crate::direction::{Edges, WindowDirection};
use crate::screen::PaddingModel;
use crate::{Point, Rect, Size};
use log::debug;

/// Size used when a size-preserving action has no window frame to copy.
pub const FALLBACK_SIZE: Size = Size {
    width: 400.0,
    height: 300.0,
};

/// Share of the screen a custom action covers when it leaves a dimension out.
const DEFAULT_PERCENTAGE: f64 = 50.0;

const EDGE_EPSILON: f64 = 0.5;

pub struct FrameResolver<'a> {
    padding: &'a PaddingModel,
    initial_frame: Option<Rect>,
}

impl<'a> FrameResolver<'a> {
    pub fn new(padding: &'a PaddingModel) -> Self {
        Self {
            padding,
            initial_frame: None,
        }
    }

    /// Frame the window had when the current interaction started; used by
    /// [`SizeMode::InitialSize`].
    pub fn with_initial_frame(mut self, frame: Option<Rect>) -> Self {
        self.initial_frame = frame;
        self
    }

    /// Target frame for `action` inside `bounds` (already padding-adjusted).
    ///
    /// A zero-area result means "leave the window alone".
    pub fn resolve(&self, action: &WindowAction, current: Option<Rect>, bounds: Rect) -> Rect {
        self.resolve_cycle(action, 0, current, bounds)
    }

    /// Like [`resolve`](Self::resolve), picking entry `index` (modulo the
    /// list length) when `action` is a cycle.
    pub fn resolve_cycle(
        &self,
        action: &WindowAction,
        index: usize,
        current: Option<Rect>,
        bounds: Rect,
    ) -> Rect {
        if bounds.is_empty() {
            debug!("Refusing to resolve against degenerate bounds {:?}", bounds);
            return Rect::zero();
        }

        let frame = match action.direction {
            WindowDirection::NoAction => {
                let anchor = self
                    .initial_frame
                    .or(current)
                    .map(|f| f.center())
                    .unwrap_or_else(|| bounds.center());
                return Rect::new(anchor.x, anchor.y, 0.0, 0.0);
            }
            WindowDirection::Cycle => {
                if action.cycle.is_empty() {
                    return Rect::zero();
                }
                let entry = &action.cycle[index % action.cycle.len()];
                return self.resolve_cycle(entry, 0, current, bounds);
            }
            WindowDirection::Custom => self.custom_frame(action, current, bounds),
            direction => {
                let region = region_frame(direction, bounds);
                self.apply_gap(region, direction.edges_touching_screen())
            }
        };

        debug!(
            "Resolved {} in {:?} to {:?}",
            action.label(),
            bounds,
            frame
        );
        frame
    }

    fn custom_frame(&self, action: &WindowAction, current: Option<Rect>, bounds: Rect) -> Rect {
        let unit = action.unit();
        let coordinates = action.position_mode() == PositionMode::Coordinates;

        let size = match action.size_mode() {
            SizeMode::Custom => {
                let mut width = action
                    .width
                    .unwrap_or_else(|| default_length(unit, bounds.width));
                let mut height = action
                    .height
                    .unwrap_or_else(|| default_length(unit, bounds.height));
                if coordinates && unit == Unit::Percentage {
                    width = width.min(100.0 - action.x_point.unwrap_or(0.0));
                    height = height.min(100.0 - action.y_point.unwrap_or(0.0));
                }
                Size::new(
                    to_pixels(width, unit, bounds.width),
                    to_pixels(height, unit, bounds.height),
                )
            }
            SizeMode::PreserveSize => current.map(|f| f.size()).unwrap_or(FALLBACK_SIZE),
            SizeMode::InitialSize => self
                .initial_frame
                .or(current)
                .map(|f| f.size())
                .unwrap_or(FALLBACK_SIZE),
        };
        let size = Size::new(
            size.width.clamp(0.0, bounds.width),
            size.height.clamp(0.0, bounds.height),
        );

        let origin = if coordinates {
            Point::new(
                bounds.min_x() + to_pixels(action.x_point.unwrap_or(0.0), unit, bounds.width),
                bounds.min_y() + to_pixels(action.y_point.unwrap_or(0.0), unit, bounds.height),
            )
        } else {
            anchored_origin(action.anchor(), size, bounds)
        };

        // Keep the far edges inside the screen
        let frame = Rect::new(
            origin.x,
            origin.y,
            size.width.min(bounds.max_x() - origin.x).max(0.0),
            size.height.min(bounds.max_y() - origin.y).max(0.0),
        );

        if action.size_mode() == SizeMode::Custom {
            self.apply_gap(frame, edges_touching(frame, bounds))
        } else {
            frame
        }
    }

    /// Half the window gap comes off every edge that faces another window
    /// rather than the screen border.
    fn apply_gap(&self, frame: Rect, touching: Edges) -> Rect {
        let half = self.padding.window / 2.0;
        if half <= 0.0 {
            return frame;
        }
        let inset = |edge: Edges| if touching.contains(edge) { 0.0 } else { half };
        let inset_frame = frame.inset(
            inset(Edges::TOP),
            inset(Edges::BOTTOM),
            inset(Edges::LEADING),
            inset(Edges::TRAILING),
        );
        if inset_frame.is_empty() {
            Rect::zero()
        } else {
            inset_frame
        }
    }
}

/// Edges of `bounds` that `frame` sits flush against.
pub fn edges_touching(frame: Rect, bounds: Rect) -> Edges {
    let mut edges = Edges::empty();
    if (frame.min_y() - bounds.min_y()).abs() < EDGE_EPSILON {
        edges |= Edges::TOP;
    }
    if (frame.max_y() - bounds.max_y()).abs() < EDGE_EPSILON {
        edges |= Edges::BOTTOM;
    }
    if (frame.min_x() - bounds.min_x()).abs() < EDGE_EPSILON {
        edges |= Edges::LEADING;
    }
    if (frame.max_x() - bounds.max_x()).abs() < EDGE_EPSILON {
        edges |= Edges::TRAILING;
    }
    edges
}

fn region_frame(direction: WindowDirection, b: Rect) -> Rect {
    let (x, y, w, h) = (b.min_x(), b.min_y(), b.width, b.height);
    let (half_w, half_h) = (w / 2.0, h / 2.0);
    let (third_w, third_h) = (w / 3.0, h / 3.0);

    match direction {
        WindowDirection::Maximize => b,
        WindowDirection::Center => Rect::new(x + w / 4.0, y + h / 4.0, half_w, half_h),

        WindowDirection::TopHalf => Rect::new(x, y, w, half_h),
        WindowDirection::BottomHalf => Rect::new(x, y + half_h, w, half_h),
        WindowDirection::LeftHalf => Rect::new(x, y, half_w, h),
        WindowDirection::RightHalf => Rect::new(x + half_w, y, half_w, h),

        WindowDirection::TopLeftQuarter => Rect::new(x, y, half_w, half_h),
        WindowDirection::TopRightQuarter => Rect::new(x + half_w, y, half_w, half_h),
        WindowDirection::BottomRightQuarter => Rect::new(x + half_w, y + half_h, half_w, half_h),
        WindowDirection::BottomLeftQuarter => Rect::new(x, y + half_h, half_w, half_h),

        WindowDirection::LeftThird => Rect::new(x, y, third_w, h),
        WindowDirection::LeftTwoThirds => Rect::new(x, y, 2.0 * third_w, h),
        WindowDirection::HorizontalCenterThird => Rect::new(x + third_w, y, third_w, h),
        WindowDirection::RightTwoThirds => Rect::new(x + third_w, y, 2.0 * third_w, h),
        WindowDirection::RightThird => Rect::new(x + 2.0 * third_w, y, third_w, h),

        WindowDirection::TopThird => Rect::new(x, y, w, third_h),
        WindowDirection::TopTwoThirds => Rect::new(x, y, w, 2.0 * third_h),
        WindowDirection::VerticalCenterThird => Rect::new(x, y + third_h, w, third_h),
        WindowDirection::BottomTwoThirds => Rect::new(x, y + third_h, w, 2.0 * third_h),
        WindowDirection::BottomThird => Rect::new(x, y + 2.0 * third_h, w, third_h),

        WindowDirection::NoAction | WindowDirection::Custom | WindowDirection::Cycle => {
            Rect::zero()
        }
    }
}

fn anchored_origin(anchor: Anchor, size: Size, b: Rect) -> Point {
    let left = b.min_x();
    let right = b.max_x() - size.width;
    let mid_x = b.min_x() + (b.width - size.width) / 2.0;
    let top = b.min_y();
    let bottom = b.max_y() - size.height;
    let mid_y = b.min_y() + (b.height - size.height) / 2.0;

    match anchor {
        Anchor::TopLeft => Point::new(left, top),
        Anchor::Top => Point::new(mid_x, top),
        Anchor::TopRight => Point::new(right, top),
        Anchor::Right => Point::new(right, mid_y),
        Anchor::BottomRight => Point::new(right, bottom),
        Anchor::Bottom => Point::new(mid_x, bottom),
        Anchor::BottomLeft => Point::new(left, bottom),
        Anchor::Left => Point::new(left, mid_y),
        Anchor::Center => Point::new(mid_x, mid_y),
        // a third of the vertical slack above, two thirds below
        Anchor::MacosCenter => Point::new(mid_x, top + (b.height - size.height) / 3.0),
    }
}

fn default_length(unit: Unit, extent: f64) -> f64 {
    match unit {
        Unit::Percentage => DEFAULT_PERCENTAGE,
        Unit::Pixels => extent * DEFAULT_PERCENTAGE / 100.0,
    }
}

fn to_pixels(value: f64, unit: Unit, extent: f64) -> f64 {
    match unit {
        Unit::Percentage => extent * value / 100.0,
        Unit::Pixels => value,
    }
}
