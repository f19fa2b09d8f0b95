//! Turns raw display frames into the area windows are allowed to occupy.

use crate::direction::Edges;
use crate::window_system::WindowSystem;
use crate::{Point, Rect};
use log::debug;
use serde::{Deserialize, Serialize};

/// Gap and padding settings, read fresh on every resolution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingModel {
    /// Gap between neighbouring windows. Doubles as uniform screen padding
    /// when per-edge padding is off.
    pub window: f64,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    /// Height of a third-party menu bar replacement drawn over the top edge.
    pub external_bar: f64,
    pub configure_screen_padding: bool,
}

impl PaddingModel {
    pub fn uniform(window: f64) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    pub fn total_top_padding(&self) -> f64 {
        self.top + self.external_bar
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenDescriptor {
    pub id: u32,
    /// Full display frame, global coordinates with a top-left origin.
    pub frame: Rect,
    /// Part of `frame` not covered by the system menu bar or dock. The
    /// macOS backend only subtracts a fixed-height menu bar on the main
    /// display; the Dock is not detected.
    pub visible_frame: Rect,
}

impl ScreenDescriptor {
    pub fn new(id: u32, frame: Rect, visible_frame: Rect) -> Self {
        Self {
            id,
            frame,
            visible_frame,
        }
    }
}

pub fn usable_bounds(screen: &ScreenDescriptor, padding: &PaddingModel) -> Rect {
    let visible = screen.visible_frame;
    let bounds = if padding.configure_screen_padding {
        visible.inset(
            padding.total_top_padding(),
            padding.bottom,
            padding.left,
            padding.right,
        )
    } else {
        visible.inset_uniform(padding.window)
    };
    debug!("Usable bounds for screen {}: {:?}", screen.id, bounds);
    bounds
}

pub fn screen_containing_point(
    screens: &[ScreenDescriptor],
    point: Point,
) -> Option<ScreenDescriptor> {
    screens.iter().find(|s| s.frame.contains(point)).copied()
}

pub fn screen_with_cursor<W: WindowSystem + ?Sized>(system: &W) -> Option<ScreenDescriptor> {
    let screens = system.screens().ok()?;
    let cursor = system.cursor_location().ok()?;
    screen_containing_point(&screens, cursor).or_else(|| screens.first().copied())
}

/// The display whose frame lies closest beyond `edge` of `current`,
/// horizontally for leading/trailing and vertically for top/bottom.
pub fn adjacent_screen(
    screens: &[ScreenDescriptor],
    current: &ScreenDescriptor,
    edge: Edges,
) -> Option<ScreenDescriptor> {
    let candidates = screens.iter().filter(|s| s.id != current.id);
    let beyond: Vec<&ScreenDescriptor> = if edge.contains(Edges::LEADING) {
        candidates
            .filter(|s| s.frame.max_x() <= current.frame.min_x())
            .collect()
    } else if edge.contains(Edges::TRAILING) {
        candidates
            .filter(|s| s.frame.min_x() >= current.frame.max_x())
            .collect()
    } else if edge.contains(Edges::TOP) {
        candidates
            .filter(|s| s.frame.max_y() <= current.frame.min_y())
            .collect()
    } else if edge.contains(Edges::BOTTOM) {
        candidates
            .filter(|s| s.frame.min_y() >= current.frame.max_y())
            .collect()
    } else {
        return None;
    };

    let origin = current.frame.center();
    beyond
        .into_iter()
        .min_by(|a, b| {
            let da = crate::geometry::squared_distance(origin, a.frame.center());
            let db = crate::geometry::squared_distance(origin, b.frame.center());
            da.total_cmp(&db)
        })
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_system::WindowError;

    fn screen(id: u32, frame: Rect) -> ScreenDescriptor {
        ScreenDescriptor::new(id, frame, frame)
    }

    #[test]
    fn simple_mode_insets_uniformly_by_gap() {
        let s = screen(1, Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let bounds = usable_bounds(&s, &PaddingModel::uniform(10.0));
        assert_eq!(bounds, Rect::new(10.0, 10.0, 980.0, 980.0));
    }

    #[test]
    fn per_edge_mode_includes_external_bar() {
        let s = ScreenDescriptor::new(
            1,
            Rect::new(0.0, 0.0, 1440.0, 900.0),
            Rect::new(0.0, 25.0, 1440.0, 875.0),
        );
        let padding = PaddingModel {
            window: 99.0,
            top: 5.0,
            bottom: 10.0,
            left: 20.0,
            right: 30.0,
            external_bar: 32.0,
            configure_screen_padding: true,
        };
        assert_eq!(
            usable_bounds(&s, &padding),
            Rect::new(20.0, 62.0, 1390.0, 828.0)
        );
    }

    #[test]
    fn screen_lookup_respects_independent_origins() {
        let screens = [
            screen(1, Rect::new(0.0, 0.0, 1920.0, 1080.0)),
            screen(2, Rect::new(-1440.0, 200.0, 1440.0, 900.0)),
            screen(3, Rect::new(1920.0, -300.0, 1080.0, 1920.0)),
        ];
        let id_at =
            |x: f64, y: f64| screen_containing_point(&screens, Point::new(x, y)).map(|s| s.id);
        assert_eq!(id_at(-10.0, 500.0), Some(2));
        assert_eq!(id_at(2000.0, -100.0), Some(3));
        assert_eq!(screen_containing_point(&screens, Point::new(-10.0, 0.0)), None);
    }

    #[test]
    fn adjacent_screen_picks_nearest_on_that_side() {
        let main = screen(1, Rect::new(0.0, 0.0, 1920.0, 1080.0));
        let screens = [
            main,
            screen(2, Rect::new(-1440.0, 0.0, 1440.0, 900.0)),
            screen(3, Rect::new(1920.0, 0.0, 1920.0, 1080.0)),
            screen(4, Rect::new(3840.0, 0.0, 1920.0, 1080.0)),
        ];
        assert_eq!(adjacent_screen(&screens, &main, Edges::LEADING).map(|s| s.id), Some(2));
        assert_eq!(adjacent_screen(&screens, &main, Edges::TRAILING).map(|s| s.id), Some(3));
        assert_eq!(adjacent_screen(&screens, &main, Edges::TOP), None);
    }

    struct FixedSystem {
        screens: Vec<ScreenDescriptor>,
        cursor: Point,
    }

    impl WindowSystem for FixedSystem {
        type Window = crate::applier::tests::MockWindow;

        fn frontmost_window(&self) -> Result<Option<Self::Window>, WindowError> {
            Ok(None)
        }

        fn screens(&self) -> Result<Vec<ScreenDescriptor>, WindowError> {
            Ok(self.screens.clone())
        }

        fn cursor_location(&self) -> Result<Point, WindowError> {
            Ok(self.cursor)
        }
    }

    #[test]
    fn cursor_screen_falls_back_to_first_display() {
        let mut system = FixedSystem {
            screens: vec![
                screen(1, Rect::new(0.0, 0.0, 1920.0, 1080.0)),
                screen(2, Rect::new(1920.0, 0.0, 1920.0, 1080.0)),
            ],
            cursor: Point::new(2500.0, 10.0),
        };
        assert_eq!(screen_with_cursor(&system).map(|s| s.id), Some(2));

        system.cursor = Point::new(-50.0, -50.0);
        assert_eq!(screen_with_cursor(&system).map(|s| s.id), Some(1));

        system.screens.clear();
        assert_eq!(screen_with_cursor(&system), None);
    }
}
