//! Resolves which direction the cursor is pointing at while the radial menu
//! is open.
//!
//! Cursor samples are expected in a space whose Y axis grows upward (the
//! AppKit convention), which makes the bearing from [`geometry::angle`] run
//! clockwise on screen, matching the sector order in [`RADIAL_SECTORS`].

use crate::config::MenuConfig;
use crate::direction::{WindowDirection, RADIAL_SECTORS};
use crate::geometry::{self, AngleExt};
use crate::Point;
use log::debug;
use tokio::sync::mpsc;

const SECTOR_WIDTH: f64 = 360.0 / RADIAL_SECTORS.len() as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    DirectionChanged(WindowDirection),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorState {
    Idle,
    /// Interaction started; nothing resolved yet.
    Tracking { origin: Point },
    Resolved {
        origin: Point,
        direction: WindowDirection,
    },
    /// Demo loop driven by ticks instead of the cursor.
    Previewing { direction: WindowDirection },
}

/// Radii shaping the hit-test, derived from the menu dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitZones {
    pub dead_zone_radius: f64,
    pub sector_radius: f64,
}

impl HitZones {
    pub fn from_menu(menu: &MenuConfig) -> Self {
        let dead_zone_radius = menu.dead_zone_radius.max(0.0);
        Self {
            dead_zone_radius,
            sector_radius: (menu.corner_radius - menu.thickness).max(dead_zone_radius),
        }
    }
}

/// Sector index (0 = east, clockwise) for a bearing in degrees.
pub fn sector_for_degrees(degrees: f64) -> usize {
    let normalized = geometry::normalize_degrees(degrees);
    ((normalized + SECTOR_WIDTH / 2.0) / SECTOR_WIDTH).floor() as usize % RADIAL_SECTORS.len()
}

/// Direction selected by moving the cursor from `origin` to `current`.
pub fn hit_test(origin: Point, current: Point, zones: HitZones) -> WindowDirection {
    let distance_sq = geometry::squared_distance(origin, current);

    if distance_sq > zones.sector_radius * zones.sector_radius {
        let degrees = geometry::angle(origin, current).normalized().to_degrees();
        WindowDirection::from_sector(sector_for_degrees(degrees))
    } else if distance_sq < zones.dead_zone_radius * zones.dead_zone_radius {
        WindowDirection::NoAction
    } else {
        WindowDirection::Maximize
    }
}

pub struct DirectionSelector {
    zones: HitZones,
    state: SelectorState,
    listeners: Vec<mpsc::UnboundedSender<SelectorEvent>>,
}

impl DirectionSelector {
    pub fn new(menu: &MenuConfig) -> Self {
        Self {
            zones: HitZones::from_menu(menu),
            state: SelectorState::Idle,
            listeners: Vec::new(),
        }
    }

    pub fn update_menu(&mut self, menu: &MenuConfig) {
        self.zones = HitZones::from_menu(menu);
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SelectorEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// The active direction; `NoAction` whenever nothing is selected.
    pub fn direction(&self) -> WindowDirection {
        match self.state {
            SelectorState::Resolved { direction, .. } | SelectorState::Previewing { direction } => {
                direction
            }
            SelectorState::Idle | SelectorState::Tracking { .. } => WindowDirection::NoAction,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != SelectorState::Idle
    }

    pub fn start(&mut self, origin: Point) {
        debug!("Selector tracking from {:?}", origin);
        self.state = SelectorState::Tracking { origin };
    }

    /// Feeds one cursor sample. Returns the new direction only when it differs
    /// from the previous one; listeners are notified on the same condition.
    pub fn sample(&mut self, current: Point) -> Option<WindowDirection> {
        let origin = match self.state {
            SelectorState::Tracking { origin } | SelectorState::Resolved { origin, .. } => origin,
            SelectorState::Idle | SelectorState::Previewing { .. } => return None,
        };
        let direction = hit_test(origin, current, self.zones);
        self.transition(origin, direction)
    }

    /// Selects `direction` directly, as when a keybind is pressed mid-interaction.
    pub fn select(&mut self, direction: WindowDirection) -> Option<WindowDirection> {
        let origin = match self.state {
            SelectorState::Tracking { origin } | SelectorState::Resolved { origin, .. } => origin,
            SelectorState::Idle | SelectorState::Previewing { .. } => return None,
        };
        self.transition(origin, direction)
    }

    fn transition(&mut self, origin: Point, direction: WindowDirection) -> Option<WindowDirection> {
        let previous = self.direction();
        self.state = SelectorState::Resolved { origin, direction };
        if previous == direction {
            return None;
        }
        self.notify(direction);
        Some(direction)
    }

    /// Ends the interaction. With `committed` the last resolved direction is
    /// handed back; otherwise it is discarded. The selector is idle afterwards.
    pub fn end(&mut self, committed: bool) -> Option<WindowDirection> {
        let direction = match self.state {
            SelectorState::Resolved { direction, .. } => Some(direction),
            _ => None,
        };
        self.state = SelectorState::Idle;

        if committed {
            debug!("Selector committed {:?}", direction);
            direction.filter(|d| *d != WindowDirection::NoAction)
        } else {
            debug!("Selector discarded {:?}", direction);
            None
        }
    }

    /// (Re)starts the demo loop at `NoAction`.
    pub fn start_preview(&mut self) {
        let previous = self.direction();
        self.state = SelectorState::Previewing {
            direction: WindowDirection::NoAction,
        };
        if previous != WindowDirection::NoAction {
            self.notify(WindowDirection::NoAction);
        }
    }

    /// Advances the demo loop by one step.
    pub fn tick(&mut self) -> Option<WindowDirection> {
        let SelectorState::Previewing { direction } = self.state else {
            return None;
        };
        let next = direction.next_preview_direction();
        self.state = SelectorState::Previewing { direction: next };
        self.notify(next);
        Some(next)
    }

    fn notify(&mut self, direction: WindowDirection) {
        debug!("Direction changed to {}", direction);
        self.listeners
            .retain(|tx| tx.send(SelectorEvent::DirectionChanged(direction)).is_ok());
    }
}
