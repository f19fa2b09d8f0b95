//! Named screen regions a window can be sent to.

use crate::geometry::Angle;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Screen edges a region is flush against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEADING = 1 << 2;
        const TRAILING = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowDirection {
    #[default]
    NoAction,
    Maximize,
    Center,
    TopHalf,
    RightHalf,
    BottomHalf,
    LeftHalf,
    TopLeftQuarter,
    TopRightQuarter,
    BottomRightQuarter,
    BottomLeftQuarter,
    LeftThird,
    LeftTwoThirds,
    HorizontalCenterThird,
    RightTwoThirds,
    RightThird,
    TopThird,
    TopTwoThirds,
    VerticalCenterThird,
    BottomThird,
    BottomTwoThirds,
    Custom,
    Cycle,
}

/// Sector order around the radial menu, clockwise starting at east.
pub const RADIAL_SECTORS: [WindowDirection; 8] = [
    WindowDirection::RightHalf,
    WindowDirection::BottomRightQuarter,
    WindowDirection::BottomHalf,
    WindowDirection::BottomLeftQuarter,
    WindowDirection::LeftHalf,
    WindowDirection::TopLeftQuarter,
    WindowDirection::TopHalf,
    WindowDirection::TopRightQuarter,
];

impl WindowDirection {
    pub const ALL: [WindowDirection; 23] = [
        Self::NoAction,
        Self::Maximize,
        Self::Center,
        Self::TopHalf,
        Self::RightHalf,
        Self::BottomHalf,
        Self::LeftHalf,
        Self::TopLeftQuarter,
        Self::TopRightQuarter,
        Self::BottomRightQuarter,
        Self::BottomLeftQuarter,
        Self::LeftThird,
        Self::LeftTwoThirds,
        Self::HorizontalCenterThird,
        Self::RightTwoThirds,
        Self::RightThird,
        Self::TopThird,
        Self::TopTwoThirds,
        Self::VerticalCenterThird,
        Self::BottomThird,
        Self::BottomTwoThirds,
        Self::Custom,
        Self::Cycle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::NoAction => "No Action",
            Self::Maximize => "Maximize",
            Self::Center => "Center",
            Self::TopHalf => "Top Half",
            Self::RightHalf => "Right Half",
            Self::BottomHalf => "Bottom Half",
            Self::LeftHalf => "Left Half",
            Self::TopLeftQuarter => "Top Left Quarter",
            Self::TopRightQuarter => "Top Right Quarter",
            Self::BottomRightQuarter => "Bottom Right Quarter",
            Self::BottomLeftQuarter => "Bottom Left Quarter",
            Self::LeftThird => "Left Third",
            Self::LeftTwoThirds => "Left Two Thirds",
            Self::HorizontalCenterThird => "Horizontal Center Third",
            Self::RightTwoThirds => "Right Two Thirds",
            Self::RightThird => "Right Third",
            Self::TopThird => "Top Third",
            Self::TopTwoThirds => "Top Two Thirds",
            Self::VerticalCenterThird => "Vertical Center Third",
            Self::BottomThird => "Bottom Third",
            Self::BottomTwoThirds => "Bottom Two Thirds",
            Self::Custom => "Custom",
            Self::Cycle => "Cycle",
        }
    }

    /// Parses either the config spelling (`top_half`) or the display name
    /// (`Top Half`), case-insensitively.
    pub fn from_string(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|d| d.name().to_lowercase().replace(' ', "_") == wanted)
    }

    /// Successor in the demo loop shown by preview overlays.
    ///
    /// Directions outside the loop restart it from the top.
    pub fn next_preview_direction(&self) -> Self {
        match self {
            Self::NoAction => Self::TopHalf,
            Self::TopHalf => Self::TopRightQuarter,
            Self::TopRightQuarter => Self::RightHalf,
            Self::RightHalf => Self::BottomRightQuarter,
            Self::BottomRightQuarter => Self::BottomHalf,
            Self::BottomHalf => Self::BottomLeftQuarter,
            Self::BottomLeftQuarter => Self::LeftHalf,
            Self::LeftHalf => Self::TopLeftQuarter,
            Self::TopLeftQuarter => Self::Maximize,
            Self::Maximize => Self::NoAction,
            _ => Self::NoAction,
        }
    }

    /// Angle of the radial menu sector selecting this direction, in the
    /// clockwise-from-east convention used by the selector.
    ///
    /// Maximize lives in the ring between the dead zone and the sectors, so it
    /// has no angle.
    pub fn radial_angle(&self) -> Option<Angle> {
        RADIAL_SECTORS
            .iter()
            .position(|d| d == self)
            .map(|index| Angle::degrees(index as f64 * 45.0))
    }

    pub fn from_sector(index: usize) -> Self {
        RADIAL_SECTORS[index % RADIAL_SECTORS.len()]
    }

    pub fn edges_touching_screen(&self) -> Edges {
        let horizontal = Edges::LEADING | Edges::TRAILING;
        let vertical = Edges::TOP | Edges::BOTTOM;
        match self {
            Self::Maximize => Edges::all(),
            Self::NoAction | Self::Center | Self::Custom | Self::Cycle => Edges::empty(),

            Self::TopHalf | Self::TopThird | Self::TopTwoThirds => Edges::TOP | horizontal,
            Self::BottomHalf | Self::BottomThird | Self::BottomTwoThirds => {
                Edges::BOTTOM | horizontal
            }
            Self::LeftHalf | Self::LeftThird | Self::LeftTwoThirds => Edges::LEADING | vertical,
            Self::RightHalf | Self::RightThird | Self::RightTwoThirds => {
                Edges::TRAILING | vertical
            }

            Self::TopLeftQuarter => Edges::TOP | Edges::LEADING,
            Self::TopRightQuarter => Edges::TOP | Edges::TRAILING,
            Self::BottomRightQuarter => Edges::BOTTOM | Edges::TRAILING,
            Self::BottomLeftQuarter => Edges::BOTTOM | Edges::LEADING,

            Self::HorizontalCenterThird => vertical,
            Self::VerticalCenterThird => horizontal,
        }
    }

    /// The side a repeated invocation pushes the window off the screen towards.
    pub fn pushed_edge(&self) -> Option<Edges> {
        match self {
            Self::LeftHalf => Some(Edges::LEADING),
            Self::RightHalf => Some(Edges::TRAILING),
            _ => None,
        }
    }

    /// Whether applying this direction, right after `previous` was applied to
    /// the same window, should carry the window onto the neighbouring display.
    pub fn will_change_screen(&self, previous: Option<WindowDirection>) -> bool {
        previous == Some(*self) && self.pushed_edge().is_some()
    }

    /// Keys that select this direction while the trigger key is held.
    pub fn default_keybind(&self) -> &'static [&'static str] {
        match self {
            Self::Maximize => &["space"],
            Self::Center => &["return"],
            Self::TopHalf => &["w"],
            Self::RightHalf => &["d"],
            Self::BottomHalf => &["s"],
            Self::LeftHalf => &["a"],
            Self::TopLeftQuarter => &["w", "a"],
            Self::TopRightQuarter => &["w", "d"],
            Self::BottomRightQuarter => &["s", "d"],
            Self::BottomLeftQuarter => &["s", "a"],
            Self::LeftThird => &["j"],
            Self::LeftTwoThirds => &["j", "k"],
            Self::HorizontalCenterThird => &["k"],
            Self::RightTwoThirds => &["k", "l"],
            Self::RightThird => &["l"],
            _ => &[],
        }
    }

    pub fn is_half(&self) -> bool {
        matches!(
            self,
            Self::TopHalf | Self::RightHalf | Self::BottomHalf | Self::LeftHalf
        )
    }

    pub fn is_quarter(&self) -> bool {
        matches!(
            self,
            Self::TopLeftQuarter
                | Self::TopRightQuarter
                | Self::BottomRightQuarter
                | Self::BottomLeftQuarter
        )
    }

    pub fn is_third(&self) -> bool {
        matches!(
            self,
            Self::LeftThird
                | Self::LeftTwoThirds
                | Self::HorizontalCenterThird
                | Self::RightTwoThirds
                | Self::RightThird
                | Self::TopThird
                | Self::TopTwoThirds
                | Self::VerticalCenterThird
                | Self::BottomThird
                | Self::BottomTwoThirds
        )
    }
}

impl std::fmt::Display for WindowDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cycle_loops_through_ten_states() {
        let mut seen = Vec::new();
        let mut current = WindowDirection::NoAction;
        for _ in 0..9 {
            current = current.next_preview_direction();
            seen.push(current);
        }
        assert_eq!(
            seen,
            vec![
                WindowDirection::TopHalf,
                WindowDirection::TopRightQuarter,
                WindowDirection::RightHalf,
                WindowDirection::BottomRightQuarter,
                WindowDirection::BottomHalf,
                WindowDirection::BottomLeftQuarter,
                WindowDirection::LeftHalf,
                WindowDirection::TopLeftQuarter,
                WindowDirection::Maximize,
            ]
        );
        assert_eq!(current.next_preview_direction(), WindowDirection::NoAction);
        assert_eq!(seen.iter().filter(|d| **d == WindowDirection::Maximize).count(), 1);
    }

    #[test]
    fn directions_outside_preview_restart_it() {
        assert_eq!(
            WindowDirection::LeftThird.next_preview_direction(),
            WindowDirection::NoAction
        );
    }

    #[test]
    fn radial_angles_are_multiples_of_45() {
        for d in WindowDirection::ALL {
            match d.radial_angle() {
                Some(angle) => {
                    assert!(d.is_half() || d.is_quarter(), "{d} should not have an angle");
                    let degrees = angle.to_degrees();
                    assert_eq!(degrees % 45.0, 0.0);
                    assert!((0.0..360.0).contains(&degrees));
                }
                None => assert!(!d.is_half() && !d.is_quarter()),
            }
        }
        assert_eq!(WindowDirection::TopHalf.radial_angle().map(|a| a.to_degrees()), Some(270.0));
    }

    #[test]
    fn edges_match_region_geometry() {
        assert_eq!(WindowDirection::Maximize.edges_touching_screen(), Edges::all());
        assert!(WindowDirection::Center.edges_touching_screen().is_empty());
        assert_eq!(
            WindowDirection::TopLeftQuarter.edges_touching_screen(),
            Edges::TOP | Edges::LEADING
        );
        assert!(!WindowDirection::LeftHalf
            .edges_touching_screen()
            .contains(Edges::TRAILING));
        assert_eq!(
            WindowDirection::HorizontalCenterThird.edges_touching_screen(),
            Edges::TOP | Edges::BOTTOM
        );
    }

    #[test]
    fn repeated_half_changes_screen() {
        let left = WindowDirection::LeftHalf;
        assert!(left.will_change_screen(Some(WindowDirection::LeftHalf)));
        assert!(!left.will_change_screen(Some(WindowDirection::RightHalf)));
        assert!(!left.will_change_screen(None));
        assert!(!WindowDirection::Maximize.will_change_screen(Some(WindowDirection::Maximize)));
    }

    #[test]
    fn parses_config_and_display_names() {
        assert_eq!(
            WindowDirection::from_string("top_left_quarter"),
            Some(WindowDirection::TopLeftQuarter)
        );
        assert_eq!(
            WindowDirection::from_string("Bottom Two Thirds"),
            Some(WindowDirection::BottomTwoThirds)
        );
        assert_eq!(WindowDirection::from_string("sideways"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&WindowDirection::HorizontalCenterThird).unwrap();
        assert_eq!(json, "\"horizontal_center_third\"");
    }
}
