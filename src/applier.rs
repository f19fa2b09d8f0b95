//! Pushes resolved frames onto live windows.

use crate::animation::{self, TimingCurve, FRAME_INTERVAL};
use crate::window_system::{ScreenOverlay, WindowError, WindowHandle};
use crate::{Rect, Size};
use log::{debug, warn};
use tokio::time::{sleep, Duration};

/// Reported when the minimum-size probe cannot complete; callers treat it as
/// "no known floor".
pub const MINIMUM_SIZE_FALLBACK: Size = Size {
    width: 0.0,
    height: 0.0,
};

/// Time given to the window server to commit the restoring resize before
/// the overlay comes down.
const PROBE_SETTLE: Duration = Duration::from_millis(5);

pub struct Applier {
    duration: Duration,
}

impl Applier {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Moves and resizes `window` to `frame`. Zero-area frames are ignored.
    ///
    /// Animated moves step through eased keyframes; the final keyframe is
    /// `frame` itself so the window always lands exactly on target.
    pub async fn apply<H: WindowHandle>(
        &self,
        window: &H,
        frame: Rect,
        animated: bool,
        curve: Option<TimingCurve>,
    ) -> Result<(), WindowError> {
        if frame.is_empty() {
            debug!("Skipping zero-area frame for window {:?}", window.id());
            return Ok(());
        }

        let mut last = window.frame()?;

        if !animated || self.duration.is_zero() {
            set_frame(window, last, frame)?;
            debug!("Applied {:?} to window {:?}", frame, window.id());
            return Ok(());
        }

        let frames = animation::keyframes(last, frame, self.duration, curve.unwrap_or_default());
        let count = frames.len();
        for (i, step) in frames.into_iter().enumerate() {
            set_frame(window, last, step)?;
            last = step;
            if i + 1 < count {
                sleep(FRAME_INTERVAL).await;
            }
        }
        debug!(
            "Animated window {:?} to {:?} over {} frames",
            window.id(),
            frame,
            count
        );
        Ok(())
    }
}

/// Sets origin and size in an order that keeps the window from being
/// clamped against a screen edge halfway through: size first when the
/// window grows, origin first when it shrinks.
pub fn set_frame<H: WindowHandle>(window: &H, from: Rect, to: Rect) -> Result<(), WindowError> {
    let growing = to.width > from.width || to.height > from.height;
    if growing {
        window.set_size(to.size())?;
        window.set_origin(to.origin())
    } else {
        window.set_origin(to.origin())?;
        window.set_size(to.size())
    }
}

/// Finds the smallest size `window` accepts by shrinking it to nothing and
/// reading back what the window server allowed, then restores it.
///
/// The steps run strictly in order: suppress, probe, restore, reveal.
/// Any failure yields [`MINIMUM_SIZE_FALLBACK`].
pub async fn probe_minimum_size<H, O>(window: &H, overlay: &O) -> Size
where
    H: WindowHandle,
    O: ScreenOverlay + ?Sized,
{
    let original = match window.frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Minimum size probe aborted for {:?}: {}", window.id(), e);
            return MINIMUM_SIZE_FALLBACK;
        }
    };

    if let Err(e) = overlay.suppress(original) {
        warn!("Could not hide minimum size probe: {}", e);
        return MINIMUM_SIZE_FALLBACK;
    }

    let probed = window
        .set_size(Size::new(0.0, 0.0))
        .and_then(|_| window.frame())
        .map(|frame| frame.size());

    let restored = window
        .set_size(original.size())
        .and_then(|_| window.set_origin(original.origin()));

    sleep(PROBE_SETTLE).await;
    overlay.reveal();

    match (probed, restored) {
        (Ok(size), Ok(())) => {
            debug!("Window {:?} minimum size is {:?}", window.id(), size);
            size
        }
        (probed, restored) => {
            warn!(
                "Minimum size probe failed for {:?}: probe={:?} restore={:?}",
                window.id(),
                probed.err(),
                restored.err()
            );
            MINIMUM_SIZE_FALLBACK
        }
    }
}

/// Grows `frame` to at least `minimum`, sliding it back inside `bounds`
/// where the extra size would push it over an edge.
pub fn fit_minimum_size(frame: Rect, minimum: Size, bounds: Rect) -> Rect {
    let width = frame.width.max(minimum.width);
    let height = frame.height.max(minimum.height);
    let x = frame.x.min(bounds.max_x() - width).max(bounds.min_x());
    let y = frame.y.min(bounds.max_y() - height).max(bounds.min_y());
    Rect::new(x, y, width, height)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{Point, WindowId};
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Origin(Point),
        Size(Size),
        Suppress,
        Reveal,
    }

    /// Records every mutation and clamps sizes like a real window would.
    #[derive(Debug)]
    pub(crate) struct MockWindow {
        pub frame: Cell<Rect>,
        pub minimum: Size,
        pub valid: Cell<bool>,
        pub calls: RefCell<Vec<Call>>,
        /// Invalidate the window after this many mutations.
        pub fail_after: Option<usize>,
    }

    impl MockWindow {
        pub fn new(frame: Rect) -> Self {
            Self {
                frame: Cell::new(frame),
                minimum: Size::new(0.0, 0.0),
                valid: Cell::new(true),
                calls: RefCell::new(Vec::new()),
                fail_after: None,
            }
        }

        fn check(&self) -> Result<(), WindowError> {
            if let Some(limit) = self.fail_after {
                let mutations = self
                    .calls
                    .borrow()
                    .iter()
                    .filter(|c| matches!(c, Call::Origin(_) | Call::Size(_)))
                    .count();
                if mutations >= limit {
                    self.valid.set(false);
                }
            }
            if self.valid.get() {
                Ok(())
            } else {
                Err(WindowError::Invalid)
            }
        }
    }

    impl WindowHandle for MockWindow {
        fn id(&self) -> WindowId {
            WindowId(7)
        }

        fn frame(&self) -> Result<Rect, WindowError> {
            self.check()?;
            Ok(self.frame.get())
        }

        fn set_origin(&self, origin: Point) -> Result<(), WindowError> {
            self.check()?;
            self.calls.borrow_mut().push(Call::Origin(origin));
            let f = self.frame.get();
            self.frame.set(Rect::new(origin.x, origin.y, f.width, f.height));
            Ok(())
        }

        fn set_size(&self, size: Size) -> Result<(), WindowError> {
            self.check()?;
            self.calls.borrow_mut().push(Call::Size(size));
            let f = self.frame.get();
            self.frame.set(Rect::new(
                f.x,
                f.y,
                size.width.max(self.minimum.width),
                size.height.max(self.minimum.height),
            ));
            Ok(())
        }
    }

    /// Overlay double sharing the window's call log so ordering is visible.
    pub(crate) struct MockOverlay<'a> {
        pub log: &'a RefCell<Vec<Call>>,
        pub fail: bool,
    }

    impl ScreenOverlay for MockOverlay<'_> {
        fn suppress(&self, _region: Rect) -> Result<(), WindowError> {
            if self.fail {
                return Err(WindowError::Backend("no overlay".into()));
            }
            self.log.borrow_mut().push(Call::Suppress);
            Ok(())
        }

        fn reveal(&self) {
            self.log.borrow_mut().push(Call::Reveal);
        }
    }

    #[tokio::test]
    async fn instant_apply_orders_calls_by_growth() {
        let window = MockWindow::new(Rect::new(100.0, 100.0, 200.0, 200.0));
        let applier = Applier::new(Duration::ZERO);

        let bigger = Rect::new(0.0, 0.0, 960.0, 1080.0);
        applier.apply(&window, bigger, false, None).await.unwrap();
        assert_eq!(
            *window.calls.borrow(),
            vec![Call::Size(bigger.size()), Call::Origin(bigger.origin())]
        );

        window.calls.borrow_mut().clear();
        let smaller = Rect::new(960.0, 0.0, 480.0, 540.0);
        applier.apply(&window, smaller, true, None).await.unwrap();
        assert_eq!(
            *window.calls.borrow(),
            vec![Call::Origin(smaller.origin()), Call::Size(smaller.size())]
        );
        assert_eq!(window.frame.get(), smaller);
    }

    #[tokio::test]
    async fn animated_apply_lands_exactly_on_target() {
        let window = MockWindow::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let applier = Applier::new(Duration::from_millis(48));
        let target = Rect::new(1.0 / 3.0, 10.0 / 3.0, 1919.0 / 3.0, 1079.0 / 7.0);

        applier
            .apply(&window, target, true, Some(TimingCurve::EaseInOut))
            .await
            .unwrap();

        assert_eq!(window.frame.get(), target);
        let sizes = window
            .calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Size(_)))
            .count();
        assert_eq!(sizes, 3);
    }

    #[tokio::test]
    async fn zero_area_frame_is_a_no_op() {
        let window = MockWindow::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        Applier::new(Duration::ZERO)
            .apply(&window, Rect::new(50.0, 50.0, 0.0, 0.0), false, None)
            .await
            .unwrap();
        assert!(window.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn closed_window_propagates_invalid() {
        let window = MockWindow::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        window.valid.set(false);
        let result = Applier::new(Duration::ZERO)
            .apply(&window, Rect::new(0.0, 0.0, 10.0, 10.0), false, None)
            .await;
        assert_eq!(result, Err(WindowError::Invalid));
    }

    #[tokio::test]
    async fn probe_reads_floor_and_restores() {
        let original = Rect::new(300.0, 200.0, 800.0, 600.0);
        let mut window = MockWindow::new(original);
        window.minimum = Size::new(320.0, 240.0);
        let overlay = MockOverlay {
            log: &window.calls,
            fail: false,
        };

        let size = probe_minimum_size(&window, &overlay).await;

        assert_eq!(size, Size::new(320.0, 240.0));
        assert_eq!(window.frame.get(), original);
        assert_eq!(
            *window.calls.borrow(),
            vec![
                Call::Suppress,
                Call::Size(Size::new(0.0, 0.0)),
                Call::Size(original.size()),
                Call::Origin(original.origin()),
                Call::Reveal,
            ]
        );
    }

    #[tokio::test]
    async fn probe_falls_back_when_window_disappears() {
        let mut window = MockWindow::new(Rect::new(0.0, 0.0, 500.0, 500.0));
        window.fail_after = Some(1);
        let overlay = MockOverlay {
            log: &window.calls,
            fail: false,
        };

        let size = probe_minimum_size(&window, &overlay).await;

        assert_eq!(size, MINIMUM_SIZE_FALLBACK);
        assert_eq!(window.calls.borrow().last(), Some(&Call::Reveal));
    }

    #[tokio::test]
    async fn probe_is_skipped_without_overlay() {
        let window = MockWindow::new(Rect::new(0.0, 0.0, 500.0, 500.0));
        let overlay = MockOverlay {
            log: &window.calls,
            fail: true,
        };
        assert_eq!(probe_minimum_size(&window, &overlay).await, MINIMUM_SIZE_FALLBACK);
        assert!(window.calls.borrow().is_empty());
    }

    #[test]
    fn minimum_size_slides_frame_back_on_screen() {
        let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let frame = Rect::new(1280.0, 0.0, 640.0, 1080.0);
        assert_eq!(
            fit_minimum_size(frame, Size::new(800.0, 400.0), bounds),
            Rect::new(1120.0, 0.0, 800.0, 1080.0)
        );
        assert_eq!(fit_minimum_size(frame, Size::new(10.0, 10.0), bounds), frame);
    }
}
