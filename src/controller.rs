use crate::action::{self, KeyCombination, ModifierKey, WindowAction};
use crate::applier::{self, Applier};
use crate::direction::WindowDirection;
use crate::resolver::FrameResolver;
use crate::screen::{self, ScreenDescriptor};
use crate::selector::{DirectionSelector, SelectorEvent};
use crate::window_system::{InputSource, ScreenOverlay, WindowError, WindowHandle, WindowSystem};
use crate::{Config, Point, Rect, Result, Size, WindowId};
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Tolerance when checking whether a window honoured the size it was given.
const SIZE_TOLERANCE: f64 = 1.0;

const CHORD_MODIFIERS: [ModifierKey; 4] = [
    ModifierKey::Ctrl,
    ModifierKey::Alt,
    ModifierKey::Shift,
    ModifierKey::Cmd,
];

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// The selected direction changed. `preview` is where the window would
    /// land, in overlay coordinates (bottom-left origin).
    DirectionChanged {
        direction: WindowDirection,
        preview: Rect,
    },
    /// The interaction ended and `frame` was applied to the window.
    Committed {
        direction: WindowDirection,
        frame: Rect,
    },
    /// The interaction ended without touching any window.
    Dismissed,
}

/// Per-interaction state, dropped when the trigger key is released.
#[derive(Debug)]
struct Interaction {
    screen: Option<ScreenDescriptor>,
    initial_frame: Option<Rect>,
    /// Height of the primary display; flips between top-left and bottom-left
    /// coordinates.
    primary_height: f64,
    last_cursor: Point,
    last_keys: BTreeSet<String>,
    /// Action chosen by keybind; cursor selections build one on the fly.
    action: Option<WindowAction>,
    /// Cycle entry this interaction commits; kept only if it is committed.
    cycle: Option<(String, usize)>,
}

impl Interaction {
    fn cycle_index(&self, action: &WindowAction) -> usize {
        match &self.cycle {
            Some((name, index))
                if action.direction == WindowDirection::Cycle && *name == action.label() =>
            {
                *index
            }
            _ => 0,
        }
    }
}

/// Where the controller last put a window.
#[derive(Debug, Clone, Copy)]
struct Placement {
    direction: WindowDirection,
    frame: Rect,
    /// The window was pushed off the display its interaction started on.
    displaced: bool,
}

pub struct Controller<S, I, O> {
    config: Config,
    system: S,
    input: I,
    overlay: O,
    selector: DirectionSelector,
    selector_events: mpsc::UnboundedReceiver<SelectorEvent>,
    applier: Applier,
    interaction: Option<Interaction>,

    /// Last committed cycle action and the entry it applied.
    cycle: Option<(String, usize)>,
    last_applied: HashMap<WindowId, Placement>,
    minimum_sizes: HashMap<WindowId, Size>,
    listeners: Vec<mpsc::UnboundedSender<InteractionEvent>>,
}

impl<S, I, O> Controller<S, I, O>
where
    S: WindowSystem,
    I: InputSource,
    O: ScreenOverlay,
{
    pub fn new(config: Config, system: S, input: I, overlay: O) -> Self {
        let mut selector = DirectionSelector::new(&config.menu);
        let selector_events = selector.subscribe();
        let applier = Applier::new(Duration::from_millis(config.general.animation_ms));
        Self {
            config,
            system,
            input,
            overlay,
            selector,
            selector_events,
            applier,
            interaction: None,
            cycle: None,
            last_applied: HashMap::new(),
            minimum_sizes: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swaps in a freshly loaded configuration. Takes effect immediately,
    /// including for an interaction already in progress.
    pub fn update_config(&mut self, config: Config) {
        self.selector.update_menu(&config.menu);
        self.applier = Applier::new(Duration::from_millis(config.general.animation_ms));
        self.config = config;
        info!("Configuration updated");
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<InteractionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// Polls input every `sample_interval_ms` until `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let trigger = self.config.general.trigger_modifier()?;
        let period = Duration::from_millis(self.config.general.sample_interval_ms.max(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            "Listening for {} with a {}ms sample interval",
            trigger.name(),
            period.as_millis()
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    if self.is_interacting() {
                        self.interaction_ended(false).await;
                    }
                    info!("Controller stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    self.poll(trigger).await;
                }
            }
        }
    }

    /// One sampling step: drives the interaction lifecycle from the trigger
    /// key, escape, chord keys and cursor.
    pub async fn poll(&mut self, trigger: ModifierKey) {
        let held = self.input.modifier_held(trigger);

        if !self.is_interacting() {
            if held {
                match self.system.cursor_location() {
                    Ok(cursor) => self.interaction_started(cursor),
                    Err(e) => warn!("Cannot start interaction without cursor: {}", e),
                }
            }
            return;
        }

        if !held {
            self.interaction_ended(true).await;
            return;
        }
        if self.input.escape_pressed() {
            self.interaction_ended(false).await;
            return;
        }

        let keys = self.input.pressed_keys();
        let modifiers = CHORD_MODIFIERS
            .into_iter()
            .filter(|m| *m != trigger && self.input.modifier_held(*m))
            .collect();
        self.keys_changed(modifiers, keys);

        if let Ok(cursor) = self.system.cursor_location() {
            self.mouse_moved(cursor);
        }
    }

    /// Begins an interaction at `cursor` (global, top-left origin).
    pub fn interaction_started(&mut self, cursor: Point) {
        let screens = self.system.screens().unwrap_or_else(|e| {
            warn!("Failed to list screens: {}", e);
            Vec::new()
        });
        let screen = screen::screen_containing_point(&screens, cursor)
            .or_else(|| screens.first().copied());
        let primary_height = screens.first().map(|s| s.frame.max_y()).unwrap_or(0.0);

        let initial_frame = match self.system.frontmost_window() {
            Ok(Some(window)) => window.frame().ok(),
            Ok(None) => None,
            Err(e) => {
                debug!("No frontmost window at interaction start: {}", e);
                None
            }
        };

        debug!(
            "Interaction started at {:?} on screen {:?}, window at {:?}",
            cursor,
            screen.map(|s| s.id),
            initial_frame
        );

        self.selector.start(cursor.flipped_y(primary_height));
        self.interaction = Some(Interaction {
            screen,
            initial_frame,
            primary_height,
            last_cursor: cursor,
            last_keys: BTreeSet::new(),
            action: None,
            cycle: None,
        });
    }

    /// Feeds a cursor sample. Unchanged positions are ignored so a keybind
    /// selection is not overridden by a stationary cursor.
    pub fn mouse_moved(&mut self, cursor: Point) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        if interaction.last_cursor == cursor {
            return;
        }
        interaction.last_cursor = cursor;
        let sample = cursor.flipped_y(interaction.primary_height);

        if self.selector.sample(sample).is_some() {
            interaction.action = None;
        }
        self.forward_selector_events();
    }

    /// Reacts to the chord currently held with the trigger key. Only a newly
    /// pressed key selects an action; holding or releasing keys keeps the
    /// current choice, so letting go of a chord one key at a time does not
    /// fall back to its single-key actions.
    pub fn keys_changed(&mut self, modifiers: BTreeSet<ModifierKey>, keys: BTreeSet<String>) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        let gained = !keys.is_subset(&interaction.last_keys);
        interaction.last_keys = keys.clone();
        if !gained {
            return;
        }

        let pressed = KeyCombination { modifiers, keys };
        let Some(action) = action::action_for_keys(&self.config.actions, &pressed).cloned() else {
            debug!("No action bound to {}", pressed);
            return;
        };

        let label = action.label();
        let cycled = action.direction == WindowDirection::Cycle;
        if cycled {
            let last = interaction
                .cycle
                .take()
                .filter(|(name, _)| *name == label)
                .or_else(|| self.cycle.clone());
            interaction.cycle = Some(match last {
                Some((name, index)) if name == label => (name, index + 1),
                _ => (label.clone(), 0),
            });
        }
        let switched =
            interaction.action.as_ref().map(WindowAction::label).as_deref() != Some(label.as_str());

        let direction = action.direction;
        interaction.action = Some(action);
        self.selector.select(direction);
        // custom actions and cycle entries share one direction each
        if !self.forward_selector_events() && (cycled || switched) {
            self.emit_direction(direction);
        }
    }

    /// Ends the interaction, applying the selected action when `committed`.
    /// Returns the frame that was applied, if any.
    pub async fn interaction_ended(&mut self, committed: bool) -> Option<Rect> {
        let direction = self.selector.end(committed);
        let interaction = self.interaction.take()?;

        let applied = match direction {
            Some(direction) => {
                let action = interaction
                    .action
                    .clone()
                    .filter(|a| a.direction == direction)
                    .unwrap_or_else(|| WindowAction::new(direction));
                match self.commit(&action, &interaction).await {
                    Ok(frame) => frame.map(|frame| (action.direction, frame)),
                    Err(WindowError::Invalid) | Err(WindowError::NoWindow) => {
                        debug!("Window went away before {} could be applied", action.label());
                        None
                    }
                    Err(e) => {
                        warn!("Failed to apply {}: {}", action.label(), e);
                        None
                    }
                }
            }
            None => None,
        };

        match applied {
            Some((direction, frame)) => {
                self.emit(InteractionEvent::Committed { direction, frame });
                Some(frame)
            }
            None => {
                self.emit(InteractionEvent::Dismissed);
                None
            }
        }
    }

    async fn commit(
        &mut self,
        action: &WindowAction,
        interaction: &Interaction,
    ) -> std::result::Result<Option<Rect>, WindowError> {
        let Some(window) = self.system.frontmost_window()? else {
            debug!("No frontmost window; skipping {}", action.label());
            return Ok(None);
        };
        let current = window.frame()?;
        let screens = self.system.screens()?;
        let previous = self.last_applied.get(&window.id()).copied();
        // a pushed window keeps to its new display until it is moved by hand
        let displaced_screen = previous
            .filter(|p| p.displaced && p.frame.approx_eq(&current, SIZE_TOLERANCE))
            .and_then(|_| screen::screen_containing_point(&screens, current.center()));
        let mut displaced = displaced_screen.is_some();
        let Some(mut target_screen) = displaced_screen
            .or(interaction.screen)
            .or_else(|| screen::screen_containing_point(&screens, current.center()))
            .or_else(|| screen::screen_with_cursor(&self.system))
        else {
            return Err(WindowError::Backend("no screens".into()));
        };

        let mut action = action.clone();
        let previous_direction = previous
            .filter(|p| p.frame.approx_eq(&current, SIZE_TOLERANCE))
            .map(|p| p.direction);
        let push = action
            .direction
            .pushed_edge()
            .filter(|_| self.config.general.move_to_adjacent_screen)
            .filter(|_| action.direction.will_change_screen(previous_direction));
        if let Some(edge) = push {
            if let Some(next) = screen::adjacent_screen(&screens, &target_screen, edge) {
                debug!(
                    "Pushing window {:?} from screen {} to {}",
                    window.id(),
                    target_screen.id,
                    next.id
                );
                target_screen = next;
                displaced = true;
                action = WindowAction::new(entering_direction(action.direction));
            }
        }

        let bounds = screen::usable_bounds(&target_screen, &self.config.padding);
        let index = interaction.cycle_index(&action);
        let frame = FrameResolver::new(&self.config.padding)
            .with_initial_frame(interaction.initial_frame)
            .resolve_cycle(&action, index, Some(current), bounds);
        if frame.is_empty() {
            debug!("{} resolved to nothing; leaving window alone", action.label());
            return Ok(None);
        }

        let general = &self.config.general;
        self.applier
            .apply(&window, frame, general.animate, Some(general.timing_curve))
            .await?;
        let frame = self.respect_minimum_size(&window, frame, bounds).await?;

        self.cycle = if action.direction == WindowDirection::Cycle {
            interaction.cycle.clone()
        } else {
            None
        };
        self.last_applied.insert(
            window.id(),
            Placement {
                direction: action.direction,
                frame,
                displaced,
            },
        );
        info!("Applied {} to window {:?}: {:?}", action.label(), window.id(), frame);
        Ok(Some(frame))
    }

    /// Windows with a size floor overshoot small regions; slide them back on
    /// screen once their floor is known.
    async fn respect_minimum_size(
        &mut self,
        window: &S::Window,
        frame: Rect,
        bounds: Rect,
    ) -> std::result::Result<Rect, WindowError> {
        let actual = window.frame()?;
        let refused = actual.width > frame.width + SIZE_TOLERANCE
            || actual.height > frame.height + SIZE_TOLERANCE;
        if !refused {
            return Ok(frame);
        }

        let minimum = match self.minimum_sizes.get(&window.id()) {
            Some(size) => *size,
            None => {
                let size = applier::probe_minimum_size(window, &self.overlay).await;
                if size.area() > 0.0 {
                    self.minimum_sizes.insert(window.id(), size);
                }
                if size.area() > 0.0 {
                    size
                } else {
                    actual.size()
                }
            }
        };

        let fitted = applier::fit_minimum_size(frame, minimum, bounds);
        if !fitted.approx_eq(&actual, SIZE_TOLERANCE) {
            applier::set_frame(window, actual, fitted)?;
        }
        Ok(fitted)
    }

    fn preview_frame(&self, direction: WindowDirection) -> Option<Rect> {
        let interaction = self.interaction.as_ref()?;
        let screen = interaction.screen?;
        let action = interaction
            .action
            .clone()
            .filter(|a| a.direction == direction)
            .unwrap_or_else(|| WindowAction::new(direction));
        let bounds = screen::usable_bounds(&screen, &self.config.padding);
        let frame = FrameResolver::new(&self.config.padding)
            .with_initial_frame(interaction.initial_frame)
            .resolve_cycle(
                &action,
                interaction.cycle_index(&action),
                interaction.initial_frame,
                bounds,
            );
        Some(frame.flipped_y(interaction.primary_height))
    }

    /// Relays the selector's direction changes with their preview frames.
    /// Returns whether anything was relayed.
    fn forward_selector_events(&mut self) -> bool {
        let mut forwarded = false;
        while let Ok(SelectorEvent::DirectionChanged(direction)) = self.selector_events.try_recv() {
            self.emit_direction(direction);
            forwarded = true;
        }
        forwarded
    }

    fn emit_direction(&mut self, direction: WindowDirection) {
        let preview = self.preview_frame(direction).unwrap_or_default();
        self.emit(InteractionEvent::DirectionChanged { direction, preview });
    }

    fn emit(&mut self, event: InteractionEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Half a window occupies after being pushed across a display edge.
fn entering_direction(direction: WindowDirection) -> WindowDirection {
    match direction {
        WindowDirection::LeftHalf => WindowDirection::RightHalf,
        WindowDirection::RightHalf => WindowDirection::LeftHalf,
        other => other,
    }
}
