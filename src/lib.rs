pub mod action;
pub mod animation;
pub mod applier;
pub mod config;
pub mod controller;
pub mod direction;
pub mod geometry;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod resolver;
pub mod screen;
pub mod selector;
pub mod window_system;

pub use action::WindowAction;
pub use config::Config;
pub use controller::Controller;
pub use direction::WindowDirection;

pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Runs the controller against the live window system until Ctrl+C.
#[cfg(target_os = "macos")]
pub async fn run_until_interrupted(config: Config) -> Result<()> {
    use controller::InteractionEvent;
    use log::{debug, info};

    let system = macos::MacOSWindowSystem::new()?;
    let mut controller = Controller::new(config, &system, &system, &system);

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                InteractionEvent::DirectionChanged { direction, preview } => {
                    debug!("Preview {} at {:?}", direction, preview)
                }
                InteractionEvent::Committed { direction, frame } => {
                    info!("Moved window to {} ({:?})", direction, frame)
                }
                InteractionEvent::Dismissed => debug!("Interaction dismissed"),
            }
        }
    });

    controller
        .run(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, shutting down");
            }
        })
        .await
}

#[cfg(not(target_os = "macos"))]
pub async fn run_until_interrupted(_config: Config) -> Result<()> {
    anyhow::bail!("the radial controller needs the macOS window server")
}
