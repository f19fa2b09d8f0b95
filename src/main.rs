use clap::{Parser, Subcommand};
use log::{error, info};
use radial::config::{default_config_path, Config};
use radial::resolver::FrameResolver;
use radial::screen::{self, PaddingModel, ScreenDescriptor};
use radial::selector::DirectionSelector;
use radial::{Rect, Result, WindowAction, WindowDirection};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "radial")]
#[command(about = "A radial-menu window snapping utility for macOS")]
struct Cli {
    #[arg(short, long, help = "Configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the radial menu controller")]
    Start,
    #[command(about = "Print the frame an action resolves to on a screen")]
    Resolve {
        #[arg(help = "Direction name, or the name of a configured custom/cycle action")]
        action: String,
        #[arg(long, value_parser = parse_rect, help = "Visible screen frame as X,Y,W,H")]
        screen: Rect,
        #[arg(long, help = "Uniform gap, overriding the configured padding")]
        gap: Option<f64>,
        #[arg(long, default_value_t = 0, help = "Entry to pick from a cycle action")]
        index: usize,
    },
    #[command(about = "List window directions with their menu angles and edges")]
    Directions,
    #[command(about = "Print the preview cycle")]
    Preview {
        #[arg(long, default_value_t = 10)]
        steps: usize,
    },
    #[command(about = "Validate the configuration file")]
    Check,
}

#[derive(Serialize)]
struct Resolution {
    action: String,
    bounds: Rect,
    frame: Rect,
}

fn parse_rect(s: &str) -> std::result::Result<Rect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<std::result::Result<_, _>>()?;
    match parts[..] {
        [x, y, width, height] => Ok(Rect::new(x, y, width, height)),
        _ => Err(format!("expected X,Y,W,H, got {s:?}")),
    }
}

fn find_action(config: &Config, name: &str) -> Option<WindowAction> {
    config
        .actions
        .iter()
        .find(|a| a.name.as_deref() == Some(name))
        .cloned()
        .or_else(|| WindowDirection::from_string(name).map(WindowAction::new))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        Some(Commands::Start) | None => {
            info!("Starting radial controller");
            let config = Config::load(&config_path)?;
            radial::run_until_interrupted(config).await?;
        }
        Some(Commands::Resolve {
            action,
            screen: frame,
            gap,
            index,
        }) => {
            let config = Config::load(&config_path)?;
            let Some(window_action) = find_action(&config, &action) else {
                anyhow::bail!("unknown direction or action {:?}", action);
            };
            let padding = gap.map(PaddingModel::uniform).unwrap_or(config.padding);
            let descriptor = ScreenDescriptor::new(0, frame, frame);
            let bounds = screen::usable_bounds(&descriptor, &padding);
            let resolved =
                FrameResolver::new(&padding).resolve_cycle(&window_action, index, None, bounds);

            let output = Resolution {
                action: window_action.label(),
                bounds,
                frame: resolved,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Some(Commands::Directions) => {
            for direction in WindowDirection::ALL {
                let angle = direction
                    .radial_angle()
                    .map(|a| format!("{:>5.0}°", a.to_degrees()))
                    .unwrap_or_else(|| "     -".to_string());
                let edges: Vec<String> = direction
                    .edges_touching_screen()
                    .iter_names()
                    .map(|(name, _)| name.to_lowercase())
                    .collect();
                println!("{:<24} {} {}", direction.name(), angle, edges.join(","));
            }
        }
        Some(Commands::Preview { steps }) => {
            let config = Config::load(&config_path)?;
            let mut selector = DirectionSelector::new(&config.menu);
            selector.start_preview();
            for step in 0..steps {
                if let Some(direction) = selector.tick() {
                    println!("{:>3} {}", step + 1, direction);
                }
            }
        }
        Some(Commands::Check) => match Config::load(&config_path) {
            Ok(config) => {
                println!(
                    "{}: ok ({} actions, trigger {})",
                    config_path.display(),
                    config.actions.len(),
                    config.general.trigger_key
                );
            }
            Err(e) => {
                error!("Invalid configuration: {}", e);
                println!("{}: {:#}", config_path.display(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
