use log::{error, info};
use radial::config::{default_config_path, Config};
use radial::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    info!("Starting radial daemon");

    let config = Config::load(default_config_path())?;
    if let Err(e) = radial::run_until_interrupted(config).await {
        error!("Controller error: {}", e);
        return Err(e);
    }

    Ok(())
}
