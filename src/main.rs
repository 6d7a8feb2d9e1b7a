use clap::Parser;
use pathfinder_app::adapters::outbound::{init_combined_logger, FilesystemMapSource};
use pathfinder_app::application::PathfinderService;
use pathfinder_app::domains::path_planning::{FieldMap, MapSource, Point2D};
use pathfinder_app::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plan collision-free routes over a PRM and republish them to subscribers.
#[derive(Parser, Debug)]
#[command(name = "pathfinder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Goal x coordinate
    #[arg(value_name = "GOAL_X", requires = "goal_y", allow_negative_numbers = true)]
    goal_x: Option<f64>,

    /// Goal y coordinate
    #[arg(value_name = "GOAL_Y", allow_negative_numbers = true)]
    goal_y: Option<f64>,

    /// TOML configuration file; defaults apply when it does not exist
    #[arg(long, value_name = "FILE", default_value = "pathfinder.toml")]
    config: String,

    /// Map document, overriding the configured one
    #[arg(long, value_name = "FILE")]
    map: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Installed as the tracing subscriber only, so the `log` facade stays free for fast_log.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load_or_default(&cli.config).await?;
    if let Some(map) = cli.map {
        config.map.path = map;
    }
    let logger = init_combined_logger(config.logging.file.as_deref());

    let source = FilesystemMapSource::new(None);
    let map = FieldMap::from_json(&source.load_map(&config.map.path)?)?;
    info!(
        width = map.width,
        height = map.height,
        obstacles = map.obstacles.len(),
        roads = map.roads.len(),
        "map loaded"
    );

    let goal = match (cli.goal_x, cli.goal_y) {
        (Some(x), Some(y)) => Some(Point2D::new(x, y)),
        _ => None,
    };

    let service = PathfinderService::start(&config, map, goal, logger).await?;
    service.run().await?;
    Ok(())
}
