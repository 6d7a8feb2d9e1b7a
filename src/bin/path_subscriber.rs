use clap::Parser;
use pathfinder_app::adapters::outbound::init_console_logger;
use pathfinder_app::application::PathSubscriber;

/// Print every path the pathfinder broadcasts.
#[derive(Parser, Debug)]
#[command(name = "path_subscriber")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address of the pathfinder's path server
    #[arg(long, value_name = "ADDRESS", default_value = "/tmp/path_planner.sock")]
    server: String,

    /// Own address; `{pid}` is replaced by the process id
    #[arg(long, value_name = "ADDRESS", default_value = "/tmp/path_subscriber_{pid}.sock")]
    address: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt::init();

    let logger = init_console_logger();
    let own = cli.address.replace("{pid}", &std::process::id().to_string());
    let subscriber = PathSubscriber::bind(&own, &cli.server, logger)?;

    subscriber
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
