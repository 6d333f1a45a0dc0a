use std::sync::Arc;

use clap::Parser;
use pulsewatch::{
    config::read_config_file,
    scanner::Scanner,
    scheduler::SchedulerHandle,
    transport::HttpTransport,
};
use tracing::{level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short)]
    file: String,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![("pulsewatch", LevelFilter::TRACE)]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    let transport = Arc::new(HttpTransport::new()?);
    let scanner = Arc::new(Scanner::new(
        config.targets.clone(),
        config.timeout(),
        transport,
    ));

    let handle = SchedulerHandle::spawn(scanner, config.interval());

    tokio::signal::ctrl_c().await?;
    trace!("shutting down");

    handle.shutdown().await?;

    Ok(())
}
