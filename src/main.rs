/*
    A process group is a fixed set of members. Each member is told its own
    identity, a number in 0..size, and the size of the group when the group
    is formed, and learns nothing else about the others. Member 0 is the
    root and coordinates every exchange.

    In collect mode each other member sends the root one greeting and the
    root reads them in ascending identity order. In exchange mode the root
    also answers each greeting before it reads the next one, and each member
    waits for that answer. Announce mode does no messaging at all, each
    member only reports what it was told.
*/

mod common;
mod network;
mod protocol;

use std::time::Duration;

use clap::Parser;
use common::config::GroupConfig;
use protocol::Mode;

#[derive(Parser)]
#[command(name = "group-hello", about = "Point-to-point messaging inside a process group")]
struct Cli {
    /// Number of members in the group.
    #[arg(short = 'n', long, env = "GROUP_SIZE", default_value = "4")]
    size: usize,

    /// Depth of each point-to-point channel.
    #[arg(long, default_value = "16")]
    channel_capacity: usize,

    /// Give up on a receive after this many milliseconds (default: wait forever).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Delay each member's first send by a random 0..=N milliseconds.
    #[arg(long, default_value = "0")]
    jitter_ms: u64,

    #[arg(value_enum)]
    mode: Mode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = GroupConfig::new()
        .size(cli.size)
        .channel_capacity(cli.channel_capacity)
        .jitter(Duration::from_millis(cli.jitter_ms));
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.recv_timeout(Duration::from_millis(timeout_ms));
    }

    protocol::run_group(&config, cli.mode).await?;
    Ok(())
}
