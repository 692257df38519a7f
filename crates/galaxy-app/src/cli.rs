use std::path::PathBuf;

use clap::Parser;

/// Galaxy: headless client for the shared space.
#[derive(Parser, Debug)]
#[command(name = "galaxy", version, about)]
pub struct Args {
    /// Relay WebSocket URL (overrides config).
    #[arg(long)]
    pub url: Option<String>,

    /// Room to join (overrides config).
    #[arg(short, long)]
    pub room: Option<String>,

    /// Stable user id issued by the identity service.
    #[arg(long)]
    pub user_id: Option<String>,

    /// Display name shown under the avatar.
    #[arg(short = 'n', long)]
    pub username: Option<String>,

    #[arg(long, default_value = "")]
    pub avatar_url: String,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Scripted input, e.g. "right:30,wait:10,say:hello,place:desk@120/340".
    #[arg(short, long, default_value = "")]
    pub script: String,

    /// Disconnect once the script has run to completion.
    #[arg(long)]
    pub exit_when_done: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
