mod cli;
mod script;
mod session;

use galaxy_common::protocol::UserDescriptor;
use galaxy_social::{ConnectionConfig, RelayClient};
use tracing_subscriber::EnvFilter;

use crate::script::ScriptRunner;
use crate::session::ClientSession;

const LOG_TARGETS: [&str; 3] = ["galaxy_app", "galaxy_social", "galaxy_world"];

fn log_filter(level: Option<&str>, config: &galaxy_config::GalaxyConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| match level {
            Some(level) => format!("{target}={level}"),
            None => config.logging.directive(target),
        })
        .collect();
    EnvFilter::new(directives.join(","))
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let (mut config, config_err) = match galaxy_config::load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Default::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.log_level.as_deref(), &config))
        .init();

    if let Some(e) = config_err {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
    }

    if let Some(url) = args.url {
        config.client.server_url = url;
    }
    if let Some(room) = args.room {
        config.client.room = room;
    }
    tracing::debug!(config = %galaxy_config::config_to_json(&config), "Effective config");

    let steps = match script::parse_script(&args.script) {
        Ok(steps) => steps,
        Err(e) => {
            tracing::error!(error = %e, "Invalid script");
            std::process::exit(2);
        }
    };

    let user_id = args.user_id.unwrap_or_else(galaxy_common::new_id);
    let username = args
        .username
        .unwrap_or_else(|| format!("guest-{}", user_id.chars().take(4).collect::<String>()));
    let user = UserDescriptor {
        user_id,
        username,
        avatar_url: args.avatar_url,
    };

    tracing::info!(
        url = %config.client.server_url,
        room = %config.client.room,
        username = %user.username,
        "Starting Galaxy client"
    );

    let (client, events) = RelayClient::connect(ConnectionConfig {
        url: config.client.server_url.clone(),
        ..Default::default()
    });

    let mut session = ClientSession::new(&config, user, client, events, ScriptRunner::new(steps));
    session.run(args.exit_when_done).await;
}
