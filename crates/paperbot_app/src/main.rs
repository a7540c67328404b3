mod app;
mod config;
mod console;
mod logging;
mod registry;
mod store;

use std::path::Path;

use anyhow::bail;

use crate::config::BotConfig;
use crate::registry::UserRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::initialize();

    let config = BotConfig::load(Path::new("bot_config.json"));
    if config.bot_token.trim().is_empty() {
        bail!("bot token not found in bot_config.json; refusing to start");
    }

    let registry = UserRegistry::load(Path::new("bot_users.json"));
    app::App::new(config, registry).run().await
}
