//! Check command - compiles the chain from configuration without serving

use tracing::info;

use crate::cli::serve::load_config;
use crate::service::ChatService;

pub async fn run() -> anyhow::Result<()> {
    let config = load_config()?;

    let service = ChatService::build(&config)?;
    info!(state = ?service.state(), "Configuration OK, chain compiled");

    Ok(())
}
