//! `check` command: a dry run of server startup.

use visible_mcp_server::config::ServerConfig;
use visible_mcp_server::state::AppState;

use super::CliError;

/// Load everything the server loads at startup and print a summary.
#[allow(clippy::print_stdout)]
pub fn run() -> Result<(), CliError> {
    let config = ServerConfig::from_env()?;
    let state = AppState::load(config)?;

    println!("listen address:  {}", state.config().socket_addr());
    println!("asset base url:  {}", state.config().asset_base_url);
    println!("devices:         {}", state.catalog().len());
    println!("colors:          {}", state.catalog().colors().len());
    for widget in state.widgets().all() {
        println!(
            "widget:          {} ({} bytes)",
            widget.spec.identifier,
            widget.html.len()
        );
    }
    Ok(())
}
