// Entrypoint for the order service client.
// - Logs go to stderr so they never mix with rendered responses.
// - Builds the API client from the environment and hands it to the menu loop.

use order_cli::{api::ApiClient, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    // `ORDER_SERVICE_URL` overrides http://localhost:8080.
    let api = ApiClient::from_env()?;

    // Blocks until the user exits or stdin closes.
    main_menu(api)?;
    Ok(())
}
