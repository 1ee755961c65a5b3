mod cli;
mod config;
mod interactive;
mod logging;
mod news;
mod open_url;
mod ui;
mod util;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use console::Term;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.verbose);

    let cfg = config::load(&args)?;
    tracing::debug!(
        interactive = args.interactive,
        page_size = cfg.page_size,
        has_key = cfg.api_key.is_some(),
        "configuration resolved"
    );

    if args.interactive {
        interactive::run(cfg).await?;
        // Leave a clean terminal behind the menus
        let _ = Term::stdout().clear_screen();
        return Ok(());
    }

    news::run(&cfg).await
}
