pub mod fetch;
pub mod format;
pub mod model;
pub mod render;

use crate::config::RuntimeConfig;
use anyhow::{Context, Result};
use fetch::{FetchError, NewsClient};
use model::Article;
use std::io::Write;

/// Batch mode: one fetch, printed to stdout.
pub async fn run(cfg: &RuntimeConfig) -> Result<()> {
    let client = NewsClient::new(&cfg.endpoint, cfg.api_key.as_deref().unwrap_or_default(), cfg.timeout())
        .context("cannot build news client (set NEWSAPI_KEY or pass --api-key)")?;

    let result = client.search(&cfg.search_params()).await;

    let mut out = std::io::stdout().lock();
    report(&mut out, result)?;
    out.flush()?;
    Ok(())
}

/// Print the outcome of one fetch. API errors are reported and end the run
/// normally; anything else is returned so the process exits non-zero.
pub fn report<W: Write>(out: &mut W, result: Result<Vec<Article>, FetchError>) -> Result<()> {
    match result {
        Ok(articles) => render::write_report(out, &articles)?,
        Err(FetchError::Api { payload, .. }) => writeln!(out, "Error fetching data: {payload}")?,
        Err(err) => return Err(err).context("failed to fetch news"),
    }
    Ok(())
}
