use anyhow::{Context, Result, bail};
use std::process::{Child, Command};
use std::thread::{self, JoinHandle};
use url::Url;

/// Only web links coming back from the API are handed to a browser.
pub fn is_browsable(candidate: &str) -> bool {
    Url::parse(candidate.trim())
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub fn open_url(url: &str, open_command: Option<&str>) -> Result<()> {
    if !is_browsable(url) {
        bail!("refusing to open non-web link: {url}");
    }
    if let Some(cmd) = open_command {
        tracing::debug!(command = cmd, url, "opening link with configured command");
        let child = Command::new(cmd)
            .arg(url)
            .spawn()
            .with_context(|| format!("failed to run {cmd}"))?;
        reap(child);
        return Ok(());
    }
    tracing::debug!(url, "opening link in default browser");
    open::that(url).with_context(|| format!("failed to open {url}"))
}

// Wait for the opener off the UI thread so it does not linger as a zombie.
fn reap(mut child: Child) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(err) = child.wait() {
            tracing::warn!(%err, "failed to wait for link opener");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_links_are_browsable() {
        assert!(is_browsable("https://www.darkreading.com/a"));
        assert!(is_browsable("http://example.com"));
        assert!(!is_browsable("file:///etc/passwd"));
        assert!(!is_browsable("javascript:alert(1)"));
        assert!(!is_browsable("not a url"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn spawned_opener_is_reaped() {
        let child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        reap(child).join().unwrap();
        assert!(!std::path::Path::new(&format!("/proc/{pid}")).exists());
    }

    #[cfg(unix)]
    #[test]
    fn configured_command_opens_web_links() {
        assert!(open_url("https://example.com/a", Some("true")).is_ok());
    }

    #[test]
    fn non_web_link_is_not_opened() {
        assert!(open_url("file:///tmp/x", Some("true")).is_err());
    }
}
