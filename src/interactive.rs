//! Interactive reader: a search form, a fetch trigger, an output pane with
//! openable links, and a status line.

use crate::config::{RuntimeConfig, clean_domains};
use crate::news::fetch::{FetchError, NewsClient, SearchParams};
use crate::news::model::Article;
use crate::news::render::{self, DisplayRecord};
use crate::open_url::open_url;
use crate::ui::{self, MenuChoice};
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Fetching,
    Fetched(usize),
    NoArticles,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("Ready"),
            Status::Fetching => f.write_str("Fetching..."),
            Status::Fetched(n) => write!(f, "Fetched {n} articles"),
            Status::NoArticles => f.write_str("No articles"),
            Status::Error => f.write_str("Error"),
        }
    }
}

/// Editable search fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub api_key: Option<String>,
    pub query: String,
    pub domains: String,
    pub page_size: u8,
}

impl SearchForm {
    pub fn from_config(cfg: &RuntimeConfig) -> Self {
        Self {
            api_key: cfg.api_key.clone(),
            query: cfg.query.clone(),
            domains: cfg.domains.join(","),
            page_size: cfg.page_size,
        }
    }

    pub fn params(&self, base: &RuntimeConfig) -> SearchParams {
        SearchParams {
            query: self.query.trim().to_string(),
            page_size: self.page_size,
            domains: clean_domains(&[self.domains.as_str()]),
            ..base.search_params()
        }
    }
}

/// Article id to URL, for the current result set only.
#[derive(Debug, Default, Clone)]
pub struct LinkTable {
    links: BTreeMap<usize, String>,
}

impl LinkTable {
    pub fn from_records(records: &[DisplayRecord]) -> Self {
        let links = records
            .iter()
            .filter_map(|r| r.url.clone().map(|u| (r.id, u)))
            .collect();
        Self { links }
    }

    pub fn resolve(&self, id: usize) -> Option<&str> {
        self.links.get(&id).map(String::as_str)
    }
}

#[derive(Debug)]
pub enum Refusal {
    /// A fetch is already in flight; the trigger is ignored.
    Busy,
    MissingApiKey,
    Client(FetchError),
}

pub struct Session {
    cfg: RuntimeConfig,
    pub form: SearchForm,
    status: Status,
    records: Vec<DisplayRecord>,
    links: LinkTable,
}

impl Session {
    pub fn new(cfg: RuntimeConfig) -> Self {
        Self {
            form: SearchForm::from_config(&cfg),
            cfg,
            status: Status::Ready,
            records: Vec::new(),
            links: LinkTable::default(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    /// Validate the credential and move to `Fetching`. Nothing touches the
    /// network until this succeeds.
    pub fn begin_fetch(&mut self) -> Result<NewsClient, Refusal> {
        if self.status == Status::Fetching {
            return Err(Refusal::Busy);
        }
        let Some(key) = self.form.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Err(Refusal::MissingApiKey);
        };
        let client = NewsClient::new(&self.cfg.endpoint, key, Some(self.cfg.interactive_timeout()))
            .map_err(|err| {
                self.status = Status::Error;
                Refusal::Client(err)
            })?;
        self.status = Status::Fetching;
        Ok(client)
    }

    /// Record the outcome of a fetch. Returns the error to show, if any.
    pub fn finish_fetch(&mut self, result: Result<Vec<Article>, FetchError>) -> Option<FetchError> {
        match result {
            Ok(articles) => {
                self.records = render::records(&articles);
                self.links = LinkTable::from_records(&self.records);
                self.status = if self.records.is_empty() {
                    Status::NoArticles
                } else {
                    Status::Fetched(self.records.len())
                };
                None
            }
            Err(err) => {
                self.records.clear();
                self.links = LinkTable::default();
                self.status = Status::Error;
                Some(err)
            }
        }
    }

    pub fn search_params(&self) -> SearchParams {
        self.form.params(&self.cfg)
    }

    fn header(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(h) = &self.cfg.header {
            lines.push(h.clone());
        }
        lines.push(format!("Status: {}", self.status));
        lines
    }
}

/// Human-readable text for the error dialog.
pub fn describe_error(err: &FetchError) -> String {
    match err {
        FetchError::Api {
            code,
            message,
            payload,
            ..
        } => match (code, message) {
            (Some(code), Some(message)) => format!("{message} ({code})\n\nError fetching data: {payload}"),
            (None, Some(message)) => format!("{message}\n\nError fetching data: {payload}"),
            _ => format!("Error fetching data: {payload}"),
        },
        FetchError::MissingApiKey => "An API key is required. Enter one in the search form.".into(),
        other => format!("Fetch failed: {other}"),
    }
}

pub async fn run(cfg: RuntimeConfig) -> Result<()> {
    let mut session = Session::new(cfg);
    let items = ["Fetch articles", "Edit search form", "Open article link", "Quit"];

    loop {
        let choice = ui::prompt_menu("Cyber News (b/q = quit)", &items, Some(0), &session.header())?;
        match choice {
            MenuChoice::Back | MenuChoice::Quit | MenuChoice::Index(3) => break,
            MenuChoice::Index(0) => {
                if trigger(&mut session).await? {
                    show_results(&session)?;
                }
            }
            MenuChoice::Index(1) => edit_form(&mut session)?,
            MenuChoice::Index(2) => {
                if session.records().is_empty() {
                    ui::show_modal("No articles", "Fetch articles first.")?;
                } else {
                    show_results(&session)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// One fetch cycle. Returns whether there is a result set to show.
async fn trigger(session: &mut Session) -> Result<bool> {
    let client = match session.begin_fetch() {
        Ok(client) => client,
        Err(Refusal::Busy) => {
            tracing::debug!("fetch already in flight; ignoring trigger");
            return Ok(false);
        }
        Err(Refusal::MissingApiKey) => {
            ui::show_modal("API key required", &describe_error(&FetchError::MissingApiKey))?;
            edit_form(session)?;
            return Ok(false);
        }
        Err(Refusal::Client(err)) => {
            ui::show_modal("Error", &describe_error(&err))?;
            return Ok(false);
        }
    };

    ui::show_status(&session.header());
    let result = client.search(&session.search_params()).await;
    if let Some(err) = session.finish_fetch(result) {
        ui::show_modal("Error", &describe_error(&err))?;
        return Ok(false);
    }
    if session.status() == Status::NoArticles {
        ui::show_modal("No articles", "No cybersecurity-related news found.")?;
        return Ok(false);
    }
    Ok(true)
}

fn show_results(session: &Session) -> Result<()> {
    let blocks: Vec<Vec<String>> = session.records().iter().map(render::pane_lines).collect();
    loop {
        let choice = ui::prompt_pane(
            "Enter an article number to open its link (b = back).",
            &blocks,
            &session.header(),
        )?;
        match choice {
            MenuChoice::Back | MenuChoice::Quit => return Ok(()),
            MenuChoice::Index(i) => {
                let id = i + 1;
                match session.links().resolve(id) {
                    Some(url) => {
                        if let Err(err) = open_url(url, session.cfg.open_command.as_deref()) {
                            tracing::warn!(%err, id, "could not open article link");
                            ui::show_modal("Error", &format!("{err:#}"))?;
                        }
                    }
                    None => ui::show_modal("No link", "This article has no link.")?,
                }
            }
            MenuChoice::Invalid => {}
        }
    }
}

fn edit_form(session: &mut Session) -> Result<()> {
    ui::show_status(&session.header());
    if let Some(key) = ui::prompt_secret("API key (Enter keeps current)")? {
        session.form.api_key = Some(key);
    }
    session.form.query = ui::prompt_text("Keywords", &session.form.query)?;
    session.form.domains = ui::prompt_text("Domains (comma-separated)", &session.form.domains)?;
    session.form.page_size = ui::prompt_page_size(session.form.page_size)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::{AppConfig, resolve};
    use crate::news::model::Source;

    fn config(api_key: Option<&str>) -> RuntimeConfig {
        let file = AppConfig {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        };
        resolve(file, &Cli::default()).unwrap()
    }

    fn article(title: &str, url: Option<&str>) -> Article {
        Article {
            title: Some(title.into()),
            url: url.map(str::to_string),
            source: Some(Source {
                name: Some("Threatpost".into()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn status_labels() {
        assert_eq!(Status::Ready.to_string(), "Ready");
        assert_eq!(Status::Fetching.to_string(), "Fetching...");
        assert_eq!(Status::Fetched(7).to_string(), "Fetched 7 articles");
        assert_eq!(Status::NoArticles.to_string(), "No articles");
        assert_eq!(Status::Error.to_string(), "Error");
    }

    #[test]
    fn starts_ready() {
        assert_eq!(Session::new(config(Some("k"))).status(), Status::Ready);
    }

    #[test]
    fn missing_key_blocks_fetch() {
        let mut session = Session::new(config(None));
        assert!(matches!(session.begin_fetch(), Err(Refusal::MissingApiKey)));
        assert_eq!(session.status(), Status::Ready);

        session.form.api_key = Some("   ".into());
        assert!(matches!(session.begin_fetch(), Err(Refusal::MissingApiKey)));
    }

    #[test]
    fn second_trigger_while_fetching_is_ignored() {
        let mut session = Session::new(config(Some("k")));
        assert!(session.begin_fetch().is_ok());
        assert_eq!(session.status(), Status::Fetching);
        assert!(matches!(session.begin_fetch(), Err(Refusal::Busy)));

        session.finish_fetch(Ok(vec![]));
        assert!(session.begin_fetch().is_ok());
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let mut session = Session::new(config(Some("k")));
        session.begin_fetch().unwrap();
        assert!(session.finish_fetch(Ok(vec![])).is_none());
        assert_eq!(session.status(), Status::NoArticles);
        assert!(session.records().is_empty());
    }

    #[test]
    fn results_populate_records_and_links() {
        let mut session = Session::new(config(Some("k")));
        session.begin_fetch().unwrap();
        let articles = vec![
            article("a", Some("https://x.test/a")),
            article("b", None),
            article("c", Some("https://x.test/c")),
        ];
        assert!(session.finish_fetch(Ok(articles)).is_none());

        assert_eq!(session.status(), Status::Fetched(3));
        let titles: Vec<_> = session.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        assert_eq!(session.links().resolve(1), Some("https://x.test/a"));
        assert_eq!(session.links().resolve(2), None);
        assert_eq!(session.links().resolve(3), Some("https://x.test/c"));
        assert_eq!(session.links().resolve(4), None);
    }

    #[test]
    fn api_error_clears_previous_results() {
        let mut session = Session::new(config(Some("k")));
        session.begin_fetch().unwrap();
        session.finish_fetch(Ok(vec![article("a", Some("https://x.test/a"))]));

        session.begin_fetch().unwrap();
        let err = FetchError::Api {
            status: "error".into(),
            code: Some("apiKeyInvalid".into()),
            message: None,
            payload: r#"{"status":"error"}"#.into(),
        };
        let shown = session.finish_fetch(Err(err)).unwrap();

        assert_eq!(session.status(), Status::Error);
        assert!(session.records().is_empty());
        assert_eq!(session.links().resolve(1), None);
        assert!(describe_error(&shown).contains(r#"{"status":"error"}"#));
    }

    #[test]
    fn form_edits_flow_into_params() {
        let mut session = Session::new(config(Some("k")));
        session.form.query = "  zero-day ".into();
        session.form.domains = "a.com, B.com,".into();
        session.form.page_size = 12;

        let p = session.search_params();
        assert_eq!(p.query, "zero-day");
        assert_eq!(p.domains, ["a.com", "b.com"]);
        assert_eq!(p.page_size, 12);
        assert_eq!(p.language, "en");
        assert_eq!(p.sort_by, "publishedAt");
    }

    #[test]
    fn header_shows_status() {
        let session = Session::new(config(Some("k")));
        assert_eq!(session.header().last().unwrap(), "Status: Ready");
    }
}
