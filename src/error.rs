use thiserror::Error;

/// Failures while fetching or parsing a listing/detail page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to fetch data: {status} ({url})")]
    Fetch { url: String, status: u16 },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("missing element: {what}")]
    MissingElement { what: &'static str },

    #[error("{what} has no `{attr}` attribute")]
    MissingAttribute {
        what: &'static str,
        attr: &'static str,
    },

    #[error("status bar has {found} tabs, expected at least 4")]
    TooFewTabs { found: usize },

    #[error("listing row has {found} cells, expected at least 3")]
    TooFewCells { found: usize },

    #[error("invalid selector `{css}`: {message}")]
    Selector { css: &'static str, message: String },
}
