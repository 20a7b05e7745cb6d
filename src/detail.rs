use scraper::{ElementRef, Html};

use crate::error::ScrapeError;
use crate::listing::text_of;
use crate::selectors::{self, compile, select_classed};
use crate::source::PageSource;

/// Fields scraped from one pull-request page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub title: String,
    pub case_number: String,
    pub conversation: String,
    pub commits: String,
    pub checks: String,
    /// Empty when the "Files changed" tab carries no counter.
    pub files_changed: String,
}

pub async fn fetch_detail<S: PageSource>(source: &S, url: &str) -> Result<DetailRecord, ScrapeError> {
    let html = source.fetch(url).await?;
    parse_detail(&html)
}

/// Parse a pull-request page.
///
/// Every element is required except the counter on the fourth status tab,
/// which GitHub omits on some pages; that one falls back to `""`.
pub fn parse_detail(html: &str) -> Result<DetailRecord, ScrapeError> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let title = doc
        .select(&compile(selectors::TITLE)?)
        .next()
        .map(text_of)
        .ok_or(ScrapeError::MissingElement { what: "title" })?;
    let case_number = select_classed(root, &selectors::CASE_NUMBER)?
        .first()
        .map(|el| text_of(*el))
        .ok_or(ScrapeError::MissingElement { what: "case number" })?;

    let nav = select_classed(root, &selectors::STATUS_BAR)?
        .into_iter()
        .next()
        .ok_or(ScrapeError::MissingElement { what: "status bar" })?;
    let tabs: Vec<ElementRef> = nav.select(&compile(selectors::STATUS_TAB)?).collect();
    if tabs.len() < selectors::STATUS_TAB_COUNT {
        return Err(ScrapeError::TooFewTabs { found: tabs.len() });
    }

    let label_sel = compile(selectors::TAB_LABEL)?;
    let label = |idx: usize, what: &'static str| -> Result<Option<String>, ScrapeError> {
        match tabs[idx].select(&label_sel).next() {
            Some(span) => span
                .value()
                .attr(selectors::TAB_LABEL_ATTR)
                .map(|t| Some(t.to_string()))
                .ok_or(ScrapeError::MissingAttribute {
                    what,
                    attr: selectors::TAB_LABEL_ATTR,
                }),
            None => Ok(None),
        }
    };
    let required = |idx: usize, what: &'static str| -> Result<String, ScrapeError> {
        label(idx, what)?.ok_or(ScrapeError::MissingElement { what })
    };

    Ok(DetailRecord {
        title,
        case_number,
        conversation: required(selectors::TAB_CONVERSATION, "conversation tab label")?,
        commits: required(selectors::TAB_COMMITS, "commits tab label")?,
        checks: required(selectors::TAB_CHECKS, "checks tab label")?,
        files_changed: label(selectors::TAB_FILES_CHANGED, "files changed tab label")?
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn page(tabs: &str) -> String {
        format!(
            r#"<html><body>
            <h1><bdi class="js-issue-title markdown-title">Fix bug</bdi>
            <span class="f1-light color-fg-muted">#123</span></h1>
            <nav class="tabnav-tabs d-flex overflow-auto">{tabs}</nav>
            </body></html>"#
        )
    }

    const THREE_TABS: &str = r#"
        <a href="/c">Conversation <span title="5" class="Counter">5</span></a>
        <a href="/m">Commits <span title="2" class="Counter">2</span></a>
        <a href="/k">Checks <span title="1" class="Counter">1</span></a>"#;

    #[test]
    fn full_status_bar() {
        let d = parse_detail(&fixture("detail")).unwrap();
        assert_eq!(
            d,
            DetailRecord {
                title: "Fix bug".into(),
                case_number: "#123".into(),
                conversation: "Conversation: 5".into(),
                commits: "Commits: 2".into(),
                checks: "Checks: 1 passing".into(),
                files_changed: "Files changed: 3".into(),
            }
        );
    }

    #[test]
    fn files_changed_without_counter_is_empty() {
        let d = parse_detail(&fixture("detail_no_files_counter")).unwrap();
        assert_eq!(d.files_changed, "");
        assert_eq!(d.title, "Añadir soporte para ñ — “quotes”");
        assert_eq!(d.checks, "0");
    }

    #[test]
    fn files_changed_span_without_title_is_an_error() {
        let html = page(&format!(r#"{THREE_TABS}<a href="/f">Files <span>3</span></a>"#));
        assert!(matches!(
            parse_detail(&html),
            Err(ScrapeError::MissingAttribute { attr: "title", .. })
        ));
    }

    #[test]
    fn missing_counter_on_earlier_tab_is_an_error() {
        let html = page(
            r#"<a href="/c">Conversation</a>
            <a href="/m">Commits <span title="2">2</span></a>
            <a href="/k">Checks <span title="1">1</span></a>
            <a href="/f">Files <span title="3">3</span></a>"#,
        );
        assert!(matches!(
            parse_detail(&html),
            Err(ScrapeError::MissingElement { what: "conversation tab label" })
        ));
    }

    #[test]
    fn elements_with_extra_classes_are_not_matched() {
        let decoys = r#"<span class="f1-light color-fg-muted d-none">#decoy</span>
            <nav class="tabnav-tabs d-flex overflow-auto sticky"><a href="/x">x</a></nav>"#;
        let html = page(&format!(r#"{THREE_TABS}<a href="/f">Files <span title="3">3</span></a>"#))
            .replacen("<body>", &format!("<body>{decoys}"), 1);
        let d = parse_detail(&html).unwrap();
        assert_eq!(d.case_number, "#123");
        assert_eq!(d.conversation, "5");
        assert_eq!(d.files_changed, "3");
    }

    #[test]
    fn class_lists_with_odd_whitespace_match() {
        let html = page(THREE_TABS)
            .replace(
                r#"class="f1-light color-fg-muted""#,
                "class=\"\n  f1-light\t\tcolor-fg-muted \"",
            )
            .replace(
                r#"class="tabnav-tabs d-flex overflow-auto""#,
                "class=\"tabnav-tabs  d-flex\n overflow-auto\"",
            )
            .replace("</nav>", r#"<a href="/f">Files</a></nav>"#);
        let d = parse_detail(&html).unwrap();
        assert_eq!(d.case_number, "#123");
        assert_eq!(d.checks, "1");
        assert_eq!(d.files_changed, "");
    }

    #[test]
    fn three_tabs_is_an_error() {
        assert!(matches!(
            parse_detail(&page(THREE_TABS)),
            Err(ScrapeError::TooFewTabs { found: 3 })
        ));
    }

    #[test]
    fn missing_title_is_an_error() {
        let html = page(THREE_TABS).replace("bdi", "em");
        assert!(matches!(
            parse_detail(&html),
            Err(ScrapeError::MissingElement { what: "title" })
        ));
    }

    #[test]
    fn missing_status_bar_is_an_error() {
        let html = page(THREE_TABS).replace("tabnav-tabs", "tabnav");
        assert!(matches!(
            parse_detail(&html),
            Err(ScrapeError::MissingElement { what: "status bar" })
        ));
    }
}
