use scraper::{ElementRef, Html};
use tracing::info;

use crate::error::ScrapeError;
use crate::selectors::{self, compile, select_classed};
use crate::source::PageSource;

/// One row of the dataset viewer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub repo: String,
    pub instance_id: String,
    pub detail_url: String,
}

/// Fetch every listing page in order and concatenate their rows.
pub async fn fetch_listing<S: PageSource>(
    source: &S,
    urls: &[String],
) -> Result<Vec<ListingEntry>, ScrapeError> {
    let mut entries = Vec::new();
    for url in urls {
        info!("Fetching listing page: {}", url);
        let html = source.fetch(url).await?;
        let rows = parse_listing(&html)?;
        info!("{} rows on {}", rows.len(), url);
        entries.extend(rows);
    }
    Ok(entries)
}

/// Extract entries from the rows whose class list matches the data-row signature.
/// Other rows (headers, placeholders) are skipped.
pub fn parse_listing(html: &str) -> Result<Vec<ListingEntry>, ScrapeError> {
    let doc = Html::parse_document(html);
    let cell_sel = compile(selectors::LISTING_CELL)?;

    select_classed(doc.root_element(), &selectors::LISTING_ROW)?
        .into_iter()
        .map(|row| -> Result<ListingEntry, ScrapeError> {
            let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
            let cell = |idx: usize| {
                cells
                    .get(idx)
                    .map(|c| text_of(*c))
                    .ok_or(ScrapeError::TooFewCells { found: cells.len() })
            };
            Ok(ListingEntry {
                repo: cell(selectors::CELL_REPO)?,
                instance_id: cell(selectors::CELL_INSTANCE_ID)?,
                detail_url: cell(selectors::CELL_DETAIL_URL)?,
            })
        })
        .collect()
}

pub(crate) fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
