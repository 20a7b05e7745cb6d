//! Extraction mapping: every piece of markup the scraper depends on.
//!
//! The listing page is the huggingface dataset viewer, detail pages are GitHub
//! pull requests. When either site changes its markup, this is the only file
//! that should need an update.

use scraper::{ElementRef, Selector};

use crate::error::ScrapeError;

/// A tag plus the exact class list it must carry.
pub struct ClassedTag {
    pub tag: &'static str,
    pub class: &'static str,
}

// ── Listing page ──

/// Tailwind class names such as `outline-offset-[-2px]` are not valid CSS
/// identifiers, so rows are matched on their class list instead of a selector.
pub const LISTING_ROW: ClassedTag = ClassedTag {
    tag: "tr",
    class: "cursor-pointer space-x-4 divide-x border-b outline-offset-[-2px] odd:bg-gray-50 hover:bg-gray-100 dark:odd:bg-gray-925 dark:hover:bg-gray-850",
};

pub const LISTING_CELL: &str = "td";
pub const CELL_REPO: usize = 0;
pub const CELL_INSTANCE_ID: usize = 1;
pub const CELL_DETAIL_URL: usize = 2;

// ── Detail page ──

pub const TITLE: &str = "bdi";
pub const CASE_NUMBER: ClassedTag = ClassedTag {
    tag: "span",
    class: "f1-light color-fg-muted",
};
pub const STATUS_BAR: ClassedTag = ClassedTag {
    tag: "nav",
    class: "tabnav-tabs d-flex overflow-auto",
};
pub const STATUS_TAB: &str = "a";
pub const TAB_LABEL: &str = "span";
pub const TAB_LABEL_ATTR: &str = "title";

/// Status bar tab positions, in the order GitHub renders them.
pub const TAB_CONVERSATION: usize = 0;
pub const TAB_COMMITS: usize = 1;
pub const TAB_CHECKS: usize = 2;
pub const TAB_FILES_CHANGED: usize = 3;
pub const STATUS_TAB_COUNT: usize = 4;

pub fn compile(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        css,
        message: e.to_string(),
    })
}

/// True when the element's class list, whitespace-normalized, is exactly
/// `class`. Extra classes or a different order do not match.
pub fn has_class_list(el: ElementRef, class: &str) -> bool {
    let actual = el.value().attr("class").unwrap_or("");
    actual.split_whitespace().eq(class.split_whitespace())
}

/// Elements of `spec.tag` whose class list is exactly `spec.class`, in
/// document order.
pub fn select_classed<'a>(
    root: ElementRef<'a>,
    spec: &ClassedTag,
) -> Result<Vec<ElementRef<'a>>, ScrapeError> {
    let sel = compile(spec.tag)?;
    Ok(root
        .select(&sel)
        .filter(|el| has_class_list(*el, spec.class))
        .collect())
}
