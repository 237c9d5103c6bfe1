//! Page-by-page extraction over a [`PdfBackend`].

use crate::error::Result;
use crate::model::PageContent;

use super::backend::PdfBackend;
use super::options::{ErrorMode, ExtractOptions};

/// Extract every page of a document, in page order.
///
/// All pages are read before returning. In [`ErrorMode::Strict`] the first
/// failing page aborts extraction; in [`ErrorMode::Lenient`] it is logged and
/// left out, so the result can be shorter than the page count.
pub fn extract_pages<B: PdfBackend + ?Sized>(
    backend: &B,
    options: &ExtractOptions,
) -> Result<Vec<PageContent>> {
    let page_count = backend.page_count();
    let mut pages = Vec::with_capacity(page_count as usize);

    for index in 0..page_count {
        match extract_page(backend, index, options) {
            Ok(page) => {
                if page.is_blank() {
                    log::debug!("Page {} is blank", page.page_number);
                }
                pages.push(page)
            }
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", index + 1, e);
            }
            Err(e) => return Err(e),
        }
    }

    log::debug!("Extracted {} of {} pages", pages.len(), page_count);
    Ok(pages)
}

/// Extract a single page by zero-based index.
pub fn extract_page<B: PdfBackend + ?Sized>(
    backend: &B,
    index: u32,
    options: &ExtractOptions,
) -> Result<PageContent> {
    let text = backend.page_text(index)?;
    let tables = if options.extract_tables {
        backend.page_tables(index)?
    } else {
        Vec::new()
    };

    Ok(PageContent::new(index + 1, text).with_tables(tables))
}
