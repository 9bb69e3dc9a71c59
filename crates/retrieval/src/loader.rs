//! Document loading and text extraction.
//!
//! Walks the configured content roots, extracts raw text from plain
//! text/markdown, PDF, and HTML sources, and optionally fetches the live
//! website page. A failure on any single document is logged and skipped;
//! it never aborts the batch.

use crate::types::Document;
use beatline_core::{AppError, AppResult};
use std::path::Path;
use std::time::Duration;
use walkdir::WalkDir;

/// Minimum extracted length, in characters, for HTML-derived content.
/// Anything shorter is navigation or boilerplate noise.
const MIN_EXTRACTED_LEN: usize = 50;

/// Timeout for the live-site fetch.
const FETCH_TIMEOUT_SECS: u64 = 15;

/// Read a plain text or markdown file. Invalid UTF-8 is replaced, not fatal.
pub fn read_text(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::SourceRead(format!("Failed to read {:?}: {}", path, e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Extract text from a PDF file.
///
/// Extraction failures yield an empty string so the caller can skip the
/// document without treating it as an error.
pub fn read_pdf(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Error reading PDF {:?}: {}", path, e);
            String::new()
        }
    }
}

/// Extract readable content from an HTML document.
///
/// Pulls text from content-bearing elements (paragraphs, headings, list
/// items, block quotes), skipping scripts, styles, and navigation chrome.
/// Returns `None` when the extracted text is below the noise threshold.
pub fn extract_html(html: &str) -> Option<String> {
    let document = scraper::Html::parse_document(html);

    // Selector over static, known-good input
    let selector = scraper::Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote").ok()?;

    let mut parts: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        let text = element
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            parts.push(text);
        }
    }

    let extracted = parts.join("\n");
    if extracted.trim().len() > MIN_EXTRACTED_LEN {
        Some(extracted)
    } else {
        None
    }
}

/// Fetch a single web page and extract its readable content.
///
/// Network or extraction failure yields `None`, logged, never fatal.
pub async fn fetch_page(url: &str) -> Option<String> {
    tracing::info!("Fetching site page: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .ok()?;

    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::warn!("Fetch of {} returned status {}", url, response.status());
        return None;
    }

    let html = match response.text().await {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!("Failed to read body of {}: {}", url, e);
            return None;
        }
    };

    extract_html(&html)
}

/// Extract text for a single file, dispatching on its extension.
///
/// Unknown extensions yield `None`; extraction failures are logged and
/// reported as `None` so the caller continues with the next file.
fn extract_file(path: &Path) -> Option<Document> {
    let source_id = path.to_string_lossy().into_owned();

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let text = match ext.as_deref() {
        Some("txt") | Some("md") | Some("markdown") => match read_text(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Error reading text file {:?}: {}", path, e);
                return None;
            }
        },
        Some("pdf") => read_pdf(path),
        Some("html") | Some("htm") => {
            let raw = match read_text(path) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Error reading HTML file {:?}: {}", path, e);
                    return None;
                }
            };
            extract_html(&raw).unwrap_or_default()
        }
        _ => return None,
    };

    if text.trim().is_empty() {
        return None;
    }

    Some(Document::new(source_id, text))
}

/// Load all documents from the configured roots, then the live site page.
pub async fn load_documents(roots: &[std::path::PathBuf], site_url: Option<&str>) -> Vec<Document> {
    let mut documents = Vec::new();

    for root in roots {
        if !root.exists() {
            tracing::info!("Content root {:?} not found, skipping", root);
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.path().is_file() {
                continue;
            }
            if let Some(doc) = extract_file(entry.path()) {
                tracing::debug!("Loaded {} ({} chars)", doc.source_id, doc.raw_text.len());
                documents.push(doc);
            }
        }
    }

    if let Some(url) = site_url {
        if let Some(text) = fetch_page(url).await {
            documents.push(Document::new(url, text));
        }
    }

    tracing::info!("Loaded {} documents", documents.len());
    documents
}
