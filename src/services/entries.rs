//! Entry listing and lookup.
//!
//! Reads fail soft: listing errors yield an empty list and lookup errors
//! yield `None`, so pages degrade instead of erroring.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::models::entry::NOT_AVAILABLE;
use crate::models::{EntryFilter, EntryListResponse, TestRunEntry};
use crate::services::contentstack::ContentRepository;

/// Records requested per page.
pub const PAGE_SIZE: usize = 100;

/// Upper bound on page requests for one listing.
pub const MAX_PAGES: usize = 100;

/// Fetch every raw record of `content_type`, in the order the CMS returns them.
///
/// Pages are requested until one comes back empty or short. The loop stops
/// after [`MAX_PAGES`] requests even if the source keeps returning full pages.
/// Any error discards the partial result and returns an empty list.
pub async fn list_all(repo: &dyn ContentRepository, content_type: &str) -> Vec<Value> {
    let mut records = Vec::new();
    let mut skip = 0;

    for page in 0..MAX_PAGES {
        let batch = match repo.fetch_page(content_type, skip, PAGE_SIZE).await {
            Ok(batch) => batch,
            Err(e) => {
                error!(
                    operation = "list_entries",
                    content_type,
                    skip,
                    "Error fetching entries: {}",
                    e
                );
                return Vec::new();
            }
        };

        let fetched = batch.len();
        records.extend(batch);
        debug!(content_type, page, fetched, "Fetched entries page");

        if fetched < PAGE_SIZE {
            return records;
        }
        skip += PAGE_SIZE;
    }

    warn!(
        operation = "list_entries",
        content_type,
        pages = MAX_PAGES,
        records = records.len(),
        "Pagination cap reached, returning accumulated entries"
    );
    records
}

/// Fetch and normalize every test-run entry. Records without a UID are dropped.
pub async fn list_entries(repo: &dyn ContentRepository, content_type: &str) -> Vec<TestRunEntry> {
    list_all(repo, content_type)
        .await
        .iter()
        .filter_map(|raw| {
            let entry = TestRunEntry::from_value(raw);
            if entry.is_none() {
                warn!(content_type, "Skipping record without uid");
            }
            entry
        })
        .collect()
}

/// Fetch one entry. Any failure, including not-found, yields `None`.
pub async fn get_entry(
    repo: &dyn ContentRepository,
    content_type: &str,
    uid: &str,
) -> Option<TestRunEntry> {
    match repo.fetch_entry(content_type, uid).await {
        Ok(Some(raw)) => TestRunEntry::from_value(&raw),
        Ok(None) => {
            debug!(content_type, uid, "Entry not found");
            None
        }
        Err(e) => {
            error!(
                operation = "get_entry",
                content_type,
                uid,
                "Error fetching entry: {}",
                e
            );
            None
        }
    }
}

/// Distinct, sorted values of `field` across `entries`. Missing values and a
/// literal `N/A` are skipped.
pub fn facet<'a>(
    entries: &'a [TestRunEntry],
    field: impl Fn(&'a TestRunEntry) -> Option<&'a str>,
) -> Vec<String> {
    entries
        .iter()
        .filter_map(field)
        .filter(|value| *value != NOT_AVAILABLE)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Apply `filter` and collect the facet lists for the full entry set.
pub fn summarize(entries: Vec<TestRunEntry>, filter: &EntryFilter) -> EntryListResponse {
    let environments = facet(&entries, |e| e.environment.as_deref());
    let modules = facet(&entries, |e| e.module.as_deref());
    let total = entries.len();
    let entries: Vec<TestRunEntry> = entries.into_iter().filter(|e| filter.matches(e)).collect();

    EntryListResponse {
        filtered: entries.len(),
        entries,
        total,
        environments,
        modules,
    }
}
