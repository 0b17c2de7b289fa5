use url::{form_urlencoded, Url};

use crate::source::{DataLocation, LoadError};

/// The address bar the controller keeps in sync with bookmarkable settings.
pub trait LocationBar {
    /// Current search string, `?`-prefixed, or empty.
    fn search(&self) -> String;

    /// Records a new history entry with the given search string.
    fn push_search(&mut self, search: &str);
}

/// In-process history stack used by the desktop front ends and tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    base: Url,
    entries: Vec<String>,
}

impl MemoryHistory {
    pub fn new(base: Url, initial_search: &str) -> Self {
        Self {
            base,
            entries: vec![normalize_search(initial_search)],
        }
    }

    /// Full address of the current entry.
    pub fn address(&self) -> String {
        self.href(&self.search())
    }

    /// Resolves a search string against the base address, the way a link would.
    pub fn href(&self, search: &str) -> String {
        let mut url = self.base.clone();
        let query = search.trim_start_matches('?');
        url.set_query((!query.is_empty()).then_some(query));
        url.to_string()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocationBar for MemoryHistory {
    fn search(&self) -> String {
        self.entries.last().cloned().unwrap_or_default()
    }

    fn push_search(&mut self, search: &str) {
        self.entries.push(normalize_search(search));
    }
}

/// Splits a full page address into the data location it sits next to and
/// its `?`-prefixed search string.
pub fn split_address(address: &str) -> Result<(DataLocation, String), LoadError> {
    let address = address.trim();
    let address = address.split_once('#').map_or(address, |(head, _)| head);
    let (base, query) = address.split_once('?').unwrap_or((address, ""));

    let location = match Url::parse(base) {
        Ok(url) if url.scheme() == "file" => {
            let dir = url
                .to_file_path()
                .map_err(|()| LoadError::InvalidLocation {
                    location: base.to_string(),
                    reason: "not a local directory".to_string(),
                })?;
            DataLocation::Directory(dir)
        }
        _ => base.parse()?,
    };
    Ok((location, normalize_search(query)))
}

/// `?`-prefixed, form-urlencoded the same way settings are serialized, so an
/// address typed with raw characters compares equal to its encoded form.
fn normalize_search(search: &str) -> String {
    let query = search.trim().trim_start_matches('?');
    if query.is_empty() {
        return String::new();
    }
    let canonical = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form_urlencoded::parse(query.as_bytes()))
        .finish();
    format!("?{canonical}")
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
