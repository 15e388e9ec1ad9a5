//! Deck pagination
//!
//! Splits a word list into grid-sized pages, skipping words the session has
//! already seen and recording each page's words before handing it out.

use crate::layout::{layout_page, GridShape, Page, WordPair};
use crate::session::SessionStore;

use super::errors::Result;

struct SessionBinding<'a> {
    store: &'a dyn SessionStore,
    name: String,
}

/// Pagination settings for one run
pub struct DeckPaginator<'a> {
    shape: GridShape,
    drop_incomplete: bool,
    session: Option<SessionBinding<'a>>,
}

impl<'a> DeckPaginator<'a> {
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            drop_incomplete: false,
            session: None,
        }
    }

    /// Only emit pages that are completely filled with real entries
    pub fn drop_incomplete(mut self, drop_incomplete: bool) -> Self {
        self.drop_incomplete = drop_incomplete;
        self
    }

    /// Exclude words already seen in `name` and record emitted ones there
    pub fn with_session(mut self, store: &'a dyn SessionStore, name: impl Into<String>) -> Self {
        self.session = Some(SessionBinding {
            store,
            name: name.into(),
        });
        self
    }

    /// Pages produced for `len` eligible pairs
    pub fn page_count(&self, len: usize) -> usize {
        let capacity = self.shape.capacity();
        if self.drop_incomplete {
            len / capacity
        } else {
            len.div_ceil(capacity)
        }
    }

    /// Drop pairs whose front is already in the session, keeping order
    pub fn filter(&self, pairs: Vec<WordPair>) -> Result<Vec<WordPair>> {
        let Some(session) = &self.session else {
            return Ok(pairs);
        };

        let seen = session.store.seen_words(&session.name)?;
        if seen.is_empty() {
            return Ok(pairs);
        }

        let before = pairs.len();
        let remaining: Vec<WordPair> = pairs
            .into_iter()
            .filter(|pair| !seen.contains(&pair.front))
            .collect();
        log::debug!(
            "Session '{}' excluded {} of {} words",
            session.name,
            before - remaining.len(),
            before
        );
        Ok(remaining)
    }

    /// Lazily paginate `pairs`.
    ///
    /// The session lookup happens here; each page's words are recorded as
    /// the page is pulled from the iterator.
    pub fn paginate(&self, pairs: Vec<WordPair>) -> Result<Paginate<'_>> {
        let pairs = self.filter(pairs)?;
        let total = self.page_count(pairs.len());

        if self.drop_incomplete {
            let dropped = pairs.len() - total * self.shape.capacity();
            if dropped > 0 {
                log::info!("Dropping {} words that do not fill a complete page", dropped);
            }
        }

        Ok(Paginate {
            pairs,
            shape: self.shape,
            session: self.session.as_ref().map(|s| (s.store, s.name.as_str())),
            next: 0,
            total,
            failed: false,
        })
    }
}

/// Iterator over the pages of one deck
pub struct Paginate<'p> {
    pairs: Vec<WordPair>,
    shape: GridShape,
    session: Option<(&'p dyn SessionStore, &'p str)>,
    next: usize,
    total: usize,
    failed: bool,
}

impl Paginate<'_> {
    /// Total pages this deck will produce
    pub fn page_count(&self) -> usize {
        self.total
    }

    /// Number of pairs left after session filtering
    pub fn eligible_words(&self) -> usize {
        self.pairs.len()
    }
}

impl Iterator for Paginate<'_> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next >= self.total {
            return None;
        }

        let capacity = self.shape.capacity();
        let start = self.next * capacity;
        let end = (start + capacity).min(self.pairs.len());
        let page = layout_page(&self.pairs[start..end], self.shape, Some(""));
        self.next += 1;

        if let Some((store, name)) = self.session {
            let words: Vec<&str> = page.words().collect();
            match store.record_words(name, &words) {
                Ok(added) => {
                    log::debug!("Page {}: recorded {} new words in '{}'", self.next, added, name)
                }
                Err(e) => {
                    // Never hand out a page whose words were not persisted
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }

        Some(Ok(page))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.failed { 0 } else { self.total - self.next };
        (0, Some(remaining))
    }
}
