//! Deck building across sheets
//!
//! Chooses which sheets take part, groups them (one deck per sheet, or all
//! sheets merged into one deck), paginates each deck and feeds the pages to
//! a renderer.

use std::path::PathBuf;

use crate::layout::{GridShape, WordPair};
use crate::render::Renderer;
use crate::session::SessionStore;
use crate::source::{SourceError, WordSource};

use super::errors::{DeckError, Result};
use super::paginator::DeckPaginator;

/// How sheets are grouped into decks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    /// One deck per sheet; page numbering restarts for each
    #[default]
    PerSheet,
    /// All selected sheets concatenated into a single deck
    Merged,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub shape: GridShape,
    pub drop_incomplete: bool,
    pub mode: GroupingMode,
    /// 0-based sheet indices; `None` means every sheet
    pub sheets: Option<Vec<usize>>,
    /// Session to filter against and record into
    pub session: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckReport {
    /// Sheet name, `None` for the merged deck
    pub name: Option<String>,
    pub pages: usize,
    pub words: usize,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub decks: Vec<DeckReport>,
    /// Sheets skipped in per-sheet mode because they could not be read
    pub failed_sheets: Vec<(String, SourceError)>,
}

impl BuildReport {
    pub fn total_pages(&self) -> usize {
        self.decks.iter().map(|d| d.pages).sum()
    }

    pub fn total_words(&self) -> usize {
        self.decks.iter().map(|d| d.words).sum()
    }
}

pub struct DeckBuilder<'a> {
    options: BuildOptions,
    store: Option<&'a dyn SessionStore>,
}

impl<'a> DeckBuilder<'a> {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            store: None,
        }
    }

    pub fn with_store(mut self, store: &'a dyn SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    fn paginator(&self) -> Result<DeckPaginator<'a>> {
        let paginator =
            DeckPaginator::new(self.options.shape).drop_incomplete(self.options.drop_incomplete);

        match (&self.options.session, self.store) {
            (None, _) => Ok(paginator),
            (Some(name), Some(store)) => Ok(paginator.with_session(store, name.as_str())),
            (Some(name), None) => Err(DeckError::InvalidConfiguration(format!(
                "session '{}' requested without a session store",
                name
            ))),
        }
    }

    /// Sheets taking part in the build, as (index, name), in selection order
    pub fn selected_sheets(&self, source: &dyn WordSource) -> Result<Vec<(usize, String)>> {
        let names = source.sheet_names();

        let Some(selection) = &self.options.sheets else {
            return Ok(names.into_iter().enumerate().collect());
        };

        let mut selected: Vec<(usize, String)> = Vec::with_capacity(selection.len());
        for &index in selection {
            let name = names.get(index).ok_or_else(|| {
                DeckError::InvalidConfiguration(format!(
                    "sheet index {} out of range ({} sheets)",
                    index,
                    names.len()
                ))
            })?;
            if !selected.iter().any(|(i, _)| *i == index) {
                selected.push((index, name.clone()));
            }
        }
        Ok(selected)
    }

    /// Build every deck from `source` into `renderer`.
    ///
    /// In per-sheet mode an unreadable sheet is reported and skipped. In
    /// merged mode it fails the build before anything is rendered.
    pub fn build(&self, source: &mut dyn WordSource, renderer: &mut dyn Renderer) -> Result<BuildReport> {
        let paginator = self.paginator()?;
        let sheets = self.selected_sheets(source)?;
        let mut report = BuildReport::default();

        match self.options.mode {
            GroupingMode::Merged => {
                let mut merged = Vec::new();
                for (index, name) in &sheets {
                    let pairs = source.read_sheet(*index)?;
                    log::debug!("Sheet '{}': {} words", name, pairs.len());
                    merged.extend(pairs);
                }
                let deck = render_deck(&paginator, None, merged, renderer)?;
                report.decks.push(deck);
            }
            GroupingMode::PerSheet => {
                for (index, name) in sheets {
                    match source.read_sheet(index) {
                        Ok(pairs) => {
                            let deck = render_deck(&paginator, Some(&name), pairs, renderer)?;
                            report.decks.push(deck);
                        }
                        Err(e) => {
                            log::warn!("Skipping sheet '{}': {}", name, e);
                            report.failed_sheets.push((name, e));
                        }
                    }
                }
            }
        }

        Ok(report)
    }
}

fn render_deck(
    paginator: &DeckPaginator,
    name: Option<&str>,
    pairs: Vec<WordPair>,
    renderer: &mut dyn Renderer,
) -> Result<DeckReport> {
    let pages = paginator.paginate(pairs)?;
    log::info!(
        "Deck {}: {} eligible words, {} pages",
        name.unwrap_or("(merged)"),
        pages.eligible_words(),
        pages.page_count()
    );

    renderer.begin_deck(name)?;
    let mut page_count = 0;
    let mut words = 0;

    for page in pages {
        let rendered = page.and_then(|page| {
            renderer.render_page(&page)?;
            Ok(page.entries)
        });

        match rendered {
            Ok(entries) => {
                page_count += 1;
                words += entries;
            }
            Err(e) => {
                // Keep what was already drawn; those words are recorded
                if let Err(finish_err) = renderer.finish_deck() {
                    log::warn!("Failed to save partial deck: {}", finish_err);
                }
                return Err(e);
            }
        }
    }

    let output = renderer.finish_deck()?;
    Ok(DeckReport {
        name: name.map(str::to_string),
        pages: page_count,
        words,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Page;
    use crate::render::RenderError;
    use crate::session::{SessionStoreError, SessionSummary, SqliteSessionStore};
    use std::collections::HashSet;

    /// Sheets held in memory; `None` content simulates an unreadable sheet
    struct MemorySource {
        sheets: Vec<(String, Option<Vec<WordPair>>)>,
        reads: Vec<usize>,
    }

    impl MemorySource {
        fn new(sheets: Vec<(&str, Option<Vec<WordPair>>)>) -> Self {
            Self {
                sheets: sheets.into_iter().map(|(n, p)| (n.to_string(), p)).collect(),
                reads: Vec::new(),
            }
        }
    }

    impl WordSource for MemorySource {
        fn sheet_names(&self) -> Vec<String> {
            self.sheets.iter().map(|(n, _)| n.clone()).collect()
        }

        fn read_sheet(&mut self, index: usize) -> crate::source::Result<Vec<WordPair>> {
            self.reads.push(index);
            let (name, pairs) = &self.sheets[index];
            pairs.clone().ok_or_else(|| SourceError::Sheet {
                sheet: name.clone(),
                message: "corrupt".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        decks: Vec<(Option<String>, Vec<Page>)>,
        open: Option<(Option<String>, Vec<Page>)>,
        /// 1-based page number, counted across decks, that fails to draw
        fail_on_page: Option<usize>,
        drawn: usize,
    }

    impl Renderer for RecordingRenderer {
        fn begin_deck(&mut self, name: Option<&str>) -> crate::render::Result<()> {
            self.open = Some((name.map(str::to_string), Vec::new()));
            Ok(())
        }

        fn render_page(&mut self, page: &Page) -> crate::render::Result<()> {
            let deck = self.open.as_mut().ok_or(RenderError::NoDeck)?;
            if self.fail_on_page == Some(self.drawn + 1) {
                return Err(RenderError::Pdf("disk full".to_string()));
            }
            deck.1.push(page.clone());
            self.drawn += 1;
            Ok(())
        }

        fn finish_deck(&mut self) -> crate::render::Result<Option<PathBuf>> {
            let deck = self.open.take().ok_or(RenderError::NoDeck)?;
            self.decks.push(deck);
            Ok(None)
        }
    }

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn seen_words(&self, _session: &str) -> crate::session::storage::Result<HashSet<String>> {
            Ok(HashSet::new())
        }

        fn is_word_in_session(&self, _session: &str, _word: &str) -> crate::session::storage::Result<bool> {
            Ok(false)
        }

        fn record_word(&self, _session: &str, _word: &str) -> crate::session::storage::Result<bool> {
            Err(SessionStoreError::Sqlite(rusqlite::Error::InvalidQuery))
        }

        fn list_sessions(&self) -> crate::session::storage::Result<Vec<SessionSummary>> {
            Ok(Vec::new())
        }
    }

    fn words(prefix: &str, n: usize) -> Vec<WordPair> {
        (0..n)
            .map(|i| WordPair::new(format!("{}{}", prefix, i), format!("{}-t{}", prefix, i)))
            .collect()
    }

    fn options(mode: GroupingMode) -> BuildOptions {
        BuildOptions {
            shape: GridShape::new(2, 2).unwrap(),
            mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_per_sheet_decks() {
        let mut source = MemorySource::new(vec![
            ("Maskulin", Some(words("m", 5))),
            ("Femenin", Some(words("f", 3))),
        ]);
        let mut renderer = RecordingRenderer::default();

        let report = DeckBuilder::new(options(GroupingMode::PerSheet))
            .build(&mut source, &mut renderer)
            .unwrap();

        assert_eq!(report.decks.len(), 2);
        assert_eq!(report.decks[0].name.as_deref(), Some("Maskulin"));
        assert_eq!(report.decks[0].pages, 2);
        assert_eq!(report.decks[1].pages, 1);
        assert_eq!(report.total_words(), 8);

        // Sheets never share a page
        assert_eq!(renderer.decks[1].1[0].front_cells, vec!["f0", "f1", "f2", ""]);
    }

    #[test]
    fn test_merged_deck() {
        let mut source = MemorySource::new(vec![
            ("A", Some(words("a", 3))),
            ("B", Some(words("b", 3))),
        ]);
        let mut renderer = RecordingRenderer::default();

        let report = DeckBuilder::new(options(GroupingMode::Merged))
            .build(&mut source, &mut renderer)
            .unwrap();

        assert_eq!(report.decks.len(), 1);
        assert_eq!(report.decks[0].name, None);
        assert_eq!(report.total_pages(), 2);
        assert_eq!(renderer.decks[0].1[0].front_cells, vec!["a0", "a1", "a2", "b0"]);
    }

    #[test]
    fn test_sheet_selection() {
        let mut source = MemorySource::new(vec![
            ("A", Some(words("a", 1))),
            ("B", Some(words("b", 1))),
            ("C", Some(words("c", 1))),
        ]);
        let mut renderer = RecordingRenderer::default();

        let report = DeckBuilder::new(BuildOptions {
            sheets: Some(vec![2, 0, 2]),
            ..options(GroupingMode::PerSheet)
        })
        .build(&mut source, &mut renderer)
        .unwrap();

        let names: Vec<_> = report.decks.iter().map(|d| d.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert_eq!(source.reads, vec![2, 0]);
    }

    #[test]
    fn test_selection_out_of_range() {
        let mut source = MemorySource::new(vec![("A", Some(words("a", 1)))]);
        let mut renderer = RecordingRenderer::default();

        let result = DeckBuilder::new(BuildOptions {
            sheets: Some(vec![1]),
            ..options(GroupingMode::Merged)
        })
        .build(&mut source, &mut renderer);

        assert!(matches!(result, Err(DeckError::InvalidConfiguration(_))));
        assert!(renderer.decks.is_empty());
    }

    #[test]
    fn test_per_sheet_failure_spares_siblings() {
        let mut source = MemorySource::new(vec![
            ("A", Some(words("a", 2))),
            ("Broken", None),
            ("C", Some(words("c", 2))),
        ]);
        let mut renderer = RecordingRenderer::default();

        let report = DeckBuilder::new(options(GroupingMode::PerSheet))
            .build(&mut source, &mut renderer)
            .unwrap();

        assert_eq!(report.decks.len(), 2);
        assert_eq!(report.failed_sheets.len(), 1);
        assert_eq!(report.failed_sheets[0].0, "Broken");
    }

    #[test]
    fn test_merged_failure_aborts_before_rendering() {
        let mut source = MemorySource::new(vec![
            ("A", Some(words("a", 2))),
            ("Broken", None),
        ]);
        let mut renderer = RecordingRenderer::default();

        let result = DeckBuilder::new(options(GroupingMode::Merged)).build(&mut source, &mut renderer);

        assert!(matches!(result, Err(DeckError::Source(_))));
        assert!(renderer.decks.is_empty());
        assert!(renderer.open.is_none());
    }

    #[test]
    fn test_session_spans_sheets() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let mut source = MemorySource::new(vec![
            ("A", Some(words("x", 4))),
            ("B", Some(words("x", 6))),
        ]);
        let mut renderer = RecordingRenderer::default();

        let report = DeckBuilder::new(BuildOptions {
            session: Some("kurs".to_string()),
            ..options(GroupingMode::PerSheet)
        })
        .with_store(&store)
        .build(&mut source, &mut renderer)
        .unwrap();

        // Sheet B repeats x0..x3, only x4 and x5 are new
        assert_eq!(report.decks[1].words, 2);
        assert_eq!(store.seen_words("kurs").unwrap().len(), 6);
    }

    #[test]
    fn test_session_without_store() {
        let mut source = MemorySource::new(vec![("A", Some(words("a", 1)))]);
        let mut renderer = RecordingRenderer::default();

        let result = DeckBuilder::new(BuildOptions {
            session: Some("kurs".to_string()),
            ..Default::default()
        })
        .build(&mut source, &mut renderer);

        assert!(matches!(result, Err(DeckError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_complete_pages_and_mode_are_independent() {
        for mode in [GroupingMode::PerSheet, GroupingMode::Merged] {
            let mut source = MemorySource::new(vec![
                ("A", Some(words("a", 3))),
                ("B", Some(words("b", 3))),
            ]);
            let mut renderer = RecordingRenderer::default();

            let report = DeckBuilder::new(BuildOptions {
                drop_incomplete: true,
                ..options(mode)
            })
            .build(&mut source, &mut renderer)
            .unwrap();

            let expected = match mode {
                GroupingMode::PerSheet => 0,
                GroupingMode::Merged => 1,
            };
            assert_eq!(report.total_pages(), expected);
            assert!(renderer.decks.iter().flat_map(|d| &d.1).all(|p| p.is_complete()));
        }
    }

    #[test]
    fn test_render_failure_saves_partial_deck() {
        let mut source = MemorySource::new(vec![
            ("A", Some(words("a", 9))),
            ("B", Some(words("b", 4))),
        ]);
        let mut renderer = RecordingRenderer {
            fail_on_page: Some(2),
            ..Default::default()
        };

        let result = DeckBuilder::new(options(GroupingMode::PerSheet)).build(&mut source, &mut renderer);

        assert!(matches!(result, Err(DeckError::Render(RenderError::Pdf(_)))));
        assert_eq!(renderer.drawn, 1);
        // The deck was closed once, holding the page drawn before the failure
        assert_eq!(renderer.decks.len(), 1);
        assert_eq!(renderer.decks[0].1.len(), 1);
        assert!(renderer.open.is_none());
        assert_eq!(source.reads, vec![0]);
    }

    #[test]
    fn test_session_failure_stops_build() {
        let store = FailingStore;
        let mut source = MemorySource::new(vec![
            ("A", Some(words("a", 3))),
            ("B", Some(words("b", 3))),
        ]);
        let mut renderer = RecordingRenderer::default();

        let result = DeckBuilder::new(BuildOptions {
            session: Some("kurs".to_string()),
            ..options(GroupingMode::PerSheet)
        })
        .with_store(&store)
        .build(&mut source, &mut renderer);

        assert!(matches!(result, Err(DeckError::Session(_))));
        assert_eq!(renderer.drawn, 0);
        assert_eq!(renderer.decks.len(), 1);
        assert!(renderer.decks[0].1.is_empty());
        // Sheet B is never read
        assert_eq!(source.reads, vec![0]);
    }
}
