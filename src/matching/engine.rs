use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::index::{IndexBuildError, PhraseIndex};
use crate::catalog::store::IntervalCatalog;
use crate::core::interval::IntervalRecord;
use crate::core::token::{title_case, Token, Tokenizer, WordTokenizer};
use crate::core::types::Rank;
use crate::matching::resolver::{resolve, ResolvedMatch};

/// Names of the stages every annotation runs through
pub const PIPELINE: &[&str] = &["geochronology"];

/// Configuration for the annotation engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Tokenizer applied to both catalog names and query text
    pub tokenizer: Arc<dyn Tokenizer>,
    /// Match token text exactly instead of ignoring case
    pub case_sensitive: bool,
    /// Title-case query text before tokenizing
    pub title_case_input: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tokenizer: Arc::new(WordTokenizer),
            case_sensitive: false,
            title_case_input: false,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn title_case_input(mut self, title_case_input: bool) -> Self {
        self.title_case_input = title_case_input;
        self
    }
}

/// Half-open `[start, end)` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A matched interval with its catalog metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedEntity {
    /// Matched text as it appears in the annotated input
    pub interval: String,
    /// Catalog name the text matched
    pub name: String,
    pub start_date: Option<f64>,
    pub start_uncertainty: Option<f64>,
    pub end_date: Option<f64>,
    pub end_uncertainty: Option<f64>,
    pub rank: Option<Rank>,
    pub part_of: Option<String>,
    pub source: String,
    /// Byte offsets into the annotated text
    pub span: Span,
    /// Token indices covered by the match
    pub tokens: Span,
}

impl EnrichedEntity {
    fn new(interval: &str, record: &IntervalRecord, span: Span, tokens: Span) -> Self {
        Self {
            interval: interval.to_string(),
            name: record.name.clone(),
            start_date: record.start,
            start_uncertainty: record.start_uncertainty,
            end_date: record.end,
            end_uncertainty: record.end_uncertainty,
            rank: record.rank.clone(),
            part_of: record.part_of.clone(),
            source: record.source.clone(),
            span,
            tokens,
        }
    }
}

/// Counts from one pass through the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub pipeline: Vec<&'static str>,
    /// Tokens produced from the input
    pub tokens: usize,
    /// Phrase matches before overlap resolution
    pub candidates: usize,
    /// Matches kept after overlap resolution
    pub resolved: usize,
    /// Resolved matches dropped because their name is not in the catalog
    pub skipped: usize,
}

/// Output of [`AnnotationEngine::annotate`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationResult {
    /// The annotated text (title-cased when configured)
    pub text: String,
    pub entities: Vec<EnrichedEntity>,
    pub diagnostics: Diagnostics,
}

impl AnnotationResult {
    /// True if at least one interval was found
    pub fn has_intervals(&self) -> bool {
        !self.entities.is_empty()
    }
}

/// Tags interval names in text.
///
/// Holds the catalog and its phrase index; both are read-only, so one engine
/// can serve any number of threads behind an `Arc`.
#[derive(Debug)]
pub struct AnnotationEngine {
    catalog: IntervalCatalog,
    index: PhraseIndex,
    title_case_input: bool,
}

impl AnnotationEngine {
    /// Create an engine with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the phrase index cannot be built.
    pub fn new(catalog: IntervalCatalog) -> Result<Self, IndexBuildError> {
        Self::with_config(catalog, EngineConfig::default())
    }

    /// Create an engine with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the tokenizer breaks the offset contract on any
    /// catalog name.
    pub fn with_config(
        catalog: IntervalCatalog,
        config: EngineConfig,
    ) -> Result<Self, IndexBuildError> {
        let index = PhraseIndex::build(catalog.names(), config.tokenizer, config.case_sensitive)?;
        tracing::info!(
            "Annotation engine ready: {} intervals, {} indexed names",
            catalog.len(),
            index.len()
        );

        Ok(Self {
            catalog,
            index,
            title_case_input: config.title_case_input,
        })
    }

    /// Create an engine from a catalog and a separately built index.
    ///
    /// Query text is tokenized with the index's tokenizer. Indexed names that
    /// are missing from the catalog are skipped at annotation time.
    pub fn from_parts(catalog: IntervalCatalog, index: PhraseIndex) -> Self {
        Self {
            catalog,
            index,
            title_case_input: false,
        }
    }

    pub fn catalog(&self) -> &IntervalCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &PhraseIndex {
        &self.index
    }

    /// Find and describe every interval mentioned in `text`.
    ///
    /// Every string is valid input; text without interval names yields an
    /// empty entity list.
    pub fn annotate(&self, text: &str) -> AnnotationResult {
        let text: Cow<'_, str> = if self.title_case_input {
            Cow::Owned(title_case(text))
        } else {
            Cow::Borrowed(text)
        };

        let tokens = self.index.tokenizer().tokenize(&text);
        let candidates: Vec<_> = self.index.find_all(&tokens).collect();
        let candidate_count = candidates.len();
        let resolved = resolve(candidates);

        let mut skipped = 0;
        let entities: Vec<EnrichedEntity> = resolved
            .iter()
            .filter_map(|m| {
                let entity = self.enrich(&text, &tokens, m);
                if entity.is_none() {
                    skipped += 1;
                    tracing::debug!("No catalog entry for indexed name '{}'", m.name);
                }
                entity
            })
            .collect();

        tracing::debug!(
            "Annotated {} tokens: {} candidates, {} resolved, {} skipped",
            tokens.len(),
            candidate_count,
            resolved.len(),
            skipped
        );

        AnnotationResult {
            diagnostics: Diagnostics {
                pipeline: PIPELINE.to_vec(),
                tokens: tokens.len(),
                candidates: candidate_count,
                resolved: resolved.len(),
                skipped,
            },
            text: text.into_owned(),
            entities,
        }
    }

    fn enrich(
        &self,
        text: &str,
        tokens: &[Token],
        resolved: &ResolvedMatch<'_>,
    ) -> Option<EnrichedEntity> {
        let record = self.catalog.lookup(resolved.name)?;
        let first = tokens.get(resolved.start)?;
        let last = tokens.get(resolved.end.checked_sub(1)?)?;
        let interval = text.get(first.start..last.end)?;

        Some(EnrichedEntity::new(
            interval,
            record,
            Span {
                start: first.start,
                end: last.end,
            },
            Span {
                start: resolved.start,
                end: resolved.end,
            },
        ))
    }
}
