use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::token::{validate_tokens, Token, TokenError, Tokenizer};

#[derive(Error, Debug)]
pub enum IndexBuildError {
    #[error("Tokenizer output for '{name}' is invalid: {source}")]
    InvalidTokens {
        name: String,
        #[source]
        source: TokenError,
    },
}

/// A phrase match before overlap resolution.
///
/// Covers tokens `start..end` of the scanned sequence and names the catalog
/// entry whose tokens it equals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate<'a> {
    pub start: usize,
    pub end: usize,
    pub name: &'a str,
}

impl MatchCandidate<'_> {
    /// Number of tokens covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, usize>,
    /// Indices into `PhraseIndex::names` of names ending here
    terminals: Vec<usize>,
}

/// Token-level trie over catalog names for multi-pattern phrase search.
///
/// Every name is tokenized with the same tokenizer used for query text, so a
/// name only matches on whole tokens. Immutable once built.
#[derive(Debug)]
pub struct PhraseIndex {
    /// Node 0 is the root
    nodes: Vec<TrieNode>,
    /// Registered names, in registration order
    names: Vec<String>,
    tokenizer: Arc<dyn Tokenizer>,
    case_sensitive: bool,
}

impl PhraseIndex {
    /// Build the index from interval names.
    ///
    /// Names that tokenize to nothing are skipped, and a name registered twice
    /// is only stored once.
    ///
    /// # Errors
    ///
    /// Returns `IndexBuildError::InvalidTokens` if the tokenizer produces tokens
    /// that break the offset contract for any name.
    pub fn build<'n, I>(
        names: I,
        tokenizer: Arc<dyn Tokenizer>,
        case_sensitive: bool,
    ) -> Result<Self, IndexBuildError>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut index = Self {
            nodes: vec![TrieNode::default()],
            names: Vec::new(),
            tokenizer,
            case_sensitive,
        };

        let mut skipped = 0usize;
        for name in names {
            let tokens = index.tokenizer.tokenize(name);
            validate_tokens(name, &tokens).map_err(|source| IndexBuildError::InvalidTokens {
                name: name.to_string(),
                source,
            })?;

            if tokens.is_empty() {
                skipped += 1;
                continue;
            }
            index.insert(name, &tokens);
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} names with no tokens", skipped);
        }
        tracing::debug!(
            "Built phrase index: {} names, {} trie nodes",
            index.names.len(),
            index.nodes.len()
        );

        Ok(index)
    }

    fn insert(&mut self, name: &str, tokens: &[Token]) {
        let mut node = 0;
        for token in tokens {
            let key = self.normalize(&token.text);
            node = match self.nodes[node].children.get(&key) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(key, child);
                    child
                }
            };
        }

        let already_registered = self.nodes[node]
            .terminals
            .iter()
            .any(|&idx| self.names[idx] == name);
        if !already_registered {
            self.nodes[node].terminals.push(self.names.len());
            self.names.push(name.to_string());
        }
    }

    fn normalize(&self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }

    /// The tokenizer names were indexed with
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Number of distinct names registered
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Find every occurrence of every registered name in `tokens`.
    ///
    /// Names contained in longer names are reported too ("Jurassic" inside
    /// "Early Jurassic"). Candidates come out by start position, then by length
    /// ascending, then by registration order. The iterator is lazy and can be
    /// cloned to restart the scan.
    pub fn find_all(&self, tokens: &[Token]) -> Candidates<'_> {
        let keys = tokens.iter().map(|t| self.normalize(&t.text)).collect();
        Candidates {
            index: self,
            keys: Arc::new(keys),
            start: 0,
            pos: 0,
            node: 0,
            terminal: 0,
        }
    }
}

/// Lazy scan over a token sequence produced by [`PhraseIndex::find_all`]
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    index: &'a PhraseIndex,
    /// Normalized token texts, shared between clones
    keys: Arc<Vec<String>>,
    /// Start position of the current walk
    start: usize,
    /// Number of tokens consumed from `start`; the walk sits at `start + pos`
    pos: usize,
    /// Current trie node
    node: usize,
    /// Next terminal to report at `node`
    terminal: usize,
}

impl<'a> Iterator for Candidates<'a> {
    type Item = MatchCandidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index: &'a PhraseIndex = self.index;
        let nodes = &index.nodes;

        while self.start < self.keys.len() {
            // Report pending terminals at the current node (never the root)
            if self.pos > 0 {
                if let Some(&name_idx) = nodes[self.node].terminals.get(self.terminal) {
                    self.terminal += 1;
                    return Some(MatchCandidate {
                        start: self.start,
                        end: self.start + self.pos,
                        name: &index.names[name_idx],
                    });
                }
            }

            // Descend one token deeper, or restart from the next position
            let next_child = self
                .keys
                .get(self.start + self.pos)
                .and_then(|key| nodes[self.node].children.get(key));

            match next_child {
                Some(&child) => {
                    self.node = child;
                    self.pos += 1;
                }
                None => {
                    self.start += 1;
                    self.pos = 0;
                    self.node = 0;
                }
            }
            self.terminal = 0;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::WordTokenizer;

    fn build(names: &[&str]) -> PhraseIndex {
        PhraseIndex::build(names.iter().copied(), Arc::new(WordTokenizer), false).unwrap()
    }

    fn spans<'a>(index: &'a PhraseIndex, tokens: &[Token]) -> Vec<(usize, usize, &'a str)> {
        index
            .find_all(tokens)
            .map(|c| (c.start, c.end, c.name))
            .collect()
    }

    #[test]
    fn test_reports_nested_names() {
        let index = build(&["Jurassic", "Early Jurassic", "Early"]);
        let tokens = WordTokenizer.tokenize("the Early Jurassic");

        assert_eq!(
            spans(&index, &tokens),
            vec![
                (1, 2, "Early"),
                (1, 3, "Early Jurassic"),
                (2, 3, "Jurassic"),
            ]
        );
    }

    #[test]
    fn test_case_insensitive() {
        let index = build(&["Jurassic"]);
        for text in ["jurassic", "JURASSIC", "Jurassic", "jUrAsSiC"] {
            let tokens = WordTokenizer.tokenize(text);
            assert_eq!(spans(&index, &tokens), vec![(0, 1, "Jurassic")], "{text}");
        }
    }

    #[test]
    fn test_case_sensitive() {
        let index =
            PhraseIndex::build(["Jurassic"], Arc::new(WordTokenizer), true).unwrap();
        let tokens = WordTokenizer.tokenize("jurassic Jurassic");
        assert_eq!(spans(&index, &tokens), vec![(1, 2, "Jurassic")]);
        assert!(index.is_case_sensitive());
    }

    #[test]
    fn test_whole_tokens_only() {
        let index = build(&["Eocene"]);
        let tokens = WordTokenizer.tokenize("Paleocene Eocenes Eocene-Oligocene");
        assert_eq!(spans(&index, &tokens), vec![(2, 3, "Eocene")]);
    }

    #[test]
    fn test_partial_phrase_no_match() {
        let index = build(&["Cambrian Stage 10"]);
        let tokens = WordTokenizer.tokenize("Cambrian Stage 1 and Cambrian Stage 10");
        assert_eq!(spans(&index, &tokens), vec![(4, 7, "Cambrian Stage 10")]);
    }

    #[test]
    fn test_duplicate_registration_is_idempotent() {
        let index = build(&["Holocene", "Holocene"]);
        assert_eq!(index.len(), 1);

        let tokens = WordTokenizer.tokenize("Holocene");
        assert_eq!(spans(&index, &tokens).len(), 1);
    }

    #[test]
    fn test_names_differing_in_case_share_a_path() {
        let index = build(&["Holocene", "HOLOCENE"]);
        assert_eq!(index.len(), 2);

        let tokens = WordTokenizer.tokenize("holocene");
        assert_eq!(
            spans(&index, &tokens),
            vec![(0, 1, "Holocene"), (0, 1, "HOLOCENE")]
        );
    }

    #[test]
    fn test_empty_names_are_skipped() {
        let index = build(&["", "   ", "Miocene"]);
        assert_eq!(index.len(), 1);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let index = build(&["Miocene"]);
        assert!(index.find_all(&[]).next().is_none());
    }

    #[test]
    fn test_restartable() {
        let index = build(&["Miocene", "Pliocene"]);
        let tokens = WordTokenizer.tokenize("Miocene to Pliocene");

        let mut scan = index.find_all(&tokens);
        let first = scan.next();
        let restarted = scan.clone();
        assert_eq!(first.map(|c| c.name), Some("Miocene"));
        assert_eq!(scan.count(), 1);
        assert_eq!(restarted.count(), 1);
    }

    #[derive(Debug)]
    struct BrokenTokenizer;

    impl Tokenizer for BrokenTokenizer {
        fn tokenize(&self, text: &str) -> Vec<Token> {
            vec![Token::new(text, 0, text.len()), Token::new(text, 0, text.len())]
        }
    }

    #[test]
    fn test_invalid_tokenizer_fails_build() {
        let err = PhraseIndex::build(["Holocene"], Arc::new(BrokenTokenizer), false).unwrap_err();
        assert!(matches!(
            err,
            IndexBuildError::InvalidTokens {
                source: TokenError::Overlapping { index: 1 },
                ..
            }
        ));
    }
}
