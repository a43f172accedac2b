use serde::Serialize;

use crate::catalog::index::MatchCandidate;

/// A candidate kept after overlap resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedMatch<'a> {
    /// First token index
    pub start: usize,
    /// One past the last token index
    pub end: usize,
    /// Catalog name the tokens matched
    pub name: &'a str,
}

impl<'a> From<MatchCandidate<'a>> for ResolvedMatch<'a> {
    fn from(candidate: MatchCandidate<'a>) -> Self {
        Self {
            start: candidate.start,
            end: candidate.end,
            name: candidate.name,
        }
    }
}

/// Select a non-overlapping set of candidates.
///
/// Candidates are ordered by start ascending, then length descending, then
/// discovery order. Each one is kept if none of its tokens is already covered
/// by a kept candidate. The result is ordered by start index and no two
/// matches share a token.
pub fn resolve<'a, I>(candidates: I) -> Vec<ResolvedMatch<'a>>
where
    I: IntoIterator<Item = MatchCandidate<'a>>,
{
    let mut ordered: Vec<MatchCandidate<'a>> =
        candidates.into_iter().filter(|c| !c.is_empty()).collect();

    // Stable sort keeps discovery order among equal keys
    ordered.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.len().cmp(&a.len())));

    let mut resolved = Vec::new();
    // Every kept match starts at or before the current candidate, so the
    // candidate overlaps one of them exactly when it starts before this bound
    let mut covered_until = 0;

    for candidate in ordered {
        if !resolved.is_empty() && candidate.start < covered_until {
            continue;
        }
        covered_until = candidate.end;
        resolved.push(ResolvedMatch::from(candidate));
    }

    resolved
}
