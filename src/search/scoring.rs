//! Score aggregation over retrieved hits.
//!
//! Every log of a test item contributes one retrieval response. Within
//! a response the top-K hits vote for their issue types with
//! score-normalized weights; across logs the votes accumulate in one
//! map. The accumulated score and the best raw hit per issue type live
//! in a single record so the two can never drift apart.

use std::collections::HashMap;

use crate::search::response::{Hit, SearchResponse};

/// Hits considered per log response.
pub const TOP_K: usize = 10;

/// Accumulated vote for one issue type plus the highest-scoring hit
/// seen for it across all logs of the item.
#[derive(Debug, Clone, Default)]
pub struct TypeScore {
    pub score: f64,
    pub most_relevant: Hit,
}

/// Fold one retrieval response into the per-item score map.
///
/// Two passes over the same top-K slice: the normalization total must
/// be fixed before any contribution is divided by it, and tracking the
/// most relevant hit separately keeps it from being counted twice
/// across logs.
pub fn fold_hits(response: &SearchResponse, k: usize, scores: &mut HashMap<String, TypeScore>) {
    if response.hits.total.value <= 0 {
        return;
    }
    let hits = &response.hits.hits[..response.hits.hits.len().min(k)];
    let total: f64 = hits.iter().map(|h| h.score).sum();

    for hit in hits {
        match scores.get_mut(&hit.source.issue_type) {
            Some(entry) => {
                if hit.score > entry.most_relevant.score {
                    entry.most_relevant = hit.clone();
                }
            }
            None => {
                scores.insert(
                    hit.source.issue_type.clone(),
                    TypeScore {
                        score: 0.0,
                        most_relevant: hit.clone(),
                    },
                );
            }
        }
    }

    if total > 0.0 {
        for hit in hits {
            if let Some(entry) = scores.get_mut(&hit.source.issue_type) {
                entry.score += hit.score / total;
            }
        }
    }
}

/// Pick the issue type with the highest accumulated score.
///
/// Only a strictly positive score wins. Ties resolve to whichever key
/// the map yields first; callers must not rely on a particular
/// resolution.
pub fn pick_winner(scores: &HashMap<String, TypeScore>) -> Option<(&str, &TypeScore)> {
    let mut max = 0.0;
    let mut winner = None;
    for (issue_type, entry) in scores {
        if entry.score > max {
            max = entry.score;
            winner = Some((issue_type.as_str(), entry));
        }
    }
    winner
}
