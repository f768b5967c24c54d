use crate::query::Query;
use search_core::tokenizer::MIN_WORD_LEN;
use search_core::{DocId, InvertedIndex};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub doc_id: DocId,
    pub rank: u32,
}

/// Ranked documents in the order they were first found.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ranking {
    hits: Vec<Hit>,
}

impl Ranking {
    /// Documents containing every term of an AND group, ranked by their smallest term frequency.
    ///
    /// A term shorter than the indexed minimum, or missing from the index, empties the group.
    pub fn for_group(index: &InvertedIndex, terms: &[String]) -> Ranking {
        let mut lists = Vec::with_capacity(terms.len());
        for term in terms {
            if term.len() < MIN_WORD_LEN {
                return Ranking::default();
            }
            match index.postings(term) {
                Some(postings) => lists.push(postings),
                None => return Ranking::default(),
            }
        }
        let Some((first, rest)) = lists.split_first() else { return Ranking::default() };

        let rest: Vec<HashMap<DocId, u32>> = rest
            .iter()
            .map(|list| list.iter().filter(|p| p.freq > 0).map(|p| (p.doc_id, p.freq)).collect())
            .collect();
        let hits = first
            .iter()
            .filter(|p| p.freq > 0)
            .filter_map(|p| {
                rest.iter()
                    .try_fold(p.freq, |rank, freqs| freqs.get(&p.doc_id).map(|&f| rank.min(f)))
                    .map(|rank| Hit { doc_id: p.doc_id, rank })
            })
            .collect();
        Ranking { hits }
    }

    /// OR-combines two rankings: ranks of shared documents add up, new documents go to the back.
    pub fn union(self, other: Ranking) -> Ranking {
        let mut hits = self.hits;
        let mut position: HashMap<DocId, usize> = hits.iter().enumerate().map(|(i, h)| (h.doc_id, i)).collect();
        for hit in other.hits {
            match position.get(&hit.doc_id) {
                Some(&i) => hits[i].rank += hit.rank,
                None => {
                    position.insert(hit.doc_id, hits.len());
                    hits.push(hit);
                }
            }
        }
        Ranking { hits }
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Highest rank first; equal ranks stay in discovery order.
    pub fn into_sorted(self) -> Vec<Hit> {
        let mut hits = self.hits;
        hits.sort_by(|a, b| b.rank.cmp(&a.rank));
        hits
    }
}

/// Evaluates every group and folds them into one sorted result list.
pub fn evaluate(index: &InvertedIndex, query: &Query) -> Vec<Hit> {
    query
        .groups()
        .iter()
        .map(|group| Ranking::for_group(index, group))
        .fold(Ranking::default(), Ranking::union)
        .into_sorted()
}
