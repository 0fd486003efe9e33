use crate::collection::{DocId, DocSet, FieldValue};
use crate::common::{contains_run, Tokenizer};
use std::collections::{BTreeSet, HashMap};

/// Inverted index over one whole-word field.
///
/// Keeps the token runs of every indexed document (one run per string, or per
/// list element) and a posting list per term. Posting lists only narrow the
/// candidates; a candidate matches when one of its runs contains the query
/// phrase contiguously.
#[derive(Debug, Default)]
pub(crate) struct TextIndex {
    postings: HashMap<String, BTreeSet<DocId>>,
    runs: HashMap<DocId, Vec<Vec<String>>>,
}

impl TextIndex {
    pub(crate) fn new() -> Self {
        TextIndex::default()
    }

    /// Indexes (or re-indexes) the value of `id`.
    pub(crate) fn index(&mut self, id: DocId, value: FieldValue<'_>, tokenizer: &Tokenizer) {
        self.remove(id);

        let runs: Vec<Vec<String>> = value.strings().map(|s| tokenizer.tokenize(s)).collect();
        for term in runs.iter().flatten() {
            self.postings.entry(term.clone()).or_default().insert(id);
        }
        self.runs.insert(id, runs);
    }

    pub(crate) fn remove(&mut self, id: DocId) {
        let Some(runs) = self.runs.remove(&id) else {
            return;
        };
        for term in runs.iter().flatten() {
            if let Some(ids) = self.postings.get_mut(term) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
    }

    /// Finds documents containing `phrase` (already tokenized) as a contiguous run.
    pub(crate) fn match_phrase(&self, phrase: &[String]) -> DocSet {
        let candidates = self.candidates(phrase);
        candidates
            .into_iter()
            .filter(|id| {
                self.runs
                    .get(id)
                    .map(|runs| runs.iter().any(|run| contains_run(run, phrase)))
                    .unwrap_or(false)
            })
            .collect()
    }

    fn candidates(&self, phrase: &[String]) -> BTreeSet<DocId> {
        if phrase.is_empty() {
            return self.runs.keys().copied().collect();
        }

        let mut postings = Vec::with_capacity(phrase.len());
        for term in phrase {
            match self.postings.get(term) {
                Some(ids) => postings.push(ids),
                None => return BTreeSet::new(),
            }
        }
        postings.sort_by_key(|ids| ids.len());

        let (first, rest) = postings.split_at(1);
        first[0]
            .iter()
            .filter(|id| rest.iter().all(|ids| ids.contains(*id)))
            .copied()
            .collect()
    }

    #[cfg(test)]
    fn term_count(&self) -> usize {
        self.postings.len()
    }
}
