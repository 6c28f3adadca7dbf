//! Flattens the service document tree into ordered, indexable entries.
//!
//! Row position in the returned list is the entry's id everywhere else in the
//! crate: the vector at position `i` belongs to entry `i`.


use serde::{Deserialize, Serialize};

use crate::documents::ServiceDocument;

/// One indexable question/answer unit with its service path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub service: String,
    pub subservice: String,
    pub question: String,
    pub answer: String,
}

impl CorpusEntry {
    /// Text handed to the embedder: all four fields, space-joined and trimmed.
    pub fn indexable_text(&self) -> String {
        [
            self.service.as_str(),
            self.subservice.as_str(),
            self.question.as_str(),
            self.answer.as_str(),
        ]
        .join(" ")
        .trim()
        .to_string()
    }
}

/// Builds the corpus for `lang`, in document order.
///
/// Items whose question or answer is blank in `lang` are skipped. Output depends
/// only on the input tree, so rebuilding from the same documents yields the
/// same list.
pub fn build_corpus(documents: &[ServiceDocument], lang: &str) -> Vec<CorpusEntry> {
    let mut entries = Vec::new();
    for doc in documents {
        let service = doc.name.get(lang).trim();
        for sub in &doc.subservices {
            let subservice = sub.name.get(lang).trim();
            for item in &sub.questions {
                let question = item.question.get(lang).trim();
                let answer = item.answer.get(lang).trim();
                if question.is_empty() || answer.is_empty() {
                    continue;
                }
                entries.push(CorpusEntry {
                    service: service.to_string(),
                    subservice: subservice.to_string(),
                    question: question.to_string(),
                    answer: answer.to_string(),
                });
            }
        }
    }
    entries
}

/// The first `cap` entries, used as grounding context for completions.
pub fn bounded_context(entries: &[CorpusEntry], cap: usize) -> &[CorpusEntry] {
    &entries[..cap.min(entries.len())]
}
