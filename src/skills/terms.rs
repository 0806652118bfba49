// Term discovery: finds skill-like terms that aren't in the catalog.
//
// Uses the `keyword_extraction` crate's TF-IDF with each sentence of the
// document treated as its own document. Words repeated across every line
// (boilerplate) get downweighted; words concentrated in a few lines (tools,
// domains, named technologies) float to the top.

use std::cmp::Ordering;
use std::collections::HashSet;

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::text;

/// Words that describe a resume or posting rather than a skill.
pub const GENERIC_TERMS: &[&str] = &[
    "experience",
    "skills",
    "knowledge",
    "ability",
    "years",
];

/// Common nouns that are never useful as skills on their own.
pub const FILTERED_TERMS: &[&str] = &[
    "work", "team", "project", "company", "client", "user", "system", "data", "time", "process",
];

/// Resume and posting filler that slips past the stop word list, including
/// the action verbs and frequency words that bullet points are built from.
const FILLER_TERMS: &[&str] = &[
    "strong", "proficient", "proficiency", "familiarity", "familiar", "looking", "required",
    "requirements", "preferred", "plus", "including", "excellent", "good", "great", "background",
    "working", "worked", "using", "used", "role", "candidate", "candidates", "responsibilities",
    "opportunity", "join", "new", "well", "etc", "across", "within",
    // action verbs
    "build", "built", "deliver", "collaborate", "communicate", "review", "develop", "lead", "led",
    "manage", "implement", "create", "maintain", "improve", "ensure", "drive", "support", "help",
    "ship", "deploy", "write", "wrote", "own", "partner", "mentor", "run", "ran", "operate",
    "design", "designed", "contribute", "define", "enable", "grow", "make", "made",
    // frequency
    "daily", "weekly", "monthly", "yearly",
];

/// Nouns that end like adverbs.
const LY_NOUNS: &[&str] = &["assembly", "anomaly", "supply", "family", "italy"];

/// Discover up to `limit` candidate terms from raw text, best-ranked first.
///
/// Words that read as verbs or adverbs are dropped. Among terms with the same
/// score, the ones written like names (capitalized mid-sentence, or mixed
/// case like "PostgreSQL") come first.
///
/// Returns an empty list for empty text.
pub fn discover_terms(raw: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }

    let sentences: Vec<String> = text::sentences(raw)
        .into_iter()
        .map(|s| text::normalize(&s))
        .collect();
    if sentences.is_empty() {
        return Vec::new();
    }

    let stop_words: Vec<String> = get(LANGUAGE::English);
    let params = TfIdfParams::UnprocessedDocuments(&sentences, &stop_words, None);
    let tfidf = TfIdf::new(params);

    // Rank the whole vocabulary so ties are not cut before reordering.
    let vocabulary = sentences
        .iter()
        .flat_map(|s| s.split_whitespace())
        .collect::<HashSet<_>>()
        .len();
    let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(vocabulary);

    let blocked: HashSet<&str> = GENERIC_TERMS
        .iter()
        .chain(FILTERED_TERMS)
        .chain(FILLER_TERMS)
        .copied()
        .collect();
    let stop: HashSet<&str> = stop_words.iter().map(String::as_str).collect();
    let names = name_like_words(raw);

    let mut candidates: Vec<(String, f32, bool)> = ranked
        .into_iter()
        .map(|(word, score)| (word.to_lowercase(), score))
        .filter(|(w, _)| is_term_like(w) && !blocked.contains(w.as_str()) && !stop.contains(w.as_str()))
        .filter_map(|(w, score)| {
            let name_like = names.contains(&w);
            (name_like || !is_non_noun_form(&w)).then_some((w, score, name_like))
        })
        .collect();

    // Stable: equal score and name-likeness keep the ranker's order.
    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(b.2.cmp(&a.2))
    });

    let terms: Vec<String> = candidates
        .into_iter()
        .take(limit)
        .map(|(w, _, _)| w)
        .collect();

    debug!(sentences = sentences.len(), terms = terms.len(), "Discovered terms");

    terms
}

/// A term has to be longer than two characters, start with a letter and not
/// be a plain number ("2019", "5+").
fn is_term_like(word: &str) -> bool {
    word.chars().count() > 2
        && word.chars().next().is_some_and(|c| c.is_alphabetic())
        && word.chars().any(|c| c.is_alphabetic())
}

/// Adverbs (`-ly`) and verb forms (`-ed`, `-ing`).
fn is_non_noun_form(word: &str) -> bool {
    let len = word.chars().count();
    (len >= 5 && word.ends_with("ly") && !LY_NOUNS.contains(&word))
        || (len >= 5 && word.ends_with("ed") && !word.ends_with("eed"))
        || (len >= 6 && word.ends_with("ing"))
}

/// Lowercased words written like names in the raw text: capitalized anywhere
/// but the start of a sentence, or with an inner capital ("GraphQL").
fn name_like_words(raw: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    for sentence in text::sentences(raw) {
        for (i, word) in sentence.split_whitespace().enumerate() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#');
            let mut chars = word.chars();
            let Some(first) = chars.next() else {
                continue;
            };
            let inner_capital = chars.any(|c| c.is_uppercase());
            if (i > 0 && first.is_uppercase()) || (inner_capital && word.chars().any(|c| c.is_lowercase())) {
                names.insert(word.to_lowercase());
            }
        }
    }
    names
}
