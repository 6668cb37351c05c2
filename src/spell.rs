use crate::glossary::Glossary;
use once_cell::sync::Lazy;
use std::collections::HashSet;

const MIN_TOKEN_LEN: usize = 4;

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "of", "for", "with", "without", "what", "which",
        "who", "whom", "whose", "when", "where", "why", "how", "is", "are", "was", "were", "will",
        "would", "shall", "should", "can", "could", "may", "might", "must", "do", "does", "did",
        "have", "has", "had", "been", "being", "this", "that", "these", "those", "there", "here",
        "about", "into", "onto", "from", "between", "please", "tell", "give", "need", "want",
        "much", "many", "more", "most", "some", "any", "you", "your", "them", "they", "than",
        "then", "just", "like", "make", "made", "used", "using", "good", "best", "very", "also",
    ]
    .into_iter()
    .collect()
});

/// Domain-vocabulary spelling correction. Deliberately conservative: only
/// tokens of four letters or more that are not stopwords and not already in
/// the vocabulary are candidates, and a replacement must be within edit
/// distance 1 (short tokens) or 2 of a vocabulary word.
pub struct SpellCorrector {
    known: HashSet<String>,
    candidates: Vec<String>,
}

impl SpellCorrector {
    pub fn from_glossary(glossary: &Glossary) -> Self {
        let known: HashSet<String> = glossary.vocabulary().map(str::to_string).collect();
        let mut candidates: Vec<String> = known.iter().cloned().collect();
        candidates.sort();
        Self { known, candidates }
    }

    /// Returns the corrected text only when at least one token changed, so
    /// the caller can show a "did you mean" hint.
    pub fn correct(&self, text: &str) -> Option<String> {
        let mut changed = false;
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|token| {
                let (prefix, core, suffix) = split_token(token);
                match self.correct_word(core) {
                    Some(replacement) => {
                        changed = true;
                        format!("{prefix}{replacement}{suffix}")
                    }
                    None => token.to_string(),
                }
            })
            .collect();

        changed.then(|| tokens.join(" "))
    }

    fn correct_word(&self, word: &str) -> Option<String> {
        if word.len() < MIN_TOKEN_LEN || !word.chars().all(|c| c.is_alphabetic()) {
            return None;
        }
        let lower = word.to_lowercase();
        if STOPWORDS.contains(lower.as_str()) || self.known.contains(&lower) {
            return None;
        }

        let max_distance = if lower.chars().count() <= 4 { 1 } else { 2 };
        let mut best: Option<(usize, &str)> = None;
        for candidate in &self.candidates {
            let distance = levenshtein(&lower, candidate, max_distance);
            match (distance, best) {
                (Some(d), None) => best = Some((d, candidate)),
                (Some(d), Some((b, _))) if d < b => best = Some((d, candidate)),
                _ => {}
            }
        }
        best.map(|(_, candidate)| candidate.to_string())
    }
}

fn split_token(token: &str) -> (&str, &str, &str) {
    let start = token
        .find(|c: char| c.is_alphanumeric())
        .unwrap_or(token.len());
    let end = token
        .rfind(|c: char| c.is_alphanumeric())
        .map_or(start, |i| i + token[i..].chars().next().map_or(1, char::len_utf8));
    (&token[..start], &token[start..end], &token[end..])
}

/// Edit distance with a cutoff: `None` when the distance exceeds `max`.
fn levenshtein(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
            row_min = row_min.min(curr[j + 1]);
        }
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (prev[b.len()] <= max).then_some(prev[b.len()])
}
