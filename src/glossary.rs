use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const MIN_GATE_WORD_LEN: usize = 3;

/// Construction knowledge base: lowercase term -> definition, loaded from a
/// JSON object file at startup. Doubles as the topic gate and as the
/// vocabulary for spelling correction.
///
/// The gate matches single vocabulary words, the lookup requires a complete
/// term, so "reinforced beam span?" passes the gate without short-circuiting
/// to a definition.
#[derive(Debug, Clone)]
pub struct Glossary {
    entries: BTreeMap<String, String>,
    vocabulary: HashSet<String>,
}

impl Glossary {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read glossary file: {}", path.display()))?;
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&content).context("Failed to parse glossary file")?;

        Ok(Self::from_map(raw))
    }

    fn from_map(raw: BTreeMap<String, String>) -> Self {
        let entries: BTreeMap<String, String> = raw
            .into_iter()
            .map(|(term, definition)| (term.to_lowercase(), definition))
            .collect();
        // terms like "is 456" must not put "is" into the gate vocabulary
        let vocabulary = entries
            .keys()
            .flat_map(|term| term.split_whitespace())
            .filter(|word| word.chars().count() >= MIN_GATE_WORD_LEN)
            .map(str::to_string)
            .collect();

        Self {
            entries,
            vocabulary,
        }
    }

    #[cfg(test)]
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Topic gate: does the input mention any glossary vocabulary word?
    pub fn is_related(&self, text: &str) -> bool {
        words_of(text).any(|word| self.vocabulary.contains(&word))
    }

    /// Definition of the longest glossary term fully contained in the input,
    /// so "reinforced concrete" wins over "concrete" when both are present.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.entries
            .iter()
            .filter(|(term, _)| text.contains(term.as_str()))
            .max_by_key(|(term, _)| term.len())
            .map(|(_, definition)| definition.as_str())
    }

    /// Every word appearing in a glossary term, for the spell corrector.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.iter().map(String::as_str)
    }
}

fn words_of(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
