//! Token reduction strategies: rule-based stemming and dictionary lemmatization.
//!
//! Both strategies sit behind [`Reducer`] so the tokenizer never needs to know which algorithm
//! turns `"winning"` into `"win"`.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

/// Compact English lexicon bundled with the binary.
const EMBEDDED_LEXICON: &str = include_str!("../../data/lexicon_en.txt");

/// Noun detachment rules applied when a token is not itself a known lemma.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Capability that maps a single lowercase token to its reduced form.
pub trait Reducer: Send + Sync {
    /// Reduce `token` to its root or base form.
    fn reduce(&self, token: &str) -> String;
}

/// Snowball (Porter2) English stemmer.
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    /// Build the English stemmer.
    pub fn english() -> Self {
        Self {
            inner: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl Reducer for SnowballStemmer {
    fn reduce(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Dictionary-backed lemmatizer using noun morphology.
///
/// Lookup order mirrors classic WordNet behaviour: the exception table wins, then the token
/// itself and its suffix-detached candidates are kept only when the lexicon knows them. The
/// shortest surviving candidate is returned; unknown tokens pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    lemmas: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl DictionaryLemmatizer {
    /// Lemmatizer over the bundled English lexicon.
    pub fn english() -> Self {
        let mut lemmatizer = Self::default();
        lemmatizer.extend_from_str(EMBEDDED_LEXICON);
        lemmatizer
    }

    /// Bundled lexicon extended with the entries of a lexicon file.
    pub fn english_with_file(path: &Path) -> io::Result<Self> {
        let mut lemmatizer = Self::english();
        let contents = std::fs::read_to_string(path)?;
        lemmatizer.extend_from_str(&contents);
        Ok(lemmatizer)
    }

    /// Parse lexicon lines: `lemma` adds a base form, `inflected lemma...` adds an exception.
    /// Blank lines and `#` comments are ignored.
    pub fn extend_from_str(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let mut fields = line.split_whitespace().map(str::to_lowercase);
            let Some(head) = fields.next() else {
                continue;
            };
            let bases: Vec<String> = fields.collect();
            if bases.is_empty() {
                self.lemmas.insert(head);
            } else {
                self.lemmas.extend(bases.iter().cloned());
                self.exceptions.entry(head).or_default().extend(bases);
            }
        }
    }

    /// Number of known base forms.
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    fn known(&self, forms: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        forms
            .into_iter()
            .filter(|form| self.lemmas.contains(form) && seen.insert(form.clone()))
            .collect()
    }

    fn candidates(&self, token: &str) -> Vec<String> {
        if let Some(bases) = self.exceptions.get(token) {
            let mut forms = vec![token.to_string()];
            forms.extend(bases.iter().cloned());
            return self.known(forms);
        }

        let mut forms = detach_suffixes(&[token.to_string()]);
        let mut first = vec![token.to_string()];
        first.extend(forms.iter().cloned());
        let results = self.known(first);
        if !results.is_empty() {
            return results;
        }

        while !forms.is_empty() {
            forms = detach_suffixes(&forms);
            let results = self.known(forms.clone());
            if !results.is_empty() {
                return results;
            }
        }
        Vec::new()
    }
}

impl Reducer for DictionaryLemmatizer {
    fn reduce(&self, token: &str) -> String {
        self.candidates(token)
            .into_iter()
            .min_by_key(|form| form.chars().count())
            .unwrap_or_else(|| token.to_string())
    }
}

fn detach_suffixes(forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            NOUN_SUFFIX_RULES.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old).map(|stem| format!("{stem}{new}"))
            })
        })
        .collect()
}
