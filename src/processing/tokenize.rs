//! Word tokenization with Penn-Treebank-style boundaries.
//!
//! Text is split the way conventional English word tokenizers do it: sentence punctuation and
//! symbols become standalone tokens, clitics are detached (`don't` → `do n't`), and quotes are
//! isolated. Tokens are then stripped of surrounding ASCII punctuation, filtered to length > 1,
//! and handed to a [`Reducer`].

use super::reduce::{DictionaryLemmatizer, Reducer, SnowballStemmer};
use super::types::ReduceMode;
use regex::Regex;
use std::sync::LazyLock;

type Rules = Vec<(Regex, &'static str)>;

fn compile(specs: &[(&str, &'static str)]) -> Rules {
    specs
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("tokenizer pattern must compile"),
                *replacement,
            )
        })
        .collect()
}

static STARTING_QUOTES: LazyLock<Rules> = LazyLock::new(|| {
    compile(&[
        (r"([«“‘„]|[`]+)", " ${1} "),
        (r#"^""#, "``"),
        (r"(``)", " ${1} "),
        (r#"([ (\[{<])("|'{2})"#, "${1} `` "),
    ])
});

static PUNCTUATION: LazyLock<Rules> = LazyLock::new(|| {
    compile(&[
        (r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2} ${3} "),
        (r"([:,])([^\d])", " ${1} ${2}"),
        (r"([:,])$", " ${1} "),
        (r"\.{2,}", " ${0} "),
        (r"[;@#$%&]", " ${0} "),
        (r"[?!]", " ${0} "),
        (r"([^'])' ", "${1} ' "),
        (r"[*]", " ${0} "),
        (r"[\]\[(){}<>]", " ${0} "),
        (r"--", " -- "),
    ])
});

static ENDING_QUOTES: LazyLock<Rules> = LazyLock::new(|| {
    compile(&[
        (r"([»”’])", " ${1} "),
        (r"''", " '' "),
        (r#"""#, " '' "),
        (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ])
});

static CONTRACTIONS: LazyLock<Rules> = LazyLock::new(|| {
    compile(&[
        (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        (r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        (r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        (r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        (r"(?i)\b(wan)(na)(\s)", " ${1} ${2} ${3}"),
        (r"(?i) ('t)(is)\b", " ${1} ${2} "),
        (r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ])
});

fn apply(rules: &Rules, text: String) -> String {
    rules.iter().fold(text, |acc, (regex, replacement)| {
        regex.replace_all(&acc, *replacement).into_owned()
    })
}

/// Split text into raw word tokens without any filtering or reduction.
pub fn split_words(text: &str) -> Vec<String> {
    let text = apply(&STARTING_QUOTES, text.to_string());
    let text = apply(&PUNCTUATION, text);
    let text = apply(&ENDING_QUOTES, format!(" {text} "));
    let text = apply(&CONTRACTIONS, text);
    text.split_whitespace().map(str::to_string).collect()
}

/// Lowercase, split, strip punctuation, drop short tokens, and reduce the rest with `reducer`.
pub fn tokenize_with(text: &str, reducer: &dyn Reducer) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    split_words(&text.to_lowercase())
        .iter()
        .map(|token| token.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|token| token.chars().count() > 1)
        .map(|token| reducer.reduce(token))
        .collect()
}

/// Tokenizer owning both reduction strategies.
pub struct Tokenizer {
    stemmer: SnowballStemmer,
    lemmatizer: DictionaryLemmatizer,
}

impl Tokenizer {
    /// Tokenizer using the English stemmer and the supplied lemmatizer.
    pub fn new(lemmatizer: DictionaryLemmatizer) -> Self {
        Self {
            stemmer: SnowballStemmer::english(),
            lemmatizer,
        }
    }

    /// Tokenize `text`, reducing each token according to `mode`.
    pub fn tokenize(&self, text: &str, mode: ReduceMode) -> Vec<String> {
        let reducer: &dyn Reducer = match mode {
            ReduceMode::Stem => &self.stemmer,
            ReduceMode::Lemmatize => &self.lemmatizer,
        };
        tokenize_with(text, reducer)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DictionaryLemmatizer::english())
    }
}
