// crates/regionmatch-core/src/text.rs

//! # Text normalization
//!
//! Every name, whether it comes from the gazetteer or from a line-list, goes
//! through [`Normalizer::normalize`] before it is compared with anything.
//!
//! Steps, in order:
//! 1. trim surrounding whitespace
//! 2. lowercase, transliterating to ASCII with `deunicode` ([`fold_key`])
//! 3. drop apostrophes, turn every other punctuation mark into a word break,
//!    keep hyphens only between two alphanumerics
//! 4. collapse runs of whitespace
//! 5. expand abbreviations token by token (`tq` → `taluk`)
//! 6. drop level designators (`mandya district` → `mandya`), unless the
//!    name consists of nothing else
//! 7. apply whole-name rewrites (`gulbarga` → `kalaburagi`)
//!
//! The function is idempotent. [`Normalizer::new`] rejects tables that would
//! break that property.

use crate::error::{GazetteerError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Abbreviations commonly found in Indian line-list location columns.
pub static DEFAULT_ABBREVIATIONS: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    [
        ("dist", "district"),
        ("dt", "district"),
        ("tq", "taluk"),
        ("tk", "taluk"),
        ("tlk", "taluk"),
        ("vill", "village"),
        ("vlg", "village"),
        ("u", "urban"),
        ("r", "rural"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
});

/// Words line-lists append to a name to say which tier it is
/// (`Mandya Dist.`, `Hoskote Tq.`). Matched after abbreviation expansion.
pub static DEFAULT_DESIGNATORS: Lazy<BTreeSet<String>> = Lazy::new(|| {
    ["district", "taluk", "tehsil", "village"]
        .into_iter()
        .map(str::to_string)
        .collect()
});

/// Transliterate to ASCII and lowercase.
///
/// ```rust
/// use regionmatch_core::text::fold_key;
///
/// assert_eq!(fold_key("Bengalūru"), "bengaluru");
/// assert_eq!(fold_key("Łódź"), "lodz");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Output of the normalizer.
///
/// `Empty` is the sentinel for blank or punctuation-only input; it never
/// reaches the matcher.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Normalized {
    Empty,
    Text(String),
}

impl Normalized {
    pub fn as_str(&self) -> &str {
        match self {
            Normalized::Empty => "",
            Normalized::Text(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Normalized::Empty)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Normalized::Empty => None,
            Normalized::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Normalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic text cleaner configured with an abbreviation table, a set
/// of level designators and a whole-name rewrite table.
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    abbreviations: HashMap<String, String>,
    designators: HashSet<String>,
    rewrites: HashMap<String, String>,
}

impl Normalizer {
    /// Builds a normalizer, validating both tables.
    ///
    /// Keys and values are themselves cleaned first, so `"dist."` is accepted
    /// as the key `dist`. Both sides of a rewrite go through expansion and
    /// designator removal. Fails with [`GazetteerError::InvalidConfig`] when
    /// an abbreviation key or a designator is not a single token, when an
    /// expansion contains a token that is itself a key, when a designator is
    /// also an abbreviation key, or when a rewrite target is also a rewrite
    /// source.
    pub fn new(
        abbreviations: &BTreeMap<String, String>,
        rewrites: &BTreeMap<String, String>,
        designators: &BTreeSet<String>,
    ) -> Result<Self> {
        let mut abbr = HashMap::with_capacity(abbreviations.len());
        for (key, value) in abbreviations {
            let k = clean(key);
            if k.is_empty() || k.contains(' ') {
                return Err(GazetteerError::InvalidConfig(format!(
                    "abbreviation key {key:?} must be a single word"
                )));
            }
            let v = clean(value);
            if v.is_empty() {
                return Err(GazetteerError::InvalidConfig(format!(
                    "abbreviation {key:?} expands to nothing"
                )));
            }
            abbr.insert(k, v);
        }
        for (key, value) in &abbr {
            if let Some(tok) = value.split(' ').find(|t| abbr.contains_key(*t)) {
                return Err(GazetteerError::InvalidConfig(format!(
                    "expansion of {key:?} contains the abbreviation {tok:?}"
                )));
            }
        }

        let mut words = HashSet::with_capacity(designators.len());
        for word in designators {
            let w = clean(word);
            if w.is_empty() || w.contains(' ') {
                return Err(GazetteerError::InvalidConfig(format!(
                    "designator {word:?} must be a single word"
                )));
            }
            if abbr.contains_key(&w) {
                return Err(GazetteerError::InvalidConfig(format!(
                    "designator {word:?} is also an abbreviation"
                )));
            }
            words.insert(w);
        }

        let mut normalizer = Normalizer {
            abbreviations: abbr,
            designators: words,
            rewrites: HashMap::with_capacity(rewrites.len()),
        };
        let mut rw = HashMap::with_capacity(rewrites.len());
        for (from, to) in rewrites {
            let f = normalizer.strip(normalizer.expand(&clean(from)));
            let t = normalizer.strip(normalizer.expand(&clean(to)));
            if f.is_empty() || t.is_empty() {
                return Err(GazetteerError::InvalidConfig(format!(
                    "rewrite {from:?} -> {to:?} has an empty side"
                )));
            }
            if f != t {
                rw.insert(f, t);
            }
        }
        if let Some(t) = rw.values().find(|t| rw.contains_key(*t)) {
            return Err(GazetteerError::InvalidConfig(format!(
                "rewrite target {t:?} is itself rewritten"
            )));
        }
        normalizer.rewrites = rw;
        Ok(normalizer)
    }

    /// Normalizer with the built-in abbreviations and designators and no
    /// rewrites.
    pub fn with_defaults() -> Self {
        // The built-in tables are covered by tests; failure here is a bug.
        Self::new(&DEFAULT_ABBREVIATIONS, &BTreeMap::new(), &DEFAULT_DESIGNATORS)
            .unwrap_or_default()
    }

    pub fn normalize(&self, text: &str) -> Normalized {
        let cleaned = clean(text);
        if cleaned.is_empty() {
            return Normalized::Empty;
        }
        let stripped = self.strip(self.expand(&cleaned));
        match self.rewrites.get(&stripped) {
            Some(target) => Normalized::Text(target.clone()),
            None => Normalized::Text(stripped),
        }
    }

    /// Step 6. A name made only of designators is kept as is.
    fn strip(&self, expanded: String) -> String {
        if self.designators.is_empty() {
            return expanded;
        }
        let kept: Vec<&str> = expanded
            .split(' ')
            .filter(|tok| !self.designators.contains(*tok))
            .collect();
        if kept.is_empty() {
            expanded
        } else {
            kept.join(" ")
        }
    }

    fn expand(&self, cleaned: &str) -> String {
        if self.abbreviations.is_empty() {
            return cleaned.to_string();
        }
        cleaned
            .split(' ')
            .map(|tok| self.abbreviations.get(tok).map_or(tok, String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Steps 1–4: trim, fold, strip punctuation, collapse whitespace.
fn clean(text: &str) -> String {
    let folded = fold_key(text.trim());
    let chars: Vec<char> = folded.chars().collect();
    let mut out = String::with_capacity(chars.len());

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if ch == '\'' {
            // o'brien -> obrien
        } else if ch == '-'
            && i > 0
            && chars[i - 1].is_ascii_alphanumeric()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_alphanumeric())
        {
            out.push('-');
        } else {
            out.push(' ');
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn cleans_case_punctuation_and_spacing() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("  Bengaluru   URBAN, "),
            Normalized::Text("bengaluru urban".into())
        );
        assert_eq!(n.normalize("K.R.Puram"), Normalized::Text("k r puram".into()));
        assert_eq!(n.normalize("St. John's"), Normalized::Text("st johns".into()));
    }

    #[test]
    fn keeps_only_intra_word_hyphens() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("Hosa-Kote"), Normalized::Text("hosa-kote".into()));
        assert_eq!(n.normalize("Hosa - Kote"), Normalized::Text("hosa kote".into()));
        assert_eq!(n.normalize("-Hoskote-"), Normalized::Text("hoskote".into()));
        assert_eq!(n.normalize("a--b"), Normalized::Text("a b".into()));
    }

    #[test]
    fn transliterates_diacritics() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("Mysūru"), Normalized::Text("mysuru".into()));
    }

    #[test]
    fn blank_input_is_the_empty_sentinel() {
        let n = Normalizer::with_defaults();
        assert_eq!(n.normalize(""), Normalized::Empty);
        assert_eq!(n.normalize("   \t"), Normalized::Empty);
        assert_eq!(n.normalize(" .,- "), Normalized::Empty);
        assert!(n.normalize("?").is_empty());
    }

    fn no_designators() -> BTreeSet<String> {
        BTreeSet::new()
    }

    #[test]
    fn expands_default_abbreviations() {
        let n = Normalizer::new(&DEFAULT_ABBREVIATIONS, &BTreeMap::new(), &no_designators()).unwrap();
        assert_eq!(
            n.normalize("Hoskote Tq."),
            Normalized::Text("hoskote taluk".into())
        );
        assert_eq!(
            n.normalize("Bengaluru (U)"),
            Normalized::Text("bengaluru urban".into())
        );
        assert_eq!(
            n.normalize("Mandya Dist."),
            Normalized::Text("mandya district".into())
        );
    }

    #[test]
    fn drops_level_designators() {
        let n = Normalizer::with_defaults();
        for raw in ["Mandya Dist.", "Mandya District", "MANDYA DT", "mandya"] {
            assert_eq!(n.normalize(raw), Normalized::Text("mandya".into()), "{raw:?}");
        }
        assert_eq!(n.normalize("Hoskote Tq."), Normalized::Text("hoskote".into()));
        assert_eq!(
            n.normalize("Vill. Besagarahalli"),
            Normalized::Text("besagarahalli".into())
        );
        // Nothing but designators: kept.
        assert_eq!(
            n.normalize("Dist. Tq."),
            Normalized::Text("district taluk".into())
        );
        // Hyphenated tokens are whole words of their own.
        assert_eq!(
            n.normalize("Taluk-Office"),
            Normalized::Text("taluk-office".into())
        );
    }

    #[test]
    fn rewrites_see_names_without_designators() {
        let n = Normalizer::new(
            &DEFAULT_ABBREVIATIONS,
            &table(&[("Gulbarga District", "Kalaburagi Dist.")]),
            &DEFAULT_DESIGNATORS,
        )
        .unwrap();
        assert_eq!(n.normalize("Gulbarga Dt"), Normalized::Text("kalaburagi".into()));
        assert_eq!(n.normalize("gulbarga"), Normalized::Text("kalaburagi".into()));
    }

    #[test]
    fn rejects_bad_designators() {
        let set = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<BTreeSet<_>>();
        let multi = Normalizer::new(&BTreeMap::new(), &BTreeMap::new(), &set(&["sub district"]));
        assert!(matches!(multi, Err(GazetteerError::InvalidConfig(_))));
        let abbr = Normalizer::new(&DEFAULT_ABBREVIATIONS, &BTreeMap::new(), &set(&["Tq."]));
        assert!(matches!(abbr, Err(GazetteerError::InvalidConfig(_))));
    }

    #[test]
    fn applies_whole_name_rewrites() {
        let n = Normalizer::new(
            &DEFAULT_ABBREVIATIONS,
            &table(&[("Gulbarga", "Kalaburagi"), ("BBMP", "Bengaluru (U)")]),
            &DEFAULT_DESIGNATORS,
        )
        .unwrap();
        assert_eq!(n.normalize("GULBARGA"), Normalized::Text("kalaburagi".into()));
        assert_eq!(n.normalize("bbmp"), Normalized::Text("bengaluru urban".into()));
        // Rewrites are whole-name only.
        assert_eq!(
            n.normalize("Gulbarga Rural"),
            Normalized::Text("gulbarga rural".into())
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = Normalizer::new(
            &DEFAULT_ABBREVIATIONS,
            &table(&[("Bijapur", "Vijayapura"), ("C H Nagar", "Chamarajanagara")]),
            &DEFAULT_DESIGNATORS,
        )
        .unwrap();
        let samples = [
            "",
            "  ",
            "Bengaluru (U)",
            "BIJAPUR",
            "C.H. Nagar",
            "Hosa--Kote Tq",
            "Whitefield, Ward-84",
            "Mysūru  R",
            "o'-brien",
            "-x-",
            "Dist. Tq. Vill.",
            "Mandya Dist.",
            "Bijapur District",
            "Village-Road Vill",
            "ಬೆಂಗಳೂರು",
        ];
        for s in samples {
            let once = n.normalize(s);
            let twice = n.normalize(once.as_str());
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn rejects_multi_word_abbreviation_keys() {
        let err = Normalizer::new(
            &table(&[("b u", "bengaluru urban")]),
            &BTreeMap::new(),
            &no_designators(),
        );
        assert!(matches!(err, Err(GazetteerError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_expansions_that_contain_keys() {
        let err = Normalizer::new(
            &table(&[("tq", "taluk"), ("tlk", "tq area")]),
            &BTreeMap::new(),
            &no_designators(),
        );
        assert!(matches!(err, Err(GazetteerError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_chained_rewrites() {
        let err = Normalizer::new(
            &BTreeMap::new(),
            &table(&[("gulbarga", "kalaburgi"), ("kalaburgi", "kalaburagi")]),
            &no_designators(),
        );
        assert!(matches!(err, Err(GazetteerError::InvalidConfig(_))));
    }

    #[test]
    fn default_tables_are_valid() {
        assert!(
            Normalizer::new(&DEFAULT_ABBREVIATIONS, &BTreeMap::new(), &DEFAULT_DESIGNATORS).is_ok()
        );
    }
}
