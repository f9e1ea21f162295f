//! Resolve ledger customers to clients of the export, exactly by name and, if possible, approximately.
use crate::{ClientRecord, IdentityIndex};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Options {
    /// An approximate candidate is accepted only if its similarity score is strictly above this value.
    pub fuzzy_threshold: u8,
}

impl Default for Options {
    fn default() -> Self {
        Options { fuzzy_threshold: 90 }
    }
}

/// A similarity measure between two names, from 0 (unrelated) to 100 (identical).
pub trait Similarity {
    fn score(&self, query: &str, candidate: &str) -> u8;
}

/// Compares names by their alphanumeric words, ignoring case, punctuation and word order.
///
/// The score is the Indel ratio of the sorted words, `2 × LCS / (len(a) + len(b))`, so appended
/// words like legal-form suffixes cost less than changed characters.
#[cfg(feature = "fuzzy")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenSortRatio;

#[cfg(feature = "fuzzy")]
impl Similarity for TokenSortRatio {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        let (query, candidate) = (sorted_tokens(query), sorted_tokens(candidate));
        let similarity = rapidfuzz::fuzz::ratio(query.chars(), candidate.chars());
        (similarity * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Lowercase `name`, split it into alphanumeric words and join them in sorted order.
#[cfg_attr(not(feature = "fuzzy"), allow(dead_code))]
fn sorted_tokens(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    let mut tokens: Vec<_> = name.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Whether a [`Matcher`] may fall back to approximate matching.
pub enum Capability {
    ExactOnly,
    Fuzzy(Box<dyn Similarity>),
}

impl Capability {
    /// Use approximate matching, as a similarity backend was compiled in.
    #[cfg(feature = "fuzzy")]
    pub fn detect() -> Self {
        Capability::Fuzzy(Box::new(TokenSortRatio))
    }

    /// Use exact matching only, as no similarity backend was compiled in.
    #[cfg(not(feature = "fuzzy"))]
    pub fn detect() -> Self {
        Capability::ExactOnly
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::ExactOnly => f.write_str("ExactOnly"),
            Capability::Fuzzy(_) => f.write_str("Fuzzy"),
        }
    }
}

/// How a customer was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy {
        /// The similarity of the accepted candidate.
        score: u8,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub client: &'a ClientRecord,
    pub kind: MatchKind,
}

#[derive(Debug)]
pub struct Matcher {
    capability: Capability,
    fuzzy_threshold: u8,
}

impl Matcher {
    pub fn new(capability: Capability, Options { fuzzy_threshold }: Options) -> Self {
        Matcher {
            capability,
            fuzzy_threshold,
        }
    }

    pub fn exact_only() -> Self {
        Matcher::new(Capability::ExactOnly, Options::default())
    }

    pub fn is_fuzzy(&self) -> bool {
        matches!(self.capability, Capability::Fuzzy(_))
    }

    /// Find the client for the normalized customer name `key`, or `None` if there is none.
    ///
    /// An exact hit in `index` always wins. Otherwise, and only if approximate matching is available,
    /// the most similar known name is used if its score is above the threshold. Of multiple equally
    /// similar names, the one sorting first is chosen.
    pub fn resolve<'a>(&self, key: &str, index: &IdentityIndex<'a>) -> Option<Match<'a>> {
        if let Some(client) = index.lookup_exact(key) {
            return Some(Match {
                client,
                kind: MatchKind::Exact,
            });
        }
        let Capability::Fuzzy(similarity) = &self.capability else {
            return None;
        };

        let mut best = None::<(&str, u8)>;
        for candidate in index.all_known_identity_strings() {
            let score = similarity.score(key, candidate);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
        let (candidate, score) = best.filter(|(_, score)| *score > self.fuzzy_threshold)?;
        log::debug!("'{key}' resolved to '{candidate}' with similarity {score}");
        index.lookup_exact(candidate).map(|client| Match {
            client,
            kind: MatchKind::Fuzzy { score },
        })
    }
}
