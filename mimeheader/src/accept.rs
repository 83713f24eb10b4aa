use std::{convert::Infallible, str::FromStr};

use super::*;

/// A parsed `Accept` header: media ranges ordered from most to least preferred.
///
/// Entries are sorted by quality, then by specificity, once at construction.
/// Ties keep the order in which they were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptHeader {
    preferences: Vec<MimePreference>,
}

/// Outcome of [`AcceptHeader::negotiate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiation {
    /// The header's media range that matched, e.g. `image/*`. Empty when nothing matched.
    pub preferred: String,
    /// The chosen candidate, or the fallback when nothing matched.
    pub candidate: String,
    /// Whether any candidate was acceptable.
    pub found: bool,
}

impl Negotiation {
    pub fn into_parts(self) -> (String, String, bool) {
        (self.preferred, self.candidate, self.found)
    }
}

impl AcceptHeader {
    pub fn new(mut preferences: Vec<MimePreference>) -> Self {
        sort_preferences(&mut preferences);
        AcceptHeader { preferences }
    }

    /// Takes `preferences` in the order given, without sorting.
    pub fn from_sorted(preferences: Vec<MimePreference>) -> Self {
        AcceptHeader { preferences }
    }

    /// Never fails: segments that can't be understood are skipped.
    pub fn parse(header: &str) -> Self {
        let header = header.trim();
        if header.is_empty() || header == "{}" {
            return AcceptHeader::default();
        }

        let preferences: Vec<_> = header.split(',').filter_map(parse_segment).collect();
        log::debug!("Parsed accept header into {} preferences", preferences.len());

        AcceptHeader::new(preferences)
    }

    pub fn preferences(&self) -> &[MimePreference] {
        &self.preferences
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MimePreference> {
        self.preferences.iter()
    }

    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    /// Is `candidate` acceptable at all? Quality is ignored.
    pub fn matches(&self, candidate: &str) -> bool {
        match MimeType::parse(candidate) {
            Some(candidate) => self.preferences.iter().any(|p| p.mime_type.matches(&candidate)),
            None => {
                log::trace!("Malformed candidate never matches: {:?}", candidate);
                false
            }
        }
    }

    /// Picks the candidate the header most prefers.
    ///
    /// Preferences are tried in order; for each one, `candidates` are tried in
    /// the order given. The first pair that matches wins.
    pub fn negotiate<S: AsRef<str>>(&self, candidates: &[S], fallback: &str) -> Negotiation {
        let candidates: Vec<(&str, MimeType)> = candidates
            .iter()
            .filter_map(|c| {
                let c: &str = c.as_ref();
                match MimeType::parse(c) {
                    Some(mt) => Some((c, mt)),
                    None => {
                        log::trace!("Skipping malformed candidate: {:?}", c);
                        None
                    }
                }
            })
            .collect();

        for preference in &self.preferences {
            for (raw, candidate) in &candidates {
                if preference.mime_type.matches(candidate) {
                    log::debug!("Negotiated {} via {}", raw, preference.mime_type);
                    return Negotiation {
                        preferred: preference.mime_type.essence(),
                        candidate: raw.to_string(),
                        found: true,
                    };
                }
            }
        }

        log::debug!("No acceptable candidate; falling back to {:?}", fallback);
        Negotiation {
            preferred: String::new(),
            candidate: fallback.to_string(),
            found: false,
        }
    }
}

impl FromStr for AcceptHeader {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AcceptHeader::parse(s))
    }
}

impl<'a> IntoIterator for &'a AcceptHeader {
    type Item = &'a MimePreference;
    type IntoIter = std::slice::Iter<'a, MimePreference>;

    fn into_iter(self) -> Self::IntoIter {
        self.preferences.iter()
    }
}

// Must stay stable: equal (quality, specificity) keeps header order.
fn sort_preferences(preferences: &mut [MimePreference]) {
    preferences.sort_by(|a, b| {
        b.quality
            .total_cmp(&a.quality)
            .then_with(|| b.mime_type.specificity().cmp(&a.mime_type.specificity()))
    });
}

fn parse_segment(segment: &str) -> Option<MimePreference> {
    let mut tokens = segment.split(';');
    let type_token = tokens.next().unwrap_or("");

    let mime_type = match MimeType::parse(type_token) {
        Some(mt) => mt,
        None => {
            log::trace!("Dropping segment with malformed media range: {:?}", segment);
            return None;
        }
    };

    let mut params = Params::default();
    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let mut kv = token.splitn(2, '=');
        let key = kv.next().unwrap_or("").trim();
        let value = match kv.next() {
            Some(v) if !key.is_empty() => v.trim(),
            _ => {
                log::trace!("Dropping malformed parameter {:?} of {}", token, mime_type);
                continue;
            }
        };
        params.set(key, value);
    }

    let quality = quality_of(&params);

    Some(MimePreference::new(mime_type.with_params(params), quality))
}

fn quality_of(params: &Params) -> f64 {
    let raw = match params.get("q") {
        Some(raw) => raw,
        None => return 1.0,
    };

    match raw.parse::<f64>() {
        Ok(q) if is_valid_quality(q) => q,
        _ => {
            log::trace!("Ignoring unusable quality {:?}", raw);
            1.0
        }
    }
}
