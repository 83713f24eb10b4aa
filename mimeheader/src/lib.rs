use std::collections::HashMap;
use std::fmt;

pub mod accept;

pub use accept::{AcceptHeader, Negotiation};

pub const WILDCARD: &str = "*";

/// Parameters attached to a media range, e.g. the `q=0.9` in `text/*; q=0.9`.
///
/// Read-only once parsing has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    data: HashMap<String, String>,
}

impl Params {
    pub(crate) fn set<K, V>(&mut self, key: K, value: V)
        where K: Into<String>, V: Into<String> {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item=(&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K, V> std::iter::FromIterator<(K, V)> for Params
    where K: Into<String>, V: Into<String> {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(iter: I) -> Self {
        let mut params = Params::default();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    type_: String,
    subtype: String,
    params: Params,
}

impl MimeType {
    pub fn new<T, S>(type_: T, subtype: S) -> Self
        where T: Into<String>, S: Into<String> {
        MimeType {
            type_: type_.into(),
            subtype: subtype.into(),
            params: Params::default(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Parses a bare `type/subtype` token.
    ///
    /// Surrounding whitespace is ignored, but the token itself must contain
    /// exactly one `/` with a non-empty, whitespace-free name on each side.
    /// Parameters are not accepted here.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let mut parts = token.splitn(2, '/');
        let type_ = parts.next()?;
        let subtype = parts.next()?;

        if !is_name(type_) || !is_name(subtype) {
            return None;
        }

        Some(MimeType::new(type_, subtype))
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// `type/subtype`, without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    /// 2 for `type/subtype`, 1 for `type/*`, 0 for anything with a wildcard type.
    pub fn specificity(&self) -> u8 {
        if self.type_ == WILDCARD {
            0
        } else if self.subtype == WILDCARD {
            1
        } else {
            2
        }
    }

    /// Does this (possibly wildcard) range accept the concrete `candidate`?
    pub fn matches(&self, candidate: &MimeType) -> bool {
        if self.type_ == WILDCARD {
            return true;
        }

        self.type_ == candidate.type_
            && (self.subtype == WILDCARD || self.subtype == candidate.subtype)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c == '/' || c.is_whitespace())
}

/// One entry of an `Accept` header: a media range and its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct MimePreference {
    mime_type: MimeType,
    quality: f64,
}

impl MimePreference {
    /// Out of range (or NaN) qualities fall back to 1.0; `-0.0` becomes `0.0`.
    pub fn new(mime_type: MimeType, quality: f64) -> Self {
        let quality = if !is_valid_quality(quality) {
            1.0
        } else if quality == 0.0 {
            0.0
        } else {
            quality
        };
        MimePreference { mime_type, quality }
    }

    pub fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }
}

pub(crate) fn is_valid_quality(q: f64) -> bool {
    (0.0..=1.0).contains(&q)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_accepts_plain_and_wildcard_tokens() {
        assert_eq!(MimeType::parse("image/png"), Some(MimeType::new("image", "png")));
        assert_eq!(MimeType::parse("*/*"), Some(MimeType::new("*", "*")));
        assert_eq!(MimeType::parse("  application/vnd.api+json "), Some(MimeType::new("application", "vnd.api+json")));
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        for token in &["", "image", "image/", "/png", "image/png/x", "*/* q=0.9", "image /png", "text/html; charset=utf-8"] {
            assert_eq!(MimeType::parse(token), None, "token: {:?}", token);
        }
    }

    #[test]
    fn specificity_ranks_exact_above_subtype_wildcard_above_full_wildcard() {
        assert_eq!(MimeType::new("text", "plain").specificity(), 2);
        assert_eq!(MimeType::new("text", "*").specificity(), 1);
        assert_eq!(MimeType::new("*", "*").specificity(), 0);
        assert_eq!(MimeType::new("*", "plain").specificity(), 0);
    }

    #[test]
    fn wildcard_matching() {
        let png = MimeType::new("image", "png");

        assert!(MimeType::new("*", "*").matches(&png));
        assert!(MimeType::new("*", "gif").matches(&png));
        assert!(MimeType::new("image", "*").matches(&png));
        assert!(MimeType::new("image", "png").matches(&png));
        assert!(!MimeType::new("image", "gif").matches(&png));
        assert!(!MimeType::new("text", "*").matches(&png));
    }

    #[test]
    fn display_omits_params() {
        let params: Params = vec![("q", "0.5")].into_iter().collect();
        let mt = MimeType::new("text", "*").with_params(params);

        assert_eq!(mt.to_string(), "text/*");
        assert_eq!(mt.essence(), "text/*");
    }

    #[test]
    fn preference_rejects_out_of_range_quality() {
        let mt = MimeType::new("text", "plain");

        assert_eq!(MimePreference::new(mt.clone(), 0.3).quality(), 0.3);
        assert_eq!(MimePreference::new(mt.clone(), 0.0).quality(), 0.0);
        assert_eq!(MimePreference::new(mt.clone(), 1.5).quality(), 1.0);
        assert_eq!(MimePreference::new(mt.clone(), -0.1).quality(), 1.0);
        assert_eq!(MimePreference::new(mt, f64::NAN).quality(), 1.0);
    }

    #[test]
    fn preference_normalizes_negative_zero() {
        let quality = MimePreference::new(MimeType::new("text", "plain"), -0.0).quality();

        assert_eq!(quality, 0.0);
        assert!(quality.is_sign_positive());
    }
}
