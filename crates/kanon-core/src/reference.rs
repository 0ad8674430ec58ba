//! Image reference grammar
//!
//! References follow the distribution grammar used by container runtimes:
//!
//! ```text
//! reference := name [ ":" tag ] [ "@" digest ]
//! name      := [ domain "/" ] path-component [ "/" path-component ]*
//! digest    := algorithm ":" hex
//! ```
//!
//! Parsing happens in two layers. [`RawReference`] splits a string exactly as
//! written. [`ImageReference`] first runs [`ensure_domain`], then applies the
//! tag default, and is what the rest of Kanon works with.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::ensure_domain;
use crate::error::{ParseError, Result};

/// Tag assumed when a reference carries neither tag nor digest
pub const DEFAULT_TAG: &str = "latest";

/// Maximum length of the name part (domain and path)
const NAME_TOTAL_LENGTH_MAX: usize = 255;

const ALPHA_NUMERIC: &str = "[a-z0-9]+";
const SEPARATOR: &str = "(?:[._]|__|[-]*)";
const DOMAIN_COMPONENT: &str = "(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
const TAG: &str = "[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
const DIGEST: &str = "[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}";

fn path_pattern() -> String {
    let component = format!("{ALPHA_NUMERIC}(?:{SEPARATOR}{ALPHA_NUMERIC})*");
    format!("{component}(?:/{component})*")
}

fn domain_pattern() -> String {
    format!("{DOMAIN_COMPONENT}(?:\\.{DOMAIN_COMPONENT})*(?::[0-9]+)?")
}

/// Full reference: captures name, tag, digest
static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    let name = format!("(?:{}/)?{}", domain_pattern(), path_pattern());
    Regex::new(&format!("^({name})(?::({TAG}))?(?:@({DIGEST}))?$"))
        .expect("valid reference regex")
});

/// Name only: captures domain and path
static ANCHORED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(?:({})/)?({})$", domain_pattern(), path_pattern()))
        .expect("valid name regex")
});

static LOWER_HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-f0-9]+$").expect("valid hex regex"));

/// Digest algorithms accepted by the grammar, with their hex length
fn digest_hex_len(algorithm: &str) -> Option<usize> {
    match algorithm {
        "sha256" => Some(64),
        "sha384" => Some(96),
        "sha512" => Some(128),
        _ => None,
    }
}

fn validate_digest(digest: &str) -> Result<()> {
    let (algorithm, encoded) = digest
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidDigestFormat {
            digest: digest.to_string(),
        })?;

    let expected = digest_hex_len(algorithm).ok_or_else(|| ParseError::UnsupportedDigest {
        algorithm: algorithm.to_string(),
    })?;

    if encoded.len() != expected {
        return Err(ParseError::InvalidDigestLength {
            algorithm: algorithm.to_string(),
            expected,
            actual: encoded.len(),
        });
    }

    if !LOWER_HEX_RE.is_match(encoded) {
        return Err(ParseError::InvalidDigestFormat {
            digest: digest.to_string(),
        });
    }

    Ok(())
}

/// A reference split by the grammar, without any defaulting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    /// Registry domain, empty when the reference has none
    pub domain: String,
    /// Repository path below the domain
    pub path: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl RawReference {
    /// Parse a reference exactly as written
    pub fn parse(reference: &str) -> Result<Self> {
        if reference.is_empty() {
            return Err(ParseError::Empty);
        }

        let Some(caps) = REFERENCE_RE.captures(reference) else {
            if REFERENCE_RE.is_match(&reference.to_lowercase()) {
                return Err(ParseError::ContainsUppercase {
                    reference: reference.to_string(),
                });
            }
            return Err(ParseError::InvalidFormat {
                reference: reference.to_string(),
            });
        };

        let name = caps.get(1).map_or("", |m| m.as_str());
        if name.len() > NAME_TOTAL_LENGTH_MAX {
            return Err(ParseError::NameTooLong {
                length: name.len(),
                max: NAME_TOTAL_LENGTH_MAX,
            });
        }

        let name_caps =
            ANCHORED_NAME_RE
                .captures(name)
                .ok_or_else(|| ParseError::InvalidFormat {
                    reference: reference.to_string(),
                })?;
        let domain = name_caps.get(1).map_or("", |m| m.as_str()).to_string();
        let path = name_caps.get(2).map_or("", |m| m.as_str()).to_string();

        let tag = caps.get(2).map(|m| m.as_str().to_string());
        let digest = match caps.get(3) {
            Some(m) => {
                validate_digest(m.as_str())?;
                Some(m.as_str().to_string())
            }
            None => None,
        };

        Ok(Self {
            domain,
            path,
            tag,
            digest,
        })
    }
}

impl FromStr for RawReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A fully-qualified image reference
///
/// `registry` is never empty once parsed. When both a tag and a digest are
/// present both are kept, but [`canonical`](Self::canonical) renders only the
/// digest; use [`to_string_with_tag`](Self::to_string_with_tag) to keep both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference {
    /// Registry address, e.g. `docker.io`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub registry: String,

    /// Short name, the last path segment, e.g. `busybox`
    pub name: String,

    /// Repository path, e.g. `some-repository/busybox`
    pub path: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    /// Digest, e.g. `sha256:128c6e35...`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub digest: String,

    /// JSON pointer to the manifest field this image was read from
    #[serde(rename = "jsonPath", default, skip_serializing_if = "String::is_empty")]
    pub json_path: String,
}

impl ImageReference {
    /// Parse and default a reference (`busybox` becomes `docker.io/busybox:latest`)
    pub fn parse(reference: &str) -> Result<Self> {
        Self::parse_at(reference, "")
    }

    /// Parse a reference read from the manifest field at `json_pointer`
    pub fn parse_at(reference: &str, json_pointer: impl Into<String>) -> Result<Self> {
        let defaulted = ensure_domain(reference);
        let raw = RawReference::parse(&defaulted)?;

        let name = raw
            .path
            .rsplit_once('/')
            .map_or(raw.path.as_str(), |(_, last)| last)
            .to_string();

        let mut tag = raw.tag.unwrap_or_default();
        let digest = raw.digest.unwrap_or_default();
        if tag.is_empty() && digest.is_empty() {
            tag = DEFAULT_TAG.to_string();
        }

        Ok(Self {
            registry: raw.domain,
            name,
            path: raw.path,
            tag,
            digest,
            json_path: json_pointer.into(),
        })
    }

    /// `registry/path@digest` when a digest is present, `registry/path:tag` otherwise
    pub fn canonical(&self) -> String {
        if self.digest.is_empty() {
            format!("{}/{}:{}", self.registry, self.path, self.tag)
        } else {
            format!("{}/{}@{}", self.registry, self.path, self.digest)
        }
    }

    /// Render both tag and digest when both are present
    pub fn to_string_with_tag(&self) -> String {
        match (self.tag.is_empty(), self.digest.is_empty()) {
            (false, false) => format!(
                "{}/{}:{}@{}",
                self.registry, self.path, self.tag, self.digest
            ),
            _ => self.canonical(),
        }
    }

    pub fn has_digest(&self) -> bool {
        !self.digest.is_empty()
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for ImageReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
