//! Handling of runtime array lengths above a configured bound.

use std::{fmt, str::FromStr};

use msgseries_core::FieldPath;

use crate::error::ParseError;

pub const DEFAULT_MAX_ARRAY_SIZE: usize = 500;

/// What to do when a variable-length array holds more than `max_size`
/// elements.
///
/// | `clamp` | `strict_check` | behavior                                   |
/// |---------|----------------|--------------------------------------------|
/// | true    | any            | consume all, emit the first `max_size`     |
/// | false   | true           | fail with [`ParseError::OversizedArray`]   |
/// | false   | false          | emit every element                         |
///
/// The payload cursor always advances past the whole array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationPolicy {
    pub clamp: bool,
    pub max_size: usize,
    pub strict_check: bool,
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self {
            clamp: true,
            max_size: DEFAULT_MAX_ARRAY_SIZE,
            strict_check: true,
        }
    }
}

impl TruncationPolicy {
    pub fn clamp(max_size: usize) -> Self {
        Self {
            clamp: true,
            max_size,
            strict_check: true,
        }
    }

    pub fn strict(max_size: usize) -> Self {
        Self {
            clamp: false,
            max_size,
            strict_check: true,
        }
    }

    pub fn permissive() -> Self {
        Self {
            clamp: false,
            max_size: DEFAULT_MAX_ARRAY_SIZE,
            strict_check: false,
        }
    }

    /// Number of elements to emit for an array of `len` elements at `path`.
    pub fn emit_count(&self, len: usize, path: &FieldPath) -> Result<usize, ParseError> {
        if len <= self.max_size {
            return Ok(len);
        }
        match (self.clamp, self.strict_check) {
            (true, _) => Ok(self.max_size),
            (false, true) => Err(ParseError::OversizedArray {
                path: path.to_string(),
                len,
                max: self.max_size,
            }),
            (false, false) => Ok(len),
        }
    }
}

impl fmt::Display for TruncationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.clamp, self.strict_check) {
            (true, _) => write!(f, "clamp:{}", self.max_size),
            (false, true) => write!(f, "strict:{}", self.max_size),
            (false, false) => f.write_str("permissive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid truncation policy '{0}' (expected clamp:N, strict:N or permissive)")]
pub struct PolicyParseError(String);

impl FromStr for TruncationPolicy {
    type Err = PolicyParseError;

    /// Accepts `clamp:N`, `strict:N` and `permissive`; a bare `clamp` or
    /// `strict` uses the default bound.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PolicyParseError(s.to_string());
        let trimmed = s.trim();
        let (mode, size) = match trimmed.split_once(':') {
            Some((mode, size)) => (mode, Some(size.trim().parse::<usize>().map_err(|_| err())?)),
            None => (trimmed, None),
        };
        match (mode.to_ascii_lowercase().as_str(), size) {
            ("clamp", n) => Ok(Self::clamp(n.unwrap_or(DEFAULT_MAX_ARRAY_SIZE))),
            ("strict", n) => Ok(Self::strict(n.unwrap_or(DEFAULT_MAX_ARRAY_SIZE))),
            ("permissive", None) => Ok(Self::permissive()),
            _ => Err(err()),
        }
    }
}
