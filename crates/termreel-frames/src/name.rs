//! Validated animation identifiers.
//!
//! An [`AnimationName`] is used both as a cache key and as a directory
//! name under the animation root, so it is restricted to ASCII letters,
//! digits, `-` and `_`. That rules out `/`, `.`, whitespace and anything
//! else that could walk out of the root.

use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;

/// A non-empty animation identifier matching `[A-Za-z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationName(String);

impl AnimationName {
    /// Validate `raw` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidName`] if `raw` is empty or contains
    /// any character outside the allowed set.
    pub fn parse(raw: &str) -> Result<Self, FrameError> {
        if raw.is_empty() || !raw.bytes().all(is_name_byte) {
            return Err(FrameError::InvalidName(raw.to_owned()));
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

impl FromStr for AnimationName {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AnimationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
