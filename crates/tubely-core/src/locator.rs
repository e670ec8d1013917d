//! Persisted asset locators.
//!
//! Records that point at a remote bucket store `bucket,key` as one opaque string.
//! Storage keys are hex encoded with a `/`-separated prefix, so they never contain the
//! delimiter and the split is unambiguous.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

pub const LOCATOR_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("Locator '{0}' is missing the ',' delimiter")]
    MissingDelimiter(String),

    #[error("Locator '{0}' has an empty bucket or key")]
    EmptyComponent(String),

    #[error("Locator component '{0}' contains the ',' delimiter")]
    DelimiterInComponent(String),
}

/// Bucket and key of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    bucket: String,
    key: String,
}

impl Locator {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, LocatorError> {
        let bucket = bucket.into();
        let key = key.into();
        for part in [&bucket, &key] {
            if part.contains(LOCATOR_DELIMITER) {
                return Err(LocatorError::DelimiterInComponent(part.clone()));
            }
        }
        if bucket.is_empty() || key.is_empty() {
            return Err(LocatorError::EmptyComponent(format!(
                "{}{}{}",
                bucket, LOCATOR_DELIMITER, key
            )));
        }
        Ok(Self { bucket, key })
    }

    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        let (bucket, key) = raw
            .split_once(LOCATOR_DELIMITER)
            .ok_or_else(|| LocatorError::MissingDelimiter(raw.to_string()))?;
        if bucket.is_empty() || key.is_empty() {
            return Err(LocatorError::EmptyComponent(raw.to_string()));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn into_parts(self) -> (String, String) {
        (self.bucket, self.key)
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, LOCATOR_DELIMITER, self.key)
    }
}

impl FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locator::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_bucket_and_key() {
        let keys = [
            "landscape/0a1b2c3d.mp4",
            "portrait/ffee.mp4",
            "abcdef0123456789.png",
        ];
        for bucket in ["tubely-private", "b", "bucket.with.dots"] {
            for key in keys {
                let joined = Locator::new(bucket, key).unwrap().to_string();
                let parsed = Locator::parse(&joined).unwrap();
                assert_eq!(parsed.bucket(), bucket);
                assert_eq!(parsed.key(), key);
            }
        }
    }

    #[test]
    fn missing_delimiter_is_reported() {
        let err = Locator::parse("http://localhost:8091/assets/abc.png").unwrap_err();
        assert!(matches!(err, LocatorError::MissingDelimiter(_)));
    }

    #[test]
    fn empty_components_are_rejected() {
        assert!(matches!(
            Locator::parse(",key.mp4"),
            Err(LocatorError::EmptyComponent(_))
        ));
        assert!(matches!(
            Locator::parse("bucket,"),
            Err(LocatorError::EmptyComponent(_))
        ));
    }

    #[test]
    fn bucket_with_delimiter_cannot_be_joined() {
        assert!(matches!(
            Locator::new("bad,bucket", "key.mp4"),
            Err(LocatorError::DelimiterInComponent(_))
        ));
    }
}
