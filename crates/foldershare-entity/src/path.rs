//! Domain-scheme paths.
//!
//! FolderShare addresses entities with URIs of the form
//! `scheme://uid/segment/segment` where the scheme selects a logical
//! domain:
//!
//! - `private:` is content owned by the addressed user;
//! - `public:` is site-visible shared content;
//! - `shared:` is content shared with the addressed user.
//!
//! The `//uid` authority is optional and defaults to the acting user. A
//! bare `/` path addresses the domain's root-folder list. A path without a
//! scheme (`/a/b`) defaults to `private:`.

use std::fmt;

use serde::{Deserialize, Serialize};

use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::UserId;

/// The logical domain a path addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathScheme {
    /// Content owned by the addressed user.
    Private,
    /// Site-visible shared content.
    Public,
    /// Content shared with the addressed user.
    Shared,
}

impl PathScheme {
    /// Stable string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::Shared => "shared",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "private" => Some(Self::Private),
            "public" => Some(Self::Public),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }
}

impl fmt::Display for PathScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed and validated domain-scheme path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemePath {
    /// The logical domain.
    pub scheme: PathScheme,
    /// The addressed user, if the path carried a `//uid` authority.
    pub uid: Option<UserId>,
    /// Path segments from the root folder downwards; empty addresses the
    /// domain's root-folder list.
    pub segments: Vec<String>,
}

impl SchemePath {
    /// Parse and validate a path string.
    ///
    /// Accepted forms: `/a/b`, `private:/a/b`, `shared://42/a/b`,
    /// `public:/`. Fails with a validation error on an unknown scheme, a
    /// malformed authority, a missing leading `/`, or an empty segment.
    pub fn parse(input: &str) -> AppResult<Self> {
        if input.is_empty() {
            return Err(AppError::validation("Path cannot be empty"));
        }

        let (scheme, rest) = match input.split_once(':') {
            Some((scheme_str, rest)) => {
                let scheme = PathScheme::parse(scheme_str).ok_or_else(|| {
                    AppError::validation(format!("Unknown path scheme '{scheme_str}'"))
                })?;
                (scheme, rest)
            }
            None => (PathScheme::Private, input),
        };

        // Optional //uid authority between the scheme and the path.
        let (uid, path) = if let Some(after) = rest.strip_prefix("//") {
            match after.split_once('/') {
                Some((uid_str, tail)) => {
                    let uid = parse_uid(uid_str)?;
                    (Some(uid), format!("/{tail}"))
                }
                None => (Some(parse_uid(after)?), "/".to_string()),
            }
        } else {
            (None, rest.to_string())
        };

        if !path.starts_with('/') {
            return Err(AppError::validation(format!(
                "Path '{input}' must be absolute"
            )));
        }

        // A single trailing slash is tolerated; interior empty segments are not.
        let trimmed = path.strip_suffix('/').unwrap_or(&path);
        let mut segments = Vec::new();
        for segment in trimmed.trim_start_matches('/').split('/') {
            if segment.is_empty() {
                if trimmed.trim_start_matches('/').is_empty() {
                    break;
                }
                return Err(AppError::validation(format!(
                    "Path '{input}' contains an empty segment"
                )));
            }
            segments.push(segment.to_string());
        }

        Ok(Self {
            scheme,
            uid,
            segments,
        })
    }

    /// Whether this path addresses the domain's root-folder list.
    pub fn is_domain_root(&self) -> bool {
        self.segments.is_empty()
    }
}

fn parse_uid(s: &str) -> AppResult<UserId> {
    s.parse::<UserId>()
        .map_err(|_| AppError::validation(format!("Invalid user id '{s}' in path authority")))
}

// The canonical form round-trips through parse().
impl fmt::Display for SchemePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(uid) = self.uid {
            write!(f, "//{uid}")?;
        }
        if self.segments.is_empty() {
            write!(f, "/")
        } else {
            for segment in &self.segments {
                write!(f, "/{segment}")?;
            }
            Ok(())
        }
    }
}
