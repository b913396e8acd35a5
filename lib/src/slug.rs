//! Collision-safe naming of new resources inside a container. The caller
//! supplies a desired slug or gets a time-ordered generated one; on
//! collision a short random prefix disambiguates, with a bounded number of
//! retries.
//!
//! The check-then-use pattern here has an inherent race: two concurrent
//! creations with the same slug can both observe "absent" and race to the
//! same path. Last write wins, which is the documented consistency model.

use crate::errors::LdpError;
use anyhow::{Error, Result};
use log::debug;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Characters that may not appear in a caller-supplied slug.
const RESERVED: [char; 4] = [':', '|', '/', '\\'];

const DISAMBIGUATOR_LEN: usize = 6;

/// Rejects slugs containing path separators or reserved characters.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.contains(RESERVED) {
        return Err(Error::new(LdpError::BadSlug {
            slug: slug.to_string(),
        }));
    }
    Ok(())
}

fn random_prefix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(DISAMBIGUATOR_LEN)
        .map(char::from)
        .collect()
}

/// Finds an unused path for a new resource inside `container`. A missing
/// slug is replaced by a UUIDv7, which sorts by creation time. Each occupied
/// candidate gets a fresh random prefix; after `max_attempts` collisions the
/// allocation fails with `AllocationExhausted` instead of looping forever.
pub fn allocate(container: &Path, desired: Option<&str>, max_attempts: usize) -> Result<PathBuf> {
    let base = match desired {
        Some(slug) => slug.to_string(),
        None => Uuid::now_v7().to_string(),
    };
    let mut candidate = base.clone();
    for attempt in 0..max_attempts {
        let path = container.join(&candidate);
        if !path.exists() {
            if attempt > 0 {
                debug!(
                    "Slug {:?} taken, allocated {:?} after {} attempts",
                    base, candidate, attempt
                );
            }
            return Ok(path);
        }
        candidate = format!("{}-{}", random_prefix(), base);
    }
    Err(Error::new(LdpError::AllocationExhausted {
        slug: base,
        attempts: max_attempts,
    }))
}
