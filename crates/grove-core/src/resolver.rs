//! Grower resolution against a local cache and the remote API.
//!
//! ## Resolution Order
//!
//! 1. Local cache: account identifier match, then internal id match
//! 2. Remote list filtered by account identifier (only when no id was given)
//! 3. Remote lookup by id (only when no account identifier was given)
//! 4. Not found
//!
//! When the cache holds one record matching the account identifier and a
//! different record matching the id, the account identifier match wins.
//!
//! Remote failures are logged and treated as "no result" for that step, so
//! the only error a caller sees is [`Error::NotFound`].

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{Grower, GrowerFilter, GrowerQuery};
use crate::traits::GrowerSource;

/// Resolves a [`GrowerQuery`] to exactly one canonical [`Grower`].
pub struct GrowerResolver<S: ?Sized> {
    source: Arc<S>,
}

impl<S: ?Sized> Clone for GrowerResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: GrowerSource + ?Sized> GrowerResolver<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Resolve a grower, consulting `local_cache` before the remote source.
    ///
    /// The cache is never modified; storing a remote result back into it is
    /// the caller's decision.
    #[instrument(skip(self, local_cache), fields(
        subsystem = "profile",
        component = "resolver",
        op = "resolve",
        grower_id = ?query.id,
        grower_account_uuid = ?query.grower_account_uuid,
        cache_size = local_cache.len(),
    ))]
    pub async fn resolve(&self, query: &GrowerQuery, local_cache: &[Grower]) -> Result<Grower> {
        if query.is_empty() {
            debug!("Empty grower query");
            return Err(Error::grower_not_found());
        }

        if let Some(grower) = find_in_cache(query, local_cache) {
            debug!(grower_id = grower.id, "Grower resolved from local cache");
            return Ok(grower.clone());
        }

        if query.id.is_none() {
            if let Some(grower) = self.fetch_by_account_uuid(query).await {
                return Ok(grower);
            }
        }

        if query.grower_account_uuid.is_none() {
            if let Some(id) = query.id {
                if let Some(grower) = self.fetch_by_id(id).await {
                    return Ok(grower);
                }
            }
        }

        debug!("Grower not found locally or remotely");
        Err(Error::grower_not_found())
    }

    async fn fetch_by_account_uuid(&self, query: &GrowerQuery) -> Option<Grower> {
        let filter = GrowerFilter {
            grower_account_uuid: query.grower_account_uuid.clone(),
        };
        match self.source.fetch_growers(&filter).await {
            Ok(growers) => {
                debug!(result_count = growers.len(), "Remote grower list queried");
                growers.into_iter().next()
            }
            Err(e) => {
                warn!(error = %e, "Remote grower list query failed");
                None
            }
        }
    }

    async fn fetch_by_id(&self, id: i64) -> Option<Grower> {
        match self.source.fetch_grower_by_id(id).await {
            Ok(grower) => {
                debug!(found = grower.is_some(), "Remote grower lookup by id");
                grower
            }
            Err(e) => {
                warn!(error = %e, "Remote grower lookup by id failed");
                None
            }
        }
    }
}

fn find_in_cache<'a>(query: &GrowerQuery, local_cache: &'a [Grower]) -> Option<&'a Grower> {
    let by_uuid = query.grower_account_uuid.as_ref().and_then(|uuid| {
        local_cache
            .iter()
            .find(|g| g.grower_account_uuid.as_ref() == Some(uuid))
    });
    by_uuid.or_else(|| {
        query
            .id
            .and_then(|id| local_cache.iter().find(|g| g.id == id))
    })
}
