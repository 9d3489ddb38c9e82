//! Ordered fallback-tier execution.
//!
//! All provider clients share the same pattern: try a list of
//! capability-equivalent strategies in priority order and keep the first
//! success. This module implements that once, so the tier ordering lives at
//! the call sites and nowhere else.

use futures::future::BoxFuture;
use std::fmt::Display;
use std::future::Future;
use tracing::debug;

/// One labeled fallback tier.
pub struct Attempt<'a, T, E> {
    /// Tier label used in logs (e.g. "authenticated api").
    pub tier: &'static str,

    /// The deferred work for this tier; only awaited if earlier tiers failed.
    pub fut: BoxFuture<'a, Result<T, E>>,
}

impl<'a, T, E> Attempt<'a, T, E> {
    /// Boxes a future as a labeled attempt.
    pub fn new(tier: &'static str, fut: impl Future<Output = Result<T, E>> + Send + 'a) -> Self {
        Self {
            tier,
            fut: Box::pin(fut),
        }
    }
}

/// Awaits attempts in order and returns the first success.
///
/// Later attempts are never awaited once one succeeds. If every attempt
/// fails, the last (innermost) error is returned; earlier failures are
/// logged at debug level.
///
/// # Panics
///
/// Panics if `attempts` is empty; callers always supply at least one tier.
pub async fn first_success<T, E>(what: &str, attempts: Vec<Attempt<'_, T, E>>) -> Result<T, E>
where
    E: Display,
{
    let mut last_err = None;

    for Attempt { tier, fut } in attempts {
        match fut.await {
            Ok(value) => {
                debug!(what, tier, "fallback tier succeeded");
                return Ok(value);
            }
            Err(err) => {
                debug!(what, tier, error = %err, "fallback tier failed, trying next");
                last_err = Some(err);
            }
        }
    }

    Err(last_err.expect("first_success requires at least one attempt"))
}
