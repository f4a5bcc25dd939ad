use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

use super::config::{RetryConfig, WaitConfig};

/// Polls `check` until it reports true or the iteration budget is spent.
///
/// Returns `Ok(false)` when the budget runs out; an `Err` from `check` aborts immediately.
/// Sleeping is done with `tokio::time::sleep`, so dropping the returned future cancels the wait.
pub async fn poll_until<F, Fut, E>(config: &WaitConfig, mut check: F) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for iteration in 0..config.max_iterations {
        if check().await? {
            return Ok(true);
        }
        debug!(
            "condition not met (iteration {}/{}), sleeping {:?}",
            iteration + 1,
            config.max_iterations,
            config.interval()
        );
        tokio::time::sleep(config.interval()).await;
    }
    Ok(false)
}

/// Runs `op` until it succeeds or `max_attempts` is exhausted.
///
/// On exhaustion returns the number of attempts made and the last error.
pub async fn retry<T, E, F, Fut>(what: &str, config: &RetryConfig, mut op: F) -> Result<T, (u32, E)>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= config.max_attempts => return Err((attempt, e)),
            Err(e) => {
                warn!(
                    "error while {} (attempt {}/{}): {}",
                    what, attempt, config.max_attempts, e
                );
                tokio::time::sleep(config.interval()).await;
            }
        }
    }
}
