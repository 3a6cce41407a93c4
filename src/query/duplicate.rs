use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

use super::debounce::Debouncer;
use crate::config::QueryConfig;

/// Backend lookup answering "is this name already taken?"
#[async_trait]
pub trait ExistenceChecker: Send + Sync + 'static {
    async fn exists(&self, value: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Idle,
    /// Input failed the synchronous precondition; no lookup scheduled
    Invalid,
    Pending,
    Available,
    Taken,
}

type Precondition = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Debounced duplicate-name check for a single input field.
///
/// At most one lookup is pending at a time. Results that arrive after newer
/// input are discarded. A failed lookup reports the name as available; the
/// server still rejects real duplicates on submit.
pub struct DuplicateCheck {
    debouncer: Debouncer<(u64, String)>,
    status: Arc<watch::Sender<CheckStatus>>,
    generation: Arc<AtomicU64>,
    precondition: Precondition,
}

impl DuplicateCheck {
    pub fn new<C: ExistenceChecker>(checker: C, delay: Duration) -> Self {
        let checker = Arc::new(checker);
        let (status, _) = watch::channel(CheckStatus::Idle);
        let status = Arc::new(status);
        let generation = Arc::new(AtomicU64::new(0));
        let cache: Arc<Mutex<Option<(String, bool)>>> = Arc::new(Mutex::new(None));

        let debouncer = {
            let status = Arc::clone(&status);
            let generation = Arc::clone(&generation);
            Debouncer::new(delay, move |(ticket, value): (u64, String)| {
                let checker = Arc::clone(&checker);
                let status = Arc::clone(&status);
                let generation = Arc::clone(&generation);
                let cache = Arc::clone(&cache);
                async move {
                    let exists = lookup(&*checker, &cache, &value).await;
                    if generation.load(Ordering::SeqCst) == ticket {
                        status.send_replace(if exists { CheckStatus::Taken } else { CheckStatus::Available });
                    } else {
                        tracing::debug!("Discarding stale duplicate check for {:?}", value);
                    }
                }
            })
        };

        Self {
            debouncer,
            status,
            generation,
            precondition: Box::new(|value: &str| !value.trim().is_empty()),
        }
    }

    pub fn from_config<C: ExistenceChecker>(checker: C, config: &QueryConfig) -> Self {
        Self::new(checker, Duration::from_millis(config.debounce_ms))
    }

    /// Replace the cheap synchronous check run on every keystroke (default: non-blank)
    pub fn with_precondition(mut self, precondition: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.precondition = Box::new(precondition);
        self
    }

    /// Feed the latest input value
    pub fn on_input(&mut self, value: &str) {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if !(self.precondition)(value) {
            self.debouncer.cancel();
            self.status.send_replace(CheckStatus::Invalid);
            return;
        }

        self.status.send_replace(CheckStatus::Pending);
        self.debouncer.call((ticket, value.to_string()));
    }

    /// Forget the pending check (field cleared or view closed)
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.debouncer.cancel();
        self.status.send_replace(CheckStatus::Idle);
    }

    pub fn status(&self) -> CheckStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckStatus> {
        self.status.subscribe()
    }
}

async fn lookup<C: ExistenceChecker>(checker: &C, cache: &Mutex<Option<(String, bool)>>, value: &str) -> bool {
    let mut cached = cache.lock().await;
    if let Some((last, exists)) = cached.as_ref() {
        if last == value {
            return *exists;
        }
    }

    let exists = match checker.exists(value).await {
        Ok(exists) => exists,
        Err(e) => {
            tracing::debug!("Duplicate check for {:?} failed, treating as available: {}", value, e);
            false
        }
    };
    *cached = Some((value.to_string(), exists));
    exists
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Failing;

    #[async_trait]
    impl ExistenceChecker for Failing {
        async fn exists(&self, _value: &str) -> anyhow::Result<bool> {
            anyhow::bail!("identity server unreachable")
        }
    }

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ExistenceChecker for Counting {
        async fn exists(&self, value: &str) -> anyhow::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(value == "Google")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_reports_available() {
        let mut check = DuplicateCheck::new(Failing, Duration::from_millis(500));
        check.on_input("my-idp");
        assert_eq!(check.status(), CheckStatus::Pending);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(check.status(), CheckStatus::Available);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_value_uses_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut check = DuplicateCheck::new(Counting { calls: Arc::clone(&calls) }, Duration::from_millis(500));

        check.on_input("Google");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(check.status(), CheckStatus::Taken);

        check.on_input("Google");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(check.status(), CheckStatus::Taken);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_returns_to_idle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut check = DuplicateCheck::new(Counting { calls: Arc::clone(&calls) }, Duration::from_millis(500));
        check.on_input("Google");
        check.cancel();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(check.status(), CheckStatus::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
