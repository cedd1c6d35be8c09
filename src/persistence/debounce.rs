//! Per-key trailing debounce on top of tokio tasks

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Runs the last task scheduled for a key once `delay` passes with no newer one
///
/// Must be used from inside a tokio runtime.
pub struct Debouncer<K> {
    tasks: HashMap<K, JoinHandle<()>>,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Debug> Debouncer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is pending for `key` with `task`, delayed by `delay`
    pub fn schedule<F>(&mut self, key: K, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.tasks.remove(&key) {
            if !previous.is_finished() {
                debug!("Superseding pending save for {:?}", key);
                previous.abort();
            }
        }
        self.tasks.retain(|_, handle| !handle.is_finished());

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        self.tasks.insert(key, handle);
    }

    /// Keys whose task has not finished yet
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|handle| !handle.is_finished()).count()
    }

    pub fn cancel(&mut self, key: &K) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    /// Abort everything still pending
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(counter: Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> + Send + 'static {
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_task_runs() {
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        for value in 1..=3 {
            debouncer.schedule("config", Duration::from_millis(500), counting_task(last.clone(), value));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(last.load(Ordering::SeqCst), 0);
        assert_eq!(debouncer.pending(), 1);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(last.load(Ordering::SeqCst), 3);
        assert_eq!(debouncer.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        debouncer.schedule("a", Duration::from_millis(100), counting_task(a.clone(), 1));
        debouncer.schedule("b", Duration::from_millis(100), counting_task(b.clone(), 2));
        assert_eq!(debouncer.pending(), 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_drops_pending() {
        let value = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        debouncer.schedule(1u8, Duration::from_millis(100), counting_task(value.clone(), 7));
        debouncer.cancel_all();
        assert_eq!(debouncer.pending(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(value.load(Ordering::SeqCst), 0);
    }
}
