//! Animation Cache.
//!
//! Normalized frame sets are loaded on first request, encoded into wire
//! chunks once, and kept for the life of the process. Entries are never evicted or refreshed, so edits
//! to frame files on disk are not picked up until restart.
//!
//! Two requests racing on the same uncached name may both load it; the
//! later insert wins and both results are equivalent. Failed loads are
//! not cached, so the next request retries.

use std::collections::HashMap;
use std::sync::Arc;

use termreel_frames::{AnimationName, FrameSource};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::stream::Animation;

/// Process-wide store of loaded animations.
pub struct AnimationCache {
    source: Arc<dyn FrameSource>,
    entries: RwLock<HashMap<AnimationName, Arc<Animation>>>,
}

impl AnimationCache {
    /// Create an empty cache backed by `source`.
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the animation for `name`, loading it on a blocking worker
    /// if it is not cached yet.
    pub async fn get_or_load(&self, name: &AnimationName) -> Result<Arc<Animation>, ServerError> {
        if let Some(animation) = self.entries.read().await.get(name) {
            return Ok(Arc::clone(animation));
        }

        let source = Arc::clone(&self.source);
        let key = name.clone();
        let loaded = tokio::task::spawn_blocking(move || source.load(&key))
            .await
            .map_err(|e| ServerError::Internal(format!("frame loader task failed: {e}")))?;

        let animation = match loaded {
            Ok(set) => Arc::new(Animation::new(set)),
            Err(e) if e.is_not_found() => {
                debug!(animation = %name, "animation not found");
                return Err(e.into());
            }
            Err(e) => {
                warn!(animation = %name, error = %e, "failed to load animation");
                return Err(e.into());
            }
        };

        info!(
            animation = %name,
            frames = animation.frames().len(),
            width = animation.frames().width(),
            height = animation.frames().height(),
            "animation cached"
        );

        self.entries
            .write()
            .await
            .insert(name.clone(), Arc::clone(&animation));
        Ok(animation)
    }

    /// Number of cached animations.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl std::fmt::Debug for AnimationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use termreel_frames::{FrameSet, LoadError};

    use super::*;

    /// Source that counts loads and can be switched between failing and
    /// succeeding.
    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
        fail_with_read_error: Mutex<bool>,
    }

    impl FrameSource for CountingSource {
        fn load(&self, name: &AnimationName) -> Result<FrameSet, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if *self.fail_with_read_error.lock().unwrap() {
                return Err(LoadError::Read {
                    path: name.as_str().into(),
                    source: std::io::Error::other("disk on fire"),
                });
            }
            match name.as_str() {
                "panda" => Ok(FrameSet::normalize(["ab\ncd", "e"])),
                _ => Err(LoadError::NotFound {
                    name: name.to_string(),
                }),
            }
        }
    }

    fn name(s: &str) -> AnimationName {
        AnimationName::parse(s).unwrap()
    }

    #[tokio::test]
    async fn second_lookup_does_not_reload() {
        let source = Arc::new(CountingSource::default());
        let cache = AnimationCache::new(Arc::clone(&source) as Arc<dyn FrameSource>);

        let first = cache.get_or_load(&name("panda")).await.unwrap();
        let second = cache.get_or_load(&name("panda")).await.unwrap();

        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.chunks()[0].as_ptr(), second.chunks()[0].as_ptr());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn not_found_is_not_cached() {
        let source = Arc::new(CountingSource::default());
        let cache = AnimationCache::new(Arc::clone(&source) as Arc<dyn FrameSource>);

        for _ in 0..2 {
            let err = cache.get_or_load(&name("ghost")).await.unwrap_err();
            assert!(matches!(err, ServerError::NotFound(ref n) if n == "ghost"));
        }
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let source = Arc::new(CountingSource::default());
        *source.fail_with_read_error.lock().unwrap() = true;
        let cache = AnimationCache::new(Arc::clone(&source) as Arc<dyn FrameSource>);

        let err = cache.get_or_load(&name("panda")).await.unwrap_err();
        assert!(matches!(err, ServerError::Load(_)));

        *source.fail_with_read_error.lock().unwrap() = false;
        let animation = cache.get_or_load(&name("panda")).await.unwrap();
        assert_eq!(animation.frames().len(), 2);
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_requests_agree() {
        let source = Arc::new(CountingSource::default());
        let cache = Arc::new(AnimationCache::new(
            Arc::clone(&source) as Arc<dyn FrameSource>
        ));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_or_load(&name("panda")).await.unwrap() })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        let expected = Animation::new(FrameSet::normalize(["ab\ncd", "e"]));
        assert!(results.iter().all(|animation| **animation == expected));
        assert_eq!(cache.len().await, 1);
        assert!(source.loads.load(Ordering::SeqCst) >= 1);
    }
}
