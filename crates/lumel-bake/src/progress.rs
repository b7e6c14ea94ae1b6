use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress sink: a monotonically increasing fraction in `[0, 1]` plus a
/// short phase label. Called from worker threads during the rasterize
/// fan-out, hence `Sync`. The lifetime lets callers hand in closures that
/// borrow bake-scoped state.
pub type ProgressFn<'a> = dyn Fn(f32, &str) + Sync + 'a;

/// Cooperative cancellation flag shared between the caller and the bake.
/// Checked between phases and between per-mesh tasks; a cancelled bake
/// ends with `BakeError::UserAborted`.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
