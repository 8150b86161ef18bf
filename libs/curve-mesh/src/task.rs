//! # Background Bends
//!
//! Runs a bend on its own thread so an interactive caller stays responsive,
//! and lets the caller abandon it when the parameters change.

use std::fmt;
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::error::BendError;
use crate::item::MeshItem;
use crate::ops::bend::{bend, BendOutput, BendParams};

/// Shared cancellation flag, checked by a bend at safe points.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Relaxed);
    }

    /// Returns true once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Relaxed)
    }
}

/// A bend running on a background thread.
pub struct BendTask {
    cancel: CancelToken,
    handle: JoinHandle<Result<BendOutput, BendError>>,
}

impl fmt::Debug for BendTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BendTask")
            .field("finished", &self.handle.is_finished())
            .field("cancel_requested", &self.cancel.is_cancelled())
            .finish()
    }
}

impl BendTask {
    /// Starts bending `items` on a new thread.
    ///
    /// The items are owned by the task; the caller keeps its own copies
    /// untouched. Fails only if the OS refuses to create the thread.
    pub fn spawn(items: Vec<MeshItem>, params: BendParams) -> io::Result<Self> {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name("curve-bend".to_owned())
            .spawn(move || {
                debug!(items = items.len(), "bend task started");
                bend(&items, &params, &token)
            })?;

        Ok(Self { cancel, handle })
    }

    /// Requests cancellation. [`BendTask::wait`] then returns
    /// [`BendError::Cancelled`] unless the bend had already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a clone of the task's cancellation token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns true once the worker has produced its result.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the worker finishes and returns its result.
    pub fn wait(self) -> Result<BendOutput, BendError> {
        self.handle.join().unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            Err(BendError::WorkerPanicked { message })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_box;
    use glam::DVec3;

    fn plate() -> MeshItem {
        let mesh = create_box(DVec3::ZERO, DVec3::new(40.0, 2.0, 10.0)).unwrap();
        MeshItem::new("plate", mesh)
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_task_cancelled_while_running() {
        // Enough work that the worker is still busy when cancelled
        let items: Vec<MeshItem> = (0..8)
            .map(|i| {
                let min = DVec3::new(0.0, 0.0, f64::from(i) * 10.0);
                let mesh = create_box(min, min + DVec3::new(300.0, 1.0, 5.0)).unwrap();
                MeshItem::new(format!("plate {i}"), mesh)
            })
            .collect();
        let params = BendParams::new(2.0).with_min_sides_per_rotation(360.0);

        let task = BendTask::spawn(items, params).unwrap();
        let finished_early = task.is_finished();
        task.cancel();
        assert!(task.cancel_token().is_cancelled());

        match task.wait() {
            Err(BendError::Cancelled) => {}
            Ok(_) => assert!(finished_early, "bend ignored cancellation"),
            Err(error) => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn test_task_completes() {
        let task = BendTask::spawn(vec![plate()], BendParams::new(30.0)).unwrap();
        let output = task.wait().unwrap();
        assert_eq!(output.items.len(), 1);
    }
}
