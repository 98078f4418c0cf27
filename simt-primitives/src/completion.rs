//! One-shot completion handles for asynchronously submitted work.
//!
//! [`submit`] runs a job on a detached worker thread and hands back a
//! [`Submission`] that resolves exactly once. If the worker dies without
//! producing a result (spawn failure, unhandled panic), waiting reports
//! [`SubmissionLost`] instead of hanging.

use crossbeam_channel::{bounded, Receiver, TryRecvError};

/// The worker terminated without delivering a result.
#[derive(Debug, thiserror::Error)]
#[error("worker terminated without producing a result")]
pub struct SubmissionLost;

/// Handle to the eventual result of a submitted job.
pub struct Submission<T> {
    rx: Receiver<T>,
}

/// Run `job` on a worker thread; the returned handle resolves when it
/// completes.
pub fn submit<T, F>(job: F) -> Submission<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = bounded(1);
    // If the spawn itself fails, the sender is dropped with the closure and
    // wait() reports SubmissionLost.
    let _ = std::thread::Builder::new()
        .name("simt-submit".into())
        .spawn(move || {
            let _ = tx.send(job());
        });
    Submission { rx }
}

impl<T> Submission<T> {
    /// Block until the job completes.
    pub fn wait(self) -> Result<T, SubmissionLost> {
        self.rx.recv().map_err(|_| SubmissionLost)
    }

    /// Non-blocking poll: `Ok(Some(_))` once finished, `Ok(None)` while the
    /// job is still running.
    pub fn try_wait(&self) -> Result<Option<T>, SubmissionLost> {
        match self.rx.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubmissionLost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_submit_and_wait() {
        let handle = submit(|| 41 + 1);
        assert_eq!(handle.wait().unwrap(), 42);
    }

    #[test]
    fn test_try_wait_eventually_resolves() {
        let handle = submit(|| {
            std::thread::sleep(Duration::from_millis(10));
            "done"
        });
        loop {
            match handle.try_wait() {
                Ok(Some(v)) => {
                    assert_eq!(v, "done");
                    break;
                }
                Ok(None) => std::thread::sleep(Duration::from_millis(1)),
                Err(e) => panic!("lost: {e}"),
            }
        }
    }

    #[test]
    fn test_panicked_worker_reports_lost() {
        let handle: Submission<u32> = submit(|| panic!("kernel fault"));
        assert!(handle.wait().is_err());
    }
}
