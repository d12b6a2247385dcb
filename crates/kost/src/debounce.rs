//! Trailing debounce built on cancelable scheduled tasks
//!
//! Scheduling replaces whatever was pending: the old task is aborted and the
//! full delay starts over for the new one.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// A task that runs after a delay unless it is superseded or cancelled first
#[derive(Debug)]
pub struct ScheduledTask {
  handle: JoinHandle<()>,
}

impl ScheduledTask {
  pub fn spawn<F>(delay: Duration, work: F) -> Self
  where
    F: Future<Output = ()> + Send + 'static,
  {
    let handle = tokio::spawn(async move {
      sleep(delay).await;
      work.await;
    });
    Self { handle }
  }

  pub fn cancel(&self) {
    self.handle.abort();
  }

  pub fn is_finished(&self) -> bool {
    self.handle.is_finished()
  }
}

impl Drop for ScheduledTask {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

#[derive(Debug)]
pub struct Debouncer {
  delay: Duration,
  pending: Option<ScheduledTask>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    Self { delay, pending: None }
  }

  /// Restart the countdown with `work` as the new trailing action
  pub fn schedule<F>(&mut self, work: F)
  where
    F: Future<Output = ()> + Send + 'static,
  {
    self.cancel();
    self.pending = Some(ScheduledTask::spawn(self.delay, work));
  }

  /// Drop any pending action; returns whether one was still waiting
  pub fn cancel(&mut self) -> bool {
    match self.pending.take() {
      Some(task) => {
        let waiting = !task.is_finished();
        task.cancel();
        waiting
      }
      None => false,
    }
  }

  pub fn is_pending(&self) -> bool {
    self.pending.as_ref().is_some_and(|task| !task.is_finished())
  }
}
