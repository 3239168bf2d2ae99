//! Cosmetic progress for the loading indicator.
//!
//! The upstream call is one opaque request with no progress signal, so this
//! value is invented: it creeps up on a timer and stalls at 90 until the
//! request settles. Nothing may read it as real progress.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio::task::JoinHandle;

pub const PROGRESS_CEILING: f64 = 90.0;
const MAX_STEP: f64 = 15.0;

#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    value: Arc<Mutex<f64>>,
}

impl ProgressHandle {
    pub fn get(&self) -> f64 {
        *self.value.lock()
    }

    pub fn set(&self, value: f64) {
        *self.value.lock() = value;
    }

    fn advance(&self, step: f64) -> f64 {
        let mut value = self.value.lock();
        *value = (*value + step).min(PROGRESS_CEILING);
        *value
    }
}

pub struct ProgressSimulator {
    task_handle: Option<JoinHandle<()>>,
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

pub fn start_progress_simulator(progress: ProgressHandle, interval: Duration) -> ProgressSimulator {
    progress.set(0.0);
    let task_handle = tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let step = rand::thread_rng().gen_range(0.0..MAX_STEP);
            if progress.advance(step) >= PROGRESS_CEILING {
                break;
            }
        }
    });

    ProgressSimulator {
        task_handle: Some(task_handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn creeps_up_and_stalls_at_the_ceiling() {
        let progress = ProgressHandle::default();
        let _simulator = start_progress_simulator(progress.clone(), Duration::from_secs(2));
        assert_eq!(progress.get(), 0.0);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let early = progress.get();
        assert!(early >= 0.0 && early < MAX_STEP);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(progress.get(), PROGRESS_CEILING);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_simulator_stops_updates() {
        let progress = ProgressHandle::default();
        let simulator = start_progress_simulator(progress.clone(), Duration::from_secs(2));
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(simulator);

        progress.set(0.0);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(progress.get(), 0.0);
    }
}
