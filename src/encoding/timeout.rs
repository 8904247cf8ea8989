use super::traits::Encoder;
use crate::error::{ProteinDbError, Result};
use crate::types::Embedding;
use std::sync::mpsc::{channel, RecvTimeoutError, SendError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

type Job = (String, Sender<Result<Embedding>>);

struct Worker {
    id: u64,
    jobs: Sender<Job>,
}

#[derive(Default)]
struct WorkerSlot {
    spawned: u64,
    current: Option<Worker>,
}

/// Serves encode calls from one long-lived worker thread and gives up on a
/// call after `timeout`.
///
/// Calls are queued and answered in order. A worker that times out or dies
/// is detached, not killed, and the next call starts a fresh one; any result
/// the old worker still produces is dropped.
pub struct TimeoutEncoder<E> {
    inner: Arc<E>,
    timeout: Duration,
    slot: Mutex<WorkerSlot>,
}

impl<E: Encoder + 'static> TimeoutEncoder<E> {
    pub fn new(inner: E, timeout: Duration) -> Self {
        Self::from_shared(Arc::new(inner), timeout)
    }

    pub fn from_shared(inner: Arc<E>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            slot: Mutex::new(WorkerSlot::default()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of worker threads started so far
    pub fn workers_spawned(&self) -> u64 {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).spawned
    }

    fn worker(&self) -> Result<(u64, Sender<Job>)> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(worker) = slot.current.as_ref() {
            return Ok((worker.id, worker.jobs.clone()));
        }

        let id = slot.spawned + 1;
        let (jobs, queue) = channel::<Job>();
        let inner = Arc::clone(&self.inner);
        thread::Builder::new()
            .name(format!("encoder-{}", id))
            .spawn(move || {
                for (sequence, reply) in queue {
                    let _ = reply.send(inner.encode(&sequence));
                }
            })
            .map_err(|e| {
                ProteinDbError::EncoderFailure(format!("failed to spawn encoder worker: {}", e))
            })?;

        log::debug!("Started encoder worker {}", id);
        slot.spawned = id;
        slot.current = Some(Worker {
            id,
            jobs: jobs.clone(),
        });
        Ok((id, jobs))
    }

    /// Detach worker `id` so the next call starts a new one
    fn retire(&self, id: u64) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.current.as_ref().is_some_and(|w| w.id == id) {
            slot.current = None;
        }
    }
}

impl<E: Encoder + 'static> Encoder for TimeoutEncoder<E> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn encode(&self, sequence: &str) -> Result<Embedding> {
        let (reply, result) = channel();
        let mut job = (sequence.to_string(), reply);

        // A worker that died since the last call is replaced once
        let mut retried = false;
        let id = loop {
            let (id, jobs) = self.worker()?;
            match jobs.send(job) {
                Ok(()) => break id,
                Err(SendError(returned)) => {
                    self.retire(id);
                    if retried {
                        return Err(ProteinDbError::EncoderFailure(
                            "encoder worker is not accepting work".to_string(),
                        ));
                    }
                    retried = true;
                    job = returned;
                }
            }
        };

        match result.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                self.retire(id);
                Err(ProteinDbError::EncoderFailure(format!(
                    "encode timed out after {} ms",
                    self.timeout.as_millis()
                )))
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.retire(id);
                Err(ProteinDbError::EncoderFailure(
                    "encoder worker exited without a result".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread::ThreadId;

    struct SlowEncoder(Duration);

    impl Encoder for SlowEncoder {
        fn dimension(&self) -> usize {
            1
        }

        fn encode(&self, sequence: &str) -> Result<Embedding> {
            thread::sleep(self.0);
            Ok(Embedding::new(vec![sequence.len() as f64]))
        }
    }

    /// Sleeps only on "SLOW", panics only on "CRASH"
    struct PickyEncoder {
        threads: Mutex<HashSet<ThreadId>>,
    }

    impl Encoder for PickyEncoder {
        fn dimension(&self) -> usize {
            1
        }

        fn encode(&self, sequence: &str) -> Result<Embedding> {
            self.threads.lock().unwrap().insert(thread::current().id());
            match sequence {
                "SLOW" => thread::sleep(Duration::from_millis(300)),
                "CRASH" => panic!("model crashed"),
                _ => {}
            }
            Ok(Embedding::new(vec![sequence.len() as f64]))
        }
    }

    fn picky() -> Arc<PickyEncoder> {
        Arc::new(PickyEncoder {
            threads: Mutex::new(HashSet::new()),
        })
    }

    #[test]
    fn test_fast_encode_passes_through() {
        let encoder = TimeoutEncoder::new(SlowEncoder(Duration::ZERO), Duration::from_secs(5));
        assert_eq!(encoder.encode("MKV").unwrap().as_slice(), &[3.0]);
        assert_eq!(encoder.dimension(), 1);
    }

    #[test]
    fn test_slow_encode_times_out() {
        let encoder = TimeoutEncoder::new(
            SlowEncoder(Duration::from_millis(500)),
            Duration::from_millis(20),
        );
        let err = encoder.encode("MKV").unwrap_err();
        assert!(matches!(err, ProteinDbError::EncoderFailure(msg) if msg.contains("timed out")));
    }

    #[test]
    fn test_calls_share_one_worker() {
        let inner = picky();
        let encoder = TimeoutEncoder::from_shared(Arc::clone(&inner), Duration::from_secs(5));
        for i in 0..200 {
            assert_eq!(encoder.encode(&"A".repeat(i)).unwrap().as_slice(), &[i as f64]);
        }
        assert_eq!(encoder.workers_spawned(), 1);
        assert_eq!(inner.threads.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_worker_replaced_after_timeout() {
        let encoder = TimeoutEncoder::from_shared(picky(), Duration::from_millis(50));
        assert!(matches!(
            encoder.encode("SLOW"),
            Err(ProteinDbError::EncoderFailure(msg)) if msg.contains("timed out")
        ));
        assert_eq!(encoder.encode("MKV").unwrap().as_slice(), &[3.0]);
        assert_eq!(encoder.workers_spawned(), 2);
    }

    #[test]
    fn test_worker_panic_is_encoder_failure_and_recovers() {
        let encoder = TimeoutEncoder::from_shared(picky(), Duration::from_secs(5));
        assert!(matches!(
            encoder.encode("CRASH"),
            Err(ProteinDbError::EncoderFailure(_))
        ));
        assert_eq!(encoder.encode("MKVL").unwrap().as_slice(), &[4.0]);
        assert_eq!(encoder.workers_spawned(), 2);
    }

    #[test]
    fn test_parallel_callers() {
        let encoder = Arc::new(TimeoutEncoder::from_shared(picky(), Duration::from_secs(5)));
        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let encoder = Arc::clone(&encoder);
                thread::spawn(move || encoder.encode(&"G".repeat(i)).unwrap().as_slice()[0])
            })
            .collect();
        let mut lengths: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        lengths.sort_by(f64::total_cmp);
        assert_eq!(lengths, (1..=8).map(|i| i as f64).collect::<Vec<_>>());
    }
}
