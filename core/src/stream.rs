//! Streaming brute force with progress events and cooperative cancellation.
//!
//! The search runs on a dedicated thread and reports through a bounded
//! channel: zero or more progress snapshots at a fixed cadence, then
//! exactly one terminal event. Dropping the handle cancels the worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::debug;

use crate::hash::HashAlgorithm;

/// Characters tried by the incremental brute-force phases, in odometer
/// order.
pub const BRUTE_FORCE_CHARSET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// One progress snapshot per this many attempts.
pub const PROGRESS_CADENCE: u64 = 10_000;

/// How often the worker polls the cancellation flag.
const CANCEL_POLL_CADENCE: u64 = 1_024;

/// An event emitted by a streaming brute-force run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BruteForceEvent {
    Progress { attempts: u64, current_length: usize },
    Cracked { password: String, attempts: u64 },
    Exhausted { attempts: u64 },
}

impl BruteForceEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BruteForceEvent::Progress { .. })
    }
}

/// Enumerates every string over a charset from `min_length` up to
/// `max_length` characters, shortest first.
pub struct BruteForceIterator {
    charset: Vec<char>,
    indices: Vec<usize>,
    max_length: usize,
    done: bool,
}

impl BruteForceIterator {
    pub fn new(charset: &[char], min_length: usize, max_length: usize) -> Self {
        Self {
            charset: charset.to_vec(),
            indices: vec![0; min_length.max(1)],
            max_length,
            done: charset.is_empty() || min_length.max(1) > max_length,
        }
    }
}

impl Iterator for BruteForceIterator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        let candidate: String = self.indices.iter().map(|&i| self.charset[i]).collect();

        // odometer increment, growing one position on full rollover
        let mut position = self.indices.len();
        loop {
            if position == 0 {
                if self.indices.len() == self.max_length {
                    self.done = true;
                } else {
                    self.indices = vec![0; self.indices.len() + 1];
                }
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.charset.len() {
                break;
            }
            self.indices[position] = 0;
        }

        Some(candidate)
    }
}

/// Owner side of a streaming run. Dropping it cancels the worker thread.
#[derive(Debug)]
pub struct BruteForceHandle {
    receiver: Option<Receiver<BruteForceEvent>>,
    handle: Option<JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
}

impl BruteForceHandle {
    /// Blocks until the next event, or `None` once the stream ends.
    pub fn recv(&self) -> Option<BruteForceEvent> {
        self.receiver.as_ref()?.recv().ok()
    }

    /// Asks the worker to stop. Idempotent.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for BruteForceHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // closing the channel unblocks a worker stuck on a full buffer
        drop(self.receiver.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Starts a brute-force search against a normalized target digest on a
/// background thread.
pub fn spawn_brute_force(
    target: String,
    algorithm: HashAlgorithm,
    max_length: usize,
) -> BruteForceHandle {
    let (sender, receiver) = bounded(1_024);
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let handle = thread::spawn(move || {
        run_search(&target, algorithm, max_length, &sender, &flag);
    });

    BruteForceHandle {
        receiver: Some(receiver),
        handle: Some(handle),
        cancel,
    }
}

fn run_search(
    target: &str,
    algorithm: HashAlgorithm,
    max_length: usize,
    sender: &Sender<BruteForceEvent>,
    cancel: &AtomicBool,
) {
    let mut attempts: u64 = 0;

    for candidate in BruteForceIterator::new(BRUTE_FORCE_CHARSET, 1, max_length) {
        attempts += 1;

        if attempts % CANCEL_POLL_CADENCE == 0 && cancel.load(Ordering::Relaxed) {
            debug!(attempts, "brute-force stream cancelled");
            return;
        }

        if algorithm.digest_hex(&candidate) == target {
            let _ = sender.send(BruteForceEvent::Cracked {
                password: candidate,
                attempts,
            });
            return;
        }

        if attempts % PROGRESS_CADENCE == 0
            && sender
                .send(BruteForceEvent::Progress {
                    attempts,
                    current_length: candidate.chars().count(),
                })
                .is_err()
        {
            // consumer went away
            return;
        }
    }

    let _ = sender.send(BruteForceEvent::Exhausted { attempts });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(handle: &BruteForceHandle) -> Vec<BruteForceEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.recv() {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    }

    #[test]
    fn iterator_enumerates_shortest_first() {
        let candidates: Vec<String> =
            BruteForceIterator::new(&['a', 'b'], 1, 2).collect();
        assert_eq!(candidates, vec!["a", "b", "aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn iterator_respects_min_length() {
        let candidates: Vec<String> =
            BruteForceIterator::new(&['a', 'b'], 2, 2).collect();
        assert_eq!(candidates, vec!["aa", "ab", "ba", "bb"]);
        assert_eq!(BruteForceIterator::new(&[], 1, 3).count(), 0);
    }

    #[test]
    fn cracks_a_short_password() {
        let target = HashAlgorithm::Md5.digest_hex("ab9");
        let handle = spawn_brute_force(target, HashAlgorithm::Md5, 3);
        let events = drain(&handle);

        match events.last().unwrap() {
            BruteForceEvent::Cracked { password, attempts } => {
                assert_eq!(password, "ab9");
                assert!(*attempts > 0);
            }
            other => panic!("expected a cracked event, got {other:?}"),
        }
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[test]
    fn exhausts_when_the_target_is_out_of_reach() {
        let target = HashAlgorithm::Sha1.digest_hex("toolong");
        let handle = spawn_brute_force(target, HashAlgorithm::Sha1, 2);
        let events = drain(&handle);

        // 36 + 36^2 candidates
        assert_eq!(events, vec![BruteForceEvent::Exhausted { attempts: 1_332 }]);
    }

    #[test]
    fn progress_attempts_strictly_increase() {
        let target = HashAlgorithm::Md5.digest_hex("zz99");
        let handle = spawn_brute_force(target, HashAlgorithm::Md5, 4);
        let events = drain(&handle);

        let progress: Vec<u64> = events
            .iter()
            .filter_map(|event| match event {
                BruteForceEvent::Progress { attempts, .. } => Some(*attempts),
                _ => None,
            })
            .collect();

        assert!(!progress.is_empty());
        assert!(progress.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[test]
    fn dropping_the_handle_stops_the_worker() {
        let target = HashAlgorithm::Sha256.digest_hex("unreachable password");
        let handle = spawn_brute_force(target, HashAlgorithm::Sha256, 6);
        handle.recv();
        drop(handle);
        // drop joins the worker; reaching this line means it stopped
    }
}
