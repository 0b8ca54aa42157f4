//! Greedy nearest neighbour chaining of frames.
//!
//! Starting from a given frame, the chain is repeatedly extended with the remaining
//! frame closest to the last placed one. This is an approximation: it is not the
//! shortest path through all frames, and the early exit makes it even less so.

use frameloop_common::{args, utils::math::RunningStats};
use rayon::prelude::*;

use crate::signature::Signature;

args! {
    #[derive(Copy, Clone)]
    Chaining {
        "Accept a candidate without looking further once its distance to the previous \
         frame is below this"
        early_exit_threshold: f64 = 1000.0;

        "Compute the distances of each step on all cores. Produces the same order as the \
         sequential scan"
        parallel_scan: bool = false;

        "Log the progress every this many chained frames, 0 to disable"
        progress_every: usize = 50;
    }
}

impl Chaining {
    pub fn good_enough(&self) -> f64 {
        self.early_exit_threshold
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel_scan
    }

    fn should_log_progress(&self, chained: usize) -> bool {
        self.progress_every != 0 && chained % self.progress_every == 0
    }
}

/// Frames not yet placed in the chain, in their original enumeration order. That order
/// decides ties.
#[derive(Debug, Clone)]
pub struct Pool<Id> {
    entries: Vec<(Id, Signature)>,
}

impl<Id> Pool<Id> {
    pub fn new(entries: Vec<(Id, Signature)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Removes the entry at `index`, keeping the order of the rest.
    pub fn take(&mut self, index: usize) -> (Id, Signature) {
        self.entries.remove(index)
    }

    pub fn into_ids(self) -> Vec<Id> {
        self.entries.into_iter().map(|(id, _)| id).collect()
    }

    /// Finds the entry to place after `current`. See [`pick`] for the rules.
    pub fn nearest(&self, current: &Signature, conf: &Chaining) -> Option<Nearest>
    where
        Id: Sync,
    {
        let distance = |(_, sig): &(Id, Signature)| current.distance(sig);
        if conf.is_parallel() {
            let distances: Vec<f64> = self.entries.par_iter().map(distance).collect();
            pick(distances, conf.good_enough())
        } else {
            pick(self.entries.iter().map(distance), conf.good_enough())
        }
    }
}

/// The candidate chosen by one scan of the pool
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    pub index: usize,
    pub distance: f64,
    pub early_exit: bool,
}

/// Scans `distances` in order keeping the strictly smallest one, so the earliest wins
/// ties and NaN or infinite distances never win. Stops at the first distance below
/// `good_enough`, even if a smaller one comes later.
pub fn pick(distances: impl IntoIterator<Item = f64>, good_enough: f64) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;
    let mut lowest = f64::INFINITY;

    for (index, distance) in distances.into_iter().enumerate() {
        if distance < lowest {
            lowest = distance;
            let early_exit = distance < good_enough;
            best = Some(Nearest {
                index,
                distance,
                early_exit,
            });
            if early_exit {
                break;
            }
        }
    }

    best
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StopReason {
    /// Every frame got placed
    Exhausted,
    /// Frames remain, but none of them can be compared to the last placed one
    Stalled,
    Cancelled,
}

/// How a frame was appended to the chain
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub distance: f64,
    pub early_exit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepResult {
    Placed(Step),
    Finished(StopReason),
}

/// The finished, possibly partial, ordering
#[derive(Debug)]
pub struct Chain<Id> {
    /// Placed frames, starting with the start frame
    pub ids: Vec<Id>,
    /// How `ids[i + 1]` was chosen
    pub steps: Vec<Step>,
    /// Frames left in the pool when the chaining stopped
    pub unplaced: Vec<Id>,
    pub stop: StopReason,
    pub stats: RunningStats,
}

impl<Id> Chain<Id> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn early_exits(&self) -> usize {
        self.steps.iter().filter(|step| step.early_exit).count()
    }
}

pub struct ChainBuilder<'a, Id> {
    conf: &'a Chaining,
    current: Signature,
    pool: Pool<Id>,
    ids: Vec<Id>,
    steps: Vec<Step>,
    stats: RunningStats,
}

impl<'a, Id: Sync> ChainBuilder<'a, Id> {
    pub fn new(start: (Id, Signature), pool: Pool<Id>, conf: &'a Chaining) -> Self {
        let (start_id, current) = start;
        let mut ids = Vec::with_capacity(pool.len() + 1);
        ids.push(start_id);
        Self {
            conf,
            current,
            steps: Vec::with_capacity(pool.len()),
            pool,
            ids,
            stats: RunningStats::new(),
        }
    }

    pub fn pool(&self) -> &Pool<Id> {
        &self.pool
    }

    pub fn chained(&self) -> &[Id] {
        &self.ids
    }

    /// Places the frame nearest to the last placed one
    pub fn step(&mut self) -> StepResult {
        if self.pool.is_empty() {
            return StepResult::Finished(StopReason::Exhausted);
        }

        let Some(nearest) = self.pool.nearest(&self.current, self.conf) else {
            return StepResult::Finished(StopReason::Stalled);
        };

        let (id, sig) = self.pool.take(nearest.index);
        self.ids.push(id);
        self.current = sig;

        let step = Step {
            distance: nearest.distance,
            early_exit: nearest.early_exit,
        };
        self.steps.push(step);
        self.stats.add(step.distance);
        StepResult::Placed(step)
    }

    /// Steps until the pool is drained, the chaining stalls or `should_stop` says so.
    /// `should_stop` is checked before every step.
    pub fn run(mut self, mut should_stop: impl FnMut() -> bool) -> Chain<Id> {
        let total = self.ids.len() + self.pool.len();
        let stop = loop {
            if !self.pool.is_empty() && should_stop() {
                break StopReason::Cancelled;
            }

            match self.step() {
                StepResult::Placed(_) => {
                    let chained = self.ids.len();
                    if self.conf.should_log_progress(chained) {
                        log::info!("Chained {chained}/{total} frames");
                    }
                }
                StepResult::Finished(reason) => break reason,
            }
        };

        match stop {
            StopReason::Exhausted => (),
            StopReason::Stalled => log::warn!(
                "No comparable frame left, stopping with {} frames unplaced",
                self.pool.len()
            ),
            StopReason::Cancelled => log::warn!(
                "Chaining cancelled, {} frames unplaced",
                self.pool.len()
            ),
        }

        Chain {
            ids: self.ids,
            steps: self.steps,
            unplaced: self.pool.into_ids(),
            stop,
            stats: self.stats,
        }
    }
}
