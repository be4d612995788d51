//! Disease timers - per-node infection and recovery day counters
//!
//! A node has at most one timer. It is created at 0 when the node becomes
//! infected, turns into a recovery timer once the infection lifespan has
//! elapsed, and is dropped when the node becomes susceptible again.

use std::collections::{BTreeMap, BTreeSet};

/// Elapsed days in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Infected(u32),
    Recovering(u32),
}

/// Timers keyed by node index
#[derive(Debug, Clone, Default)]
pub struct DiseaseTimers {
    timers: BTreeMap<usize, Timer>,
}

impl DiseaseTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) an infection timer at day 0
    pub fn infect(&mut self, node: usize) {
        self.timers.insert(node, Timer::Infected(0));
    }

    pub fn get(&self, node: usize) -> Option<Timer> {
        self.timers.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance every infection timer by one day.
    ///
    /// Timers of `paused` nodes do not move. A timer that would pass
    /// `lifespan` becomes `Recovering(0)` instead; those nodes are returned.
    pub fn progress_infections(
        &mut self,
        lifespan: u32,
        paused: &BTreeSet<usize>,
    ) -> Vec<usize> {
        let mut recovered = Vec::new();

        for (&node, timer) in self.timers.iter_mut() {
            let Timer::Infected(days) = *timer else {
                continue;
            };
            if paused.contains(&node) {
                continue;
            }
            if days + 1 > lifespan {
                *timer = Timer::Recovering(0);
                recovered.push(node);
            } else {
                *timer = Timer::Infected(days + 1);
            }
        }

        recovered
    }

    /// Advance every recovery timer by one day.
    ///
    /// A timer that would pass `lifespan` is dropped; those nodes are
    /// returned. Timers created by today's [`progress_infections`] advance
    /// too.
    ///
    /// [`progress_infections`]: DiseaseTimers::progress_infections
    pub fn progress_recoveries(&mut self, lifespan: u32) -> Vec<usize> {
        let mut released = Vec::new();

        self.timers.retain(|&node, timer| match *timer {
            Timer::Recovering(days) if days + 1 > lifespan => {
                released.push(node);
                false
            }
            Timer::Recovering(days) => {
                *timer = Timer::Recovering(days + 1);
                true
            }
            Timer::Infected(_) => true,
        });

        released
    }
}
