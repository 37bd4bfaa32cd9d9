// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived-state cache keyed by normalized query keys.
//!
//! Entries never expire on their own. They are dropped only by an explicit
//! [`QueryCache::invalidate`] (prefix match) or [`QueryCache::clear`]. While a
//! fetch for a key is in flight, further readers of that key block and share
//! its outcome instead of issuing their own request. A fetch whose key was
//! invalidated while it was running still answers its callers but is not
//! stored.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: &str) -> Self {
        QueryKey(vec![resource.to_string()])
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn resource(&self) -> &str {
        &self.0[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Segment-wise prefix match: `expenses` covers `expenses/all/3/2024`,
    /// but not `expenseStats`.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl From<&str> for QueryKey {
    fn from(resource: &str) -> Self {
        QueryKey::new(resource)
    }
}

type Shared = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Entry {
    value: Option<Shared>,
    generation: u64,
    in_flight: Option<u64>,
    failure: Option<(u64, Shared)>,
}

#[derive(Default)]
struct State {
    entries: HashMap<QueryKey, Entry>,
    next_attempt: u64,
    stats: CacheStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub fetches: u64,
    pub shared_waits: u64,
    pub superseded: u64,
}

#[derive(Default)]
pub struct QueryCache {
    state: Mutex<State>,
    settled: Condvar,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Returns the cached value for `key`, or runs `fetch` to produce it.
    ///
    /// At most one `fetch` runs per key at a time. A failed fetch is shared
    /// with the readers that were waiting on it and is never cached.
    pub fn get_or_fetch<T, E, F>(&self, key: &QueryKey, fetch: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let (attempt, generation) = {
            let mut state = self.lock();
            let mut waited_on: Option<u64> = None;
            loop {
                let entry = state.entries.entry(key.clone()).or_default();
                if let Some(v) = entry.value.clone() {
                    match v.downcast::<T>() {
                        Ok(hit) => {
                            state.stats.hits += 1;
                            trace!(%key, "cache hit");
                            return Ok(hit);
                        }
                        Err(_) => {
                            debug!(%key, "cached value has a different type; refetching");
                            entry.value = None;
                        }
                    }
                }
                if let (Some(w), Some((failed, err))) = (waited_on, entry.failure.as_ref()) {
                    if w == *failed {
                        if let Ok(e) = err.clone().downcast::<E>() {
                            return Err((*e).clone());
                        }
                    }
                }
                match entry.in_flight {
                    Some(running) => {
                        waited_on = Some(running);
                        state.stats.shared_waits += 1;
                        trace!(%key, "waiting on in-flight fetch");
                        state = self.settled.wait(state).unwrap_or_else(|p| p.into_inner());
                    }
                    None => {
                        let generation = entry.generation;
                        state.next_attempt += 1;
                        let attempt = state.next_attempt;
                        let entry = state.entries.entry(key.clone()).or_default();
                        entry.in_flight = Some(attempt);
                        entry.failure = None;
                        state.stats.fetches += 1;
                        break (attempt, generation);
                    }
                }
            }
        };

        debug!(%key, "cache miss; fetching");
        let mut guard = InFlight {
            cache: self,
            key,
            attempt,
            done: false,
        };
        let result = fetch();
        guard.done = true;

        let mut state = self.lock();
        let entry = state.entries.entry(key.clone()).or_default();
        if entry.in_flight == Some(attempt) {
            entry.in_flight = None;
        }
        let superseded = entry.generation != generation;
        let out = match result {
            Ok(v) => {
                let v = Arc::new(v);
                if !superseded {
                    entry.value = Some(v.clone() as Shared);
                }
                Ok(v)
            }
            Err(e) => {
                entry.failure = Some((attempt, Arc::new(e.clone()) as Shared));
                Err(e)
            }
        };
        if superseded && out.is_ok() {
            state.stats.superseded += 1;
            debug!(%key, "response superseded by invalidation; not stored");
        }
        drop(state);
        self.settled.notify_all();
        out
    }

    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let state = self.lock();
        state
            .entries
            .get(key)
            .and_then(|e| e.value.clone())
            .and_then(|v| v.downcast::<T>().ok())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock()
            .entries
            .get(key)
            .is_some_and(|e| e.value.is_some())
    }

    /// Drops every entry whose key starts with `prefix`. Does not fetch.
    /// Returns how many cached values were discarded.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut state = self.lock();
        let mut dropped = 0;
        state.entries.retain(|k, e| {
            if !k.starts_with(prefix) {
                return true;
            }
            if e.value.take().is_some() {
                dropped += 1;
            }
            e.generation += 1;
            // keep the slot while a fetch is running so its waiters find it
            e.in_flight.is_some()
        });
        debug!(%prefix, dropped, "invalidated");
        dropped
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.retain(|_, e| {
            e.value = None;
            e.generation += 1;
            e.in_flight.is_some()
        });
        debug!("cache cleared");
    }

    pub fn len(&self) -> usize {
        self.lock()
            .entries
            .values()
            .filter(|e| e.value.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}

/// Releases the in-flight slot if `fetch` unwinds, so waiters are not stuck.
struct InFlight<'a> {
    cache: &'a QueryCache,
    key: &'a QueryKey,
    attempt: u64,
    done: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let mut state = self.cache.lock();
        if let Some(entry) = state.entries.get_mut(self.key) {
            if entry.in_flight == Some(self.attempt) {
                entry.in_flight = None;
            }
        }
        drop(state);
        self.cache.settled.notify_all();
    }
}
