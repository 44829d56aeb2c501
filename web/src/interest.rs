//! State behind the "I'm interested" control.
//!
//! The initial fetch moves `Idle -> Loading -> Ready | Error`; a click moves
//! `Idle -> Submitting -> Voted | Error`. Network calls happen between the
//! `begin_*` and `finish_*` transitions, so a caller can hold the state in a
//! reactive signal and await the request outside of it.

use std::cell::RefCell;

use log::{info, warn};

use crate::cache::VoteCache;
use crate::client::{ClientError, CounterApi};

/// Shown when neither the server nor the local cache has a count.
pub const FALLBACK_COUNT: u64 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotePhase {
    Idle,
    Submitting,
    Voted,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// A non-blocking toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str, description: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestState {
    pub count: u64,
    /// `count` came from the cache or the server rather than the fallback.
    pub known: bool,
    pub has_voted: bool,
    pub load: LoadPhase,
    pub vote: VotePhase,
}

impl InterestState {
    pub fn restore(cache: &impl VoteCache) -> Self {
        let has_voted = cache.has_voted();
        let cached = cache.cached_count();
        Self {
            count: cached.unwrap_or(FALLBACK_COUNT),
            known: cached.is_some(),
            has_voted,
            load: LoadPhase::Idle,
            vote: if has_voted {
                VotePhase::Voted
            } else {
                VotePhase::Idle
            },
        }
    }

    pub fn begin_load(&mut self) {
        self.load = LoadPhase::Loading;
    }

    pub fn finish_load(
        &mut self,
        result: Result<u64, ClientError>,
        cache: &impl VoteCache,
    ) -> Option<Notice> {
        match result {
            Ok(count) => {
                self.count = count;
                self.known = true;
                self.load = LoadPhase::Ready;
                cache.store_count(count);
                None
            }
            Err(e) => {
                warn!("Failed to fetch interest count: {e}");
                self.load = LoadPhase::Error;
                Some(Notice::new(
                    NoticeKind::Error,
                    "Couldn't load the latest count",
                    "Showing the last number we saw. It will refresh next time.",
                ))
            }
        }
    }

    /// The count to show, or `None` while the first fetch is still out and
    /// only the fallback is available.
    pub fn displayed_count(&self) -> Option<u64> {
        match self.load {
            LoadPhase::Idle | LoadPhase::Loading if !self.known => None,
            _ => Some(self.count),
        }
    }

    pub fn can_vote(&self) -> bool {
        !self.has_voted && self.vote != VotePhase::Submitting
    }

    /// Starts a vote if one is allowed; the caller should only send the
    /// request when this returns `true`.
    pub fn begin_vote(&mut self) -> bool {
        if !self.can_vote() {
            return false;
        }
        self.vote = VotePhase::Submitting;
        true
    }

    pub fn finish_vote(&mut self, result: Result<u64, ClientError>, cache: &impl VoteCache) -> Notice {
        match result {
            Ok(count) => {
                info!("Interest registered, count is now {count}");
                self.count = count;
                self.known = true;
                self.has_voted = true;
                self.vote = VotePhase::Voted;
                cache.mark_voted();
                cache.store_count(count);
                Notice::new(
                    NoticeKind::Success,
                    "Thanks for your interest! 🎉",
                    "We'll notify you when CollegeConnect launches at Shoolini University.",
                )
            }
            Err(e) => {
                warn!("Failed to register interest: {e}");
                self.vote = VotePhase::Error;
                Notice::new(
                    NoticeKind::Error,
                    "Something went wrong",
                    "We couldn't record your interest. Please try again.",
                )
            }
        }
    }
}

/// "student is" for exactly one, "students are" otherwise.
pub fn interested_phrase(count: u64) -> &'static str {
    if count == 1 { "student is" } else { "students are" }
}

/// Scoped access to wherever the page keeps its [`InterestState`].
///
/// Returns `None` when the state is gone, e.g. the view was torn down while a
/// request was in flight.
pub trait InterestCell {
    fn with_state<R>(&self, f: impl FnOnce(&mut InterestState) -> R) -> Option<R>;
}

impl InterestCell for RefCell<InterestState> {
    fn with_state<R>(&self, f: impl FnOnce(&mut InterestState) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Fetches the current count and folds it into the state.
pub async fn load(
    cell: &impl InterestCell,
    api: &impl CounterApi,
    cache: &impl VoteCache,
) -> Option<Notice> {
    cell.with_state(InterestState::begin_load)?;
    let result = api.fetch_count().await;
    cell.with_state(|s| s.finish_load(result, cache)).flatten()
}

/// Registers interest unless this browser already voted or a vote is in
/// flight. Returns `None` when the click was ignored.
pub async fn vote(
    cell: &impl InterestCell,
    api: &impl CounterApi,
    cache: &impl VoteCache,
) -> Option<Notice> {
    if !cell.with_state(InterestState::begin_vote)? {
        return None;
    }
    let result = api.register_interest().await;
    cell.with_state(|s| s.finish_vote(result, cache))
}
