//! Browser side of the CollegeConnect landing page.
//!
//! The interest control is driven by [`interest::InterestState`], which only
//! knows about a [`cache::VoteCache`] and the results of [`client::CounterApi`]
//! calls, so it runs the same natively and in the browser. The leptos view in
//! `app` is compiled for `wasm32` only.

pub mod cache;
pub mod client;
pub mod interest;

#[cfg(target_arch = "wasm32")]
pub mod app;
