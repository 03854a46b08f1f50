//! Reddit subscription inactivity checker.
//!
//! A command-line tool that walks the authenticated user's subscribed
//! subreddits, classifies each one against an inactivity cutoff, and
//! reports the stale ones, optionally opening them in browser tabs.

pub mod checker;
pub mod config;
pub mod reddit;
pub mod report;
