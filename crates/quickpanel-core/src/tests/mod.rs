//! Test module for quickpanel-core
//!
//! This module contains tests for:
//! - VI scheduler state machine (admission, completion, suspend/drain, user events)
//! - Freeze and target-retention invariants under random operation sequences
//! - Notification list transitions (post, update, reorder, remove, swipe, clear-all)
//! - Minicontrol insert/resize/remove
//! - Quick-settings reordering
//! - The `QuickPanel` facade and its snapshots

// Test modules use exact float comparisons and test-specific casts
#![allow(clippy::float_cmp, clippy::cast_possible_truncation)]

mod minictrl_tests;
mod scheduler_tests;
