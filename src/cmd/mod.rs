// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   run, ids, signals, options, configs
//! ```

pub mod config;
pub mod ids;
pub mod run;
