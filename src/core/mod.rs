// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process and environment management.
//!
//! ```text
//!              core
//!               |
//!       +-------+--------+
//!       v                v
//!      env            process
//!       |                |
//!   EnvPolicy     start / Process / ProcessState
//!   current_env   Signal / Pid / wait_timeout
//!                        |
//!                       sys   unix | windows | unsupported
//! ```

pub mod env;
pub mod process;
