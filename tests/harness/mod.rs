// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for driving the testbed like a crawler would.
//!
//! This module provides in-process request helpers and a small breadth-first
//! crawler that records how the site behaved.

#![allow(dead_code)]

pub mod client;
pub mod crawler;
pub mod metrics;
