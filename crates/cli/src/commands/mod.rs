// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod album;
pub mod daemon;
pub mod folder;
pub mod rotate;
pub mod schedule;
