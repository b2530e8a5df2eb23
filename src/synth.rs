// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

pub mod generator;
pub mod stats;
