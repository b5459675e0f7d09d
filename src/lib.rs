// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // value sessions
pub mod config;     // run config + file formats
pub mod errors;     // error handling
pub mod freeze;     // variables -> constants
pub mod graph;      // graph model, extraction
pub mod observability;
pub mod placement;  // device heuristics
pub mod prune;      // training-node removal
pub mod traits;     // unified abstractions
