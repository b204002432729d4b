// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Anchorage crates.
//!
//! Enabled via feature flags to keep the core independent of any engine.

#[cfg(feature = "scene_view_adapter")]
pub mod scene_view;
