// SPDX-License-Identifier: MIT

//! CLI command implementations

pub mod wait;
