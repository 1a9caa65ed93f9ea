// SPDX-License-Identifier: MIT

pub mod notify;
pub mod ruleset;
