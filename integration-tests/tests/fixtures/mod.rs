// SPDX-License-Identifier: GPL-3.0-or-later

//! Test fixtures and infrastructure for the integration tests

pub mod constants;
pub mod infrastructure;

#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use infrastructure::*;
