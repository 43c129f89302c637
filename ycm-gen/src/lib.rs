// SPDX-License-Identifier: GPL-3.0-or-later

pub mod args;
pub mod build;
pub mod config;
pub mod context;
pub mod environment;
pub mod intercept;
pub mod modes;
pub mod output;
pub mod reduce;
pub mod select;
