// SPDX-License-Identifier: GPL-3.0-or-later

mod exit_codes;
mod generate;
