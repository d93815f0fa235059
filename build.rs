/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

fn main() {
    // Writes $OUT_DIR/built.rs, included by the version string of the CLI.
    built::write_built_file().expect("Failed to acquire build-time information");
}
