// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Link graph for the synthetic site.
//!
//! Every page below the depth cap links to the page one level deeper. The
//! fan-out repeats the same child address rather than naming distinct
//! children, so crawlers also have to deduplicate within a page.

/// Links emitted by a page that is not depth-capped.
pub const LINKS_PER_PAGE: usize = 3;

/// Child-page addresses for a page at `current_depth`.
///
/// Empty once `current_depth >= max_depth`.
pub fn generate_page_links(current_depth: u64, max_depth: u64, base_url: &str) -> Vec<String> {
    if current_depth >= max_depth {
        return Vec::new();
    }
    let child = page_url(base_url, current_depth + 1);
    vec![child; LINKS_PER_PAGE]
}

/// Absolute address of the page at `depth`.
pub fn page_url(base_url: &str, depth: u64) -> String {
    format!("{}/page/{}", base_url, depth)
}
