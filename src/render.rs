// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML page rendering.

use rand::Rng;
use std::fmt::Write;

/// Filler lines per page.
pub const FILLER_LINES: usize = 10;

/// Character repeated in the `large` payload block.
pub const FILLER_CHAR: char = 'A';

/// Body of the standalone `/rate_limit` page.
pub const RATE_LIMITED_PAGE: &str = "<html><head><title>Rate Limited Page</title></head>\
<body><h1>Rate Limited Page</h1><p>This page is rate-limited.</p></body></html>";

/// Render a page at `depth` linking to `links`.
pub fn render_page(depth: u64, links: &[String]) -> String {
    render_page_with(&mut rand::thread_rng(), depth, links)
}

/// Render a page drawing filler values from `rng`.
pub fn render_page_with<R: Rng + ?Sized>(rng: &mut R, depth: u64, links: &[String]) -> String {
    let mut html = String::with_capacity(512 + links.len() * 96);

    // write! into a String cannot fail
    let _ = write!(
        html,
        "<html>\n<head><title>Page at Depth {depth}</title></head>\n<body>\n\
         <h1>Welcome to Page at Depth {depth}</h1>\n"
    );

    for _ in 0..FILLER_LINES {
        let value: u8 = rng.gen_range(1..=100);
        let _ = writeln!(html, "<div>Random content for depth {depth}: {value}</div>");
    }

    html.push_str("<h2>Links to Next Pages:</h2>\n");
    for link in links {
        let escaped = escape_html(link);
        let _ = writeln!(html, "<a href=\"{escaped}\">{escaped}</a><br>");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Filler block appended by the `large` outcome.
///
/// `size` counts only the repeated characters, not the wrapping tag.
pub fn large_payload(size: usize) -> String {
    let mut block = String::with_capacity(size + 7);
    block.push_str("<p>");
    block.extend(std::iter::repeat(FILLER_CHAR).take(size));
    block.push_str("</p>");
    block
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
