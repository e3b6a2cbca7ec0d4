//! License template rendering
//!
//! Upstream license bodies mark the copyright line with ad-hoc tokens that
//! differ per license family ("[year]", "[yyyy]", "<year>", ...). Rendering
//! rewrites them to one placeholder pair so every cached template is filled
//! the same way.

use crate::catalog::LicenseDetail;

/// Placeholder written for the copyright year
pub const YEAR_PLACEHOLDER: &str = "{{year}}";

/// Placeholder written for the copyright holder
pub const FULLNAME_PLACEHOLDER: &str = "{{fullname}}";

/// Upstream tokens rewritten to [`YEAR_PLACEHOLDER`]
const YEAR_TOKENS: [&str; 3] = ["[year]", "[yyyy]", "<year>"];

/// Upstream tokens rewritten to [`FULLNAME_PLACEHOLDER`]
const FULLNAME_TOKENS: [&str; 5] = [
    "[fullname]",
    "[name of copyright owner]",
    "[name of author]",
    "<name of author>",
    "<owner>",
];

/// Render a license detail into reusable template text
pub fn render(detail: &LicenseDetail) -> String {
    let mut body = detail.body.clone();

    for token in YEAR_TOKENS {
        body = body.replace(token, YEAR_PLACEHOLDER);
    }
    for token in FULLNAME_TOKENS {
        body = body.replace(token, FULLNAME_PLACEHOLDER);
    }

    body
}

/// Fill a rendered template's placeholders with concrete values
pub fn fill(template: &str, fullname: &str, year: &str) -> String {
    template
        .replace(YEAR_PLACEHOLDER, year)
        .replace(FULLNAME_PLACEHOLDER, fullname)
}
