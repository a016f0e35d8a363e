//! Sandboxed preview host policy
//!
//! Assembled documents run inside an iframe `srcdoc` or are served with a
//! `Content-Security-Policy: sandbox` header. Both use the same allow-list.

use crate::html::Element;

/// Capabilities granted to a preview; everything else stays sandboxed
pub const SANDBOX_TOKENS: [&str; 5] = [
    "allow-scripts",
    "allow-popups",
    "allow-popups-to-escape-sandbox",
    "allow-same-origin",
    "allow-downloads",
];

pub const PREVIEW_TITLE: &str = "Digital Card Preview";
const FRAME_STYLE: &str = "width:100%;min-height:100vh;border:none;background-color:#fff;";

/// Space-separated allow-list for the `sandbox` attribute
pub fn sandbox_attribute() -> String {
    SANDBOX_TOKENS.join(" ")
}

/// Header value for serving a preview document directly
pub fn csp_header_value() -> String {
    format!("sandbox {}", sandbox_attribute())
}

/// `<iframe>` embedding `document` as `srcdoc`
pub fn iframe_embed(document: &str) -> String {
    Element::new("iframe")
        .attr("title", PREVIEW_TITLE)
        .attr("srcdoc", document)
        .attr("sandbox", sandbox_attribute())
        .style(FRAME_STYLE)
        .to_html()
}
