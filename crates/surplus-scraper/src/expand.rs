//! Reverses the auction platform's shorthand-token compression of listing HTML.

/// Token → markup table, applied once each in this order. An expansion can
/// complete an earlier token (`"@@E"` becomes `"@AUCTION"`), which is left as
/// text, so the order must match the site's own decoder.
const TOKENS: [(&str, &str); 12] = [
    ("@A", "<div class=\""),
    ("@B", "</div>"),
    ("@C", "class=\""),
    ("@D", "<div>"),
    ("@E", "AUCTION"),
    ("@F", "</td><td"),
    ("@G", "</td></tr>"),
    ("@H", "<tr><td "),
    ("@I", "table"),
    ("@J", "p_back=\"NextCheck="),
    ("@K", "style=\"Display:none\""),
    ("@L", "/index.cfm?zaction=auction&zmethod=details&AID="),
];

/// Expands every `@A`..`@L` token in `html`. Anything else is left untouched.
#[must_use]
pub fn expand_tokens(html: &str) -> String {
    let mut out = html.to_owned();
    for (token, expansion) in TOKENS {
        if out.contains(token) {
            out = out.replace(token, expansion);
        }
    }
    out
}
