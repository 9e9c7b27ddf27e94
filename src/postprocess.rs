//! # postprocess: pure text transforms over the serialized document
//!
//! The serializer returns one self-contained HTML string with every
//! stylesheet inlined. Two transforms shrink it without a CSS parser:
//! flag-gated font pruning and liveness-gated custom-property pruning.
//! Correctness depends only on these two documented transforms, not on
//! general CSS parsing.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

// Variable values can nest references (`--a: var(--b, var(--c));`), so only
// the referenced name is extracted, never the full value.
static VAR_REFERENCE_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"var\s*\(\s*(?P<name>--[A-Za-z0-9\-]+)").unwrap());

static FONT_FACE_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"@font-face\s*\{[^}]*\}").unwrap());

static FONT_FAMILY_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"font-family:\s*['"]?(?P<family>[^'";}]+)"#).unwrap());

// Matches `--name: value;` declarations, also catching the one-line form
// `--a: 0px; }` where the closing brace must survive the rewrite.
static VAR_DECLARATION_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?m)(?P<name>--[A-Za-z0-9\-]+)\s*:\s*(?P<value>[^;\n}]+)[;\n]?(?P<brace>\})?")
        .unwrap()
});

/// Font families starting with this prefix carry math typesetting glyphs and
/// are kept when the document was flagged as containing math content.
pub const MATH_FONT_PREFIX: &str = "KaTeX";

/// Apply both transforms: collect the liveness set from the full serialized
/// text, then prune fonts, then prune dead variable declarations.
pub fn minimise(content: &str, keep_math_fonts: bool) -> String {
    let live = live_variables(content);
    let pruned_fonts = prune_fonts(content, keep_math_fonts);
    prune_dead_variables(&pruned_fonts, &live).into_owned()
}

/// Collect the set of custom property names referenced anywhere in the text
/// via `var(...)`.
pub fn live_variables(content: &str) -> HashSet<String> {
    VAR_REFERENCE_RE
        .captures_iter(content)
        .map(|caps| caps["name"].to_string())
        .collect()
}

/// Remove every embedded `@font-face` block, except math fonts when the
/// document was flagged as math-bearing. All other fonts are assumed
/// redundant with system fonts and dropped to minimise artifact size.
pub fn prune_fonts(content: &str, keep_math_fonts: bool) -> String {
    FONT_FACE_RE
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let block = &caps[0];
            let family = FONT_FAMILY_RE
                .captures(block)
                .map(|f| f["family"].trim().to_string())
                .unwrap_or_default();
            if keep_math_fonts && family.starts_with(MATH_FONT_PREFIX) {
                block.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Remove every custom-property declaration whose name is not in the
/// liveness set. Surviving declarations keep their exact name and value, and
/// a closing brace adjacent to a removed declaration stays in place.
pub fn prune_dead_variables<'a>(
    content: &'a str,
    live: &HashSet<String>,
) -> Cow<'a, str> {
    VAR_DECLARATION_RE.replace_all(content, |caps: &regex::Captures<'_>| {
        let name = &caps["name"];
        let brace = caps.name("brace").map(|m| m.as_str()).unwrap_or("");
        if live.contains(name) {
            format!("{}:{};{}", name, &caps["value"], brace)
        } else {
            brace.to_string()
        }
    })
}
