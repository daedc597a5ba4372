//! Markdown to plain narration text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Substitutions applied in order. Code and images go first so their
/// contents never reach the link and emphasis rules.
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Fenced code blocks
        (r"(?s)```.*?```", ""),
        // Images
        (r"!\[[^\]]*\]\([^)]*\)", ""),
        // Links keep their text
        (r"\[([^\]]+)\]\([^)]+\)", "$1"),
        // HTML tags
        (r"<[^>]+>", ""),
        // Horizontal rules
        (r"(?m)^[ \t]*[-*_]{3,}[ \t]*$", ""),
        // Headers become a sentence followed by a pause
        (r"(?m)^#{1,6}[ \t]+(.+)$", "$1.\n"),
        // Bold/italic markers
        (r"\*\*\*([^*]+)\*\*\*", "$1"),
        (r"\*\*([^*]+)\*\*", "$1"),
        (r"\*([^*]+)\*", "$1"),
        (r"___([^_]+)___", "$1"),
        (r"__([^_]+)__", "$1"),
        (r"_([^_]+)_", "$1"),
        // Inline code keeps its text
        (r"`([^`]+)`", "$1"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

static EXTRA_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static REPEATED_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Convert markdown into plain text suitable for narration.
///
/// Strips code, images, links, HTML, rules, headers and emphasis, then
/// collapses redundant blank lines and spaces.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = markdown.replace("\r\n", "\n");

    for (pattern, replacement) in RULES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    let text = EXTRA_BLANK_LINES.replace_all(&text, "\n\n");
    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    // Trimming lines can leave new runs of blank lines behind
    let text = EXTRA_BLANK_LINES.replace_all(&text, "\n\n");
    let text = REPEATED_SPACES.replace_all(&text, " ");

    text.trim().to_string()
}
