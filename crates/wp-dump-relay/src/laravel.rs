//! Laravel / Symfony VarDumper text to HTML
//!
//! Plain-text dumps (as produced by `dump()` in a CLI context) are turned into
//! markup that reuses the `sf-dump-*` classes of Symfony's HTML dumper. The
//! substitutions run in a fixed order and each one sees the output of the
//! previous ones.

use regex::Regex;
use std::sync::OnceLock;

/// One substitution step
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

    RULES.get_or_init(|| {
        [
            (r"\n", "<br>"),
            (r"\s{2,}", "&nbsp;&nbsp;"),
            (r"\{#([0-9]+)", r#"<span class="sf-dump-note">{#$1</span>"#),
            (r"#([0-9A-Za-z_]+):", r#"<span class="sf-dump-private">#$1:</span>"#),
            (r"\+([0-9A-Za-z_]+):", r#"<span class="sf-dump-public">+$1:</span>"#),
            (r"-([0-9A-Za-z_]+):", r#"<span class="sf-dump-protected">-$1:</span>"#),
            (r#""([^"]+)":"#, r#""<span class="sf-dump-key">$1</span>":"#),
            (r#"=> "([^"]+)""#, r#"=> "<span class="sf-dump-str">$1</span>""#),
            (r"=> ([0-9]+)", r#"=> <span class="sf-dump-num">$1</span>"#),
            (r"=> (null|true|false)", r#"=> <span class="sf-dump-const">$1</span>"#),
            (r"array:([0-9]+)", r#"<span class="sf-dump-note">array:$1</span>"#),
            (r"\[([^\]]+)\]", r#"[<span class="sf-dump-index">$1</span>]"#),
            (r"(FluentCart\\[^\s{]+)", r#"<span class="sf-dump-class">$1</span>"#),
        ]
        .into_iter()
        .map(|(pattern, replacement)| Rule {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        })
        .collect()
    })
}

/// Render a text dump as highlighted HTML
///
/// The result is always wrapped in
/// `<div class="sf-dump laravel-dump"><pre>...</pre></div>`.
pub fn format_laravel_dump(raw: &str) -> String {
    let formatted = rules().iter().fold(raw.to_string(), |text, rule| {
        rule.pattern
            .replace_all(&text, rule.replacement)
            .into_owned()
    });

    format!(r#"<div class="sf-dump laravel-dump"><pre>{}</pre></div>"#, formatted)
}
