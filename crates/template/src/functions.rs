//! Custom filters for project templates

/// Quote a string as a TOML basic string
///
/// Usage: `{{ author_name | quote }}`
///
/// Examples:
/// - `hello` → `"hello"`
/// - `say "hi"` → `"say \"hi\""`
/// - `path\to\file` → `"path\\to\\file"`
#[must_use]
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Normalize a package name the way package indexes compare them
///
/// Runs of `-`, `_` and `.` collapse to a single `-`, and the result is
/// lowercased.
///
/// Usage: `{{ name | normalize }}`
#[must_use]
pub fn normalize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.chars() {
        if matches!(ch, '-' | '_' | '.') {
            pending_dash = !out.is_empty();
        } else {
            if pending_dash {
                out.push('-');
                pending_dash = false;
            }
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Title line for generated readmes, `my_project` → `My Project`
///
/// Usage: `{{ name | title_case }}`
#[must_use]
pub fn title_case(value: &str) -> String {
    value
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
