/// Normalize display text into a slug.
///
/// Lowercases, maps direction arrows to letters and replaces whitespace and
/// separator punctuation with `_`. Runs of separators are not collapsed, so the
/// mapping stays one char to one char.
pub fn canonicalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '↓' => out.push('d'),
            '↑' => out.push('u'),
            '→' => out.push('r'),
            c if c.is_whitespace() || is_separator(c) => out.push('_'),
            c => out.extend(c.to_lowercase()),
        }
    }
    out
}

fn is_separator(ch: char) -> bool {
    matches!(
        ch,
        '.' | ':' | '/' | '\\' | '-' | '+' | '(' | ')' | '\''
    )
}
