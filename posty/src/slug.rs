//! Title sanitising used to derive column ids and rewrite slugs.

/// Convert a display title into a host-compatible slug.
///
/// Markup is stripped and the text is lowercased. Letters and digits from
/// any script are kept along with `_`, whitespace, dots and slashes become
/// dashes, and everything else is dropped. Runs of dashes collapse and
/// leading/trailing dashes are trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in strip_tags(title).chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '.' || c == '/' {
            slug.push('-');
        }
    }
    slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
