// Inline style handling
//
// Only one property matters to the site rules: the background image a node
// paints with. Browsers report it through `style.backgroundImage` in a
// normalized `url("...")` form regardless of how the author quoted it, and the
// rules rely on that form, so this module reproduces the normalization.

/// Extract the effective inline background image of a `style` attribute.
///
/// Both `background-image` and the `background` shorthand count; the last
/// declaration wins. Returns `None` when neither property is declared.
pub fn inline_background_image(style: &str) -> Option<String> {
    let mut image = None;

    for declaration in split_declarations(style) {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();

        match property.as_str() {
            "background-image" => {
                image = Some(match css_url(value) {
                    Some(url) => serialize_url(&url),
                    None => value.to_string(),
                });
            }
            "background" => {
                image = Some(match css_url(value) {
                    Some(url) => serialize_url(&url),
                    None => "none".to_string(),
                });
            }
            _ => {}
        }
    }

    image
}

/// Serialize a URL the way `style.backgroundImage` reports it.
pub fn serialize_url(url: &str) -> String {
    format!("url(\"{}\")", url.replace('"', "\\\""))
}

/// The first `url(...)` argument in a CSS value, unquoted.
pub fn css_url(value: &str) -> Option<String> {
    let start = value.to_ascii_lowercase().find("url(")?;
    let after = &value[start + 4..];
    let end = find_url_end(after)?;
    let url = parse_url_value(&after[..end]);

    if url.is_empty() {
        None
    } else {
        Some(url)
    }
}

fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);

    parts
}

fn find_url_end(s: &str) -> Option<usize> {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' if depth == 0 => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}

fn parse_url_value(value: &str) -> String {
    let value = value.trim();

    let unquoted = if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    };

    unquoted.to_string()
}
