//! Character level scanning of assignment text.
//!
//! Every matcher takes the text still to be parsed and, on success, returns
//! the matched token together with the remainder, with leading whitespace
//! already skipped.  Nothing here knows about entities or the symbol table,
//! the parser modules build on top of these primitives.

/// Is the character any valid whitespace
pub(crate) fn is_whitespace(c: char) -> bool {
    // A0 = Non breaking space
    "\t \u{A0}".contains(c) || is_newline(c)
}

/// Is the character a valid newline character
pub(crate) fn is_newline(c: char) -> bool {
    // 0B = Vertical Tab
    // 0C = Form Feed
    "\n\x0B\x0C\r".contains(c)
}

/// Can the character continue a reference or a keyword
fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Remove whitespace from both ends of the text
pub(crate) fn trim(text: &str) -> &str {
    text.trim_matches(is_whitespace)
}

/// Remove leading whitespace
pub(crate) fn trim_start(text: &str) -> &str {
    text.trim_start_matches(is_whitespace)
}

/// Extract the content of a `{ ... }` group at the start of the text.
/// Returns the remaining text and the group content, both trimmed.  If the
/// text does not start with a brace, or the braces are not balanced, the
/// text is returned unchanged with no content.
pub(crate) fn extract_curlybrack(text: &str) -> (&str, Option<&str>) {
    extract_bracket(text, '{', '}')
}

/// Extract the content of a `( ... )` group, see [`extract_curlybrack`]
pub(crate) fn extract_parenth(text: &str) -> (&str, Option<&str>) {
    extract_bracket(text, '(', ')')
}

/// Extract the content of a `[ ... ]` group, see [`extract_curlybrack`]
pub(crate) fn extract_squarebrack(text: &str) -> (&str, Option<&str>) {
    extract_bracket(text, '[', ']')
}

fn extract_bracket(text: &str, open: char, close: char) -> (&str, Option<&str>) {
    let trimmed = trim_start(text);
    if !trimmed.starts_with(open) {
        return (text, None);
    }

    let mut depth = 0usize;
    let mut quote = None;
    for (offset, c) in trimmed.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        if c == '\'' || c == '"' {
            quote = Some(c);
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                let inner = &trimmed[open.len_utf8()..offset];
                let rest = &trimmed[offset + close.len_utf8()..];
                return (trim(rest), Some(trim(inner)));
            }
        }
    }

    (text, None)
}

/// Byte offsets of every occurrence of `sep` that is not nested inside any
/// kind of bracket or quoted string.
pub(crate) fn search_top_lvl_sep(text: &str, sep: &str) -> Vec<usize> {
    let mut offsets = vec![];
    let mut depth = 0usize;
    let mut quote = None;

    for (offset, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text[offset..].starts_with(sep) => offsets.push(offset),
            _ => {}
        }
    }

    offsets
}

/// Split the text at every top level separator, trimming each part.  Empty
/// text gives no parts at all, while empty parts between separators are kept.
pub(crate) fn split_top_level<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    if trim(text).is_empty() {
        return vec![];
    }

    let mut parts = vec![];
    let mut start = 0;
    for offset in search_top_lvl_sep(text, sep) {
        parts.push(trim(&text[start..offset]));
        start = offset + sep.len();
    }
    parts.push(trim(&text[start..]));

    parts
}

/// Match a reference of either case: a letter followed by letters, digits
/// and hyphens, where a hyphen is neither doubled nor trailing.
pub(crate) fn reference(text: &str) -> Option<(&str, &str)> {
    let text = trim_start(text);
    let bytes = text.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }

    let mut len = 1;
    while len < bytes.len() {
        match bytes[len] {
            b if b.is_ascii_alphanumeric() => len += 1,
            b'-' if bytes.get(len + 1).is_some_and(u8::is_ascii_alphanumeric) => len += 1,
            _ => break,
        }
    }

    Some((&text[..len], trim_start(&text[len..])))
}

/// Match an identifier or value reference, beginning with a lowercase letter
pub(crate) fn identifier(text: &str) -> Option<(&str, &str)> {
    reference(text).filter(|(name, _)| is_lowercase_initial(name))
}

/// Match a type, class or set reference, beginning with an uppercase letter
pub(crate) fn type_reference(text: &str) -> Option<(&str, &str)> {
    reference(text).filter(|(name, _)| !is_lowercase_initial(name))
}

/// Match a class field reference `&name` or `&Name`.  The returned name
/// keeps the leading ampersand.
pub(crate) fn field_reference(text: &str) -> Option<(&str, &str)> {
    let text = trim_start(text);
    let rest = text.strip_prefix('&')?;
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let (name, rest) = reference(rest)?;
    Some((&text[..name.len() + 1], rest))
}

pub(crate) fn is_lowercase_initial(name: &str) -> bool {
    name.trim_start_matches('&')
        .starts_with(|c: char| c.is_ascii_lowercase())
}

/// Match a signed decimal number.  The digits may not run straight into an
/// identifier character, so `5a` is not a number.
pub(crate) fn number(text: &str) -> Option<(&str, &str)> {
    let text = trim_start(text);
    let digits = text.strip_prefix('-').unwrap_or(text);
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }

    let end = text.len() - digits.len() + len;
    if text[end..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '-') {
        return None;
    }

    Some((&text[..end], trim_start(&text[end..])))
}

/// Match a keyword made of one or more words separated by whitespace.  Each
/// word must end at a word boundary.
pub(crate) fn keyword<'a>(text: &'a str, kw: &str) -> Option<&'a str> {
    let mut text = text;
    for word in kw.split(' ') {
        text = trim_start(text).strip_prefix(word)?;
        if text.starts_with(is_reference_char) && word.ends_with(is_reference_char) {
            return None;
        }
    }

    Some(trim_start(text))
}

/// Find the first top level, whole word occurrence of a keyword.  Returns
/// the byte offset of its start and of the text following it.
pub(crate) fn find_keyword(text: &str, kw: &str) -> Option<(usize, usize)> {
    let first = kw.split(' ').next()?;
    let mut depth = 0usize;
    let mut quote = None;
    let mut prev = None;

    for (offset, c) in text.char_indices() {
        let at_boundary = !prev.is_some_and(is_reference_char);
        prev = Some(c);

        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && at_boundary && text[offset..].starts_with(first) => {
                if let Some(rest) = keyword(&text[offset..], kw) {
                    return Some((offset, text.len() - rest.len()));
                }
            }
            _ => {}
        }
    }

    None
}

/// Match a `'...'B` or `'...'H` literal, returning the raw body between the
/// quotes and the radix letter.
pub(crate) fn quoted_literal(text: &str) -> Option<(&str, char, &str)> {
    let text = trim_start(text);
    let body = text.strip_prefix('\'')?;
    let end = body.find('\'')?;
    let rest = &body[end + 1..];

    let radix = rest.chars().next().filter(|c| matches!(c, 'B' | 'H'))?;
    let rest = &rest[1..];
    if rest.starts_with(is_reference_char) {
        return None;
    }

    Some((&body[..end], radix, trim_start(rest)))
}

/// Match a `"..."` character string literal, where `""` stands for a single
/// quotation mark.
pub(crate) fn cstring(text: &str) -> Option<(String, &str)> {
    let text = trim_start(text);
    let mut body = text.strip_prefix('"')?;
    let mut value = String::new();

    loop {
        let end = body.find('"')?;
        value.push_str(&body[..end]);
        body = &body[end + 1..];

        match body.strip_prefix('"') {
            Some(rest) => {
                value.push('"');
                body = rest;
            }
            None => return Some((value, trim_start(body))),
        }
    }
}
