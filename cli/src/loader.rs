//! Splitting a module file into assignments that can be given to the
//! compiler one at a time.

/// The parts of a module file the compiler needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module<'a> {
    /// Name in the module header, if there is a header
    pub name: Option<String>,

    /// The header contains `EXTENSIBILITY IMPLIED`
    pub extensibility_implied: bool,

    /// Assignments of the module body, in source order
    pub assignments: Vec<Assignment<'a>>,
}

/// A single assignment and where it starts in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub text: &'a str,

    /// Byte offset of the text within the source file
    pub offset: usize,
}

/// Replace every comment with spaces.  Byte offsets into the result match
/// those in the original text.
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;
    let mut in_string = false;

    while i < bytes.len() {
        if in_string {
            in_string = bytes[i] != b'"';
            i += 1;
        } else if bytes[i] == b'"' {
            in_string = true;
            i += 1;
        } else if bytes[i..].starts_with(b"--") {
            let mut end = i + 2;
            while end < bytes.len() && bytes[end] != b'\n' && !bytes[end..].starts_with(b"--") {
                end += 1;
            }
            if bytes[end..].starts_with(b"--") {
                end += 2;
            }
            blank(&mut out[i..end]);
            i = end;
        } else if bytes[i..].starts_with(b"/*") {
            let mut depth = 0;
            let mut end = i;
            while end < bytes.len() {
                if bytes[end..].starts_with(b"/*") {
                    depth += 1;
                    end += 2;
                } else if bytes[end..].starts_with(b"*/") {
                    depth -= 1;
                    end += 2;
                    if depth == 0 {
                        break;
                    }
                } else {
                    end += 1;
                }
            }
            blank(&mut out[i..end]);
            i = end;
        } else {
            i += 1;
        }
    }

    // comments are blanked whole, so multi-byte characters are never split
    String::from_utf8(out).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into())
}

/// Overwrite text with spaces, keeping line breaks
fn blank(text: &mut [u8]) {
    for byte in text {
        if *byte != b'\n' {
            *byte = b' ';
        }
    }
}

/// Find the module header and body, then split the body into assignments.
/// `source` must already have its comments removed.
pub fn load(source: &str) -> Module<'_> {
    let begin = find_word(source, "BEGIN");
    let end = rfind_word(source, "END");
    let (header, body, body_offset) = match (begin, end) {
        (Some(begin), Some(end)) if begin < end => {
            (&source[..begin], &source[begin + 5..end], begin + 5)
        }
        _ => ("", source, 0),
    };

    let name = header
        .split_whitespace()
        .next()
        .filter(|_| find_word(header, "DEFINITIONS").is_some())
        .map(str::to_string);
    let extensibility_implied = header
        .split_whitespace()
        .collect::<Vec<_>>()
        .windows(2)
        .any(|words| words == ["EXTENSIBILITY", "IMPLIED"]);

    let body = skip_clause(body, "EXPORTS");
    let body = skip_clause(&body, "IMPORTS");

    let assignments = split_assignments(&body)
        .into_iter()
        .map(|range| Assignment {
            text: source[body_offset + range.start..body_offset + range.end].trim(),
            offset: body_offset + range.start,
        })
        .filter(|assignment| !assignment.text.is_empty())
        .collect();

    Module {
        name,
        extensibility_implied,
        assignments,
    }
}

/// Blank out a clause such as `IMPORTS ... ;`, keeping byte offsets
fn skip_clause(body: &str, keyword: &str) -> String {
    let mut out = body.to_string();
    if let Some(start) = find_word(body, keyword) {
        let end = body[start..]
            .find(';')
            .map_or(body.len(), |end| start + end + 1);
        let blanked = " ".repeat(end - start);
        out.replace_range(start..end, &blanked);
    }
    out
}

/// Byte ranges of each assignment.  An assignment starts at the first line
/// at bracket depth zero that begins with a name and is followed by a top
/// level `::=` before the next such line.
fn split_assignments(body: &str) -> Vec<std::ops::Range<usize>> {
    let bytes = body.as_bytes();
    let mut candidates = vec![];
    let mut starts: Vec<usize> = vec![];
    let mut depth = 0usize;
    let mut line_start = true;
    let mut quote = None;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'\n' => line_start = true,
            b' ' | b'\t' | b'\r' => {}
            _ => {
                if line_start && depth == 0 && b.is_ascii_alphabetic() {
                    candidates.push(i);
                }
                line_start = false;

                match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'{' | b'(' | b'[' => depth += 1,
                    b'}' | b')' | b']' => depth = depth.saturating_sub(1),
                    b':' if depth == 0 && bytes[i..].starts_with(b"::=") => {
                        let head = candidates.iter().rev().find(|&&c| c <= i).copied();
                        if let Some(head) = head {
                            if starts.last() != Some(&head) {
                                starts.push(head);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    let mut ranges = vec![];
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(body.len());
        ranges.push(start..end);
    }
    ranges
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

/// Position of a whole word within the text
fn find_word(text: &str, word: &str) -> Option<usize> {
    text.match_indices(word)
        .map(|(i, _)| i)
        .find(|&i| is_whole_word(text, i, word.len()))
}

fn rfind_word(text: &str, word: &str) -> Option<usize> {
    text.rmatch_indices(word)
        .map(|(i, _)| i)
        .find(|&i| is_whole_word(text, i, word.len()))
}

fn is_whole_word(text: &str, start: usize, len: usize) -> bool {
    let bytes = text.as_bytes();
    let before = start == 0 || !is_word_byte(bytes[start - 1]);
    let after = bytes.get(start + len).map_or(true, |&b| !is_word_byte(b));
    before && after
}
