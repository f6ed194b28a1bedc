pub(crate) fn split_lines(text: &str) -> Vec<String> {
    // `str::split('\n')` preserves trailing empty segments, so one line break is `["", ""]`,
    // matching how edit records store their content.
    text.split('\n').map(str::to_string).collect()
}

pub(crate) fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Text is stored with LF newlines; CRLF and lone CR are folded into LF on the way in.
pub(crate) fn normalize_line_endings(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}
