/// Visible delimiter that replaces line breaks in report text.
pub const LINE_DELIMITER: &str = "<br>";

/// Joins multi-line text into a single line using [`LINE_DELIMITER`].
///
/// Splits on `\n` and strips a trailing `\r` from every segment, so CRLF
/// input never leaves a raw carriage return behind. Empty segments are kept.
pub fn join_lines(text: &str) -> String {
    if !text.contains('\n') && !text.contains('\r') {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).replace('\r', ""))
        .collect::<Vec<_>>()
        .join(LINE_DELIMITER)
}

/// Joins trace frames, themselves possibly multi-line, into one line.
pub fn join_frames(frames: &[String]) -> String {
    join_lines(&frames.join("\n"))
}
