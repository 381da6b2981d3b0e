/// Lines of a script as a JavaScript engine numbers them.
///
/// Splits at `\n`, `\r\n`, a lone `\r`, U+2028 and U+2029. Like
/// [`str::lines`], a trailing terminator does not start another line and an
/// empty source has no lines.
pub fn source_lines(source: &str) -> SourceLines<'_> {
    SourceLines { rest: source }
}

#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
}

fn is_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(at) = self.rest.find(is_terminator) else {
            return Some(std::mem::take(&mut self.rest));
        };
        let (line, tail) = self.rest.split_at(at);
        let width = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        self.rest = &tail[width..];
        Some(line)
    }
}
