use std::fmt;

use thiserror::Error;

/// Relation of a segment to the outcome of the one before it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChainOperator {
    /// First segment of a line; always runs.
    #[default]
    None,
    Semicolon,
    And,
    Or,
}

impl ChainOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainOperator::None => "",
            ChainOperator::Semicolon => ";",
            ChainOperator::And => "&&",
            ChainOperator::Or => "||",
        }
    }

    /// Bytes the operator occupies in the line.
    pub fn width(self) -> usize {
        self.as_str().len()
    }

    /// Whether a segment introduced by this operator runs, given the
    /// status left by the previous segment.
    pub fn permits(self, status: i32) -> bool {
        match self {
            ChainOperator::None | ChainOperator::Semicolon => true,
            ChainOperator::And => status == 0,
            ChainOperator::Or => status != 0,
        }
    }
}

impl fmt::Display for ChainOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operator starting at byte `index` of `line`, if any. `&&` and `||`
/// need both characters; a lone `&` or `|` is plain text.
pub fn operator_at(line: &str, index: usize) -> Option<ChainOperator> {
    match line.as_bytes().get(index..)? {
        [b';', ..] => Some(ChainOperator::Semicolon),
        [b'&', b'&', ..] => Some(ChainOperator::And),
        [b'|', b'|', ..] => Some(ChainOperator::Or),
        _ => None,
    }
}

pub fn contains_operator(text: &str) -> bool {
    (0..text.len()).any(|index| operator_at(text, index).is_some())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSegment<'a> {
    pub operator: ChainOperator,
    /// Raw text between operators, whitespace included.
    pub text: &'a str,
}

/// Splits a line at `;`, `&&` and `||`.
///
/// Yields one segment per operator plus one, so a line ending in an
/// operator produces a final empty segment. No quoting is recognised.
#[derive(Debug, Clone)]
pub struct ChainSplitter<'a> {
    line: &'a str,
    pos: usize,
    operator: ChainOperator,
    done: bool,
}

impl<'a> ChainSplitter<'a> {
    pub fn new(line: &'a str) -> Self {
        Self::starting_at(line, 0)
    }

    /// Starts scanning at byte offset `pos`; the first segment produced is
    /// treated as a line start.
    pub fn starting_at(line: &'a str, pos: usize) -> Self {
        Self {
            line,
            pos: pos.min(line.len()),
            operator: ChainOperator::None,
            done: false,
        }
    }

    /// Offset just past the last operator consumed, or the line length
    /// once exhausted.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for ChainSplitter<'a> {
    type Item = ChainSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.pos;
        let mut index = start;
        while index < self.line.len() {
            if let Some(next_operator) = operator_at(self.line, index) {
                let segment = ChainSegment {
                    operator: self.operator,
                    text: &self.line[start..index],
                };
                self.operator = next_operator;
                self.pos = index + next_operator.width();
                return Some(segment);
            }
            index += 1;
        }

        self.done = true;
        self.pos = self.line.len();
        Some(ChainSegment {
            operator: self.operator,
            text: &self.line[start..],
        })
    }
}

pub fn split(line: &str) -> Vec<ChainSegment<'_>> {
    ChainSplitter::new(line).collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("\"{0}\" unexpected")]
    Unexpected(ChainOperator),
    #[error("end of line unexpected after \"{0}\"")]
    MissingCommand(ChainOperator),
}

/// Rejects operators with no command before them, and `&&`/`||` with no
/// command after them. A trailing `;` is fine.
pub fn validate(segments: &[ChainSegment<'_>]) -> Result<(), ChainError> {
    for (index, segment) in segments.iter().enumerate() {
        if !segment.text.trim().is_empty() {
            continue;
        }
        match segments.get(index + 1) {
            Some(next) => return Err(ChainError::Unexpected(next.operator)),
            None if matches!(segment.operator, ChainOperator::And | ChainOperator::Or) => {
                return Err(ChainError::MissingCommand(segment.operator));
            }
            None => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(segments: &[ChainSegment<'_>]) -> String {
        segments
            .iter()
            .map(|s| format!("{}{}", s.operator, s.text))
            .collect()
    }

    #[test]
    fn test_split_all_operators() {
        let segments = split("ls -l; false && echo no || echo yes");
        let ops: Vec<ChainOperator> = segments.iter().map(|s| s.operator).collect();
        let texts: Vec<&str> = segments.iter().map(|s| s.text).collect();
        assert_eq!(
            ops,
            vec![
                ChainOperator::None,
                ChainOperator::Semicolon,
                ChainOperator::And,
                ChainOperator::Or
            ]
        );
        assert_eq!(texts, vec!["ls -l", " false ", " echo no ", " echo yes"]);
    }

    #[test]
    fn test_round_trip() {
        for line in [
            "",
            "ls",
            "a;b;c",
            "a && b || c ; d",
            "a;",
            "&& a",
            "a &&& b",
            "a ||| b;;",
            "echo a & b | c",
            "x;&&||;",
        ] {
            assert_eq!(rejoin(&split(line)), line, "line {:?}", line);
        }
    }

    #[test]
    fn test_single_ampersand_and_pipe_are_text() {
        let segments = split("echo a & b | c");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "echo a & b | c");
    }

    #[test]
    fn test_greedy_two_char_operators() {
        let segments = split("a &&& b");
        assert_eq!(segments[1].operator, ChainOperator::And);
        assert_eq!(segments[1].text, "& b");
    }

    #[test]
    fn test_splitter_position() {
        let line = "ab;cd&&ef";
        let mut splitter = ChainSplitter::new(line);
        assert_eq!(splitter.next().unwrap().text, "ab");
        assert_eq!(splitter.position(), 3);
        assert_eq!(splitter.next().unwrap().text, "cd");
        assert_eq!(splitter.position(), 7);

        let resumed: Vec<_> = ChainSplitter::starting_at(line, 3).collect();
        assert_eq!(resumed[0].operator, ChainOperator::None);
        assert_eq!(resumed[0].text, "cd");
        assert_eq!(resumed[1].operator, ChainOperator::And);
    }

    #[test]
    fn test_multibyte_text_is_kept_whole() {
        let segments = split("echo é;echo ü");
        assert_eq!(segments[0].text, "echo é");
        assert_eq!(segments[1].text, "echo ü");
    }

    #[test]
    fn test_validate() {
        assert!(validate(&split("ls; pwd;")).is_ok());
        assert!(validate(&split("   ")).is_ok());
        assert_eq!(
            validate(&split("; ls")),
            Err(ChainError::Unexpected(ChainOperator::Semicolon))
        );
        assert_eq!(
            validate(&split("ls && && pwd")),
            Err(ChainError::Unexpected(ChainOperator::And))
        );
        assert_eq!(
            validate(&split("ls ||")),
            Err(ChainError::MissingCommand(ChainOperator::Or))
        );
    }

    #[test]
    fn test_permits() {
        assert!(ChainOperator::Semicolon.permits(1));
        assert!(ChainOperator::And.permits(0));
        assert!(!ChainOperator::And.permits(1));
        assert!(ChainOperator::Or.permits(127));
        assert!(!ChainOperator::Or.permits(0));
    }

    #[test]
    fn test_contains_operator() {
        assert!(contains_operator("ls; pwd"));
        assert!(contains_operator("a||b"));
        assert!(!contains_operator("a | b & c"));
    }
}
