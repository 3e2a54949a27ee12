use inksac::prelude::*;

use crate::shell::chain::operator_at;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// What a word on the command line is, for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Command { known: bool },
    Flag,
    Variable,
    Operator,
    Comment,
    Plain,
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colours `input` without changing its text: the first word of each
    /// chain segment, flags, `$` references, operators and comments.
    pub fn highlight_command(&self, input: &str, is_known: impl Fn(&str) -> bool) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len() * 2);
        for (text, token) in tokenize(input, is_known) {
            match style_for(token) {
                Some(style) => out.push_str(&text.style(style).to_string()),
                None => out.push_str(text),
            }
        }
        out
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        if !self.enabled() {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();

        hint.style(hint_style).to_string()
    }
}

fn style_for(token: Token) -> Option<Style> {
    let style = match token {
        Token::Command { known: true } => Style::builder().foreground(Color::Cyan).bold().build(),
        Token::Command { known: false } => Style::builder().foreground(Color::Red).bold().build(),
        Token::Flag => Style::builder().foreground(Color::Yellow).build(),
        Token::Variable => Style::builder().foreground(Color::Green).build(),
        Token::Operator => Style::builder()
            .foreground(Color::RGB(198, 120, 221))
            .bold()
            .build(),
        Token::Comment => Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build(),
        Token::Plain => return None,
    };
    Some(style)
}

/// Splits `input` into pieces that concatenate back to it exactly.
fn tokenize(input: &str, is_known: impl Fn(&str) -> bool) -> Vec<(&str, Token)> {
    let mut tokens = Vec::new();
    let mut expect_command = true;
    let mut index = 0;

    while let Some(c) = input[index..].chars().next() {
        if let Some(operator) = operator_at(input, index) {
            let end = index + operator.width();
            tokens.push((&input[index..end], Token::Operator));
            expect_command = true;
            index = end;
            continue;
        }

        if c.is_whitespace() {
            let end = index + c.len_utf8();
            tokens.push((&input[index..end], Token::Plain));
            index = end;
            continue;
        }

        let at_word_start = input[..index]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if c == '#' && at_word_start {
            tokens.push((&input[index..], Token::Comment));
            break;
        }

        let end = word_end(input, index);
        let word = &input[index..end];
        let token = if expect_command {
            Token::Command {
                known: is_known(word) || word.contains('/'),
            }
        } else if word.starts_with('-') {
            Token::Flag
        } else if word.starts_with('$') {
            Token::Variable
        } else {
            Token::Plain
        };
        tokens.push((word, token));
        expect_command = false;
        index = end;
    }
    tokens
}

fn word_end(input: &str, start: usize) -> usize {
    input[start..]
        .char_indices()
        .find(|&(offset, c)| c.is_whitespace() || operator_at(input, start + offset).is_some())
        .map_or(input.len(), |(offset, _)| start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(&str, Token)> {
        tokenize(input, |word| word == "ls")
            .into_iter()
            .filter(|(text, _)| !text.trim().is_empty())
            .collect()
    }

    #[test]
    fn test_tokens_rebuild_input() {
        let input = "ls -l $HOME&&nope  x ;  # done";
        let joined: String = tokenize(input, |_| true)
            .into_iter()
            .map(|(text, _)| text)
            .collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn test_token_kinds() {
        assert_eq!(
            kinds("ls -l $HOME&&nope x # done"),
            vec![
                ("ls", Token::Command { known: true }),
                ("-l", Token::Flag),
                ("$HOME", Token::Variable),
                ("&&", Token::Operator),
                ("nope", Token::Command { known: false }),
                ("x", Token::Plain),
                ("# done", Token::Comment),
            ]
        );
    }

    #[test]
    fn test_paths_count_as_known_commands() {
        assert_eq!(
            kinds("./run.sh"),
            vec![("./run.sh", Token::Command { known: true })]
        );
    }

    #[test]
    fn test_hash_inside_word_is_not_comment() {
        assert_eq!(
            kinds("ls a#b"),
            vec![
                ("ls", Token::Command { known: true }),
                ("a#b", Token::Plain)
            ]
        );
    }

    #[test]
    fn test_no_color_passthrough() {
        let highlighter = SyntaxHighlighter {
            color_support: ColorSupport::NoColor,
        };
        assert_eq!(highlighter.highlight_command("ls; pwd", |_| true), "ls; pwd");
    }
}
