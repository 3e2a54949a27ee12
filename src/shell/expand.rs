use std::borrow::Cow;

use crate::core::SessionState;

/// Replaces `$?`, `$$` and `$NAME` in one left-to-right pass. Values that
/// are substituted are not scanned again. Unset names expand to nothing and
/// a `$` that starts none of these forms is kept as is.
pub fn expand_variables<'a>(text: &'a str, state: &SessionState) -> Cow<'a, str> {
    if !text.contains('$') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        match after.chars().next() {
            Some('?') => {
                out.push_str(&state.status.to_string());
                rest = &after[1..];
            }
            Some('$') => {
                out.push_str(&state.pid().to_string());
                rest = &after[1..];
            }
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {
                let len = after
                    .find(|c: char| c != '_' && !c.is_ascii_alphanumeric())
                    .unwrap_or(after.len());
                out.push_str(state.env.get(&after[..len]).unwrap_or_default());
                rest = &after[len..];
            }
            _ => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
