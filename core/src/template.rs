//! Positional `{0}`-style substitution for statement templates.

use core::fmt::{Display, Write};

use crate::error::{Result, SluiceError};

/// Substitutes `{n}` placeholders in `template` with `args[n]`.
///
/// `{{` and `}}` produce literal braces. A template given no arguments is
/// returned untouched so raw SQL containing braces passes through.
pub fn format_template(template: &str, args: &[&dyn Display]) -> Result<String> {
    if args.is_empty() {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut index = String::new();
                let mut closed = false;
                for (_, d) in chars.by_ref() {
                    if d == '}' {
                        closed = true;
                        break;
                    }
                    index.push(d);
                }
                if !closed {
                    return Err(SluiceError::Template(format!(
                        "unterminated placeholder at offset {pos}"
                    )));
                }
                let n: usize = index.trim().parse().map_err(|_| {
                    SluiceError::Template(format!("invalid placeholder '{{{index}}}'"))
                })?;
                let arg = args.get(n).ok_or_else(|| {
                    SluiceError::Template(format!(
                        "placeholder {{{n}}} has no argument ({} given)",
                        args.len()
                    ))
                })?;
                // Writing to a String cannot fail
                let _ = write!(out, "{arg}");
            }
            '}' => {
                return Err(SluiceError::Template(format!(
                    "unmatched '}}' at offset {pos}"
                )));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
