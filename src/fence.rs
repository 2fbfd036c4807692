use crate::error::{ConvertError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Inline style applied to converted fence blocks.
pub const MONOSPACE_STYLE: &str =
    "font-family:Menlo,Consolas,'Courier New',monospace; white-space:pre";

static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());

/// A bare token on the line right after the opening fence, e.g. `bash`.
static LANG_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+#_.-]*$").unwrap());

/// Replace triple-backtick regions in a sanitized fragment with monospace
/// `<div>` blocks. `<br/>` is treated as `\n` while fences are parsed so
/// the fence sees the cell's rendered line structure; remaining newlines
/// are converted back afterwards.
///
/// An odd number of ``` markers means an unterminated fence, which is an
/// error rather than silently swallowing the rest of the field.
pub fn transform_fences(html: &str) -> Result<String> {
    if !html.contains("```") {
        return Ok(html.to_string());
    }

    let text = html.replace("<br/>", "\n");
    if text.matches("```").count() % 2 != 0 {
        return Err(ConvertError::UnterminatedFence);
    }

    let replaced = FENCE_RE.replace_all(&text, |caps: &Captures| {
        let body = strip_language_hint(caps.get(1).map_or("", |m| m.as_str()));
        let body = body.trim_matches('\n');
        format!("<div style=\"{MONOSPACE_STYLE}\">{body}</div>")
    });

    Ok(replaced.replace('\n', "<br/>"))
}

fn strip_language_hint(body: &str) -> &str {
    if let Some((first, rest)) = body.split_once('\n') {
        if LANG_HINT_RE.is_match(first.trim()) {
            return rest;
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_fence_to_monospace_div() {
        let input = "```<br/>router eigrp 100<br/>variance 2<br/>```";
        let result = transform_fences(input).unwrap();
        assert_eq!(
            result,
            format!("<div style=\"{MONOSPACE_STYLE}\">router eigrp 100<br/>variance 2</div>")
        );
    }

    #[test]
    fn drops_language_hint() {
        let input = "```bash<br/>ls -l<br/>```";
        let result = transform_fences(input).unwrap();
        assert_eq!(
            result,
            format!("<div style=\"{MONOSPACE_STYLE}\">ls -l</div>")
        );
    }

    #[test]
    fn keeps_first_line_that_is_not_a_hint() {
        let input = "```<br/>show ip route<br/>```";
        let result = transform_fences(input).unwrap();
        assert!(result.contains("show ip route"));
    }

    #[test]
    fn preserves_interior_blank_lines_and_indentation() {
        let input = "```<br/>fn main() {<br/><br/>    body<br/>}<br/>```";
        let result = transform_fences(input).unwrap();
        assert!(result.contains("fn main() {<br/><br/>    body<br/>}"));
    }

    #[test]
    fn leaves_surrounding_text_untouched() {
        let input = "before<br/>```<br/>x<br/>```<br/>after";
        let result = transform_fences(input).unwrap();
        assert!(result.starts_with("before<br/><div"));
        assert!(result.ends_with("</div><br/>after"));
    }

    #[test]
    fn handles_multiple_fences_in_order() {
        let input = "```<br/>one<br/>``` mid ```<br/>two<br/>```";
        let result = transform_fences(input).unwrap();
        let first = result.find(">one<").unwrap();
        let second = result.find(">two<").unwrap();
        assert!(first < second);
        assert!(result.contains(" mid "));
    }

    #[test]
    fn unterminated_fence_is_an_error() {
        let result = transform_fences("```<br/>dangling");
        assert!(matches!(result, Err(ConvertError::UnterminatedFence)));
    }

    #[test]
    fn passes_through_text_without_fences() {
        let input = "plain<br/>lines";
        assert_eq!(transform_fences(input).unwrap(), input);
    }
}
