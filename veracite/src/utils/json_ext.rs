//! Extracting JSON payloads from language-model completions.
//!
//! Models are instructed to answer with bare JSON, but replies still arrive
//! wrapped in code fences or prefixed with prose often enough that parsing
//! the raw reply directly would fail spuriously. [`extract_json_object`]
//! normalizes those shapes without attempting to repair the JSON itself.

/// Returns the first top-level JSON object embedded in a model reply.
///
/// Strips a surrounding Markdown code fence (with or without a language
/// tag), then slices from the first `{` to the last `}`. Returns `None`
/// when no object-shaped region exists; the slice is not validated here,
/// that is the deserializer's job.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let body = strip_code_fence(reply.trim());
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&body[start..=end])
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    match rest.rfind("```") {
        Some(i) => &rest[..i],
        None => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_bare_objects() {
        assert_eq!(
            extract_json_object(r#"{"verdict": "supported"}"#),
            Some(r#"{"verdict": "supported"}"#)
        );
    }

    #[test]
    fn unwraps_fenced_replies() {
        let fenced = "```json\n{\"claims\": []}\n```";
        assert_eq!(extract_json_object(fenced), Some("{\"claims\": []}"));

        let no_lang = "```\n{\"claims\": []}\n```";
        assert_eq!(extract_json_object(no_lang), Some("{\"claims\": []}"));
    }

    #[test]
    fn skips_leading_and_trailing_prose() {
        let chatty = "Here is the JSON you asked for:\n{\"a\": 1}\nHope that helps!";
        assert_eq!(extract_json_object(chatty), Some("{\"a\": 1}"));
    }

    #[test]
    fn keeps_nested_braces_intact() {
        let nested = r#"{"outer": {"inner": 1}}"#;
        assert_eq!(extract_json_object(nested), Some(nested));
    }

    #[test]
    fn rejects_replies_without_an_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}
