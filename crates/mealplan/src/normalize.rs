use std::sync::LazyLock;

use regex::Regex;

use crate::GenerationError;

static RE_FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```json\s*").unwrap());
static RE_FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*```$").unwrap());

/// Cuts the single JSON object out of a model answer.
///
/// A leading ```` ```json ```` fence and a trailing ```` ``` ```` fence are
/// removed (anchored at the very start and end only), then everything before
/// the first `{` and after the last `}` is discarded.
pub fn normalize_response(raw: &str) -> Result<&str, GenerationError> {
    let unfenced_start = RE_FENCE_OPEN.find(raw).map_or(0, |m| m.end());
    let unfenced = &raw[unfenced_start..];
    let unfenced_end = RE_FENCE_CLOSE
        .find(unfenced)
        .map_or(unfenced.len(), |m| m.start());
    let unfenced = &unfenced[..unfenced_end];

    let start = unfenced.find('{').ok_or(GenerationError::MalformedResponse)?;
    let end = unfenced
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or(GenerationError::MalformedResponse)?;

    Ok(&unfenced[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_json_fences() {
        let raw = "```json\n{\"meals\": []}\n```";
        assert_eq!(normalize_response(raw).unwrap(), "{\"meals\": []}");
    }

    #[test]
    fn test_discards_surrounding_prose() {
        let raw = "Here is your plan:\n{\"meals\": [{\"name\": \"x\"}]}\nEnjoy your meals!";
        assert_eq!(
            normalize_response(raw).unwrap(),
            "{\"meals\": [{\"name\": \"x\"}]}"
        );
    }

    #[test]
    fn test_fence_after_prose_is_handled_by_brace_slicing() {
        let raw = "Sure!\n```json\n{\"a\": 1}\n```\nAnything else?";
        assert_eq!(normalize_response(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_bare_object_is_unchanged() {
        assert_eq!(normalize_response("{}").unwrap(), "{}");
    }

    #[test]
    fn test_missing_object_is_malformed() {
        assert!(matches!(
            normalize_response("I cannot help with that."),
            Err(GenerationError::MalformedResponse)
        ));
        assert!(matches!(
            normalize_response("} backwards {"),
            Err(GenerationError::MalformedResponse)
        ));
        assert!(matches!(
            normalize_response(""),
            Err(GenerationError::MalformedResponse)
        ));
    }
}
