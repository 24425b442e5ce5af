use serde_json::Value;

use super::provider::ParsedGarment;

const GARMENT_KEYS: &[&str] = &["name", "category", "color"];

/// Extract the garment object from raw model output.
///
/// Tries the whole text as JSON first, then a fenced ```json block, then the
/// first bare `{...}` containing any garment key. Returns `None` when nothing
/// usable is found.
pub fn parse_garment_output(raw: &str) -> Option<ParsedGarment> {
    let value = extract_json_by_key(raw, GARMENT_KEYS)?;
    serde_json::from_value(value).ok()
}

/// Unified JSON extraction: full text, fenced block, then bare object.
pub fn extract_json_by_key(output: &str, keys: &[&str]) -> Option<Value> {
    let has_key = |v: &Value| keys.iter().any(|k| v.get(*k).is_some());

    if let Ok(val) = serde_json::from_str::<Value>(output.trim()) {
        if val.is_object() && has_key(&val) {
            return Some(val);
        }
    }
    if let Some(val) = extract_fenced_json(output) {
        if has_key(&val) {
            return Some(val);
        }
    }
    extract_bare_json_with_key(output, keys)
}

/// Last JSON object found in a fenced ```json ... ``` (or bare ```) block.
fn extract_fenced_json(output: &str) -> Option<Value> {
    let mut in_block = false;
    let mut content = String::new();
    let mut best: Option<Value> = None;

    for line in output.lines() {
        let trimmed = line.trim();
        if !in_block && trimmed.starts_with("```") {
            let lang = trimmed.trim_start_matches('`').trim();
            if lang.is_empty() || lang.eq_ignore_ascii_case("json") {
                in_block = true;
                content.clear();
            }
            continue;
        }
        if in_block && trimmed == "```" {
            in_block = false;
            if let Ok(val) = serde_json::from_str::<Value>(&content) {
                if val.is_object() {
                    best = Some(val);
                }
            }
            continue;
        }
        if in_block {
            content.push_str(line);
            content.push('\n');
        }
    }

    best
}

/// First `{...}` in the text that parses as an object holding one of `keys`.
///
/// Each candidate is read with a streaming deserializer, so trailing prose
/// after the object is ignored and braces inside strings never confuse it.
fn extract_bare_json_with_key(output: &str, keys: &[&str]) -> Option<Value> {
    output
        .char_indices()
        .filter(|&(_, c)| c == '{')
        .filter_map(|(at, _)| {
            serde_json::Deserializer::from_str(&output[at..])
                .into_iter::<Value>()
                .next()?
                .ok()
        })
        .find(|val| keys.iter().any(|k| val.get(*k).is_some()))
}
