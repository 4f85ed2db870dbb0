//! Maps a source-language file path to its target-language sibling.
//!
//! Three conventions are tried in fixed priority order, first match wins:
//! a `<source_lang>` directory segment, a flat `<source_lang>.json` file,
//! and finally a best-effort whole-token substitution inside the path
//! string. The function is pure and total.

/// Derive the target-language path for `source_path`. Never fails; when no
/// convention applies the path is returned unchanged.
pub fn resolve_target_path(source_path: &str, source_lang: &str, target_lang: &str) -> String {
    // Laravel-style lang directory: resources/lang/en/messages.php
    let segments: Vec<&str> = source_path.split('/').collect();
    if let Some(idx) = segments.iter().position(|&s| s == source_lang) {
        let mut out = segments;
        out[idx] = target_lang;
        return out.join("/");
    }

    // Flat JSON file: resources/lang/en.json
    let flat = format!("{source_lang}.json");
    let file_name = source_path.rsplit('/').next().unwrap_or(source_path);
    if file_name == flat {
        let prefix = &source_path[..source_path.len() - flat.len()];
        return format!("{prefix}{target_lang}.json");
    }

    // Fallback: first case-insensitive whole-token occurrence of the
    // language code. A token is "whole" when the next character is not an
    // ASCII alphanumeric; a preceding alphanumeric is deliberately not
    // checked, so a code appearing as a word suffix still matches.
    let n = source_lang.len();
    if n > 0 && source_path.len() >= n {
        for i in 0..=source_path.len() - n {
            if !source_path.is_char_boundary(i) || !source_path.is_char_boundary(i + n) {
                continue;
            }
            if !source_path[i..i + n].eq_ignore_ascii_case(source_lang) {
                continue;
            }
            let boundary = source_path[i + n..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_ascii_alphanumeric());
            if boundary {
                return format!(
                    "{}{}{}",
                    &source_path[..i],
                    target_lang,
                    &source_path[i + n..]
                );
            }
        }
    }

    source_path.to_string()
}
