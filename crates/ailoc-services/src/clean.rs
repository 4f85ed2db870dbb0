//! Strips incidental formatting from backend output: one wrapping fenced
//! code block and, for structured formats, explanatory prose before the
//! first structural token. Idempotent by construction.

use ailoc_core::TranslationFormat;

pub fn clean_response(raw: &str, format: TranslationFormat) -> String {
    let mut text = strip_code_fence(raw.trim());
    if format.is_structured() {
        text = skip_leading_prose(text, format);
    }
    text.trim().to_string()
}

/// Unwrap a single surrounding ``` fence, optionally tagged with a language
/// hint. Anything that does not look like a complete wrapping fence is left
/// untouched.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(newline) = rest.find('\n') else {
        return text;
    };
    let tag = rest[..newline].trim();
    if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return text;
    }
    let body = &rest[newline + 1..];
    let Some(end) = body.rfind("```") else {
        return text;
    };
    if !body[end + 3..].trim().is_empty() {
        return text;
    }
    body[..end].trim_matches('\n')
}

/// Drop leading prose in front of a structured literal. When no structural
/// opener is present, the text passes through unchanged.
fn skip_leading_prose(text: &str, format: TranslationFormat) -> &str {
    let openers: &[&str] = match format {
        TranslationFormat::Json => &["{", "["],
        TranslationFormat::PhpArray => &["<?php", "return", "{", "["],
        TranslationFormat::Plain => return text,
    };
    match openers.iter().filter_map(|t| text.find(t)).min() {
        Some(idx) => &text[idx..],
        None => text,
    }
}
