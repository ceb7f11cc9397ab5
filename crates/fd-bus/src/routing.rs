//! Topic routing-key matching.
//!
//! Dot-separated segments; `*` matches exactly one segment, `#` matches
//! zero or more trailing or interior segments.

/// Whether a binding pattern matches a concrete routing key.
#[must_use]
pub fn pattern_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = routing_key.split('.').collect();
    segments_match(&pattern, &key)
}

fn segments_match(pattern: &[&str], key: &[&str]) -> bool {
    match pattern {
        [] => key.is_empty(),
        ["#", rest @ ..] => {
            // `#` greedily tries every possible number of consumed segments.
            (0..=key.len()).any(|n| segments_match(rest, &key[n..]))
        }
        ["*", rest @ ..] => match key {
            [_, key_rest @ ..] => segments_match(rest, key_rest),
            [] => false,
        },
        [segment, rest @ ..] => match key {
            [head, key_rest @ ..] if head == segment => segments_match(rest, key_rest),
            _ => false,
        },
    }
}
