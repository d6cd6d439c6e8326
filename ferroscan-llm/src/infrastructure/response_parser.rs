//! Model reply parsing
//!
//! The prompt mandates a bare JSON array of findings, but models routinely
//! wrap it in a markdown fence or surrounding prose. Parsing peels those
//! wrappers off and accepts a lone finding object as a one-element array;
//! anything without a findings array in it is an invalid reply.

use serde::de::DeserializeOwned;

use crate::domain::error::LlmError;

/// Extracts the findings array from a raw model reply.
pub struct ResponseParser;

impl ResponseParser {
    /// Parse the reply into the findings array the prompt mandates.
    ///
    /// Candidate shapes, tried in order: the trimmed reply itself, the body
    /// of each markdown code fence, and a balanced JSON array or object
    /// embedded in prose. A single object is promoted to a one-element
    /// array.
    pub fn parse_findings<T: DeserializeOwned>(content: &str) -> Result<Vec<T>, LlmError> {
        let trimmed = content.trim();

        let mut candidates: Vec<&str> = vec![trimmed];
        candidates.extend(Self::fence_bodies(trimmed));
        candidates.extend(Self::balanced_value(trimmed, b'[', b']'));
        candidates.extend(Self::balanced_value(trimmed, b'{', b'}'));

        for candidate in candidates {
            let candidate = candidate.trim();
            if candidate.is_empty() {
                continue;
            }
            if let Ok(parsed) = serde_json::from_str::<Vec<T>>(candidate) {
                return Ok(parsed);
            }
            if candidate.starts_with('{')
                && let Ok(single) = serde_json::from_str::<T>(candidate)
            {
                return Ok(vec![single]);
            }
        }

        Err(LlmError::InvalidResponse(
            "reply did not contain a findings array".to_string(),
        ))
    }

    /// Bodies of every ``` fence, with the language tag line stripped.
    fn fence_bodies(content: &str) -> Vec<&str> {
        content
            .split("```")
            .skip(1)
            .step_by(2)
            .map(|body| match body.split_once('\n') {
                Some((tag, rest)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => rest,
                _ => body,
            })
            .collect()
    }

    /// The first balanced `open..close` run in the text. Tracks JSON string
    /// literals so brackets inside quoted values do not count toward depth.
    fn balanced_value(content: &str, open: u8, close: u8) -> Option<&str> {
        let bytes = content.as_bytes();
        let start = bytes.iter().position(|&b| b == open)?;

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (offset, &byte) in bytes[start..].iter().enumerate() {
            if escaped {
                escaped = false;
                continue;
            }
            match byte {
                b'\\' if in_string => escaped = true,
                b'"' => in_string = !in_string,
                _ if in_string => {}
                b if b == open => depth += 1,
                b if b == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&content[start..=start + offset]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}
