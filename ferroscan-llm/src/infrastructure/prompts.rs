//! Prompt construction for vulnerability analysis

/// System prompt establishing the analysis persona and output contract.
pub const SYSTEM_PROMPT: &str = "You are a security auditor reviewing legacy source code. \
Respond only with a JSON array of findings; do not add commentary outside the JSON.";

/// Builds the per-request analysis prompt.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the analysis prompt from source code, language and retrieved
    /// security context.
    pub fn analysis_prompt(language: &str, code: &str, context: &[String]) -> String {
        let context_block = if context.is_empty() {
            "(none)".to_string()
        } else {
            context.join("\n---\n")
        };

        format!(
            r#"Analyze the following {language} code for security vulnerabilities.

Code:
{code}

Additional context:
{context_block}

Report every vulnerability you identify as an element of a JSON array. Each element must be an object with these fields:
- "vulnerability_type": one of "buffer-overflow", "sql-injection", "xss", "csrf", "auth-bypass", "insecure-deserialization", "other"
- "severity": one of "critical", "high", "medium", "low", "info"
- "description": what is wrong and why it is exploitable
- "file_path": the file the issue is in
- "line": line number, or null if unknown
- "code_snippet": the offending code, or null
- "recommendation": how to fix it
- "confidence": number between 0 and 1

Return an empty array if the code has no vulnerabilities."#
        )
    }
}
