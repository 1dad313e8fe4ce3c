// Shared prompt constants and prompt-building utilities.
// Each agent role defines its own prompts in interview::prompts.
// This file contains cross-cutting prompt fragments.

/// Appended to every system prompt whose output goes through the response parser.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction for every role that judges or plans around a candidate.
pub const METHODOLOGY_INSTRUCTION: &str = "\
    The candidate explains their approach verbally and has no access to the software. \
    Judge reasoning, method and awareness of pitfalls, not keystrokes or exact syntax.";

/// Joins a role description with the JSON-only instruction.
pub fn json_system(role: &str) -> String {
    format!("{role}\n\n{METHODOLOGY_INSTRUCTION}\n\n{JSON_ONLY_INSTRUCTION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_contains_role_and_json_rule() {
        let system = json_system("You are a reviewer.");
        assert!(system.starts_with("You are a reviewer."));
        assert!(system.contains("valid JSON only"));
        assert!(system.contains("verbally"));
    }
}
