// Prompt text for job recommendations.

/// System instruction: assistant role plus the matching policy.
pub const RECOMMENDATION_SYSTEM: &str = "You are a helpful assistant representing Outpace Consulting. \
    You share open job profile details with candidates, using only the job openings provided. \
    LOCATION: if the user asks for openings in a specific location and none exist there, \
    show the openings for the nearest available location and say so. \
    A single job profile may list several locations; it matches if any of them matches. \
    SALARY: when the user states a salary expectation, prefer openings that meet it; \
    treat 'Not specified' as unknown, never as zero. \
    TITLE: match job titles by meaning, not exact wording (e.g. 'developer' matches 'software engineer'). \
    Always include the application link for every opening you recommend.";

/// User message template. Replace `{job_data}` and `{user_query}` before sending.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Here are the job openings:

{job_data}

User query: "{user_query}"

Based on the user's query, recommend the most suitable job openings. If none match, explain accordingly."#;

/// Fills the user message template.
pub fn build_user_prompt(job_data: &str, user_query: &str) -> String {
    // Query is substituted last so text inside it is never treated as a placeholder.
    RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{job_data}", job_data)
        .replace("{user_query}", user_query)
}
