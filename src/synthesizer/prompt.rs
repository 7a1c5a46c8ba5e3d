// Prompt text sent to the language model.
use crate::model::SynthesisRequest;

pub struct Prompts {
    pub system: String,
    pub user: String,
}

pub fn build_prompts(req: &SynthesisRequest) -> Prompts {
    let client = &req.client_name;
    let coach = &req.coach_name;

    let system = format!(
        "You are a professional health content synthesizer for health coaches. \
Your task is to create comprehensive, detailed client reports.

INSTRUCTIONS:
1. Write a complete, detailed report; do not truncate or summarize prematurely
2. Match the tone of the provided research sources
3. Synthesize all information into one cohesive, professional report
4. Explain the reasoning behind each health recommendation
5. When products are mentioned in the sources, reference them by their EXACT product names
6. Include dosage recommendations when the sources mention them
7. Write at least 800-1200 words

FORMAT:
# Health Recommendations for {client}
## Prepared by {coach}

[Personalized introduction addressing {client} by name]

## [Topic sections with detailed explanations]

## Recommended Products
[Products mentioned in the research, each with a short reason]

## Summary & Next Steps
[Key takeaways and action items for {client}]"
    );

    let sources = req
        .sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("--- SOURCE {} ---\n{}\n", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Please synthesize the following {count} research sources into a complete, detailed \
health report for my client {client}.

{sources}
The report must cover every topic from the sources, explain the science behind each \
recommendation, list product recommendations with their exact names and end with \
actionable next steps.

Write the complete report now:",
        count = req.sources.len(),
    );

    Prompts { system, user }
}
