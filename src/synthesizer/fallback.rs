use crate::model::SynthesisRequest;

const EXCERPT_CHARS: usize = 500;

/// Report used when the language model is unavailable.
pub fn fallback_article(req: &SynthesisRequest) -> String {
    let count = req.sources.len();
    let plural = if count == 1 { "" } else { "s" };
    let excerpts = req
        .sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("**Source {}:**\n{}\n", i + 1, excerpt(s)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# Health Recommendations for {client}
## Prepared by {coach}

---

Dear {client},

Based on my review of the latest research, I've compiled the following health insights specifically for you.

### Research Summary

The following information has been gathered from {count} research source{plural}:

{excerpts}
### Key Takeaways

Please review the research sources above and consult with your health coach for personalized product recommendations.

---

*This report was prepared by {coach}.*
",
        client = req.client_name,
        coach = req.coach_name,
    )
}

fn excerpt(source: &str) -> String {
    if source.chars().count() <= EXCERPT_CHARS {
        return source.to_string();
    }
    let head: String = source.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", head)
}
