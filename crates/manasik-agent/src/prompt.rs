//! Grounding prompt assembly.
//!
//! The template wording is part of the contract with the model: changing it
//! changes answer behaviour, so edits bump `PROMPT_VERSION`.

use manasik_core::types::ScoredResult;

/// Logged with every generated prompt.
pub const PROMPT_VERSION: &str = "hajj-umrah-grounded-v1";

/// Sentence the model is told to use when the context lacks the answer.
///
/// Distinct from the synthesizer's `NO_RESULTS_FALLBACK`, which is returned
/// without calling the model at all when retrieval finds nothing.
pub const NOT_IN_CONTEXT_FALLBACK: &str =
    "This specific detail is not covered in this knowledge base. Please ask a trusted scholar.";

/// Line placed between consecutive context blocks.
pub const CONTEXT_SEPARATOR: &str = "\n-----------------------------\n";

const UNTITLED: &str = "Untitled";
const NO_CATEGORY: &str = "N/A";

/// Render the grounding prompt for `question` over ranked `results`.
pub fn build_prompt(question: &str, results: &[ScoredResult<'_>]) -> String {
    let context = results
        .iter()
        .enumerate()
        .map(|(idx, result)| context_block(idx + 1, result))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    format!(
        r#"
You are an Islamic knowledge assistant that answers questions about Hajj and Umrah.

Rules:
- Use ONLY the information in the CONTEXT below.
- If the answer is not clearly in the context, say:
  "{fallback}"
- Do NOT invent rulings or details.
- Answer clearly and simply. Use bullet points or ordered steps when explaining rituals.

CONTEXT:
{context}

QUESTION:
{question}

FINAL ANSWER (in English, clear, friendly, faithful to the context):
"#,
        fallback = NOT_IN_CONTEXT_FALLBACK,
        context = context,
        question = question,
    )
}

fn context_block(rank: usize, result: &ScoredResult<'_>) -> String {
    let doc = result.doc;
    format!(
        "[#{rank}] {title} (score: {score})\nCategory: {category}\nTags: {tags}\n\nContent:\n{content}\n",
        title = doc.display_title().unwrap_or(UNTITLED),
        score = format_score(result.score),
        category = doc.display_category().unwrap_or(NO_CATEGORY),
        tags = doc.tags.join(", "),
        content = doc.content,
    )
}

/// Two decimals, rounded from the exact binary value.
///
/// `{:.2}` already rounds the exact value; only an exact tie (the stored value
/// ends in a 5 at the third decimal and nothing after it, e.g. 0.125) needs
/// rounding up instead of to even. 0.075 is stored just below the tie and
/// stays "0.07".
fn format_score(score: f64) -> String {
    let exact = format!("{score:.60}");
    let is_tie = exact
        .split_once('.')
        .map(|(_, frac)| frac[2..].strip_prefix('5').is_some_and(|rest| rest.bytes().all(|b| b == b'0')))
        .unwrap_or(false);
    if is_tie {
        format!("{:.2}", (score * 100.0).round() / 100.0)
    } else {
        format!("{score:.2}")
    }
}
