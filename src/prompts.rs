//! Instruction templates sent to the generation provider.
//!
//! Wording changes happen here only; `pipeline` assembles turns from these.

use crate::modes::Mode;

// ---------------------------------------------------------------------------
// shared fragments
// ---------------------------------------------------------------------------

pub const PERSONA: &str = "Act as a world-class prompt engineering expert.";

pub const RETAIN_INTENT: &str = "🎯 Your optimized prompt must retain the original intent.";

/// Closing line of every optimize template. Downstream code treats the
/// assembled reply as the new prompt, so nothing may wrap it.
pub const OUTPUT_ONLY_PROMPT: &str = "⚠️ CRITICAL INSTRUCTION: Do NOT output any commentary, apologies, or explanations. Output ONLY the **final refined prompt** as plain text.";

pub const RESEARCH_AGENT_TASK: &str = "Your task is to transform a raw, basic user query into a fully optimized, detailed, and highly effective prompt designed for use with deep researching agents from gemini or chatgpt.";

const STANDARD_TASK: &str = "Your task is to transform a raw, basic user query into a fully optimized, detailed, and highly effective prompt designed for use with advanced LLMs like Gemini 1.5 Pro or Claude 3 Opus.";

pub const TECHNIQUES: &str = r#"🧠 Apply the following techniques if they are appropriate (not necessary to use each and every one):

1. Role & Persona — Assign an expert identity to the AI (e.g., "You are a veteran data scientist with 15 years of industry experience.")
2. Context — Add background info or assumptions to frame the task meaningfully.
3. Audience — Define who the output is intended for (e.g., beginner, developer, executive).
4. Structure & Format — Specify how the answer should be organized (e.g., "Use a three-part breakdown with bullets and a markdown table").
5. Goals & Intent — State what the user wants to achieve (e.g., "The goal is to create a step-by-step learning plan...").
6. Key Elements — Include concepts, examples, analogies, pitfalls, comparisons, and optional depth levels.
7. Constraints — Add exclusions if appropriate (e.g., "Do not include political commentary")."#;

// ---------------------------------------------------------------------------
// pipeline.rs: optimize
// ---------------------------------------------------------------------------

/// Build the instruction turn for `mode`.
///
/// `deep_research` gets the research-agent template. Catalog keys get the
/// standard template with their canned instruction; anything else (even an
/// empty string) goes into the same slot verbatim.
pub fn compose_instruction(mode: &str) -> String {
    match Mode::resolve(mode) {
        Mode::DeepResearch => deep_research_template(),
        Mode::Catalogued { instruction, .. } => standard_template(instruction),
        Mode::Freeform(raw) => standard_template(raw),
    }
}

fn deep_research_template() -> String {
    format!("{PERSONA}\n\n{RESEARCH_AGENT_TASK}\n\n{RETAIN_INTENT}\n\n{OUTPUT_ONLY_PROMPT}")
}

fn standard_template(most_important: &str) -> String {
    format!(
        "{PERSONA}\n\n{STANDARD_TASK}\n\n{RETAIN_INTENT}\n\n{TECHNIQUES}\n\n\
         🎯 MOST IMPORTANT INSTRUCTION: **{most_important}**\n\n{OUTPUT_ONLY_PROMPT}"
    )
}

pub fn optimise_request(raw_prompt: &str) -> String {
    format!("Optimise this: {raw_prompt}")
}

// ---------------------------------------------------------------------------
// pipeline.rs: explain
// ---------------------------------------------------------------------------

pub const EXPLAIN_PERSONA: &str = "You are a prompt engineer. You need to explain your own work.";

const EXPLAIN_SCHEMA: &str = r#"{
  "original_prompt": {
    "strengths": ["..."],
    "weaknesses": ["..."]
  },
  "llm_understanding_improvements": ["..."],
  "tips_for_future_prompts": ["..."]
}"#;

const EXPLAIN_GUIDANCE: &str = r#"🧠 Section Guidance:
👍 Original Prompt Strengths
• (State what the user's original prompt did well.)
• (Be generous but honest.)

👎 Original Prompt Weaknesses
• (Point out key missing elements or flaws in the original.)
• (Explain the impact of those weaknesses.)

🧠 What LLMs Understand Better Now
• (Explain how the refined prompt improves LLM comprehension.)
• (Focus on structure, role, clarity, and specificity.)

💡 Tips for Future Prompts
• (Give practical suggestions to improve prompt writing skills.)
• (Focus on what to try next time: structure, constraints, or specificity.)

⚠️ Important Instructions:
- Do NOT output anything other than the JSON object.
- Make sure the response is valid JSON and not a markdown code block."#;

/// Second turn of the explain request. `goal` is the catalog instruction for
/// the mode, or the raw mode string.
pub fn explain_request(original: &str, goal: &str, optimized: &str) -> String {
    format!(
        "{PERSONA}\n\n\
         Compare the following two prompts and return a structured analysis in **valid JSON format** using the schema below.\n\n\
         📌 Original Prompt:\n\"{original}\"\n\n\
         🎯 Final Goal of optimized prompt:\n\"{goal}\"\n\n\
         ✨ Optimized Prompt:\n\"{optimized}\"\n\n\
         Return exactly this JSON object structure:\n\n{EXPLAIN_SCHEMA}\n\n{EXPLAIN_GUIDANCE}"
    )
}

// ---------------------------------------------------------------------------
// pipeline.rs: deep research answers
// ---------------------------------------------------------------------------

/// System turn used when replaying the deep-research optimize exchange.
/// Asks for a broader rewrite than the optimize template does.
pub const RESEARCH_INSTRUCTION: &str = "Act as a world-class prompt engineering expert.\n\n\
    Your task is to transform a raw, basic user query into a fully optimized, detailed, and highly effective prompt designed for use with deep researching agents from gemini or chatgpt.\n\n\
    🎯 Your optimized prompt must retain the original intent but dramatically expand its scope, specificity, and structure.\n\n\
    ⚠️ CRITICAL INSTRUCTION: Do NOT output any commentary, apologies, or explanations. Output ONLY the **final refined prompt** as plain text.";

pub const PREFERENCES_HEADING: &str = "My preferences:";

/// Final user turn asking the provider to answer the research agent's
/// questions. The preferences section is omitted entirely when none are given.
pub fn research_followup(questions: &str, preferences: Option<&str>) -> String {
    match preferences.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefs) => format!(
            "The model has asked the following questions:{questions}\n\
             {PREFERENCES_HEADING}{prefs}\n\
             Please answer them generally\n\
             ⚠️ CRITICAL INSTRUCTION: Do NOT output any commentary, apologies, or explanations. Output ONLY the answers as plain text."
        ),
        None => format!(
            "The model has asked the following questions to prepare the report:{questions}\n\
             Please answer them generally\n\
             ⚠️ CRITICAL INSTRUCTION: Do NOT output any commentary, apologies, or explanations. Output ONLY the answers to questions asked by model as plain text."
        ),
    }
}
