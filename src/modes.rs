//! The fixed catalog of optimization modes.
//!
//! A mode is either a catalog key (with a canned instruction), the special
//! `deep_research` key (which also switches templates), or any other string,
//! which is used verbatim as the instruction.

pub const DEEP_RESEARCH: &str = "deep_research";

/// Mode used when a caller doesn't pick one.
pub const DEFAULT_MODE: &str = "clarity";

pub static CATALOG: &[(&str, &str)] = &[
    (
        DEEP_RESEARCH,
        "the prompt will be used by deep researching agent, it should enhance the quality such I get best research report covering each and every detail",
    ),
    (
        "clarity",
        "Rewrite the prompt so that the LLM will produce an extremely clear and unambiguous response. Eliminate vagueness, add specific details, and enforce a logical structure.",
    ),
    (
        "depth",
        "Rewrite the prompt to guide the LLM toward a thoughtful, multi-layered response. Encourage analysis, rationale, and contextual depth.",
    ),
    (
        "creative",
        "Rewrite the prompt so the LLM delivers a highly imaginative and expressive response. Encourage the use of vivid examples, analogies, metaphors, and creative language.",
    ),
    (
        "technical",
        "Rewrite the prompt so that the LLM generates precise, technically accurate content using domain-specific terminology, clear step-by-step logic, and relevant technical context.",
    ),
    (
        "concise",
        "Rewrite the prompt to guide the LLM toward a brief, direct, and efficient response that retains clarity while reducing unnecessary verbosity.",
    ),
    (
        "structured",
        "Rewrite the prompt to instruct the LLM to format the response cleanly, using bullet points, markdown tables, hierarchical sections, and clear headings.",
    ),
    (
        "teaching",
        "Rewrite the prompt so that the LLM explains the topic progressively, with simple analogies, examples, and concepts tailored for a learning audience, including beginners.",
    ),
    (
        "executive_summary",
        "Rewrite the prompt to elicit a high-level summary optimized for decision-makers. Prioritize key takeaways, actionable insights, and strategic framing.",
    ),
    (
        "contrarian",
        "Rewrite the prompt to guide the LLM toward challenging conventional thinking. Encourage it to provide counterpoints, critique assumptions, and present alternative perspectives.",
    ),
    (
        "step_by_step",
        "Rewrite the prompt to instruct the LLM to break down the response into clear, ordered steps or phases, with detailed explanations for each.",
    ),
    (
        "journalistic",
        "Rewrite the prompt to elicit a response in the tone and structure of investigative or analytical journalism, including critical analysis, source-based reasoning, and consideration of bias.",
    ),
    (
        "socratic",
        "Rewrite the prompt to instruct the LLM to ask probing, thought-provoking questions instead of providing direct answers—encouraging reflective or critical thinking from the user.",
    ),
    (
        "controversial",
        "Rewrite the prompt to provoke the most controversial, unconventional, or polarizing response the LLM can generate. Push against mainstream assumptions while maintaining logical structure and factual support. Do not avoid sensitive or taboo perspectives unless ethically restricted.",
    ),
    (
        "devil_advocate",
        "Rewrite the prompt to make the LLM take a strong opposing stance or play devil's advocate. Encourage it to argue against popular opinion or the user's assumed position using logic, evidence, or satire.",
    ),
    (
        "debate_ready",
        "Rewrite the prompt so that the LLM structures its answer like a formal argument — clearly outlining opposing viewpoints, rebuttals, and conclusion. Suitable for use in debates or persuasive writing.",
    ),
    (
        "startup_pitch",
        "Rewrite the prompt to generate a polished, concise startup pitch. Include value proposition, problem/solution, market fit, and potential differentiation. Use persuasive, high-conviction tone.",
    ),
    (
        "real_world_applications",
        "Rewrite the prompt to guide the LLM toward output that maps theoretical ideas to real-world use cases, industries, or everyday scenarios.",
    ),
    (
        "personal_growth",
        "Rewrite the prompt so the LLM provides actionable advice, reflection prompts, and behavioral frameworks for improving mindset, habits, or emotional resilience.",
    ),
    (
        "marketing_landing_page",
        "Rewrite the prompt to produce marketing copy suitable for a product or service landing page. Include headline, problem/solution framing, benefits, CTA, and testimonials if applicable.",
    ),
    (
        "socratic_reverse",
        "Rewrite the prompt to make the LLM ask a sequence of layered, increasingly specific questions back to the user in order to clarify the problem or uncover blind spots.",
    ),
    (
        "satirical",
        "Rewrite the prompt so that the LLM responds with sarcasm, exaggeration, or parody — in the style of satirical commentary or mockery of the topic.",
    ),
];

/// Display grouping for mode pickers. Every catalog key appears exactly once.
pub static CATEGORIES: &[(&str, &[&str])] = &[
    ("Core Optimization", &["clarity", "depth", "concise", "structured"]),
    ("Creative & Expression", &["creative", "satirical", "contrarian"]),
    (
        "Professional",
        &["technical", "executive_summary", "startup_pitch", "marketing_landing_page"],
    ),
    ("Educational", &["teaching", "step_by_step", "socratic", "socratic_reverse"]),
    ("Advanced", &[DEEP_RESEARCH, "journalistic", "debate_ready", "devil_advocate"]),
    ("Specialized", &["real_world_applications", "personal_growth", "controversial"]),
];

pub fn instruction_for(key: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, instruction)| *instruction)
}

/// `step_by_step` → `step by step`
pub fn label(key: &str) -> String {
    key.replace('_', " ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    DeepResearch,
    Catalogued {
        key: &'static str,
        instruction: &'static str,
    },
    Freeform(&'a str),
}

impl<'a> Mode<'a> {
    pub fn resolve(mode: &'a str) -> Self {
        if mode == DEEP_RESEARCH {
            return Self::DeepResearch;
        }
        match CATALOG.iter().find(|(k, _)| *k == mode) {
            Some(&(key, instruction)) => Self::Catalogued { key, instruction },
            None => Self::Freeform(mode),
        }
    }

    /// What the rewrite is supposed to achieve, as shown to the explainer.
    pub fn goal(&self) -> &'a str {
        match *self {
            Self::DeepResearch => instruction_for(DEEP_RESEARCH).unwrap_or(DEEP_RESEARCH),
            Self::Catalogued { instruction, .. } => instruction,
            Self::Freeform(raw) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_unique() {
        let mut keys: Vec<&str> = CATALOG.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CATALOG.len());
    }

    #[test]
    fn categories_cover_catalog_once() {
        let mut grouped: Vec<&str> = CATEGORIES.iter().flat_map(|(_, ks)| ks.iter().copied()).collect();
        grouped.sort_unstable();
        let mut keys: Vec<&str> = CATALOG.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        assert_eq!(grouped, keys);
    }

    #[test]
    fn resolve_kinds() {
        assert_eq!(Mode::resolve("deep_research"), Mode::DeepResearch);
        assert!(matches!(Mode::resolve("clarity"), Mode::Catalogued { key: "clarity", .. }));
        assert_eq!(Mode::resolve("talk like a pirate"), Mode::Freeform("talk like a pirate"));
        // catalog keys are case-sensitive
        assert_eq!(Mode::resolve("Clarity"), Mode::Freeform("Clarity"));
    }

    #[test]
    fn goal_falls_back_to_raw() {
        assert_eq!(Mode::resolve("concise").goal(), instruction_for("concise").unwrap());
        assert_eq!(Mode::resolve("be brief").goal(), "be brief");
    }

    #[test]
    fn label_replaces_underscores() {
        assert_eq!(label("step_by_step"), "step by step");
        assert_eq!(label("clarity"), "clarity");
    }
}
