//! Optimize, explain and deep-research: one streaming primitive, three turn
//! builders.
//!
//! The provider keeps no state between calls, so every request carries the
//! whole conversation. Deep research replays the original optimize exchange
//! before asking its follow-up.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{Generator, TextStream, Turn};
use crate::error::PromptError;
use crate::extract::{parse_feedback, ExplanationFeedback};
use crate::modes::Mode;
use crate::prompts;
use crate::store::{self, DeepResearchRecord, ExplanationRecord, PromptRecord, RecordStore};

fn require(value: &str, err: PromptError) -> Result<(), PromptError> {
    if value.trim().is_empty() {
        Err(err)
    } else {
        Ok(())
    }
}

pub fn optimize_turns(raw_prompt: &str, mode: &str) -> Vec<Turn> {
    vec![
        Turn::user(prompts::compose_instruction(mode)),
        Turn::user(prompts::optimise_request(raw_prompt)),
    ]
}

pub fn explain_turns(original: &str, optimized: &str, mode: &str) -> Vec<Turn> {
    let goal = Mode::resolve(mode).goal();
    vec![
        Turn::user(prompts::EXPLAIN_PERSONA),
        Turn::user(prompts::explain_request(original, goal, optimized)),
    ]
}

pub fn research_turns(
    original: &str,
    optimized: &str,
    questions: &str,
    preferences: Option<&str>,
) -> Vec<Turn> {
    vec![
        Turn::user(prompts::RESEARCH_INSTRUCTION),
        Turn::user(prompts::optimise_request(original)),
        Turn::model(optimized),
        Turn::user(prompts::research_followup(questions, preferences)),
    ]
}

/// Send `turns` and hand back the reply stream untouched.
pub fn run_turns<G: Generator + ?Sized>(gen: &G, turns: Vec<Turn>) -> TextStream {
    debug!(model = gen.model(), turns = turns.len(), "starting generation");
    gen.generate_stream(turns)
}

pub fn optimize<G: Generator + ?Sized>(
    gen: &G,
    raw_prompt: &str,
    mode: &str,
) -> Result<TextStream, PromptError> {
    require(raw_prompt, PromptError::EmptyPrompt)?;
    require(mode, PromptError::EmptyMode)?;
    Ok(run_turns(gen, optimize_turns(raw_prompt, mode)))
}

pub fn explain<G: Generator + ?Sized>(
    gen: &G,
    original: &str,
    optimized: &str,
    mode: &str,
) -> Result<TextStream, PromptError> {
    require(original, PromptError::EmptyPrompt)?;
    require(optimized, PromptError::EmptyPrompt)?;
    require(mode, PromptError::EmptyMode)?;
    Ok(run_turns(gen, explain_turns(original, optimized, mode)))
}

pub fn deep_research_answers<G: Generator + ?Sized>(
    gen: &G,
    original: &str,
    optimized: &str,
    questions: &str,
    preferences: Option<&str>,
) -> Result<TextStream, PromptError> {
    require(original, PromptError::EmptyPrompt)?;
    require(optimized, PromptError::EmptyPrompt)?;
    require(questions, PromptError::EmptyQuestions)?;
    Ok(run_turns(
        gen,
        research_turns(original, optimized, questions, preferences),
    ))
}

/// Concatenate every fragment in arrival order. The first error wins and
/// whatever was collected before it is dropped.
pub async fn collect_text(mut stream: TextStream) -> Result<String, PromptError> {
    let mut out = String::new();
    while let Some(fragment) = stream.next().await {
        out.push_str(&fragment?);
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original: String,
    pub optimized: String,
    pub mode: String,
    /// Set only when the prompt was logged.
    pub prompt_id: Option<String>,
}

/// Optimize to completion, then log the pair. A logging failure only leaves
/// `prompt_id` empty.
pub async fn optimize_and_record<G, S>(
    gen: &G,
    store: Option<&S>,
    raw_prompt: &str,
    mode: &str,
) -> Result<OptimizationResult, PromptError>
where
    G: Generator + ?Sized,
    S: RecordStore,
{
    let optimized = collect_text(optimize(gen, raw_prompt, mode)?).await?;
    info!(mode, chars = optimized.len(), "prompt optimized");

    let record = PromptRecord::new(raw_prompt, &optimized, mode, gen.model(), None, None);
    let prompt_id = store::log_prompt(store, record).await;

    Ok(OptimizationResult {
        original: raw_prompt.to_string(),
        optimized,
        mode: mode.to_string(),
        prompt_id,
    })
}

/// Explain a finished optimization. Unparseable output is an error; the
/// explanation is saved only when the prompt has an id.
pub async fn explain_and_record<G, S>(
    gen: &G,
    store: Option<&S>,
    result: &OptimizationResult,
) -> Result<ExplanationFeedback, PromptError>
where
    G: Generator + ?Sized,
    S: RecordStore,
{
    let text = collect_text(explain(gen, &result.original, &result.optimized, &result.mode)?).await?;
    let feedback = parse_feedback(&text)?;

    if let Some(ref prompt_id) = result.prompt_id {
        let record = ExplanationRecord {
            prompt_id: prompt_id.clone(),
            explanation_json: feedback.clone(),
        };
        store::save_explanation(store, record).await;
    }
    Ok(feedback)
}

/// Answer the research agent's questions for a finished optimization and
/// save the exchange when the prompt has an id.
pub async fn research_and_record<G, S>(
    gen: &G,
    store: Option<&S>,
    result: &OptimizationResult,
    questions: &str,
    preferences: Option<&str>,
) -> Result<String, PromptError>
where
    G: Generator + ?Sized,
    S: RecordStore,
{
    let stream = deep_research_answers(gen, &result.original, &result.optimized, questions, preferences)?;
    let answers = collect_text(stream).await?;

    if let Some(ref prompt_id) = result.prompt_id {
        let record = DeepResearchRecord {
            prompt_id: prompt_id.clone(),
            questions_asked: questions.to_string(),
            preferences: preferences
                .filter(|p| !p.trim().is_empty())
                .map(str::to_string),
            answers: answers.clone(),
        };
        store::save_deep_research(store, record).await;
    }
    Ok(answers)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
