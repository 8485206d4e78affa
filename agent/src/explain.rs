//! # explain: plain-English summary of a strategy
//!
//! Asks the model when enabled; any failure falls back to a deterministic
//! rendering of the conditions.

use tracing::warn;

use strategist::models::{IndicatorOperand, Operand, Strategy};

use crate::{config::Config, ollama::OllamaClient, prompt};

const EXPLANATION_TEMPERATURE: f32 = 0.3;

pub async fn explain(client: &OllamaClient, config: &Config, strategy: &Strategy) -> String {
    if !config.explain_with_llm {
        return basic_explanation(strategy);
    }

    match client
        .generate(None, &prompt::explanation_prompt(strategy), EXPLANATION_TEMPERATURE)
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => basic_explanation(strategy),
        Err(e) => {
            warn!(error = %e, "LLM explanation failed — using basic explanation");
            basic_explanation(strategy)
        }
    }
}

/// `**Name**`, the description, then one numbered line per condition.
pub fn basic_explanation(strategy: &Strategy) -> String {
    let mut lines = vec![format!("**{}**\n", strategy.name)];

    lines.push(if strategy.description.trim().is_empty() {
        "No description provided.".to_string()
    } else {
        strategy.description.clone()
    });

    lines.push("\n**Conditions:**".to_string());

    for (i, cond) in strategy.conditions.iter().enumerate() {
        let mut line = format!(
            "{}. {} {} {}",
            i + 1,
            capitalize(&describe(&cond.lhs)),
            cond.operator,
            describe(&cond.rhs),
        );
        if let Some(tol) = cond.tolerance {
            line.push_str(&format!(" (within {tol}%)"));
        }
        lines.push(line);
    }

    lines.join("\n")
}

fn describe(operand: &Operand) -> String {
    match operand {
        Operand::Value(v) => v.value.to_string(),
        Operand::Indicator(ind) => describe_indicator(ind),
    }
}

fn describe_indicator(ind: &IndicatorOperand) -> String {
    let mut out = format!("{} {}", ind.timeframe, ind.name);
    if let Some(period) = ind.params.period {
        out.push_str(&format!("({period})"));
    }
    if ind.offset > 0 {
        out.push_str(&format!(" {} bar(s) ago", ind.offset));
    }
    if let Some(m) = ind.multiplier.filter(|m| *m != 1.0) {
        out = format!("{m} × {out}");
    }
    if let Some(a) = ind.add_offset.filter(|a| *a != 0.0) {
        out.push_str(&format!(" + {a}"));
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
