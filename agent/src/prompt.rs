//! # prompt: prompts for the local model
//!
//! The model must answer with a JSON strategy the validator accepts, so the
//! system prompt is rendered from the same registry and operator vocabulary
//! the validator checks against.

use std::fmt::Write as _;

use strategist::models::{Operator, Strategy, Timeframe};
use strategist::schema::{registry, IndicatorCategory};

fn category_label(category: IndicatorCategory) -> &'static str {
    match category {
        IndicatorCategory::PriceVolume   => "Price / volume",
        IndicatorCategory::MovingAverage => "Moving averages",
        IndicatorCategory::Momentum      => "Momentum",
        IndicatorCategory::Volatility    => "Volatility",
        IndicatorCategory::Volume        => "Volume",
    }
}

/// Indicator reference grouped by category, one line per category.
fn indicator_table() -> String {
    let mut out = String::new();
    let mut current: Option<IndicatorCategory> = None;

    for spec in registry::all() {
        if current != Some(spec.category) {
            if current.is_some() {
                out.push('\n');
            }
            let _ = write!(out, "- {}:", category_label(spec.category));
            current = Some(spec.category);
        }
        match spec.default_period {
            Some(p) => { let _ = write!(out, " {} (period, default {p})", spec.name); }
            None    => { let _ = write!(out, " {}", spec.name); }
        }
    }
    out
}

/// System prompt for natural language → strategy JSON.
pub fn system_prompt() -> String {
    let operators = Operator::listing();
    let timeframes = Timeframe::listing();
    let indicators = indicator_table();

    format!(r#"You are a stock screening strategy converter. Convert the user's natural-language description into a strategy JSON object.

**CRITICAL**: Respond with ONLY a valid JSON object. No explanations, no markdown, no code fences.

## Required JSON Format
```
{{
  "name": "<short strategy name>",
  "description": "<one sentence>",
  "conditions": [
    {{
      "lhs": {{ "type": "indicator", "name": "<indicator>", "timeframe": "daily", "offset": 0, "params": {{ "period": 14 }} }},
      "operator": "<operator>",
      "rhs": {{ "type": "value", "value": <number> }}
    }}
  ]
}}
```

## Vocabulary
Indicators:
{indicators}

Operators: {operators}
Timeframes: {timeframes}

## Rules
1. Every condition has "lhs", "operator" and "rhs"; all conditions must hold together
2. An operand is either {{"type": "indicator", ...}} or {{"type": "value", "value": <number>}}
3. "offset" counts bars back: 0 is the latest bar, 1 the one before
4. Include "params.period" for every indicator that takes a period
5. "multiplier" and "add_offset" are allowed on the RHS indicator only (rhs = indicator * multiplier + add_offset)
6. For "≈ (approx)" add "tolerance": percent band, e.g. 1.0

## Example
"RSI below 30 and price above the 50 day SMA" →
{{"name": "Oversold Uptrend", "description": "RSI oversold while price is above SMA 50", "conditions": [{{"lhs": {{"type": "indicator", "name": "rsi", "timeframe": "daily", "offset": 0, "params": {{"period": 14}}}}, "operator": "<", "rhs": {{"type": "value", "value": 30}}}}, {{"lhs": {{"type": "indicator", "name": "close", "timeframe": "daily", "offset": 0}}, "operator": ">", "rhs": {{"type": "indicator", "name": "sma", "timeframe": "daily", "offset": 0, "params": {{"period": 50}}}}}}]}}

Respond with JSON only:"#)
}

/// Prompt asking for a beginner-friendly explanation of a validated strategy.
pub fn explanation_prompt(strategy: &Strategy) -> String {
    let json = serde_json::to_string_pretty(strategy).unwrap_or_default();

    format!(r#"Explain this stock screening strategy in plain English for a beginner investor.
Be concise but thorough. Explain what each condition looks for and why it might be useful.

Strategy JSON:
{json}

Provide a clear, numbered explanation of each condition and an overall summary of what this strategy is trying to find."#)
}
