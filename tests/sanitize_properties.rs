//! Property tests for the schema layer.
//!
//! Uses proptest over arbitrary strategy-shaped JSON to verify:
//! 1. Idempotence: sanitizing a sanitized strategy changes nothing
//! 2. Post-condition: a sanitized strategy with conditions re-validates cleanly
//! 3. Accounting: every input condition is either kept or reported as dropped
//! 4. Totality: validation and sanitization never mutate their input

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use strategist::schema::{registry, sanitize_strategy, validate_strategy};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        (-1.0e6..1.0e6_f64).prop_map(Value::from),
        "[ a-zA-Z0-9.\\-]{0,8}".prop_map(Value::from),
    ]
}

fn arb_indicator_name() -> impl Strategy<Value = Value> {
    let known: Vec<&'static str> = registry::names().collect();
    prop_oneof![
        3 => prop::sample::select(known).prop_map(Value::from),
        1 => prop::sample::select(vec!["RSI", " Sma ", "MACD_Signal", "nope", ""]).prop_map(Value::from),
        1 => arb_scalar(),
    ]
}

fn arb_operand_type() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(Some(json!("indicator"))),
        Just(Some(json!("value"))),
        Just(Some(json!("VALUE"))),
        Just(Some(json!("formula"))),
        Just(None),
    ]
}

fn arb_timeframe() -> impl Strategy<Value = Value> {
    prop::sample::select(vec!["daily", "weekly", "monthly", "Daily", "hourly"]).prop_map(Value::from)
}

/// A JSON object whose every field is optional and possibly ill-typed.
fn arb_operand() -> impl Strategy<Value = Value> {
    let object = (
        arb_operand_type(),
        prop::option::of(arb_indicator_name()),
        prop::option::of(arb_timeframe()),
        prop::option::of(arb_scalar()),
        prop::option::of(arb_scalar()),
        prop::option::of(arb_scalar()),
        prop::option::of(arb_scalar()),
        prop::option::of(arb_scalar()),
    )
        .prop_map(|(ty, name, timeframe, offset, period, multiplier, add_offset, value)| {
            let mut obj = Map::new();
            let mut put = |key: &str, v: Option<Value>| {
                if let Some(v) = v {
                    obj.insert(key.to_string(), v);
                }
            };
            put("type", ty);
            put("name", name);
            put("timeframe", timeframe);
            put("offset", offset);
            put("params", period.map(|p| json!({ "period": p })));
            put("multiplier", multiplier);
            put("add_offset", add_offset);
            put("value", value);
            Value::Object(obj)
        });

    prop_oneof![9 => object, 1 => arb_scalar()]
}

fn arb_operator() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::sample::select(vec![">", "<", ">=", "<=", "=", "≈ (approx)", "≈(approx)", "~=", "=>"])
            .prop_map(Value::from),
        arb_scalar(),
    ]
}

fn arb_condition() -> impl Strategy<Value = Value> {
    let object = (
        prop::option::of(arb_operand()),
        prop::option::of(arb_operator()),
        prop::option::of(arb_operand()),
        prop::option::of(arb_scalar()),
    )
        .prop_map(|(lhs, operator, rhs, tolerance)| {
            let mut obj = Map::new();
            for (key, v) in [("lhs", lhs), ("operator", operator), ("rhs", rhs), ("tolerance", tolerance)] {
                if let Some(v) = v {
                    obj.insert(key.to_string(), v);
                }
            }
            Value::Object(obj)
        });

    prop_oneof![9 => object, 1 => arb_scalar()]
}

fn arb_strategy() -> impl Strategy<Value = Value> {
    let object = (
        prop::option::of(arb_scalar()),
        prop::option::of(arb_scalar()),
        prop::option::of(prop_oneof![
            9 => prop::collection::vec(arb_condition(), 0..5).prop_map(Value::from),
            1 => arb_scalar(),
        ]),
    )
        .prop_map(|(name, description, conditions)| {
            let mut obj = Map::new();
            for (key, v) in [("name", name), ("description", description), ("conditions", conditions)] {
                if let Some(v) = v {
                    obj.insert(key.to_string(), v);
                }
            }
            Value::Object(obj)
        });

    prop_oneof![19 => object, 1 => arb_scalar()]
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    /// sanitize(sanitize(x)) == sanitize(x), and the second pass drops nothing.
    #[test]
    fn sanitize_is_idempotent(doc in arb_strategy()) {
        let once = sanitize_strategy(&doc);
        let twice = sanitize_strategy(&once.strategy.to_value());
        prop_assert_eq!(&twice.strategy, &once.strategy);
        prop_assert!(twice.dropped.is_empty());
    }

    /// Whenever at least one condition survives, the output validates with
    /// no errors and no warnings.
    #[test]
    fn sanitized_output_revalidates(doc in arb_strategy()) {
        let out = sanitize_strategy(&doc);
        prop_assume!(!out.strategy.conditions.is_empty());

        let report = validate_strategy(&out.strategy.to_value());
        prop_assert!(report.is_valid(), "errors: {:?}", report.error_messages());
        prop_assert!(report.warnings.is_empty(), "warnings: {:?}", report.warning_messages());
    }

    /// Kept + dropped accounts for every element of an input array.
    #[test]
    fn every_condition_is_kept_or_dropped(doc in arb_strategy()) {
        let out = sanitize_strategy(&doc);
        let input_len = doc
            .get("conditions")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        prop_assert_eq!(out.strategy.conditions.len() + out.dropped.len(), input_len);
    }

    /// Neither operation mutates its input, and validation is deterministic.
    #[test]
    fn input_is_untouched(doc in arb_strategy()) {
        let before = doc.clone();
        let first = validate_strategy(&doc);
        let _ = sanitize_strategy(&doc);
        prop_assert_eq!(&doc, &before);
        prop_assert_eq!(validate_strategy(&doc), first);
    }
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn missing_conditions_mentions_conditions() {
    let report = validate_strategy(&json!({ "name": "x", "description": "" }));
    assert!(!report.is_valid());
    assert!(report.error_messages().iter().any(|m| m.contains("conditions")));
}

#[test]
fn oversold_scenario() {
    let doc = json!({
        "name": "Oversold",
        "conditions": [{
            "lhs": { "type": "indicator", "name": "rsi" },
            "operator": "<",
            "rhs": { "type": "value", "value": 30 }
        }]
    });

    let report = validate_strategy(&doc);
    assert!(report.is_valid());
    assert!(report.warnings.len() >= 2);

    let lhs = &sanitize_strategy(&doc).strategy.to_value()["conditions"][0]["lhs"];
    assert_eq!(lhs["timeframe"], json!("daily"));
    assert_eq!(lhs["params"]["period"], json!(14));
}

#[test]
fn repairs_named_in_the_contract() {
    let out = sanitize_strategy(&json!({
        "name": "Repairs",
        "conditions": [
            { "lhs": { "type": "indicator", "name": "NOPE", "offset": -5 },
              "operator": "~=",
              "rhs": { "type": "value", "value": 1 } },
            { "lhs": { "type": "indicator", "name": "RSI" },
              "operator": "≈ (approx)",
              "rhs": { "type": "value", "value": 50 } }
        ]
    }))
    .strategy
    .to_value();

    let first = &out["conditions"][0];
    assert_eq!(first["lhs"]["name"], json!("close"));
    assert_eq!(first["lhs"]["offset"], json!(0));
    assert_eq!(first["operator"], json!(">"));

    let second = &out["conditions"][1];
    assert_eq!(second["lhs"]["name"], json!("rsi"));
    assert_eq!(second["tolerance"], json!(1.0));
}

#[test]
fn missing_lhs_is_dropped_and_reported() {
    let doc = json!({
        "name": "Lopsided",
        "conditions": [{ "operator": ">", "rhs": { "type": "value", "value": 1 } }]
    });

    assert!(sanitize_strategy(&doc).strategy.conditions.is_empty());
    let report = validate_strategy(&doc);
    assert!(report.error_messages()[0].contains("Condition 1"));
}
