use std::{collections::BTreeMap, sync::Arc};

use fuzzy_logic::{
    Expression, FuzzySet, InferenceContext, InferenceMachine, Rule, RuleSet, UniversalSet,
};

use super::{
    error::CustomError,
    measure_time,
    settings::{to_options, to_universes, ConditionModel, LinguisticVarKind, PresetModel},
};

fn lookup_set(
    universes: &BTreeMap<String, Arc<UniversalSet>>,
    var: &str,
    set: &str,
) -> Result<Arc<FuzzySet>, CustomError> {
    universes
        .get(var)
        .ok_or_else(|| CustomError::UniverseNotFound(var.to_string()))?
        .term(set)
        .ok_or_else(|| CustomError::SetNotFound {
            universe: var.to_string(),
            set: set.to_string(),
        })
}

pub fn to_expression(
    universes: &BTreeMap<String, Arc<UniversalSet>>,
    condition: &ConditionModel,
) -> Result<Expression, CustomError> {
    let expr = match condition {
        ConditionModel::And(l, r) => {
            to_expression(universes, l)?.and(to_expression(universes, r)?)
        }
        ConditionModel::Or(l, r) => to_expression(universes, l)?.or(to_expression(universes, r)?),
        ConditionModel::Not(x) => !to_expression(universes, x)?,
        ConditionModel::Is { var, set } => Expression::is(var, lookup_set(universes, var, set)?),
    };
    Ok(expr)
}

pub fn create_inference_machine(
    preset: &PresetModel,
    workers: Option<usize>,
) -> Result<InferenceMachine, CustomError> {
    let universes = to_universes(preset)?;

    let mut rule_set = RuleSet::default();
    for rule in preset.rules.iter() {
        let condition = to_expression(&universes, &rule.condition)?;
        let consequent = lookup_set(&universes, &rule.then.var, &rule.then.set)?;
        rule_set.add(Rule::new(&rule.name, condition, consequent));
    }
    log::info!("loaded {} rules", rule_set.len());
    log::debug!("\n{}", rule_set);

    let context = InferenceContext::new(
        preset.names_of(LinguisticVarKind::Input),
        to_options(&preset.operators),
    );
    let machine = InferenceMachine::new(context, universes.into_values(), rule_set);

    match workers {
        Some(n) => Ok(machine.with_workers(n)?),
        None => Ok(machine),
    }
}

/// Parse `name=value`.
pub fn parse_input(raw: &str) -> Result<(String, f64), CustomError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CustomError::InvalidInput(raw.to_string()))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| CustomError::InvalidInput(raw.to_string()))?;
    Ok((name.trim().to_string(), value))
}

/// Write each input in order and return the decision after the last write.
/// Names the machine does not know are rejected before anything is written.
pub fn apply_inputs(
    machine: &mut InferenceMachine,
    inputs: &[(String, f64)],
) -> Result<Option<f64>, CustomError> {
    if let Some((name, _)) = inputs
        .iter()
        .find(|(name, _)| !machine.context().has_input(name))
    {
        return Err(CustomError::InputNotFound(name.clone()));
    }

    let mut decision = machine.decision();
    for (name, value) in inputs {
        decision = measure_time(
            || machine.set(name, *value),
            &format!("{} = {}", name, value),
        );
    }
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::core::settings::parse_preset;

    const TIPPING: &str = r#"{
        "universes": {
            "service": {
                "domain": { "begin": 0, "end": 10, "step": 0.5 },
                "kind": "input",
                "shapes": {
                    "poor": { "shapeType": "trapezoid", "parameters": { "a": 0, "b": 0, "c": 2, "d": 5 } },
                    "good": { "shapeType": "trapezoid", "parameters": { "a": 5, "b": 8, "c": 10, "d": 10 } }
                }
            },
            "food": {
                "domain": { "begin": 0, "end": 10, "step": 0.5 },
                "kind": "input",
                "shapes": {
                    "rancid": { "shapeType": "trapezoid", "parameters": { "a": 0, "b": 0, "c": 1, "d": 4 } }
                }
            },
            "tip": {
                "domain": { "begin": 0, "end": 30, "step": 1 },
                "kind": "output",
                "shapes": {
                    "low": { "shapeType": "triangle", "parameters": { "a": 0, "b": 5, "c": 10 } },
                    "high": { "shapeType": "triangle", "parameters": { "a": 20, "b": 25, "c": 30 } }
                }
            }
        },
        "rules": [
            {
                "name": "stingy",
                "condition": { "or": [
                    { "is": { "var": "service", "set": "poor" } },
                    { "is": { "var": "food", "set": "rancid" } }
                ] },
                "then": { "var": "tip", "set": "low" }
            },
            {
                "name": "generous",
                "condition": { "and": [
                    { "is": { "var": "service", "set": "good" } },
                    { "not": { "is": { "var": "food", "set": "rancid" } } }
                ] },
                "then": { "var": "tip", "set": "high" }
            }
        ]
    }"#;

    fn machine(workers: Option<usize>) -> InferenceMachine {
        create_inference_machine(&parse_preset(TIPPING).unwrap(), workers).unwrap()
    }

    fn inputs(raw: &[&str]) -> Vec<(String, f64)> {
        raw.iter().map(|r| parse_input(r).unwrap()).collect()
    }

    #[test]
    fn test_create_inference_machine() {
        let m = machine(None);

        assert_eq!(m.rule_set().len(), 2);
        assert_eq!(m.universes().len(), 3);
        assert!(m.context().has_input("service"));
        assert!(m.context().has_input("food"));
        assert!(!m.context().has_input("tip"));
        assert_eq!(
            m.rule_set().rules()[1].to_string(),
            "generous: IF (service IS good AND NOT food IS rancid) THEN high"
        );
    }

    #[test]
    fn test_generous_tip() {
        let mut m = machine(None);
        let d = apply_inputs(&mut m, &inputs(&["food=9", "service=9"])).unwrap();
        assert!(approx_eq!(f64, d.unwrap(), 25.0, epsilon = 1e-9));
        assert_eq!(m.get("food"), 9.0);
    }

    #[test]
    fn test_stingy_tip() {
        let mut m = machine(Some(2));
        let d = apply_inputs(&mut m, &inputs(&["food=0.5", "service=9"])).unwrap();
        assert!(approx_eq!(f64, d.unwrap(), 5.0, epsilon = 1e-9));
    }

    #[test]
    fn test_partial_inputs_poison_rules() {
        // food stays unset, so both conditions read NaN and nothing fires
        let mut m = machine(None);
        let d = apply_inputs(&mut m, &inputs(&["service=9"])).unwrap();
        assert_eq!(d, None);
    }

    #[test]
    fn test_unknown_input() {
        let mut m = machine(None);
        assert!(matches!(
            apply_inputs(&mut m, &inputs(&["service=9", "price=3"])),
            Err(CustomError::InputNotFound(name)) if name == "price"
        ));
        assert!(m.get("service").is_nan());
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("rsi=42.5").unwrap(), ("rsi".to_string(), 42.5));
        assert_eq!(parse_input(" rsi = -1 ").unwrap(), ("rsi".to_string(), -1.0));
        assert!(parse_input("rsi").is_err());
        assert!(parse_input("rsi=high").is_err());
    }

    #[test]
    fn test_unknown_set_in_rule() {
        let mut preset = parse_preset(TIPPING).unwrap();
        preset.rules[0].then.set = "huge".to_string();
        assert!(matches!(
            create_inference_machine(&preset, None),
            Err(CustomError::SetNotFound { set, .. }) if set == "huge"
        ));

        let mut preset = parse_preset(TIPPING).unwrap();
        preset.rules[1].condition = ConditionModel::Is {
            var: "mood".to_string(),
            set: "happy".to_string(),
        };
        assert!(matches!(
            create_inference_machine(&preset, None),
            Err(CustomError::UniverseNotFound(u)) if u == "mood"
        ));
    }
}
