use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use fuzzy_logic::{
    shape::{trapezoidal, triangle},
    CenterOfMass, Implication, InferenceOptions, MeanOfMaximum, MinMax, Product, UniversalSet,
    Zadeh, F,
};
use serde::{Deserialize, Serialize};

use super::error::CustomError;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum LinguisticVarKind {
    #[serde(rename(serialize = "input", deserialize = "input"))]
    Input,
    #[serde(rename(serialize = "output", deserialize = "output"))]
    Output,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum DomainModel {
    Range { begin: f64, end: f64, step: f64 },
    Explicit(Vec<f64>),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ShapeModel {
    pub parameters: BTreeMap<String, f64>,
    #[serde(rename(serialize = "shapeType", deserialize = "shapeType"))]
    pub shape_type: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct UniverseModel {
    pub domain: DomainModel,
    pub shapes: BTreeMap<String, ShapeModel>,
    pub kind: LinguisticVarKind,
}

/// Rule condition as written in a preset, e.g.
/// `{"and": [{"is": {"var": "rsi", "set": "low"}}, {"not": {"is": ...}}]}`.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ConditionModel {
    And(Box<ConditionModel>, Box<ConditionModel>),
    Or(Box<ConditionModel>, Box<ConditionModel>),
    Not(Box<ConditionModel>),
    Is { var: String, set: String },
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SetRefModel {
    pub var: String,
    pub set: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RuleModel {
    pub name: String,
    pub condition: ConditionModel,
    pub then: SetRefModel,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SetOpsKind {
    #[default]
    #[serde(rename = "min-max")]
    MinMax,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogicOpsKind {
    #[default]
    #[serde(rename = "zadeh")]
    Zadeh,
    #[serde(rename = "product")]
    Product,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefuzzKind {
    #[default]
    #[serde(rename = "center-of-mass")]
    CenterOfMass,
    #[serde(rename = "mean-of-maximum")]
    MeanOfMaximum,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImplicationKind {
    #[default]
    #[serde(rename = "threshold")]
    Threshold,
    #[serde(rename = "clip")]
    Clip,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperatorsModel {
    #[serde(default)]
    pub set: SetOpsKind,
    #[serde(default)]
    pub logic: LogicOpsKind,
    #[serde(default)]
    pub defuzzificator: DefuzzKind,
    #[serde(default)]
    pub implication: ImplicationKind,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct PresetModel {
    pub universes: BTreeMap<String, UniverseModel>,
    #[serde(default)]
    pub rules: Vec<RuleModel>,
    #[serde(default)]
    pub operators: OperatorsModel,
}

impl PresetModel {
    pub fn names_of(&self, kind: LinguisticVarKind) -> Vec<&str> {
        self.universes
            .iter()
            .filter(|(_, u)| u.kind == kind)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

pub fn load_preset<P: AsRef<Path>>(path: P) -> Result<PresetModel, CustomError> {
    let raw = fs::read_to_string(path)?;
    parse_preset(&raw)
}

pub fn parse_preset(raw: &str) -> Result<PresetModel, CustomError> {
    Ok(serde_json::from_str(raw)?)
}

fn parameter(name: &str, shape: &ShapeModel, key: &str) -> Result<f64, CustomError> {
    shape
        .parameters
        .get(key)
        .copied()
        .ok_or_else(|| CustomError::ShapeParameterNotFound {
            shape: name.to_string(),
            parameter: key.to_string(),
        })
}

pub fn to_membership(name: &str, shape: &ShapeModel) -> Result<F, CustomError> {
    let p = |key| parameter(name, shape, key);
    let f = match shape.shape_type.as_str() {
        "triangle" => triangle(p("a")?, p("b")?, p("c")?)?,
        "trapezoid" => trapezoidal(p("a")?, p("b")?, p("c")?, p("d")?)?,
        other => return Err(CustomError::ShapeNotFound(other.to_string())),
    };
    Ok(f)
}

pub fn to_universe(name: &str, model: &UniverseModel) -> Result<UniversalSet, CustomError> {
    let mut universe = match &model.domain {
        DomainModel::Range { begin, end, step } => UniversalSet::new(name, *begin, *end, *step)?,
        DomainModel::Explicit(domain) => UniversalSet::with_domain(name, domain.clone())?,
    };
    for (set_name, shape) in model.shapes.iter() {
        universe.add_set(set_name, to_membership(set_name, shape)?);
    }
    Ok(universe)
}

pub fn to_options(model: &OperatorsModel) -> InferenceOptions {
    let options = match model.set {
        SetOpsKind::MinMax => InferenceOptions::default().with_set_ops(MinMax),
    };
    let options = match model.logic {
        LogicOpsKind::Zadeh => options.with_logic_ops(Zadeh),
        LogicOpsKind::Product => options.with_logic_ops(Product),
    };
    let options = match model.defuzzificator {
        DefuzzKind::CenterOfMass => options.with_defuzzificator(CenterOfMass),
        DefuzzKind::MeanOfMaximum => options.with_defuzzificator(MeanOfMaximum),
    };
    options.with_implication(match model.implication {
        ImplicationKind::Threshold => Implication::Threshold,
        ImplicationKind::Clip => Implication::Clip,
    })
}

pub fn to_universes(
    preset: &PresetModel,
) -> Result<BTreeMap<String, Arc<UniversalSet>>, CustomError> {
    preset
        .universes
        .iter()
        .map(|(name, model)| Ok((name.to_string(), Arc::new(to_universe(name, model)?))))
        .collect()
}
