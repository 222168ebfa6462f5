use std::{fmt, ops::Not, sync::Arc};

use crate::{inference::InferenceContext, set::FuzzySet};

/// Rule condition over fuzzy predicates.
#[derive(Debug, Clone)]
pub enum Expression {
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    /// `variable IS set`: the degree of the variable's current value in the set.
    Is(String, Arc<FuzzySet>),
}

impl Expression {
    pub fn is(variable: &str, set: Arc<FuzzySet>) -> Self {
        Expression::Is(variable.to_string(), set)
    }

    pub fn and(self, right: Expression) -> Self {
        Expression::And(Box::new(self), Box::new(right))
    }

    pub fn or(self, right: Expression) -> Self {
        Expression::Or(Box::new(self), Box::new(right))
    }

    /// Degree to which the expression holds in `context`. An input missing from
    /// the context reads as NaN, which then flows through the connectives.
    pub fn evaluate(&self, context: &InferenceContext) -> f64 {
        let logic = context.options().logic_ops.as_ref();
        match self {
            Expression::And(l, r) => logic.and(l.evaluate(context), r.evaluate(context)),
            Expression::Or(l, r) => logic.or(l.evaluate(context), r.evaluate(context)),
            Expression::Not(x) => logic.not(x.evaluate(context)),
            Expression::Is(name, set) => set.degree_of(context.value(name)),
        }
    }
}

impl Not for Expression {
    type Output = Expression;

    fn not(self) -> Self::Output {
        Expression::Not(Box::new(self))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::And(l, r) => write!(f, "({} AND {})", l, r),
            Expression::Or(l, r) => write!(f, "({} OR {})", l, r),
            Expression::Not(x) => write!(f, "NOT {}", x),
            Expression::Is(name, set) => write!(f, "{} IS {}", name, set),
        }
    }
}
