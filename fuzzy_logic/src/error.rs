#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    #[error("Invalid {shape} parameters {parameters:?}: {reason}")]
    InvalidShape {
        shape: &'static str,
        parameters: Vec<f64>,
        reason: &'static str,
    },

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid membership degree {degree} for element {element}")]
    InvalidDegree { element: f64, degree: f64 },

    /// The aggregate set has zero total degree, so there is nothing to defuzzify.
    #[error("No decision: the aggregate set \"{0}\" has zero total membership")]
    NoDecision(String),

    #[error("Could not build the rule evaluation pool: {0}")]
    WorkerPool(String),
}
