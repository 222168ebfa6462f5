use fuzzy_logic::FuzzyError;

#[derive(thiserror::Error, Debug)]
pub enum CustomError {
    #[error("This universe \"{0}\" does not exist")]
    UniverseNotFound(String),

    #[error("The set \"{set}\" does not exist in universe \"{universe}\"")]
    SetNotFound { universe: String, set: String },

    #[error("This shape \"{0}\" does not exist")]
    ShapeNotFound(String),

    #[error("Shape \"{shape}\" is missing parameter \"{parameter}\"")]
    ShapeParameterNotFound { shape: String, parameter: String },

    #[error("This input \"{0}\" does not exist")]
    InputNotFound(String),

    #[error("Invalid input \"{0}\", expected name=value")]
    InvalidInput(String),

    #[error(transparent)]
    Fuzzy(#[from] FuzzyError),

    #[error("Could not read preset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse preset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    InternalError(String),
}

pub fn map_internal_err<T: std::fmt::Display>(e: T) -> CustomError {
    use CustomError::*;
    InternalError(e.to_string())
}
