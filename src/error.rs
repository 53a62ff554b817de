use thiserror::Error;

use crate::recipe::SearchMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipeError {
    #[error("a recipe needs at least one ingredient")]
    NoIngredients,
    #[error("recipe title cannot be empty")]
    EmptyTitle,
    #[error("servings must be at least 1")]
    InvalidServings,
    #[error("feedback cannot be empty")]
    EmptyFeedback,
    #[error("servings must be between {min} and {max}, got {requested}")]
    ServingsOutOfRange { requested: u32, min: u32, max: u32 },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator {0} is unavailable")]
    Unavailable(String),
    #[error("remote generator request failed: {0}")]
    Remote(#[from] reqwest::Error),
    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("stored value for {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored counter {key} is not a number: {value}")]
    BadCounter { key: String, value: String },
    #[error("stored value for {key} is not recognised: {value}")]
    Unrecognized { key: String, value: String },
    #[error("failed encoding value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("missing {0}: please enter {0} to generate a recipe")]
    MissingInput(SearchMode),
    #[error("history index {index} is out of range ({len} entries)")]
    HistoryIndex { index: usize, len: usize },
    #[error("no favorite recipe with id {0}")]
    FavoriteNotFound(String),
    #[error(transparent)]
    Recipe(#[from] RecipeError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not signed in")]
    NotSignedIn,
    #[error("admin role required")]
    Forbidden,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("an account already exists for {0}")]
    EmailTaken(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("no {entity} with id {id}")]
    NotFound { entity: &'static str, id: u32 },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
