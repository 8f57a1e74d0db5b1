use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("No languages configured")]
    NoLanguages,

    #[error("Base language {0:?} is not in the language list")]
    MissingBaseLanguage(String),
}
