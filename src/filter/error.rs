use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("WHERE clause '{template}' has {placeholders} placeholders but {params} parameters")]
    ParamMismatch {
        template: String,
        placeholders: usize,
        params: usize,
    },

    #[error("Query has no pagination attached")]
    MissingPagination,
}
