//! Generator validation errors.

use thiserror::Error;

/// Error raised while registering entities with a generator.
///
/// These are always surfaced to the caller and never retried; generation
/// only writes output once every registration has succeeded.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("target `{name}` needs a recipe or dependencies")]
    EmptyTarget { name: String },

    #[error("target already registered:\n{rendered}")]
    DuplicateTarget { rendered: String },

    #[error("pattern rule already registered:\n{rendered}")]
    DuplicatePatternRule { rendered: String },

    #[error("entry `{entry}` already exists in the {list} list")]
    DuplicateEntry { entry: String, list: String },

    #[error("pattern `{pattern}` must contain the `%` wildcard")]
    MissingWildcard { pattern: String },

    #[error("`{path}` is not a directory")]
    InvalidDirectory { path: String },

    #[error("unknown variable referenced in directory entry: `{name}`")]
    UnknownVariable { name: String },

    #[error("invalid cache variable type `{given}` (expected one of BOOL, FILEPATH, PATH, STRING, INTERNAL)")]
    InvalidCacheType { given: String },

    #[error("unsupported library type `{given}` (expected STATIC, SHARED, MODULE, OBJECT, or INTERFACE)")]
    UnsupportedLibraryType { given: String },
}
