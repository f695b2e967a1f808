use crate::model::{self, ClassName, MethodSignature};
use std::fmt;

/// Which of the two marker annotations is meant
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Marker {
    Added,
    Modified,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Added => f.write_str("added"),
            Marker::Modified => f.write_str("modified"),
        }
    }
}

/// How far a failure reaches
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Severity {
    /// The pipeline upstream is inconsistent: abort the whole pass
    Fatal,

    /// Only the unit being looked at is unusable: log it, skip it, and keep going
    SkipUnit,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The marker annotation type is not known to the unit graph
    #[error("cannot resolve the {marker} marker annotation `{name}`")]
    UnresolvedMarker { marker: Marker, name: ClassName },

    /// A method is marked modified but the code-insertion stage never rewrote it
    #[error(
        "method {signature} in {class} is marked modified but has no code-insertion record \
         (code insertion must run before classification)"
    )]
    MissingCodeInsertion {
        class: ClassName,
        signature: MethodSignature,
    },

    /// A method carries both markers and the settings forbid that
    #[error("method {signature} in {class} is marked both added and modified")]
    ConflictingMarkers {
        class: ClassName,
        signature: MethodSignature,
    },

    /// Two source classes derive the same patch class name
    #[error(
        "patch class {patch_class} is already derived from {existing}, so it cannot also be used \
         for {source_class} (use package-qualified patch names)"
    )]
    PatchNameCollision {
        patch_class: ClassName,
        existing: ClassName,
        source_class: ClassName,
    },

    #[error(transparent)]
    Model(#[from] model::Error),

    #[error("malformed name: {0}")]
    MalformedName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Policy for each kind of failure
    ///
    /// | failure                                      | severity   |
    /// |----------------------------------------------|------------|
    /// | marker annotation type cannot be resolved    | `Fatal`    |
    /// | modified method without code insertion       | `Fatal`    |
    /// | method marked both ways (`Reject` policy)    | `Fatal`    |
    /// | two sources share one patch class name       | `Fatal`    |
    /// | annotation on a unit cannot be resolved      | `SkipUnit` |
    /// | anything else                                | `Fatal`    |
    pub fn severity(&self) -> Severity {
        match self {
            Error::Model(model::Error::MissingAnnotationType { .. }) => Severity::SkipUnit,
            Error::UnresolvedMarker { .. }
            | Error::MissingCodeInsertion { .. }
            | Error::ConflictingMarkers { .. }
            | Error::PatchNameCollision { .. }
            | Error::Model(_)
            | Error::MalformedName(_)
            | Error::Io(_)
            | Error::Json(_) => Severity::Fatal,
        }
    }
}
