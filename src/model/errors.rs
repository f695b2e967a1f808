use super::{ClassName, MethodSignature};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed name: {0}")]
    MalformedName(String),

    #[error("bad descriptor `{descriptor}` on {unit}: {message}")]
    BadDescriptor {
        unit: String,
        descriptor: String,
        message: String,
    },

    /// A class with this name was already added to the unit graph
    #[error("duplicate class {0}")]
    DuplicateClass(ClassName),

    /// A method with this long name was already declared on the same class
    #[error("duplicate method {0}")]
    DuplicateMethod(MethodSignature),

    /// An annotation on a unit refers to a type the unit graph doesn't know about
    ///
    /// This is only fatal to the lookup on that one unit.
    #[error("annotation type {annotation} on {unit} cannot be resolved")]
    MissingAnnotationType { unit: String, annotation: ClassName },
}
