use std::{io, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while a statement runs.
pub enum RuntimeError {
    /// Tried to read an undefined variable.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
    },
    /// Called an unknown method or template.
    UndefinedMethod {
        /// The name of the method.
        name: String,
    },
    /// Referenced a list that does not exist.
    UndefinedList {
        /// The name of the list.
        name: String,
    },
    /// Referenced a class that does not exist.
    UndefinedClass {
        /// The name of the class.
        name: String,
    },
    /// Referenced a constant that does not exist.
    UndefinedConstant {
        /// The name of the constant.
        name: String,
    },
    /// Referenced a module that does not exist.
    UndefinedModule {
        /// The name of the module.
        name: String,
    },
    /// A value had an unexpected or incompatible type.
    TypeMismatch {
        /// Details about the type mismatch.
        details: String,
    },
    /// A value could not be converted to the requested representation.
    ConversionError {
        /// The text that failed to convert.
        value: String,
    },
    /// Attempted division (or remainder) by zero.
    DivideByZero,
    /// Tried to access a list element outside the allowed bounds.
    OutOfBounds {
        /// The index that was requested.
        index: String,
        /// The number of elements available.
        size:  usize,
    },
    /// Attempted to define a name that already exists.
    AlreadyDefined {
        /// The name being redefined.
        name: String,
    },
    /// An operator was not recognized in its position.
    InvalidOperator {
        /// The offending operator.
        operator: String,
    },
    /// The statement is not valid in the current state.
    InvalidOperation {
        /// Why the operation was rejected.
        details: String,
    },
    /// A file was expected but does not exist.
    FileNotFound {
        /// The requested path.
        path: String,
    },
    /// A file was about to be created but already exists.
    FileExists {
        /// The requested path.
        path: String,
    },
    /// A directory was expected but does not exist.
    DirectoryNotFound {
        /// The requested path.
        path: String,
    },
    /// A directory was about to be created but already exists.
    DirectoryExists {
        /// The requested path.
        path: String,
    },
    /// The host failed to read or write a resource.
    ReadFailure {
        /// The resource that failed.
        path:    String,
        /// The underlying host message.
        details: String,
    },
}

impl RuntimeError {
    /// Returns the stable numeric code of this error kind.
    ///
    /// The CLI exits with the code of the last reported error, so the
    /// numbering must never be reordered.
    ///
    /// # Example
    /// ```
    /// use quill::error::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::DivideByZero.code(), 9);
    /// ```
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::UndefinedVariable { .. } => 1,
            Self::UndefinedMethod { .. } => 2,
            Self::UndefinedList { .. } => 3,
            Self::UndefinedClass { .. } => 4,
            Self::UndefinedConstant { .. } => 5,
            Self::UndefinedModule { .. } => 6,
            Self::TypeMismatch { .. } => 7,
            Self::ConversionError { .. } => 8,
            Self::DivideByZero => 9,
            Self::OutOfBounds { .. } => 10,
            Self::AlreadyDefined { .. } => 11,
            Self::InvalidOperator { .. } => 12,
            Self::InvalidOperation { .. } => 13,
            Self::FileNotFound { .. } => 14,
            Self::FileExists { .. } => 15,
            Self::DirectoryNotFound { .. } => 16,
            Self::DirectoryExists { .. } => 17,
            Self::ReadFailure { .. } => 18,
        }
    }

    /// Shorthand for [`RuntimeError::InvalidOperation`].
    pub fn invalid(details: impl Into<String>) -> Self {
        Self::InvalidOperation { details: details.into() }
    }

    /// Shorthand for [`RuntimeError::TypeMismatch`].
    pub fn mismatch(details: impl Into<String>) -> Self {
        Self::TypeMismatch { details: details.into() }
    }

    /// Maps a host I/O failure on `path` to the matching error kind.
    ///
    /// `directory` selects between the file and directory flavours of the
    /// not-found and already-exists kinds.
    #[must_use]
    pub fn from_io(err: &io::Error, path: &Path, directory: bool) -> Self {
        let path = path.display().to_string();
        match (err.kind(), directory) {
            (io::ErrorKind::NotFound, false) => Self::FileNotFound { path },
            (io::ErrorKind::NotFound, true) => Self::DirectoryNotFound { path },
            (io::ErrorKind::AlreadyExists, false) => Self::FileExists { path },
            (io::ErrorKind::AlreadyExists, true) => Self::DirectoryExists { path },
            _ => Self::ReadFailure { path,
                                     details: err.to_string() },
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "Undefined variable '{name}'."),
            Self::UndefinedMethod { name } => write!(f, "Undefined method '{name}'."),
            Self::UndefinedList { name } => write!(f, "Undefined list '{name}'."),
            Self::UndefinedClass { name } => write!(f, "Undefined class '{name}'."),
            Self::UndefinedConstant { name } => write!(f, "Undefined constant '{name}'."),
            Self::UndefinedModule { name } => write!(f, "Undefined module '{name}'."),
            Self::TypeMismatch { details } => write!(f, "Type mismatch: {details}."),
            Self::ConversionError { value } => {
                write!(f, "Conversion error: '{value}' is not a whole number.")
            },
            Self::DivideByZero => write!(f, "Division by zero."),
            Self::OutOfBounds { index, size } => write!(f,
                                                        "Index out of bounds: {index} is outside a collection of {size} elements."),
            Self::AlreadyDefined { name } => write!(f, "'{name}' is already defined."),
            Self::InvalidOperator { operator } => write!(f, "Invalid operator '{operator}'."),
            Self::InvalidOperation { details } => write!(f, "Invalid operation: {details}."),
            Self::FileNotFound { path } => write!(f, "File '{path}' does not exist."),
            Self::FileExists { path } => write!(f, "File '{path}' already exists."),
            Self::DirectoryNotFound { path } => write!(f, "Directory '{path}' does not exist."),
            Self::DirectoryExists { path } => write!(f, "Directory '{path}' already exists."),
            Self::ReadFailure { path, details } => {
                write!(f, "Could not access '{path}': {details}.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
