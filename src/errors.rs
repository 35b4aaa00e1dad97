//! Centralized error handling for labeled_resample
//!
//! Every fallible operation in the crate returns [`Result`], carrying a
//! [`ResampleError`] that names the dimension, variable or coordinate involved.

use std::fmt;

/// Main error type for labeled array and resampling operations
#[derive(Debug)]
pub enum ResampleError {
    /// The proxy resampling dimension has the same name as the real dimension
    ProxyDimensionConflict { dim: String, resample_dim: String },

    /// Dimension not found in an array, variable or dataset
    DimensionNotFound { var: String, dim: String },

    /// Variable not found in a dataset
    VariableNotFound { var: String },

    /// Coordinate not found
    CoordinateNotFound { name: String },

    /// A dimension or coordinate name is already taken
    DuplicateName { name: String },

    /// Dimensions cannot be aligned, concatenated or broadcast together
    IncompatibleDimensions { message: String },

    /// Data shape does not match the declared dimensions
    ShapeMismatch { message: String },

    /// The datetime accessor was used on a non-temporal coordinate
    NotDatetimeLike { accessor: String, found: String },

    /// Group labels must be integers, strings or timestamps
    UnsupportedGroupKey { kind: String },

    /// Label not present in a coordinate
    LabelNotFound { dim: String, label: String },

    /// No groups to iterate
    EmptyGroups { dim: String },

    /// Statistics computation errors
    StatisticsError(String),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Generic error, also used by caller-supplied functions
    Generic(String),
}

impl ResampleError {
    /// Builds the configuration error raised when `dim` and `resample_dim` collide.
    #[must_use]
    pub fn proxy_dimension_conflict(dim: &str, resample_dim: &str) -> Self {
        ResampleError::ProxyDimensionConflict {
            dim: dim.to_string(),
            resample_dim: resample_dim.to_string(),
        }
    }
}

impl fmt::Display for ResampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleError::ProxyDimensionConflict { dim, resample_dim } => write!(
                f,
                "Proxy resampling dimension ('{}') cannot have the same name as actual dimension ('{}')",
                resample_dim, dim
            ),
            ResampleError::DimensionNotFound { var, dim } => {
                write!(f, "Dimension '{}' not found in variable '{}'", dim, var)
            }
            ResampleError::VariableNotFound { var } => write!(f, "Variable '{}' not found in dataset", var),
            ResampleError::CoordinateNotFound { name } => write!(f, "Coordinate '{}' not found", name),
            ResampleError::DuplicateName { name } => {
                write!(f, "Name '{}' is already used by a dimension or coordinate", name)
            }
            ResampleError::IncompatibleDimensions { message } => write!(f, "Incompatible dimensions: {}", message),
            ResampleError::ShapeMismatch { message } => write!(f, "Shape mismatch: {}", message),
            ResampleError::NotDatetimeLike { accessor, found } => write!(
                f,
                "'{}' accessor only available for coordinates with datetime values, found {} values",
                accessor, found
            ),
            ResampleError::UnsupportedGroupKey { kind } => {
                write!(f, "Cannot group by {} values; use integer, string or datetime labels", kind)
            }
            ResampleError::LabelNotFound { dim, label } => {
                write!(f, "Label '{}' not found along dimension '{}'", label, dim)
            }
            ResampleError::EmptyGroups { dim } => write!(f, "No groups found along dimension '{}'", dim),
            ResampleError::StatisticsError(msg) => write!(f, "Statistics computation error: {}", msg),
            ResampleError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            ResampleError::ArrayError(e) => write!(f, "Array error: {}", e),
            ResampleError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ResampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResampleError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ndarray::ShapeError> for ResampleError {
    fn from(error: ndarray::ShapeError) -> Self {
        ResampleError::ArrayError(error)
    }
}

impl From<String> for ResampleError {
    fn from(error: String) -> Self {
        ResampleError::Generic(error)
    }
}

impl From<&str> for ResampleError {
    fn from(error: &str) -> Self {
        ResampleError::Generic(error.to_string())
    }
}

/// Result type alias for labeled_resample operations
pub type Result<T> = std::result::Result<T, ResampleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_both_dimensions() {
        let err = ResampleError::proxy_dimension_conflict("time", "time");
        let msg = err.to_string();
        assert!(msg.contains("Proxy resampling dimension ('time')"));
        assert!(msg.contains("actual dimension ('time')"));
    }

    #[test]
    fn shape_errors_keep_their_source() {
        let shape_err = ndarray::ArrayD::<f64>::from_shape_vec(vec![2, 2], vec![1.0]).unwrap_err();
        let err: ResampleError = shape_err.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
