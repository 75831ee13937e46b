//! Maps [`bloom::FilterError`] onto the Python exception types a caller
//! would expect.

use bloom::FilterError;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::PyErr;

/// A thin newtype so `?` can convert a [`FilterError`] straight into a
/// [`PyErr`] at any binding boundary.
pub struct PyFilterError(pub FilterError);

impl From<FilterError> for PyFilterError {
    fn from(e: FilterError) -> Self {
        PyFilterError(e)
    }
}

impl From<PyFilterError> for PyErr {
    fn from(e: PyFilterError) -> PyErr {
        match e.0 {
            FilterError::InvalidParameter => {
                PyValueError::new_err("capacity must be >= 1 and fp_rate must be in (0, 1)")
            }
            FilterError::UnsupportedType => {
                PyTypeError::new_err("unsupported item type for this filter's mode")
            }
            FilterError::OutOfRange => PyValueError::new_err(
                "integer out of range for serializable mode (must fit within int64)",
            ),
            FilterError::IncompatibleFilters => PyValueError::new_err(
                "filters have different capacity, fp_rate, serializable setting, or size and cannot be combined",
            ),
            FilterError::TypeMismatch => PyTypeError::new_err("argument type mismatch"),
            FilterError::NotSerializable => PyValueError::new_err(
                "filter was not constructed with serializable=True and cannot be serialized",
            ),
            FilterError::InvalidFormat => PyValueError::new_err("invalid bloom filter format"),
            FilterError::UnsupportedVersion => {
                PyValueError::new_err("unsupported bloom filter format version")
            }
            FilterError::Truncated => PyValueError::new_err("truncated bloom filter data"),
        }
    }
}
