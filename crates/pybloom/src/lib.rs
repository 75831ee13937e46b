//! Python bindings for the `bloom` split-block Bloom filter engine, built
//! with `pyo3`.
//!
//! Exposes a single class, `BloomFilter`, wrapping [`bloom::Filter`]. The
//! constructor's `serializable` flag selects the mode: `False` (the default)
//! builds a host-hash-mode filter that hashes any hashable Python object via
//! its own `__hash__`, fast but not picklable; `True` builds a
//! deterministic-mode filter restricted to `str`/`bytes`/`int`, portable and
//! picklable across processes.

mod error;

use std::sync::Mutex;

use bloom::{Filter, Item, Mode};
use error::PyFilterError;
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

/// Resolves a Python object to a borrowed [`Item`] for a serializable-mode
/// filter, buffering the owned string/byte data in the caller's scratch
/// locals so the borrow can outlive this call. Ints go through
/// [`bloom::hash::checked_int`] so the `i64` boundary check (and its
/// `OutOfRange` error) is shared with the core crate rather than
/// re-implemented here.
fn py_to_item<'a>(
    obj: &'a Bound<'_, PyAny>,
    text_buf: &'a mut String,
    bytes_buf: &'a mut Vec<u8>,
) -> PyResult<Item<'a>> {
    if let Ok(s) = obj.extract::<String>() {
        *text_buf = s;
        return Ok(Item::Text(text_buf.as_str()));
    }
    if let Ok(b) = obj.extract::<Vec<u8>>() {
        *bytes_buf = b;
        return Ok(Item::Bytes(bytes_buf.as_slice()));
    }
    if let Ok(i) = obj.extract::<i128>() {
        return bloom::hash::checked_int(i).map_err(|e| PyFilterError(e).into());
    }
    Err(PyTypeError::new_err(
        "item type not supported in serializable mode: only str, bytes, and int are accepted",
    ))
}

/// Seeds a host-hash-mode insert/lookup from Python's own `hash(item)`,
/// accepting any hashable object -- tuples, frozensets, nested structures --
/// the same way the language's own set/dict machinery would.
fn py_host_hash(item: &Bound<'_, PyAny>) -> PyResult<u64> {
    Ok(item.hash()? as u64)
}

/// A split-block Bloom filter, backed by the `bloom` engine.
///
/// `BloomFilter(capacity, fp_rate, serializable=False)` -- the default
/// (`serializable=False`) accepts any hashable Python value via the host's
/// own hash; `serializable=True` restricts items to `str`/`bytes`/`int` in
/// exchange for a portable, picklable bit pattern.
#[pyclass(name = "BloomFilter")]
struct PyBloomFilter {
    inner: Mutex<Filter>,
    serializable: bool,
}

impl PyBloomFilter {
    fn with_inner<R>(&self, f: impl FnOnce(&Filter) -> R) -> R {
        f(&self.inner.lock().expect("bloom filter mutex poisoned"))
    }

    fn with_inner_mut<R>(&self, f: impl FnOnce(&mut Filter) -> R) -> R {
        f(&mut self.inner.lock().expect("bloom filter mutex poisoned"))
    }
}

#[pymethods]
impl PyBloomFilter {
    #[new]
    #[pyo3(signature = (capacity, fp_rate, serializable=false))]
    fn new(capacity: u64, fp_rate: f64, serializable: bool) -> PyResult<Self> {
        let mode = if serializable {
            Mode::Deterministic
        } else {
            Mode::HostHash
        };
        let inner = Filter::new(capacity, fp_rate, mode).map_err(PyFilterError)?;
        tracing::debug!(capacity, fp_rate, ?mode, "constructed BloomFilter binding");
        Ok(PyBloomFilter {
            inner: Mutex::new(inner),
            serializable,
        })
    }

    /// Returns the constructor arguments needed to rebuild an empty shell
    /// before `__setstate__` fills in the bit array -- pickling always
    /// round-trips through deterministic mode, since host-hash-mode filters
    /// refuse to serialize in the first place.
    fn __getnewargs__(&self) -> (u64, f64) {
        self.with_inner(|f| (f.capacity(), f.fp_rate()))
    }

    fn __getstate__(&self, py: Python<'_>) -> PyResult<Py<PyBytes>> {
        let bytes = self.with_inner(bloom::to_bytes).map_err(PyFilterError)?;
        Ok(PyBytes::new_bound(py, &bytes).into())
    }

    fn __setstate__(&mut self, state: &Bound<'_, PyBytes>) -> PyResult<()> {
        let filter = bloom::from_bytes(state.as_bytes()).map_err(PyFilterError)?;
        self.inner = Mutex::new(filter);
        self.serializable = true;
        Ok(())
    }

    fn add(&self, item: &Bound<'_, PyAny>) -> PyResult<()> {
        if self.serializable {
            let mut text_buf = String::new();
            let mut bytes_buf = Vec::new();
            let resolved = py_to_item(item, &mut text_buf, &mut bytes_buf)?;
            self.with_inner_mut(|filter| filter.insert(resolved))
                .map_err(|e| PyFilterError(e).into())
        } else {
            let seed = py_host_hash(item)?;
            self.with_inner_mut(|filter| filter.insert_hash(seed));
            Ok(())
        }
    }

    fn __contains__(&self, item: &Bound<'_, PyAny>) -> PyResult<bool> {
        if self.serializable {
            let mut text_buf = String::new();
            let mut bytes_buf = Vec::new();
            let resolved = py_to_item(item, &mut text_buf, &mut bytes_buf)?;
            self.with_inner(|filter| filter.may_contain(&resolved))
                .map_err(|e| PyFilterError(e).into())
        } else {
            let seed = py_host_hash(item)?;
            Ok(self.with_inner(|filter| filter.contains_hash(seed)))
        }
    }

    fn update(&self, iterable: &Bound<'_, PyAny>) -> PyResult<()> {
        for item in iterable.try_iter()? {
            self.add(&item?)?;
        }
        Ok(())
    }

    fn clear(&self) {
        self.with_inner_mut(Filter::clear);
    }

    fn is_empty(&self) -> bool {
        self.with_inner(Filter::is_empty)
    }

    fn copy(&self) -> PyBloomFilter {
        PyBloomFilter {
            inner: Mutex::new(self.with_inner(Filter::clone)),
            serializable: self.serializable,
        }
    }

    fn __or__(&self, other: &PyBloomFilter) -> PyResult<PyBloomFilter> {
        let union = self
            .with_inner(|a| other.with_inner(|b| a.union(b)))
            .map_err(PyFilterError)?;
        Ok(PyBloomFilter {
            inner: Mutex::new(union),
            serializable: self.serializable,
        })
    }

    fn __ior__(&mut self, other: &PyBloomFilter) -> PyResult<()> {
        other
            .with_inner(|b| self.with_inner_mut(|a| a.union_in_place(b)))
            .map_err(|e| PyFilterError(e).into())
    }

    fn __eq__(&self, other: &PyBloomFilter) -> bool {
        self.with_inner(|a| other.with_inner(|b| a == b))
    }

    #[getter]
    fn capacity(&self) -> u64 {
        self.with_inner(Filter::capacity)
    }

    #[getter]
    fn fp_rate(&self) -> f64 {
        self.with_inner(Filter::fp_rate)
    }

    #[getter]
    fn size_in_bits(&self) -> u64 {
        self.with_inner(Filter::bit_count)
    }

    #[getter]
    fn k(&self) -> usize {
        Filter::K
    }

    #[getter]
    fn byte_count(&self) -> u64 {
        self.with_inner(Filter::byte_count)
    }

    #[getter]
    fn serializable(&self) -> bool {
        self.serializable
    }

    fn __repr__(&self) -> String {
        self.with_inner(|f| {
            format!(
                "BloomFilter(capacity={}, fp_rate={}, size_in_bits={})",
                f.capacity(),
                f.fp_rate(),
                f.bit_count()
            )
        })
    }
}

#[pymodule]
pub fn pybloom(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBloomFilter>()?;
    Ok(())
}
