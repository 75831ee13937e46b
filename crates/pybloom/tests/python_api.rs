//! Drives the `BloomFilter` binding through an embedded interpreter,
//! exercising it exactly the way Python calling code would.

use std::ffi::CString;

use pyo3::prelude::*;
use pyo3::types::PyDict;

fn module(py: Python<'_>) -> Bound<'_, PyModule> {
    let m = PyModule::new_bound(py, "pybloom").unwrap();
    pybloom::pybloom(&m).unwrap();
    m
}

fn run(py: Python<'_>, code: &str) -> PyResult<()> {
    let locals = PyDict::new_bound(py);
    locals.set_item("pybloom", module(py)).unwrap();
    let code = CString::new(code).unwrap();
    py.run(&code, None, Some(&locals))
}

#[test]
fn add_and_contains_roundtrip() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
bf = pybloom.BloomFilter(1000, 0.01)
bf.add("apple")
bf.add(b"banana")
bf.add(42)
assert "apple" in bf
assert b"banana" in bf
assert 42 in bf
"#,
        )
        .unwrap();
    });
}

#[test]
fn update_bulk_inserts_from_an_iterable() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
bf = pybloom.BloomFilter(1000, 0.01)
bf.update(["a", "b", "c"])
assert "a" in bf and "b" in bf and "c" in bf
"#,
        )
        .unwrap();
    });
}

#[test]
fn clear_and_is_empty() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
bf = pybloom.BloomFilter(100, 0.01)
assert bf.is_empty()
bf.add("x")
assert not bf.is_empty()
bf.clear()
assert bf.is_empty()
"#,
        )
        .unwrap();
    });
}

#[test]
fn union_via_or_operator_and_in_place() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
a = pybloom.BloomFilter(1000, 0.01)
a.add("a")
b = pybloom.BloomFilter(1000, 0.01)
b.add("b")
u = a | b
assert "a" in u and "b" in u

a |= b
assert "a" in a and "b" in a
"#,
        )
        .unwrap();
    });
}

#[test]
fn pickle_roundtrips_serializable_mode() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
import pickle
bf = pybloom.BloomFilter(1000, 0.01, serializable=True)
bf.add("apple")
restored = pickle.loads(pickle.dumps(bf))
assert "apple" in restored
assert restored == bf
"#,
        )
        .unwrap();
    });
}

#[test]
fn default_mode_rejects_pickling() {
    Python::with_gil(|py| {
        let err = run(
            py,
            r#"
import pickle
bf = pybloom.BloomFilter(1000, 0.01)
bf.add("apple")
pickle.dumps(bf)
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ValueError"));
    });
}

#[test]
fn default_mode_accepts_any_hashable_item() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
bf = pybloom.BloomFilter(1000, 0.01)
bf.add((1, "two", 3.0))
bf.add(frozenset({1, 2, 3}))
assert (1, "two", 3.0) in bf
assert frozenset({1, 2, 3}) in bf
"#,
        )
        .unwrap();
    });
}

#[test]
fn properties_report_sizing() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
bf = pybloom.BloomFilter(1000, 0.01)
assert bf.capacity == 1000
assert abs(bf.fp_rate - 0.01) < 1e-9
assert bf.size_in_bits % 256 == 0
assert bf.size_in_bits > 0
assert bf.k == 8
assert bf.byte_count * 8 == bf.size_in_bits
assert bf.serializable is False
"#,
        )
        .unwrap();
    });
}

#[test]
fn serializable_property_reflects_constructor_argument() {
    Python::with_gil(|py| {
        run(
            py,
            r#"
bf = pybloom.BloomFilter(1000, 0.01, serializable=True)
assert bf.serializable is True
"#,
        )
        .unwrap();
    });
}

#[test]
fn rejects_unsupported_item_types_in_serializable_mode() {
    Python::with_gil(|py| {
        let err = run(
            py,
            r#"
bf = pybloom.BloomFilter(100, 0.01, serializable=True)
bf.add(3.14)
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("TypeError"));
    });
}

#[test]
fn rejects_int_out_of_range_in_serializable_mode() {
    Python::with_gil(|py| {
        let err = run(
            py,
            r#"
bf = pybloom.BloomFilter(100, 0.01, serializable=True)
bf.add(2 ** 63)
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ValueError"));
        assert!(err.to_string().contains("int64"));
    });
}
