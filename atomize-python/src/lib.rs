//! Python bindings for the atomize rewriter
//!
//! This module lets Python code prepare patterns containing atomic groups
//! for engines that lack them.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(err: atomize_lib::AtomizeError) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

/// Details of a transformation
#[pyclass(name = "TransformReport")]
pub struct PyTransformReport {
    inner: atomize_lib::TransformReport,
}

#[pymethods]
impl PyTransformReport {
    /// The original pattern
    #[getter]
    fn input(&self) -> &str {
        &self.inner.input
    }

    /// The pattern with synthetic group names still in place
    #[getter]
    fn intermediate(&self) -> &str {
        &self.inner.intermediate
    }

    /// The transformed pattern
    #[getter]
    fn output(&self) -> &str {
        &self.inner.output
    }

    /// Marker names of the resolved atomic groups, in resolution order
    #[getter]
    fn markers(&self) -> Vec<String> {
        self.inner
            .groups
            .iter()
            .map(|group| group.marker_name.clone())
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "TransformReport(input={:?}, output={:?}, groups={})",
            self.inner.input,
            self.inner.output,
            self.inner.groups.len()
        )
    }
}

/// Rewrite atomic groups into lookahead-plus-backreference emulation
#[pyfunction]
fn transform_atomic_groups(pattern: &str) -> PyResult<String> {
    atomize_lib::transform_atomic_groups(pattern).map_err(to_py_err)
}

/// Rewrite atomic groups and keep the intermediate form
#[pyfunction]
fn transform_debug(pattern: &str) -> PyResult<PyTransformReport> {
    atomize_lib::transform_atomic_groups_debug(pattern)
        .map(|inner| PyTransformReport { inner })
        .map_err(to_py_err)
}

/// Check whether a pattern contains an atomic group outside character classes
#[pyfunction]
fn has_atomic_groups(pattern: &str) -> bool {
    atomize_lib::has_atomic_groups(pattern)
}

/// Check whether a regex needle occurs unescaped outside character classes
#[pyfunction]
fn exists_unescaped(pattern: &str, needle: &str) -> PyResult<bool> {
    let needle = atomize_lib::Needle::new(needle).map_err(to_py_err)?;
    Ok(atomize_lib::exists_unescaped_in_default_context(
        pattern, &needle,
    ))
}

/// Atomize Python module
#[pymodule(name = "atomize")]
fn atomize(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTransformReport>()?;
    m.add_function(wrap_pyfunction!(transform_atomic_groups, m)?)?;
    m.add_function(wrap_pyfunction!(transform_debug, m)?)?;
    m.add_function(wrap_pyfunction!(has_atomic_groups, m)?)?;
    m.add_function(wrap_pyfunction!(exists_unescaped, m)?)?;
    Ok(())
}
