//! Python bindings

use pyo3::prelude::*;

use crate::wmf;

/// Convert a WMF file to SVG
///
/// Args:
///     input_path: Path to input WMF file
///     output_path: Path to output SVG file
///
/// Returns:
///     True if conversion successful
#[pyfunction]
fn convert_wmf_to_svg(input_path: &str, output_path: &str) -> PyResult<bool> {
    let input = std::path::Path::new(input_path);
    if !input.exists() {
        return Err(PyErr::new::<pyo3::exceptions::PyFileNotFoundError, _>(
            format!("Input file not found: {}", input_path)
        ));
    }

    let data = std::fs::read(input).map_err(|e| PyErr::new::<pyo3::exceptions::PyIOError, _>(
        format!("Failed to read input file: {}", e)
    ))?;

    if !wmf::is_wmf_format(&data) {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
            "Input file must be WMF format"
        ));
    }

    let svg_content = crate::convert_wmf_to_svg(&data)?;

    std::fs::write(output_path, svg_content).map_err(|e| PyErr::new::<pyo3::exceptions::PyIOError, _>(
        format!("Failed to write output file: {}", e)
    ))?;

    Ok(true)
}

/// Convert WMF bytes to an SVG string
#[pyfunction]
fn convert_wmf_bytes_to_svg(wmf_data: &[u8]) -> PyResult<String> {
    if !wmf::is_wmf_format(wmf_data) {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
            "Input must be WMF data"
        ));
    }
    Ok(crate::convert_wmf_to_svg(wmf_data)?)
}

/// Python module for the WMF converter
#[pymodule]
fn wmf2svg(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert_wmf_to_svg, m)?)?;
    m.add_function(wrap_pyfunction!(convert_wmf_bytes_to_svg, m)?)?;
    Ok(())
}
