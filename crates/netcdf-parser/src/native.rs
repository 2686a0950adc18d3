//! Native NetCDF access helpers shared by the snow and terrain loaders.

use std::path::Path;
use std::sync::Once;

use snow_common::GridSpec;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This function disables that output by calling
/// H5Eset_auto2 with null handlers. It only needs to be called once per process,
/// but is safe to call multiple times.
///
/// Call it early in `main()`, before any NetCDF file is opened.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file for reading.
pub(crate) fn open_file(path: &Path) -> NetCdfResult<netcdf::File> {
    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }
    netcdf::open(path).map_err(|e| NetCdfError::library(path, e))
}

/// Read a 1D coordinate variable as f64.
pub(crate) fn read_coord(file: &netcdf::File, path: &Path, name: &str) -> NetCdfResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::missing(format!("{} coordinate in {}", name, path.display())))?;
    var.get_values::<f64, _>(..)
        .map_err(|e| NetCdfError::library(path, e))
}

/// Build the grid of a file from its `x` and `y` coordinate variables.
pub(crate) fn read_grid(file: &netcdf::File, path: &Path) -> NetCdfResult<GridSpec> {
    let x = read_coord(file, path, "x")?;
    let y = read_coord(file, path, "y")?;
    Ok(GridSpec::from_coords(x, y)?)
}

/// Names of a variable's dimensions, in order.
pub(crate) fn dimension_names(var: &netcdf::Variable) -> Vec<String> {
    var.dimensions().iter().map(|d| d.name()).collect()
}

/// Apply `_FillValue`, `scale_factor` and `add_offset` to raw values in place.
///
/// Fill values decode to NaN.
pub(crate) fn unpack_values(var: &netcdf::Variable, values: &mut [f32]) {
    let fill_value = get_f32_attr(var, "_FillValue").or_else(|| get_f32_attr(var, "missing_value"));
    let scale_factor = get_f32_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f32_attr(var, "add_offset").unwrap_or(0.0);

    for v in values.iter_mut() {
        if fill_value.is_some_and(|fill| *v == fill) {
            *v = f32::NAN;
        } else if scale_factor != 1.0 || add_offset != 0.0 {
            *v = *v * scale_factor + add_offset;
        }
    }
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f32 attribute.
pub(crate) fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

/// Helper to get a string attribute.
pub(crate) fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        netcdf::AttributeValue::Strs(mut v) if !v.is_empty() => Some(v.swap_remove(0)),
        _ => None,
    }
}
