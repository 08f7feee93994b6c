// SPDX-License-Identifier: CEPL-1.0
//! All-or-nothing checks of required names (extensions, layers) against what a
//! driver reports.

use std::ffi::{CStr, CString};

use ash::vk;

use crate::error::{ExtensionScope, VkInitError, VkInitResult};

pub fn extension_names(props: &[vk::ExtensionProperties]) -> Vec<CString> {
    props
        .iter()
        // driver-written, nul-terminated within the fixed array
        .map(|p| unsafe { CStr::from_ptr(p.extension_name.as_ptr()) }.to_owned())
        .collect()
}

pub fn layer_names(props: &[vk::LayerProperties]) -> Vec<CString> {
    props
        .iter()
        .map(|p| unsafe { CStr::from_ptr(p.layer_name.as_ptr()) }.to_owned())
        .collect()
}

/// Names from `required` that `available` lacks, in request order.
pub fn missing_names<'a>(required: &[&'a CStr], available: &[CString]) -> Vec<&'a CStr> {
    required
        .iter()
        .copied()
        .filter(|want| !available.iter().any(|have| have.as_c_str() == *want))
        .collect()
}

/// True iff every required name is available. An empty `available` set never
/// satisfies anything.
pub fn supports_all(required: &[&CStr], available: &[CString]) -> bool {
    !available.is_empty() && missing_names(required, available).is_empty()
}

pub fn require_all(
    scope: ExtensionScope,
    required: &[&CStr],
    available: &[CString],
) -> VkInitResult<()> {
    if supports_all(required, available) {
        return Ok(());
    }
    let missing = if available.is_empty() {
        required.to_vec()
    } else {
        missing_names(required, available)
    };
    Err(VkInitError::MissingExtensions {
        scope,
        missing: missing
            .iter()
            .map(|n| n.to_string_lossy().into_owned())
            .collect(),
    })
}
