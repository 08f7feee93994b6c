// SPDX-License-Identifier: CEPL-1.0
use std::ffi::CStr;
use std::fmt;

use ash::khr::swapchain;
use ash::vk;
use tracing::{debug, info};

use crate::error::{VkInitError, VkInitResult};
use crate::extensions::{missing_names, supports_all};
use crate::query::DeviceQuery;
use crate::queue::{resolve_queue_families, QueueCaps, QueueFamilyIndices};
use crate::surface::{probe_surface, SurfaceSupport};

/// Device extensions every candidate must expose.
pub const REQUIRED_DEVICE_EXTENSIONS: &[&CStr] = &[swapchain::NAME];

#[derive(Clone, Copy, Debug)]
pub struct DeviceRequirements<'a> {
    pub queues: QueueCaps,
    pub extensions: &'a [&'a CStr],
}

impl Default for DeviceRequirements<'static> {
    fn default() -> Self {
        DeviceRequirements {
            queues: QueueCaps::GRAPHICS | QueueCaps::PRESENT,
            extensions: REQUIRED_DEVICE_EXTENSIONS,
        }
    }
}

/// The winning candidate, with everything learnt while checking it.
#[derive(Clone, Debug)]
pub struct SelectedDevice<D> {
    pub device: D,
    pub name: String,
    pub queues: QueueFamilyIndices,
    pub support: SurfaceSupport,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    MissingQueues(QueueCaps),
    MissingExtensions(Vec<String>),
    NoSurfaceFormats,
    NoPresentModes,
    QueryFailed {
        what: &'static str,
        result: vk::Result,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingQueues(caps) => write!(f, "no queue family for {caps:?}"),
            Rejection::MissingExtensions(names) => write!(f, "missing extensions {names:?}"),
            Rejection::NoSurfaceFormats => f.write_str("surface reports no formats"),
            Rejection::NoPresentModes => f.write_str("surface reports no present modes"),
            Rejection::QueryFailed { what, result } => write!(f, "{what} query failed: {result}"),
        }
    }
}

/// Runs the three suitability checks on one device: queue families, device
/// extensions, surface formats/modes. The surface is only probed once the
/// cheaper checks pass.
pub fn check_device<Q: DeviceQuery>(
    query: &Q,
    device: Q::Device,
    reqs: &DeviceRequirements<'_>,
) -> VkInitResult<Result<SelectedDevice<Q::Device>, Rejection>> {
    let queues = resolve_queue_families(query, device, reqs.queues)?;
    if !queues.is_valid(reqs.queues) {
        return Ok(Err(Rejection::MissingQueues(
            reqs.queues.difference(queues.found()),
        )));
    }

    let available = query.device_extensions(device)?;
    if !supports_all(reqs.extensions, &available) {
        let missing = if available.is_empty() {
            reqs.extensions.to_vec()
        } else {
            missing_names(reqs.extensions, &available)
        };
        return Ok(Err(Rejection::MissingExtensions(
            missing
                .iter()
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
        )));
    }

    let support = probe_surface(query, device)?;
    if support.formats.is_empty() {
        return Ok(Err(Rejection::NoSurfaceFormats));
    }
    if support.present_modes.is_empty() {
        return Ok(Err(Rejection::NoPresentModes));
    }

    Ok(Ok(SelectedDevice {
        device,
        name: query.device_name(device),
        queues,
        support,
    }))
}

/// First candidate, in enumeration order, that passes every check. No scoring.
/// A capability query failing on one candidate rejects that candidate only.
pub fn select_physical_device<Q: DeviceQuery>(
    query: &Q,
    candidates: &[Q::Device],
    reqs: &DeviceRequirements<'_>,
) -> VkInitResult<SelectedDevice<Q::Device>> {
    for &device in candidates {
        let verdict = match check_device(query, device, reqs) {
            Ok(verdict) => verdict,
            Err(VkInitError::Query { what, source }) => Err(Rejection::QueryFailed {
                what,
                result: source,
            }),
            Err(e) => return Err(e),
        };
        match verdict {
            Ok(selected) => {
                info!(
                    "selected device '{}' (graphics family {:?}, present family {:?})",
                    selected.name, selected.queues.graphics, selected.queues.present
                );
                return Ok(selected);
            }
            Err(why) => debug!("skipping device '{}': {why}", query.device_name(device)),
        }
    }
    Err(VkInitError::NoSuitableDevice {
        candidates: candidates.len(),
    })
}
