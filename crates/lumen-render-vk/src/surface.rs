// SPDX-License-Identifier: CEPL-1.0
use ash::khr::surface;
use ash::{vk, Entry};
use lumen_render::RenderWindow;
use tracing::debug;

use crate::error::{VkInitResult, VkResultExt};
use crate::query::DeviceQuery;

/// `VkSurfaceKHR` bound to one instance and one window.
///
/// Must be dropped before the instance that created it, and the window must
/// outlive it.
pub struct Surface {
    loader: surface::Instance,
    handle: vk::SurfaceKHR,
}

impl Surface {
    pub fn new(
        entry: &Entry,
        instance: &ash::Instance,
        window: &dyn RenderWindow,
    ) -> VkInitResult<Self> {
        let dh = window.display_handle()?.as_raw();
        let wh = window.window_handle()?.as_raw();

        let handle = unsafe { ash_window::create_surface(entry, instance, dh, wh, None) }
            .created("surface")?;
        let loader = surface::Instance::new(entry, instance);
        Ok(Surface { loader, handle })
    }

    pub fn handle(&self) -> vk::SurfaceKHR {
        self.handle
    }

    pub fn loader(&self) -> &surface::Instance {
        &self.loader
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        debug!("destroying surface");
        unsafe { self.loader.destroy_surface(self.handle, None) };
    }
}

/// Surface limits with the API's magic numbers turned into `Option`s.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceLimits {
    pub min_image_count: u32,
    /// `None`: no upper bound.
    pub max_image_count: Option<u32>,
    /// `None`: the application picks the extent (within min/max).
    pub current_extent: Option<vk::Extent2D>,
    pub min_image_extent: vk::Extent2D,
    pub max_image_extent: vk::Extent2D,
    pub current_transform: vk::SurfaceTransformFlagsKHR,
    pub supported_transforms: vk::SurfaceTransformFlagsKHR,
    pub supported_composite_alpha: vk::CompositeAlphaFlagsKHR,
}

impl From<vk::SurfaceCapabilitiesKHR> for SurfaceLimits {
    fn from(caps: vk::SurfaceCapabilitiesKHR) -> Self {
        SurfaceLimits {
            min_image_count: caps.min_image_count,
            max_image_count: (caps.max_image_count != 0).then_some(caps.max_image_count),
            current_extent: (caps.current_extent.width != u32::MAX)
                .then_some(caps.current_extent),
            min_image_extent: caps.min_image_extent,
            max_image_extent: caps.max_image_extent,
            current_transform: caps.current_transform,
            supported_transforms: caps.supported_transforms,
            supported_composite_alpha: caps.supported_composite_alpha,
        }
    }
}

/// Surface support of one device+surface pair. Query again whenever the surface changes.
#[derive(Clone, Debug)]
pub struct SurfaceSupport {
    pub limits: SurfaceLimits,
    /// In driver order; order matters for format fallback.
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SurfaceSupport {
    /// A swap chain can only be built with at least one format and one mode.
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

pub fn probe_surface<Q: DeviceQuery>(query: &Q, device: Q::Device) -> VkInitResult<SurfaceSupport> {
    let limits = SurfaceLimits::from(query.surface_capabilities(device)?);
    let formats = query.surface_formats(device)?;
    let present_modes = query.present_modes(device)?;
    Ok(SurfaceSupport {
        limits,
        formats,
        present_modes,
    })
}
