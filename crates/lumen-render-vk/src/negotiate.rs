// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use lumen_render::{PresentPreference, RenderSize};

use crate::error::{VkInitError, VkInitResult};
use crate::queue::QueueFamilyIndices;
use crate::surface::{SurfaceLimits, SurfaceSupport};

/// 8-bit formats accepted as-is when paired with sRGB non-linear.
pub const PREFERRED_FORMATS: &[vk::Format] =
    &[vk::Format::R8G8B8A8_UNORM, vk::Format::B8G8R8A8_UNORM];

/// Used when the surface accepts any format.
pub const DEFAULT_SURFACE_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::R8G8B8A8_UNORM,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

#[derive(Clone, Copy, Debug)]
pub struct SwapchainPrefs {
    pub formats: &'static [vk::Format],
    pub present: PresentPreference,
}

impl Default for SwapchainPrefs {
    fn default() -> Self {
        SwapchainPrefs {
            formats: PREFERRED_FORMATS,
            present: PresentPreference::Mailbox,
        }
    }
}

/// A single `UNDEFINED` entry means "anything goes"; then the default is used.
/// Otherwise the first preferred format in sRGB non-linear, else whatever the
/// driver listed first.
pub fn choose_surface_format(
    formats: &[vk::SurfaceFormatKHR],
    preferred: &[vk::Format],
) -> vk::SurfaceFormatKHR {
    if let [only] = formats {
        if only.format == vk::Format::UNDEFINED {
            return DEFAULT_SURFACE_FORMAT;
        }
    }
    formats
        .iter()
        .copied()
        .find(|f| {
            preferred.contains(&f.format) && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| formats.first().copied())
        .unwrap_or(DEFAULT_SURFACE_FORMAT)
}

/// MAILBOX when asked for and offered; FIFO otherwise. FIFO is guaranteed by
/// the API so it is returned even for an empty list.
pub fn choose_present_mode(
    modes: &[vk::PresentModeKHR],
    preference: PresentPreference,
) -> vk::PresentModeKHR {
    match preference {
        PresentPreference::Mailbox if modes.contains(&vk::PresentModeKHR::MAILBOX) => {
            vk::PresentModeKHR::MAILBOX
        }
        _ => vk::PresentModeKHR::FIFO,
    }
}

/// The surface's own extent when it dictates one. Otherwise the window's
/// framebuffer size, clamped per axis into the surface's bounds; the window is
/// only asked in that case.
pub fn choose_extent(
    limits: &SurfaceLimits,
    framebuffer: impl FnOnce() -> RenderSize,
) -> vk::Extent2D {
    if let Some(extent) = limits.current_extent {
        return extent;
    }
    let want = framebuffer();
    let (min, max) = (limits.min_image_extent, limits.max_image_extent);
    vk::Extent2D {
        width: want.width.min(max.width).max(min.width),
        height: want.height.min(max.height).max(min.height),
    }
}

/// One more than the minimum, capped by the maximum when there is one.
pub fn choose_image_count(limits: &SurfaceLimits) -> u32 {
    let wanted = limits.min_image_count.saturating_add(1);
    match limits.max_image_count {
        Some(max) => wanted.min(max),
        None => wanted,
    }
}

/// How swap chain images are shared between the graphics and present queues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSharing {
    Exclusive,
    /// Graphics family, then present family.
    Concurrent([u32; 2]),
}

impl ImageSharing {
    /// Distinct families must use concurrent sharing; exclusive across two
    /// families is undefined behaviour.
    pub fn for_families(graphics: u32, present: u32) -> Self {
        if graphics == present {
            ImageSharing::Exclusive
        } else {
            ImageSharing::Concurrent([graphics, present])
        }
    }

    pub fn mode(&self) -> vk::SharingMode {
        match self {
            ImageSharing::Exclusive => vk::SharingMode::EXCLUSIVE,
            ImageSharing::Concurrent(_) => vk::SharingMode::CONCURRENT,
        }
    }

    pub fn family_indices(&self) -> &[u32] {
        match self {
            ImageSharing::Exclusive => &[],
            ImageSharing::Concurrent(families) => families,
        }
    }
}

/// Everything decided before asking the driver for a swap chain.
#[derive(Clone, Copy, Debug)]
pub struct ChosenSwapchainConfig {
    pub surface_format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub image_count: u32,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
    pub sharing: ImageSharing,
}

impl ChosenSwapchainConfig {
    pub fn create_info(
        &self,
        surface: vk::SurfaceKHR,
        old_swapchain: vk::SwapchainKHR,
    ) -> vk::SwapchainCreateInfoKHR<'_> {
        let info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface)
            .min_image_count(self.image_count)
            .image_format(self.surface_format.format)
            .image_color_space(self.surface_format.color_space)
            .image_extent(self.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(self.sharing.mode())
            .pre_transform(self.pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(self.present_mode)
            .clipped(true)
            .old_swapchain(old_swapchain);

        match self.sharing {
            ImageSharing::Exclusive => info,
            ImageSharing::Concurrent(_) => info.queue_family_indices(self.sharing.family_indices()),
        }
    }
}

/// Picks format, present mode, extent, image count and sharing for a freshly
/// probed surface. `framebuffer` is consulted only if the surface leaves the
/// extent to the application.
pub fn negotiate(
    support: &SurfaceSupport,
    queues: &QueueFamilyIndices,
    prefs: &SwapchainPrefs,
    framebuffer: impl FnOnce() -> RenderSize,
) -> VkInitResult<ChosenSwapchainConfig> {
    let graphics = queues
        .graphics
        .ok_or(VkInitError::MissingQueueFamily("graphics"))?;
    let present = queues
        .present
        .ok_or(VkInitError::MissingQueueFamily("present"))?;

    Ok(ChosenSwapchainConfig {
        surface_format: choose_surface_format(&support.formats, prefs.formats),
        present_mode: choose_present_mode(&support.present_modes, prefs.present),
        extent: choose_extent(&support.limits, framebuffer),
        image_count: choose_image_count(&support.limits),
        pre_transform: support.limits.current_transform,
        sharing: ImageSharing::for_families(graphics, present),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sf(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    fn limits(min: u32, max: u32) -> SurfaceLimits {
        SurfaceLimits::from(vk::SurfaceCapabilitiesKHR {
            min_image_count: min,
            max_image_count: max,
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 100,
                height: 100,
            },
            max_image_extent: vk::Extent2D {
                width: 2000,
                height: 1000,
            },
            ..Default::default()
        })
    }

    fn window(width: u32, height: u32) -> impl FnOnce() -> RenderSize {
        move || RenderSize { width, height }
    }

    const SRGB: vk::ColorSpaceKHR = vk::ColorSpaceKHR::SRGB_NONLINEAR;

    fn key(f: vk::SurfaceFormatKHR) -> (vk::Format, vk::ColorSpaceKHR) {
        (f.format, f.color_space)
    }

    #[test]
    fn undefined_sentinel_selects_default() {
        let formats = [sf(vk::Format::UNDEFINED, SRGB)];
        assert_eq!(
            key(choose_surface_format(&formats, PREFERRED_FORMATS)),
            (vk::Format::R8G8B8A8_UNORM, SRGB)
        );
    }

    #[test]
    fn undefined_among_others_is_not_the_sentinel() {
        let formats = [
            sf(vk::Format::UNDEFINED, SRGB),
            sf(vk::Format::R16G16B16A16_SFLOAT, SRGB),
        ];
        assert_eq!(
            key(choose_surface_format(&formats, PREFERRED_FORMATS)),
            key(formats[0])
        );
    }

    #[test]
    fn first_preferred_match_in_sequence_order() {
        let formats = [
            sf(vk::Format::A2B10G10R10_UNORM_PACK32, SRGB),
            sf(vk::Format::B8G8R8A8_UNORM, SRGB),
            sf(vk::Format::R8G8B8A8_UNORM, SRGB),
        ];
        assert_eq!(
            key(choose_surface_format(&formats, PREFERRED_FORMATS)),
            key(formats[1])
        );
    }

    #[test]
    fn preferred_format_needs_srgb_color_space() {
        let formats = [
            sf(vk::Format::B8G8R8A8_SRGB, SRGB),
            sf(
                vk::Format::R8G8B8A8_UNORM,
                vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT,
            ),
        ];
        assert_eq!(
            key(choose_surface_format(&formats, PREFERRED_FORMATS)),
            key(formats[0])
        );
    }

    #[test]
    fn present_mode_prefers_mailbox() {
        let modes = [
            vk::PresentModeKHR::FIFO,
            vk::PresentModeKHR::IMMEDIATE,
            vk::PresentModeKHR::MAILBOX,
        ];
        assert_eq!(
            choose_present_mode(&modes, PresentPreference::Mailbox),
            vk::PresentModeKHR::MAILBOX
        );
    }

    #[test]
    fn present_mode_falls_back_to_fifo() {
        let modes = [vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::FIFO_RELAXED];
        assert_eq!(
            choose_present_mode(&modes, PresentPreference::Mailbox),
            vk::PresentModeKHR::FIFO
        );
        assert_eq!(
            choose_present_mode(&[], PresentPreference::Mailbox),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn fifo_preference_ignores_mailbox() {
        let modes = [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::FIFO];
        assert_eq!(
            choose_present_mode(&modes, PresentPreference::Fifo),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn surface_extent_wins_over_window_size() {
        let fixed = vk::Extent2D {
            width: 1024,
            height: 768,
        };
        let lim = SurfaceLimits {
            current_extent: Some(fixed),
            ..limits(2, 0)
        };
        let extent = choose_extent(&lim, || panic!("window must not be queried"));
        assert_eq!(extent, fixed);
    }

    #[test]
    fn free_extent_is_clamped_per_axis() {
        let lim = limits(2, 0);
        assert_eq!(
            choose_extent(&lim, window(50, 5000)),
            vk::Extent2D {
                width: 100,
                height: 1000
            }
        );
        assert_eq!(
            choose_extent(&lim, window(1280, 720)),
            vk::Extent2D {
                width: 1280,
                height: 720
            }
        );
        assert_eq!(
            choose_extent(&lim, window(9000, 0)),
            vk::Extent2D {
                width: 2000,
                height: 100
            }
        );
    }

    #[test]
    fn inverted_bounds_resolve_to_minimum() {
        let mut lim = limits(2, 0);
        lim.min_image_extent = vk::Extent2D {
            width: 800,
            height: 600,
        };
        lim.max_image_extent = vk::Extent2D {
            width: 400,
            height: 300,
        };
        assert_eq!(
            choose_extent(&lim, window(1280, 720)),
            vk::Extent2D {
                width: 800,
                height: 600
            }
        );
        assert_eq!(
            choose_extent(&lim, window(10, 10)),
            vk::Extent2D {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn image_count_is_min_plus_one() {
        assert_eq!(choose_image_count(&limits(2, 0)), 3);
        assert_eq!(choose_image_count(&limits(2, 8)), 3);
    }

    #[test]
    fn image_count_is_clamped_to_max() {
        assert_eq!(choose_image_count(&limits(2, 2)), 2);
        assert_eq!(choose_image_count(&limits(3, 3)), 3);
    }

    #[test]
    fn distinct_families_share_concurrently() {
        let sharing = ImageSharing::for_families(0, 2);
        assert_eq!(sharing.mode(), vk::SharingMode::CONCURRENT);
        assert_eq!(sharing.family_indices(), &[0, 2]);
    }

    #[test]
    fn same_family_is_exclusive() {
        let sharing = ImageSharing::for_families(0, 0);
        assert_eq!(sharing.mode(), vk::SharingMode::EXCLUSIVE);
        assert!(sharing.family_indices().is_empty());
    }

    fn support(formats: Vec<vk::SurfaceFormatKHR>, modes: Vec<vk::PresentModeKHR>) -> SurfaceSupport {
        SurfaceSupport {
            limits: limits(2, 0),
            formats,
            present_modes: modes,
        }
    }

    #[test]
    fn negotiate_with_split_families_lists_both_in_create_info() {
        let sup = support(
            vec![sf(vk::Format::B8G8R8A8_UNORM, SRGB)],
            vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
        );
        let queues = QueueFamilyIndices {
            graphics: Some(0),
            present: Some(2),
        };
        let cfg = negotiate(&sup, &queues, &SwapchainPrefs::default(), window(640, 480)).unwrap();

        assert_eq!(cfg.surface_format.format, vk::Format::B8G8R8A8_UNORM);
        assert_eq!(cfg.present_mode, vk::PresentModeKHR::MAILBOX);
        assert_eq!(
            cfg.extent,
            vk::Extent2D {
                width: 640,
                height: 480
            }
        );
        assert_eq!(cfg.image_count, 3);

        let info = cfg.create_info(vk::SurfaceKHR::null(), vk::SwapchainKHR::null());
        assert_eq!(info.image_sharing_mode, vk::SharingMode::CONCURRENT);
        assert_eq!(info.queue_family_index_count, 2);
        let listed = unsafe {
            std::slice::from_raw_parts(
                info.p_queue_family_indices,
                info.queue_family_index_count as usize,
            )
        };
        assert_eq!(listed, &[0, 2]);
        assert_eq!(info.min_image_count, 3);
        assert_eq!(info.image_array_layers, 1);
    }

    #[test]
    fn negotiate_with_shared_family_is_exclusive_without_list() {
        let sup = support(vec![sf(vk::Format::R8G8B8A8_UNORM, SRGB)], vec![vk::PresentModeKHR::FIFO]);
        let queues = QueueFamilyIndices {
            graphics: Some(0),
            present: Some(0),
        };
        let cfg = negotiate(&sup, &queues, &SwapchainPrefs::default(), window(640, 480)).unwrap();
        assert_eq!(cfg.sharing, ImageSharing::Exclusive);
        assert_eq!(cfg.present_mode, vk::PresentModeKHR::FIFO);

        let info = cfg.create_info(vk::SurfaceKHR::null(), vk::SwapchainKHR::null());
        assert_eq!(info.image_sharing_mode, vk::SharingMode::EXCLUSIVE);
        assert_eq!(info.queue_family_index_count, 0);
        assert!(info.p_queue_family_indices.is_null());
    }

    #[test]
    fn negotiate_requires_present_family() {
        let sup = support(vec![sf(vk::Format::R8G8B8A8_UNORM, SRGB)], vec![vk::PresentModeKHR::FIFO]);
        let queues = QueueFamilyIndices {
            graphics: Some(0),
            present: None,
        };
        let err = negotiate(&sup, &queues, &SwapchainPrefs::default(), window(1, 1)).unwrap_err();
        assert!(matches!(err, VkInitError::MissingQueueFamily("present")));
    }
}
