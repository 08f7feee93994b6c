// SPDX-License-Identifier: CEPL-1.0
use ash::khr::swapchain;
use ash::vk;
use tracing::{debug, info};

use crate::device::LogicalDevice;
use crate::error::{VkInitResult, VkResultExt};
use crate::negotiate::ChosenSwapchainConfig;
use crate::surface::Surface;

/// A presentable image and the view we made for it. The image belongs to the
/// swap chain; the view is ours.
#[derive(Clone, Copy, Debug)]
pub struct SwapchainImage {
    pub image: vk::Image,
    pub view: vk::ImageView,
}

/// 2D colour view, identity swizzle, one mip level, one layer.
pub fn color_view_info(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfo<'static> {
    vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        })
}

pub struct Swapchain {
    device: ash::Device,
    loader: swapchain::Device,
    handle: vk::SwapchainKHR,
    config: ChosenSwapchainConfig,
    // index == position in the swap chain
    images: Vec<SwapchainImage>,
}

impl Swapchain {
    /// Creates the chain from an already negotiated config, then one view per
    /// image in presentation-engine order. On failure everything created so
    /// far is released.
    pub fn create(
        instance: &ash::Instance,
        device: &LogicalDevice,
        surface: &Surface,
        config: ChosenSwapchainConfig,
        old: vk::SwapchainKHR,
    ) -> VkInitResult<Self> {
        let loader = swapchain::Device::new(instance, device.raw());
        let info = config.create_info(surface.handle(), old);
        let handle = unsafe { loader.create_swapchain(&info, None) }.created("swapchain")?;

        let mut chain = Swapchain {
            device: device.raw().clone(),
            loader,
            handle,
            config,
            images: Vec::new(),
        };

        let images = unsafe { chain.loader.get_swapchain_images(handle) }
            .query("swapchain images")?;
        chain.images.reserve(images.len());
        for image in images {
            let view_info = color_view_info(image, config.surface_format.format);
            let view = unsafe { chain.device.create_image_view(&view_info, None) }
                .created("swapchain image view")?;
            chain.images.push(SwapchainImage { image, view });
        }

        info!(
            "swapchain ready: {:?}/{:?} {:?} {}x{}, {} images (asked {}), sharing {:?}",
            config.surface_format.format,
            config.surface_format.color_space,
            config.present_mode,
            config.extent.width,
            config.extent.height,
            chain.images.len(),
            config.image_count,
            config.sharing,
        );
        Ok(chain)
    }

    pub fn handle(&self) -> vk::SwapchainKHR {
        self.handle
    }

    pub fn config(&self) -> &ChosenSwapchainConfig {
        &self.config
    }

    pub fn images(&self) -> &[SwapchainImage] {
        &self.images
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        debug!("destroying {} image views and swapchain", self.images.len());
        unsafe {
            for img in self.images.drain(..) {
                self.device.destroy_image_view(img.view, None);
            }
            self.loader.destroy_swapchain(self.handle, None);
        }
    }
}
