// SPDX-License-Identifier: CEPL-1.0
//! Simulated devices for exercising selection without a GPU.

use std::ffi::CString;

use ash::vk;

use crate::error::{VkInitError, VkInitResult};
use crate::query::DeviceQuery;

#[derive(Clone, Debug)]
pub struct FakeFamily {
    pub flags: vk::QueueFlags,
    pub queue_count: u32,
    pub present: bool,
}

impl FakeFamily {
    pub fn graphics() -> Self {
        FakeFamily {
            flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER,
            queue_count: 1,
            present: false,
        }
    }

    pub fn present_only() -> Self {
        FakeFamily {
            flags: vk::QueueFlags::TRANSFER,
            queue_count: 1,
            present: true,
        }
    }

    pub fn graphics_present() -> Self {
        FakeFamily {
            present: true,
            ..Self::graphics()
        }
    }

    pub fn compute() -> Self {
        FakeFamily {
            flags: vk::QueueFlags::COMPUTE,
            queue_count: 1,
            present: false,
        }
    }

    pub fn empty(mut self) -> Self {
        self.queue_count = 0;
        self
    }
}

#[derive(Clone, Debug)]
pub struct FakeDevice {
    pub name: &'static str,
    pub families: Vec<FakeFamily>,
    pub extensions: Vec<CString>,
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub modes: Vec<vk::PresentModeKHR>,
    pub present_query_fails: bool,
}

impl FakeDevice {
    /// A device that passes every check: one combined graphics+present family,
    /// the swapchain extension, one sRGB format, FIFO.
    pub fn suitable(name: &'static str) -> Self {
        FakeDevice {
            name,
            families: vec![FakeFamily::graphics_present()],
            extensions: vec![c"VK_KHR_swapchain".to_owned()],
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_count: 8,
                current_extent: vk::Extent2D { width: 800, height: 600 },
                min_image_extent: vk::Extent2D { width: 1, height: 1 },
                max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
                max_image_array_layers: 1,
                current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
                supported_transforms: vk::SurfaceTransformFlagsKHR::IDENTITY,
                supported_composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
                supported_usage_flags: vk::ImageUsageFlags::COLOR_ATTACHMENT,
            },
            formats: vec![vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_UNORM,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            }],
            modes: vec![vk::PresentModeKHR::FIFO],
            present_query_fails: false,
        }
    }
}

pub struct FakeQuery {
    pub devices: Vec<FakeDevice>,
}

impl FakeQuery {
    pub fn new(devices: Vec<FakeDevice>) -> Self {
        FakeQuery { devices }
    }

    pub fn handles(&self) -> Vec<usize> {
        (0..self.devices.len()).collect()
    }
}

impl DeviceQuery for FakeQuery {
    type Device = usize;

    fn device_name(&self, device: usize) -> String {
        self.devices[device].name.to_owned()
    }

    fn queue_families(&self, device: usize) -> Vec<vk::QueueFamilyProperties> {
        self.devices[device]
            .families
            .iter()
            .map(|f| vk::QueueFamilyProperties {
                queue_flags: f.flags,
                queue_count: f.queue_count,
                ..Default::default()
            })
            .collect()
    }

    fn supports_present(&self, device: usize, family: u32) -> VkInitResult<bool> {
        let dev = &self.devices[device];
        if dev.present_query_fails {
            return Err(VkInitError::Query {
                what: "surface present support",
                source: vk::Result::ERROR_SURFACE_LOST_KHR,
            });
        }
        Ok(dev.families[family as usize].present)
    }

    fn device_extensions(&self, device: usize) -> VkInitResult<Vec<CString>> {
        Ok(self.devices[device].extensions.clone())
    }

    fn surface_capabilities(&self, device: usize) -> VkInitResult<vk::SurfaceCapabilitiesKHR> {
        Ok(self.devices[device].capabilities)
    }

    fn surface_formats(&self, device: usize) -> VkInitResult<Vec<vk::SurfaceFormatKHR>> {
        Ok(self.devices[device].formats.clone())
    }

    fn present_modes(&self, device: usize) -> VkInitResult<Vec<vk::PresentModeKHR>> {
        Ok(self.devices[device].modes.clone())
    }
}
