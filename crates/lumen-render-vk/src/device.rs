// SPDX-License-Identifier: CEPL-1.0
use std::ffi::CStr;

use ash::vk;
use tracing::{debug, info};

use crate::error::{VkInitError, VkInitResult, VkResultExt};
use crate::queue::QueueFamilyIndices;

/// `VkDevice` plus the queues it was created with.
pub struct LogicalDevice {
    raw: ash::Device,
    families: QueueFamilyIndices,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
}

impl LogicalDevice {
    /// One queue per distinct family among graphics and present.
    pub fn new(
        instance: &ash::Instance,
        physical: vk::PhysicalDevice,
        families: QueueFamilyIndices,
        extensions: &[&CStr],
    ) -> VkInitResult<Self> {
        let (graphics, present) = families
            .graphics_and_present()
            .ok_or(VkInitError::MissingQueueFamily("graphics or present"))?;

        let priorities = [1.0_f32];
        let queue_infos: Vec<_> = families
            .unique()
            .into_iter()
            .map(|family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(&priorities)
            })
            .collect();

        let ext_ptrs: Vec<_> = extensions.iter().map(|n| n.as_ptr()).collect();
        let features = vk::PhysicalDeviceFeatures::default();
        let info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&ext_ptrs)
            .enabled_features(&features);

        let raw = unsafe { instance.create_device(physical, &info, None) }
            .created("logical device")?;
        let graphics_queue = unsafe { raw.get_device_queue(graphics, 0) };
        let present_queue = unsafe { raw.get_device_queue(present, 0) };

        info!(
            "logical device created ({} queue famil{})",
            queue_infos.len(),
            if queue_infos.len() == 1 { "y" } else { "ies" }
        );
        Ok(LogicalDevice {
            raw,
            families,
            graphics_queue,
            present_queue,
        })
    }

    pub fn raw(&self) -> &ash::Device {
        &self.raw
    }

    pub fn families(&self) -> QueueFamilyIndices {
        self.families
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    pub fn wait_idle(&self) {
        unsafe { self.raw.device_wait_idle() }.ok();
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        debug!("destroying logical device");
        self.wait_idle();
        unsafe { self.raw.destroy_device(None) };
    }
}
