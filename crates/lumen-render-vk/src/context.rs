// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use lumen_render::{RenderPrefs, RenderWindow};
use tracing::{debug, info};

use crate::device::LogicalDevice;
use crate::error::VkInitResult;
use crate::instance::InstanceHandle;
use crate::negotiate::{negotiate, SwapchainPrefs};
use crate::query::AshQuery;
use crate::select::{select_physical_device, DeviceRequirements};
use crate::surface::{probe_surface, Surface};
use crate::swapchain::Swapchain;

/// Every Vulkan object the renderer owns.
///
/// Fields drop top to bottom: views and swap chain, device, surface, instance.
/// The same holds for the locals in [`VkContext::new`], so an error at any step
/// releases earlier steps in reverse.
pub struct VkContext {
    swapchain: Swapchain,
    device: LogicalDevice,
    surface: Surface,
    instance: InstanceHandle,

    physical: vk::PhysicalDevice,
    device_name: String,
    prefs: SwapchainPrefs,
}

impl VkContext {
    pub fn new(window: &dyn RenderWindow, prefs: &RenderPrefs) -> VkInitResult<Self> {
        let instance = InstanceHandle::new(window, &prefs.app_name, prefs.validation)?;
        let surface = Surface::new(instance.entry(), instance.raw(), window)?;

        let reqs = DeviceRequirements::default();
        let selected = {
            let query = AshQuery::new(instance.raw(), &surface);
            let candidates = query.physical_devices()?;
            let selected = select_physical_device(&query, &candidates, &reqs)?;
            info!(
                "'{}' is a {:?} device",
                selected.name,
                query.device_type(selected.device)
            );
            selected
        };

        let device = LogicalDevice::new(
            instance.raw(),
            selected.device,
            selected.queues,
            reqs.extensions,
        )?;
        debug!(
            "queues ready (graphics {:?}, present {:?})",
            device.graphics_queue(),
            device.present_queue()
        );

        let swap_prefs = SwapchainPrefs {
            present: prefs.present,
            ..SwapchainPrefs::default()
        };
        let config = negotiate(&selected.support, &selected.queues, &swap_prefs, || {
            window.framebuffer_size()
        })?;
        let swapchain = Swapchain::create(
            instance.raw(),
            &device,
            &surface,
            config,
            vk::SwapchainKHR::null(),
        )?;

        Ok(VkContext {
            swapchain,
            device,
            surface,
            instance,
            physical: selected.device,
            device_name: selected.name,
            prefs: swap_prefs,
        })
    }

    /// Re-probes the surface and replaces the swap chain. The old chain is
    /// handed to the driver for reuse, then released with its views.
    pub fn recreate_swapchain(&mut self, window: &dyn RenderWindow) -> VkInitResult<()> {
        self.device.wait_idle();

        let support = probe_surface(
            &AshQuery::new(self.instance.raw(), &self.surface),
            self.physical,
        )?;
        let config = negotiate(&support, &self.device.families(), &self.prefs, || {
            window.framebuffer_size()
        })?;
        let fresh = Swapchain::create(
            self.instance.raw(),
            &self.device,
            &self.surface,
            config,
            self.swapchain.handle(),
        )?;
        self.swapchain = fresh;
        Ok(())
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn device(&self) -> &LogicalDevice {
        &self.device
    }

    pub fn swapchain(&self) -> &Swapchain {
        &self.swapchain
    }
}
