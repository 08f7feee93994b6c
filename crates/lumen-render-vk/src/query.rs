// SPDX-License-Identifier: CEPL-1.0
use std::ffi::{CStr, CString};
use std::fmt;

use ash::vk;

use crate::error::{VkInitResult, VkResultExt};
use crate::extensions::extension_names;
use crate::surface::Surface;

/// Capability queries the selection logic needs from the graphics API, for one
/// fixed surface.
///
/// Variable-length results are fetched completely (count, then entries); an
/// empty list is returned as an empty `Vec`, never as an error.
pub trait DeviceQuery {
    type Device: Copy + fmt::Debug;

    fn device_name(&self, device: Self::Device) -> String;
    fn queue_families(&self, device: Self::Device) -> Vec<vk::QueueFamilyProperties>;
    fn supports_present(&self, device: Self::Device, family: u32) -> VkInitResult<bool>;
    fn device_extensions(&self, device: Self::Device) -> VkInitResult<Vec<CString>>;
    fn surface_capabilities(
        &self,
        device: Self::Device,
    ) -> VkInitResult<vk::SurfaceCapabilitiesKHR>;
    fn surface_formats(&self, device: Self::Device) -> VkInitResult<Vec<vk::SurfaceFormatKHR>>;
    fn present_modes(&self, device: Self::Device) -> VkInitResult<Vec<vk::PresentModeKHR>>;
}

/// Live queries against an instance and the surface it created.
pub struct AshQuery<'a> {
    instance: &'a ash::Instance,
    surface: &'a Surface,
}

impl<'a> AshQuery<'a> {
    pub fn new(instance: &'a ash::Instance, surface: &'a Surface) -> Self {
        AshQuery { instance, surface }
    }

    pub fn physical_devices(&self) -> VkInitResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }.query("physical devices")
    }

    pub fn device_type(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceType {
        unsafe { self.instance.get_physical_device_properties(device) }.device_type
    }
}

impl DeviceQuery for AshQuery<'_> {
    type Device = vk::PhysicalDevice;

    fn device_name(&self, device: vk::PhysicalDevice) -> String {
        let props = unsafe { self.instance.get_physical_device_properties(device) };
        unsafe { CStr::from_ptr(props.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(device)
        }
    }

    fn supports_present(&self, device: vk::PhysicalDevice, family: u32) -> VkInitResult<bool> {
        unsafe {
            self.surface.loader().get_physical_device_surface_support(
                device,
                family,
                self.surface.handle(),
            )
        }
        .query("surface present support")
    }

    fn device_extensions(&self, device: vk::PhysicalDevice) -> VkInitResult<Vec<CString>> {
        let props = unsafe { self.instance.enumerate_device_extension_properties(device) }
            .query("device extensions")?;
        Ok(extension_names(&props))
    }

    fn surface_capabilities(
        &self,
        device: vk::PhysicalDevice,
    ) -> VkInitResult<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.surface
                .loader()
                .get_physical_device_surface_capabilities(device, self.surface.handle())
        }
        .query("surface capabilities")
    }

    fn surface_formats(
        &self,
        device: vk::PhysicalDevice,
    ) -> VkInitResult<Vec<vk::SurfaceFormatKHR>> {
        unsafe {
            self.surface
                .loader()
                .get_physical_device_surface_formats(device, self.surface.handle())
        }
        .query("surface formats")
    }

    fn present_modes(&self, device: vk::PhysicalDevice) -> VkInitResult<Vec<vk::PresentModeKHR>> {
        unsafe {
            self.surface
                .loader()
                .get_physical_device_surface_present_modes(device, self.surface.handle())
        }
        .query("surface present modes")
    }
}
