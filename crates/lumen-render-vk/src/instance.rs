// SPDX-License-Identifier: CEPL-1.0
use std::ffi::{c_void, CStr, CString};

use ash::ext::debug_utils;
use ash::{vk, Entry};
use lumen_render::RenderWindow;
use tracing::{debug, error, info, trace, warn};

use crate::error::{ExtensionScope, VkInitError, VkInitResult, VkResultExt};
use crate::extensions::{extension_names, layer_names, require_all, supports_all};

pub const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";
const ENGINE_NAME: &CStr = c"lumen";

unsafe extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    _types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user: *mut c_void,
) -> vk::Bool32 {
    if data.is_null() || unsafe { (*data).p_message.is_null() } {
        return vk::FALSE;
    }
    let msg = unsafe { CStr::from_ptr((*data).p_message) }.to_string_lossy();
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        error!("[vulkan] {msg}");
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        warn!("[vulkan] {msg}");
    } else {
        trace!("[vulkan] {msg}");
    }
    vk::FALSE
}

struct DebugMessenger {
    loader: debug_utils::Instance,
    handle: vk::DebugUtilsMessengerEXT,
}

/// Loader entry, `VkInstance` and, with validation on, the debug messenger.
/// Outlives every other Vulkan object.
pub struct InstanceHandle {
    entry: Entry,
    raw: ash::Instance,
    debug: Option<DebugMessenger>,
}

impl InstanceHandle {
    /// Creates an instance with the window system's surface extensions.
    ///
    /// Those extensions are checked first; any one missing fails creation.
    /// Requested validation needs the Khronos layer installed; it is never
    /// silently dropped.
    pub fn new(window: &dyn RenderWindow, app_name: &str, validation: bool) -> VkInitResult<Self> {
        let entry = Entry::linked();
        let display = window.display_handle()?.as_raw();

        if validation {
            let layers =
                unsafe { entry.enumerate_instance_layer_properties() }.query("instance layers")?;
            check_validation_layer(&layer_names(&layers))?;
        }

        let mut required: Vec<&CStr> = ash_window::enumerate_required_extensions(display)
            .query("window system instance extensions")?
            .iter()
            .map(|&p| unsafe { CStr::from_ptr(p) })
            .collect();
        if validation {
            required.push(debug_utils::NAME);
        }

        let available = unsafe { entry.enumerate_instance_extension_properties(None) }
            .query("instance extensions")?;
        require_all(
            ExtensionScope::Instance,
            &required,
            &extension_names(&available),
        )?;

        let app = CString::new(app_name).unwrap_or_else(|_| ENGINE_NAME.to_owned());
        let app_info = vk::ApplicationInfo::default()
            .application_name(&app)
            .application_version(vk::make_api_version(0, 0, 1, 0))
            .engine_name(ENGINE_NAME)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_2);

        let ext_ptrs: Vec<_> = required.iter().map(|n| n.as_ptr()).collect();
        let layer_ptrs: Vec<_> = if validation {
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            Vec::new()
        };
        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&ext_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let raw = unsafe { entry.create_instance(&create_info, None) }.created("instance")?;
        let mut handle = InstanceHandle {
            entry,
            raw,
            debug: None,
        };
        if validation {
            handle.debug = Some(handle.create_debug_messenger()?);
        }

        info!(
            "instance created ({} extensions, validation={})",
            required.len(),
            validation
        );
        Ok(handle)
    }

    fn create_debug_messenger(&self) -> VkInitResult<DebugMessenger> {
        let loader = debug_utils::Instance::new(&self.entry, &self.raw);
        let info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));
        let handle = unsafe { loader.create_debug_utils_messenger(&info, None) }
            .created("debug messenger")?;
        Ok(DebugMessenger { loader, handle })
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn raw(&self) -> &ash::Instance {
        &self.raw
    }
}

impl Drop for InstanceHandle {
    fn drop(&mut self) {
        unsafe {
            if let Some(dbg) = self.debug.take() {
                dbg.loader.destroy_debug_utils_messenger(dbg.handle, None);
            }
            debug!("destroying instance");
            self.raw.destroy_instance(None);
        }
    }
}

fn check_validation_layer(available: &[CString]) -> VkInitResult<()> {
    if supports_all(&[VALIDATION_LAYER], available) {
        Ok(())
    } else {
        Err(VkInitError::MissingValidationLayer(
            VALIDATION_LAYER.to_string_lossy().into_owned(),
        ))
    }
}
