// SPDX-License-Identifier: CEPL-1.0
use std::fmt;

use ash::vk;
use thiserror::Error;

/// Where a required extension was looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionScope {
    Instance,
    Device,
}

impl fmt::Display for ExtensionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtensionScope::Instance => "instance",
            ExtensionScope::Device => "device",
        })
    }
}

/// Everything that can abort Vulkan initialisation. None of these are retried.
#[derive(Debug, Error)]
pub enum VkInitError {
    #[error("{scope} is missing required extensions: {missing:?}")]
    MissingExtensions {
        scope: ExtensionScope,
        missing: Vec<String>,
    },

    #[error("validation requested but layer {0} is not installed")]
    MissingValidationLayer(String),

    #[error("selected device has no {0} queue family")]
    MissingQueueFamily(&'static str),

    #[error("no suitable physical device among {candidates} candidate(s)")]
    NoSuitableDevice { candidates: usize },

    #[error("{what} query failed")]
    Query {
        what: &'static str,
        #[source]
        source: vk::Result,
    },

    #[error("{what} creation failed")]
    Creation {
        what: &'static str,
        #[source]
        source: vk::Result,
    },

    #[error("window handle unavailable: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
}

pub type VkInitResult<T> = Result<T, VkInitError>;

/// Tags a raw `vk::Result` with the step that produced it.
pub(crate) trait VkResultExt<T> {
    fn query(self, what: &'static str) -> VkInitResult<T>;
    fn created(self, what: &'static str) -> VkInitResult<T>;
}

impl<T> VkResultExt<T> for Result<T, vk::Result> {
    fn query(self, what: &'static str) -> VkInitResult<T> {
        self.map_err(|source| VkInitError::Query { what, source })
    }

    fn created(self, what: &'static str) -> VkInitResult<T> {
        self.map_err(|source| VkInitError::Creation { what, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn creation_error_keeps_vk_result_as_source() {
        let err = Err::<(), _>(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY)
            .created("swapchain")
            .unwrap_err();
        assert_eq!(err.to_string(), "swapchain creation failed");
        let source = err.source().expect("source");
        assert_eq!(
            source.to_string(),
            vk::Result::ERROR_OUT_OF_DEVICE_MEMORY.to_string()
        );
    }

    #[test]
    fn missing_extensions_message_names_scope() {
        let err = VkInitError::MissingExtensions {
            scope: ExtensionScope::Device,
            missing: vec!["VK_KHR_swapchain".to_owned()],
        };
        assert!(err.to_string().starts_with("device is missing"));
        assert!(err.to_string().contains("VK_KHR_swapchain"));
    }
}
