// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
//! Vulkan backend: device selection, surface negotiation and swap chain setup.
//!
//! The selection and negotiation steps ([`select`], [`negotiate`]) only talk to
//! the driver through [`query::DeviceQuery`], so they run without a GPU.

use anyhow::{Context, Result};
use lumen_render::{RenderPrefs, RenderSize, RenderSummary, RenderWindow, Renderer};
use tracing::info;

pub mod context;
pub mod device;
pub mod error;
pub mod extensions;
pub mod instance;
pub mod negotiate;
pub mod query;
pub mod queue;
pub mod select;
pub mod surface;
pub mod swapchain;

#[cfg(test)]
mod testing;

pub use context::VkContext;
pub use error::{VkInitError, VkInitResult};

pub struct VkRenderer {
    ctx: VkContext,
}

impl Renderer for VkRenderer {
    fn new(window: &dyn RenderWindow, prefs: &RenderPrefs) -> Result<Self> {
        let ctx = VkContext::new(window, prefs).context("vulkan initialisation")?;
        let r = VkRenderer { ctx };
        let s = r.summary();
        info!(
            "vulkan ready on '{}' ({}x{}, {}, {}, {} images)",
            s.device_name, s.size.width, s.size.height, s.format, s.present_mode, s.image_count
        );
        Ok(r)
    }

    fn resize(&mut self, window: &dyn RenderWindow) -> Result<()> {
        self.ctx
            .recreate_swapchain(window)
            .context("swapchain recreation")
    }

    fn summary(&self) -> RenderSummary {
        let chain = self.ctx.swapchain();
        let cfg = chain.config();
        RenderSummary {
            device_name: self.ctx.device_name().to_owned(),
            format: format!(
                "{:?}/{:?}",
                cfg.surface_format.format, cfg.surface_format.color_space
            ),
            present_mode: format!("{:?}", cfg.present_mode),
            size: RenderSize {
                width: cfg.extent.width,
                height: cfg.extent.height,
            },
            image_count: chain.images().len() as u32,
        }
    }
}
