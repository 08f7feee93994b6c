// SPDX-License-Identifier: CEPL-1.0
use anyhow::{Context, Result};
use lumen_render::{RenderSize, RenderWindow};
use raw_window_handle::{DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle};
use tracing::info;

pub use winit;

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

#[derive(Clone, Debug)]
pub struct WindowDesc {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowDesc {
    fn default() -> Self {
        WindowDesc {
            title: "lumen".to_owned(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

/// Native window handed to renderers. Surfaces created from it must be dropped first.
pub struct PlatformWindow {
    inner: Window,
}

impl PlatformWindow {
    pub fn create(event_loop: &ActiveEventLoop, desc: &WindowDesc) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(desc.title.clone())
            .with_inner_size(LogicalSize::new(desc.width, desc.height))
            .with_resizable(desc.resizable);
        let inner = event_loop.create_window(attrs).context("create_window")?;

        let size = inner.inner_size();
        info!(
            "window '{}' created ({}x{} physical)",
            desc.title, size.width, size.height
        );
        Ok(PlatformWindow { inner })
    }

    pub fn id(&self) -> WindowId {
        self.inner.id()
    }
}

impl HasWindowHandle for PlatformWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.inner.window_handle()
    }
}

impl HasDisplayHandle for PlatformWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.inner.display_handle()
    }
}

impl RenderWindow for PlatformWindow {
    fn framebuffer_size(&self) -> RenderSize {
        let size = self.inner.inner_size();
        RenderSize {
            width: size.width,
            height: size.height,
        }
    }
}
