// SPDX-License-Identifier: CEPL-1.0
use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
}

impl RenderSize {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A window a renderer can present into.
///
/// Owned by the windowing layer; it must outlive every surface created from it.
pub trait RenderWindow: HasWindowHandle + HasDisplayHandle {
    /// Current drawable size in physical pixels.
    fn framebuffer_size(&self) -> RenderSize;
}

/// How eagerly the presentation engine should hand frames to the display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentPreference {
    /// Low-latency triple buffering when available, FIFO otherwise.
    #[default]
    Mailbox,
    /// Always FIFO (strict vsync).
    Fifo,
}

#[derive(Clone, Debug)]
pub struct RenderPrefs {
    pub app_name: String,
    pub present: PresentPreference,
    pub validation: bool,
}

impl Default for RenderPrefs {
    fn default() -> Self {
        RenderPrefs {
            app_name: "lumen".to_owned(),
            present: PresentPreference::Mailbox,
            validation: false,
        }
    }
}

/// What a backend ended up with after negotiating with the surface.
#[derive(Clone, Debug)]
pub struct RenderSummary {
    pub device_name: String,
    pub format: String,
    pub present_mode: String,
    pub size: RenderSize,
    pub image_count: u32,
}

pub trait Renderer {
    fn new(window: &dyn RenderWindow, prefs: &RenderPrefs) -> Result<Self>
    where
        Self: Sized;

    /// Re-probes the surface and rebuilds the swap chain for the window's current size.
    fn resize(&mut self, window: &dyn RenderWindow) -> Result<()>;

    fn summary(&self) -> RenderSummary;
}
