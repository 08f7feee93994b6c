// SPDX-License-Identifier: CEPL-1.0
use std::fs;
use std::io;
use std::path::Path;

use lumen_platform::WindowDesc;
use lumen_render::{PresentPreference, RenderPrefs};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize, Default)]
pub struct AppCfg {
    #[serde(default)]
    pub window: WindowCfg,
    #[serde(default)]
    pub render: RenderCfg,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowCfg {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowCfg {
    fn default() -> Self {
        let d = WindowDesc::default();
        WindowCfg {
            title: d.title,
            width: d.width,
            height: d.height,
            resizable: d.resizable,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RenderCfg {
    #[serde(default)]
    pub present_mode: PresentModeCfg,
    #[serde(default = "default_validation")]
    pub validation: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeCfg {
    Fifo,
    #[default]
    Mailbox,
}

impl Default for RenderCfg {
    fn default() -> Self {
        RenderCfg {
            present_mode: PresentModeCfg::Mailbox,
            validation: default_validation(),
        }
    }
}

fn default_validation() -> bool {
    false
}

impl AppCfg {
    pub fn window_desc(&self) -> WindowDesc {
        WindowDesc {
            title: self.window.title.clone(),
            width: self.window.width.max(1),
            height: self.window.height.max(1),
            resizable: self.window.resizable,
        }
    }

    pub fn render_prefs(&self) -> RenderPrefs {
        RenderPrefs {
            app_name: self.window.title.clone(),
            present: match self.render.present_mode {
                PresentModeCfg::Fifo => PresentPreference::Fifo,
                PresentModeCfg::Mailbox => PresentPreference::Mailbox,
            },
            validation: self.render.validation,
        }
    }
}

pub fn parse_cfg(s: &str) -> Result<AppCfg, toml::de::Error> {
    toml::from_str::<AppCfg>(s)
}

/// Missing file means defaults; an unreadable or malformed one is reported
/// and ignored.
pub fn load_cfg(path: &Path) -> AppCfg {
    match fs::read_to_string(path) {
        Ok(s) => parse_cfg(&s).unwrap_or_else(|e| {
            warn!("ignoring {}: {e}", path.display());
            AppCfg::default()
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => AppCfg::default(),
        Err(e) => {
            warn!("cannot read {}: {e}; using defaults", path.display());
            AppCfg::default()
        }
    }
}
