// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use lumen_core::{init_tracing, DEFAULT_LOG_DIRECTIVE};
use lumen_platform::PlatformWindow;
use lumen_render::{RenderWindow, Renderer};
use lumen_render_vk::VkRenderer;
use tracing::{error, info};

use lumen_platform::winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

mod config;

use config::{load_cfg, AppCfg};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = "lumen.toml")]
    config: PathBuf,
    /// Force the Vulkan validation layer on
    #[arg(long)]
    validation: bool,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = DEFAULT_LOG_DIRECTIVE)]
    log: String,
}

struct App {
    cfg: AppCfg,
    // renderer before window: the surface must go first
    renderer: Option<VkRenderer>,
    window: Option<PlatformWindow>,
    failed: bool,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = PlatformWindow::create(event_loop, &self.cfg.window_desc())?;
        let renderer = VkRenderer::new(&window, &self.cfg.render_prefs())?;
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop) {
        self.failed = true;
        self.renderer = None;
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.init(event_loop) {
            error!("startup failed: {e:#}");
            self.abort(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("CloseRequested");
                self.renderer = None;
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(_) => {
                let size = window.framebuffer_size();
                if size.is_empty() {
                    info!("Resized → {}x{} (minimised, keeping swapchain)", size.width, size.height);
                    return;
                }
                let Some(renderer) = &mut self.renderer else { return };
                match renderer.resize(window) {
                    Ok(()) => info!("Resized → {}x{}", size.width, size.height),
                    Err(e) => {
                        error!("{e:#}");
                        self.abort(event_loop);
                    }
                }
            }

            _ => {}
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let mut cfg = load_cfg(&args.config);
    if args.validation {
        cfg.render.validation = true;
    }

    let event_loop: EventLoop<()> = EventLoop::new()?;
    let mut app = App {
        cfg,
        renderer: None,
        window: None,
        failed: false,
    };
    event_loop.run_app(&mut app)?;
    Ok(!app.failed)
}
