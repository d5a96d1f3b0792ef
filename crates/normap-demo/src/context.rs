//! Window plus an OpenGL 3.3 core context made current on the main thread.

use std::ffi::CString;
use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use normap_gl::GlDriver;
use raw_window_handle::HasRawWindowHandle;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use crate::config::DemoConfig;

pub struct GlContext {
    pub window: Window,
    pub driver: Rc<GlDriver>,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

impl GlContext {
    pub fn new(window_target: &EventLoopWindowTarget<()>, config: &DemoConfig) -> Result<Self> {
        let window_builder = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height));

        let template = ConfigTemplateBuilder::new()
            .prefer_hardware_accelerated(Some(true))
            .with_depth_size(24);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(window_target, template, |mut configs| {
                // No matching config leaves nothing to render with.
                configs.next().expect("display offered no GL config")
            })
            .map_err(|e| anyhow!("failed to create window: {e}"))?;
        let window = window.context("display builder returned no window")?;

        let raw_window_handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window_handle));

        let attrs = window.build_surface_attributes(Default::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("failed to create window surface")?;
        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("failed to create an OpenGL 3.3 core context")?
            .make_current(&gl_surface)
            .context("failed to make the GL context current")?;

        if config.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("could not enable vsync: {e}");
            }
        }

        let driver = unsafe {
            GlDriver::load_with(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(&symbol),
                Err(_) => std::ptr::null(),
            })
        };

        let size = window.inner_size();
        info!(width = size.width, height = size.height, "GL context ready");

        let context = Self {
            window,
            driver: Rc::new(driver),
            gl_context,
            gl_surface,
        };
        context.resize(size.width, size.height);
        Ok(context)
    }

    /// Resize the surface and the GL viewport. Zero-sized (minimised) windows
    /// keep a 1x1 surface.
    pub fn resize(&self, width: u32, height: u32) {
        let one = NonZeroU32::MIN;
        self.gl_surface.resize(
            &self.gl_context,
            NonZeroU32::new(width).unwrap_or(one),
            NonZeroU32::new(height).unwrap_or(one),
        );
        unsafe { gl::Viewport(0, 0, width as i32, height as i32) };
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("failed to swap buffers")
    }

    /// Hide the cursor and keep it inside the window for mouse look.
    pub fn grab_cursor(&self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            warn!("cursor grab unavailable: {e}");
        }
        self.window.set_cursor_visible(false);
    }
}
