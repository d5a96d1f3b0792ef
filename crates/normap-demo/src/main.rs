//! Manual normal mapping: a brick quad spinning under a point light, viewed
//! through a first-person camera (WASD, mouse look, scroll zoom, Esc quits).

mod buffer;
mod bytes;
mod camera;
mod config;
mod context;
mod drawing;
mod geometry;
mod input;
mod texture;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use normap_core::{initialise_tracing, FrameData, Viewport};
use normap_gl::glsl::{current_glsl_version, REQUIRED_GLSL};
use tracing::{error, info, warn};
use winit::event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;

use crate::camera::Camera;
use crate::config::DemoConfig;
use crate::context::GlContext;
use crate::drawing::Scene;
use crate::input::{ControlAction, Controls};

fn main() -> Result<()> {
    initialise_tracing();
    let config = DemoConfig::from_env();
    info!(asset_dir = %config.asset_dir.display(), "starting {}", config.title);
    run(config)
}

fn run(config: DemoConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let context = GlContext::new(&event_loop, &config)?;
    context.grab_cursor();

    match unsafe { current_glsl_version() } {
        Some(version) if version.supports(REQUIRED_GLSL) => info!(%version, "GLSL"),
        Some(version) => warn!(%version, required = %REQUIRED_GLSL, "GLSL version too old"),
        None => warn!("could not read the GLSL version"),
    }

    unsafe { gl::Enable(gl::DEPTH_TEST) };
    let mut scene = unsafe { Scene::new(Rc::clone(&context.driver), &config)? };

    let mut camera = Camera::new(config.camera_position);
    let mut controls = Controls::default();
    let size = context.window.inner_size();
    let mut frame = FrameData::new(Viewport::new(size.width, size.height));

    let failure: Rc<RefCell<Option<anyhow::Error>>> = Rc::default();
    let loop_failure = Rc::clone(&failure);

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => {
                    context.resize(size.width, size.height);
                    frame.set_viewport(size.width, size.height);
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state,
                            ..
                        },
                    ..
                } => {
                    let pressed = state == ElementState::Pressed;
                    if controls.handle_key(code, pressed) == ControlAction::Exit {
                        elwt.exit();
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => controls.scroll(&mut camera, delta),
                WindowEvent::RedrawRequested => {
                    let delta_time = frame.tick();
                    controls.apply(&mut camera, delta_time);

                    let drawn = unsafe { scene.draw(&camera, &frame) }
                        .and_then(|()| context.swap_buffers());
                    if let Err(e) = drawn {
                        error!("frame {} failed: {e:#}", frame.frame_count());
                        *loop_failure.borrow_mut() = Some(e);
                        elwt.exit();
                    }
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                ..
            } => controls.mouse_motion(&mut camera, dx, dy),
            Event::AboutToWait => context.window.request_redraw(),
            Event::LoopExiting => {
                unsafe { scene.clean_up() };
                info!(frames = frame.frame_count(), "shutting down");
            }
            _ => {}
        })
        .context("event loop failed")?;

    match failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
