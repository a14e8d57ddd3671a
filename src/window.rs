//! Windowed host: drives a scene from the winit event loop.
//!
//! Each redraw advances the clock, ticks the scene into a fresh
//! [`DrawList`], hands the list to the GPU presenter, then requests the next
//! redraw. Space pauses, Escape quits.

use std::sync::Arc;

use glam::{UVec2, Vec2};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::Config;
use crate::error::RunError;
use crate::gpu::{DrawList, Presenter};
use crate::input::PointerButton;
use crate::scene::Scene;
use crate::surface::Surface;
use crate::time::Time;

/// Frames between debug fps reports.
const FPS_LOG_INTERVAL: u64 = 300;

/// Open a window sized from `config` and run `scene` until it is closed.
pub fn run(scene: Box<dyn Scene>, config: &Config) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(scene, config.width, config.height);
    app.time.set_time_scale(config.time_scale);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    scene: Box<dyn Scene>,
    frame: DrawList,
    time: Time,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    error: Option<RunError>,
}

impl App {
    fn new(scene: Box<dyn Scene>, width: u32, height: u32) -> Self {
        Self {
            scene,
            frame: DrawList::new(width, height),
            time: Time::new(),
            window: None,
            presenter: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let size = self.frame.size();
        let window_attrs = Window::default_attributes()
            .with_title(self.scene.title())
            .with_inner_size(winit::dpi::PhysicalSize::new(size.x, size.y));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        self.resize(presenter.width(), presenter.height());
        self.window = Some(window);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.frame.resize(width, height);
        self.scene.resize(UVec2::new(width, height));
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.time.update();
        // A paused frame replays nothing; the accumulated image stays put.
        self.frame.reset();
        if !self.time.is_paused() {
            self.scene.tick(dt, &mut self.frame);
        }
        if self.time.frame() % FPS_LOG_INTERVAL == 0 {
            log::debug!("frame {}: {:.1} fps", self.time.frame(), self.time.fps());
        }

        if let Some(presenter) = &mut self.presenter {
            match presenter.render(&self.frame) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {e:?}"),
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Space => {
                    self.time.toggle_pause();
                    log::info!("{}", if self.time.is_paused() { "paused" } else { "resumed" });
                }
                _ => {}
            },
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = PointerButton::from_winit(button) {
                    self.scene
                        .pointer_button(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.scene
                    .pointer_moved(Some(Vec2::new(position.x as f32, position.y as f32)));
            }
            WindowEvent::CursorLeft { .. } => {
                self.scene.pointer_moved(None);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
