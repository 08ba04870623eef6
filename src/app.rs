//! winit application shell: owns the window, the renderer and the backdrop
//! state, and translates window events into host signals.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::host::{self, HostSignal, Viewport};
use crate::input::ScrollTracker;
use crate::loaders::{self, ModelMesh};
use crate::render::SceneRenderer;
use crate::scene::SceneParams;
use crate::update::Backdrop;

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;
const FPS_UPDATE_INTERVAL: f32 = 1.0;

pub struct App {
    params: SceneParams,
    model_path: PathBuf,
    show_overlay: bool,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    backdrop: Option<Backdrop>,
    scroll: ScrollTracker,
    model_rx: Option<Receiver<anyhow::Result<ModelMesh>>>,
    last_frame_time: Instant,
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
}

impl App {
    pub fn new(params: SceneParams, model_path: PathBuf, show_overlay: bool) -> Self {
        Self {
            params,
            model_path,
            show_overlay,
            window: None,
            renderer: None,
            backdrop: None,
            scroll: ScrollTracker::new(),
            model_rx: None,
            last_frame_time: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            fps_update_timer: 0.0,
        }
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            println!("FPS: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    /// Check the loader channel without blocking. The slot latches on the
    /// first result and the channel is dropped right after.
    fn poll_model(&mut self) {
        let Some(rx) = &self.model_rx else {
            return;
        };
        let (Some(backdrop), Some(renderer)) = (&mut self.backdrop, &mut self.renderer) else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(model)) => {
                renderer.upload_model(&model);
                backdrop.scene.model_ready();
                self.model_rx = None;
            }
            Ok(Err(err)) => {
                log::warn!("model load failed: {:#}", err);
                backdrop.scene.model_failed();
                self.model_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // A loader thread that died without sending counts as a failure.
                backdrop.scene.model_failed();
                self.model_rx = None;
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Hero Backdrop")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let size = window.inner_size();
            let backdrop = Backdrop::new(
                &self.params,
                Viewport::new(size.width.max(1), size.height.max(1)),
            );

            let renderer = match pollster::block_on(SceneRenderer::new(
                window.clone(),
                &backdrop.scene,
                self.show_overlay,
            )) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to initialize renderer: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.model_rx = Some(loaders::spawn_load(self.model_path.clone()));

            // Prime the frame cycle; every later frame is scheduled by the
            // updater itself.
            window.request_redraw();

            self.window = Some(window);
            self.renderer = Some(renderer);
            self.backdrop = Some(backdrop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let the overlay handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::MouseWheel { delta, .. } => {
                let offset = self.scroll.apply(delta);
                if let (Some(backdrop), Some(window)) = (&mut self.backdrop, &self.window) {
                    host::dispatch(backdrop, HostSignal::Scroll { offset }, window.as_ref());
                }
            }
            WindowEvent::Resized(size) => {
                if let (Some(backdrop), Some(renderer), Some(window)) =
                    (&mut self.backdrop, &mut self.renderer, &self.window)
                {
                    host::dispatch(
                        backdrop,
                        HostSignal::Resize {
                            width: size.width,
                            height: size.height,
                        },
                        window.as_ref(),
                    );
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                self.update_fps(delta);
                self.poll_model();

                let (Some(backdrop), Some(renderer), Some(window)) =
                    (&mut self.backdrop, &mut self.renderer, &self.window)
                else {
                    return;
                };

                host::dispatch(backdrop, HostSignal::Frame, window.as_ref());

                match renderer.render(backdrop, window, self.fps) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let viewport = backdrop.viewport;
                        renderer.resize(viewport.width, viewport.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        eprintln!("Surface out of memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("frame dropped: {}", e),
                }
            }
            _ => {}
        }
    }
}
