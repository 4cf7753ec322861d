use std::sync::Arc;

use crate::engine::graphics::VulkanoRenderer;
use crate::engine::user_input::UserInput;
use crate::engine::{AnimationLoop, EngineError, EngineResult, Universe};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

const WINDOW_TITLE: &str = "little-orrery";

/// Minimal winit wrapper (2025 winit style: ApplicationHandler).
pub struct Windowing;

impl Windowing {
    /// Open the window and drive frames until it closes.
    ///
    /// A renderer failure ends the loop and is returned here.
    pub fn run_app(
        universe: Universe,
        renderer: VulkanoRenderer,
        user_input: UserInput,
    ) -> EngineResult<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App {
            window: None,
            universe,
            renderer,
            user_input,
            animation: AnimationLoop::new(),
            fatal: None,
        };

        event_loop.run_app(&mut app)?;

        match app.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    universe: Universe,
    renderer: VulkanoRenderer,
    user_input: UserInput,
    animation: AnimationLoop,
    fatal: Option<EngineError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        log::error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> EngineResult<()> {
        let attrs: WindowAttributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 768.0));

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| EngineError::Render(format!("failed to create window: {e}")))?;
        let window = Arc::new(window);

        self.renderer.init_for_window(&window)?;

        let size = window.inner_size();
        self.universe.resize(size.width, size.height);
        self.universe.prepare_render(&mut self.renderer);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.user_input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.universe.resize(size.width, size.height);
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                self.user_input.latch_frame();
                let result = self.animation.frame(
                    &mut self.universe,
                    &mut self.renderer,
                    self.user_input.state(),
                );
                self.user_input.end_frame();

                if let Err(err) = result {
                    self.fail(event_loop, err);
                    return;
                }

                if let Some(w) = &self.window {
                    w.pre_present_notify();
                    w.request_redraw();
                }
            }

            _ => {}
        }
    }
}
