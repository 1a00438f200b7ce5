use std::collections::VecDeque;

use gl;
use gl::types::GLenum;
use log::{debug, info, warn};
use sdl2;
use sdl2::event::{Event as SdlEvent, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::video::{GLContext, GLProfile, SwapInterval, Window};

use crate::config::WindowConfig;
use crate::error::{CreationStep, Error, Result};
use crate::events::{Action, Event, EventPump, EventSource, Key, WindowState};
use crate::glutils;

/// Event source backed by the SDL event queue. Events posted by the pump
/// itself are delivered before anything SDL has pending.
pub struct SdlEventSource {
    sdl_context: sdl2::Sdl,
    posted: VecDeque<Event>,
}

impl SdlEventSource {
    fn new(sdl_context: sdl2::Sdl) -> SdlEventSource {
        SdlEventSource {
            sdl_context,
            posted: VecDeque::new(),
        }
    }

    fn event_pump(&self) -> Result<sdl2::EventPump> {
        self.sdl_context.event_pump().map_err(Error::WindowSystem)
    }
}

impl EventSource for SdlEventSource {
    fn poll_event(&mut self) -> Result<Option<Event>> {
        if let Some(event) = self.posted.pop_front() {
            return Ok(Some(event));
        }
        let mut event_pump = self.event_pump()?;
        Ok(event_pump.poll_event().map(translate))
    }

    fn wait_event(&mut self) -> Result<Event> {
        if let Some(event) = self.posted.pop_front() {
            return Ok(event);
        }
        let mut event_pump = self.event_pump()?;
        Ok(translate(event_pump.wait_event()))
    }

    fn request_close(&mut self) {
        self.posted.push_back(Event::Destroy);
    }

    fn post_quit(&mut self) {
        self.posted.push_back(Event::Quit);
    }
}

fn translate(event: SdlEvent) -> Event {
    match event {
        SdlEvent::Quit { .. } => Event::Quit,
        SdlEvent::Window { win_event, .. } => match win_event {
            WindowEvent::Shown => Event::Create,
            WindowEvent::Close => Event::Destroy,
            WindowEvent::Minimized => Event::Resize {
                width: 0,
                height: 0,
                minimized: true,
            },
            WindowEvent::Resized(w, h) | WindowEvent::SizeChanged(w, h) => Event::Resize {
                width: w.max(0) as u32,
                height: h.max(0) as u32,
                minimized: false,
            },
            // size follows in a SizeChanged
            WindowEvent::Restored | WindowEvent::Maximized => Event::Resize {
                width: 0,
                height: 0,
                minimized: false,
            },
            _ => Event::Other,
        },
        SdlEvent::KeyDown {
            keycode: Some(Keycode::Escape),
            ..
        } => Event::KeyPress(Key::Escape),
        SdlEvent::KeyDown { .. } => Event::KeyPress(Key::Other),
        _ => Event::Other,
    }
}

/// Errors left over from drawing are logged; only an error raised by the swap
/// itself fails the present.
fn check_swap(stale: &[GLenum], after_swap: Option<GLenum>) -> Result<()> {
    for code in stale {
        warn!("GL error 0x{code:04x} raised before presenting");
    }
    match after_swap {
        None => Ok(()),
        Some(code) => Err(Error::Present(format!("GL error 0x{code:04x}"))),
    }
}

/// The one window of the process together with its GL context.
///
/// Fields drop in declaration order: the context goes before the window.
pub struct WindowSession {
    gl_ctx: Option<GLContext>,
    window: Window,
    events: EventPump<SdlEventSource>,
    _video_subsystem: sdl2::VideoSubsystem,
}

impl WindowSession {
    pub fn create(config: &WindowConfig) -> Result<WindowSession> {
        let sdl_context =
            sdl2::init().map_err(|e| Error::creation(CreationStep::Init, e))?;
        let video_subsystem = sdl_context
            .video()
            .map_err(|e| Error::creation(CreationStep::VideoSubsystem, e))?;

        let (major, minor) = config.gl_version;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(major, minor);

        // shown explicitly once the context is bound
        let mut window = video_subsystem
            .window(&config.title, config.width, config.height)
            .opengl()
            .hidden()
            .build()
            .map_err(|e| Error::creation(CreationStep::BuildWindow, e.to_string()))?;

        let gl_ctx = window
            .gl_create_context()
            .map_err(|e| Error::creation(CreationStep::CreateContext, e))?;
        window
            .gl_make_current(&gl_ctx)
            .map_err(|e| Error::creation(CreationStep::MakeCurrent, e))?;

        gl::load_with(|name| video_subsystem.gl_get_proc_address(name) as *const _);
        if !gl::Clear::is_loaded() {
            return Err(Error::creation(
                CreationStep::LoadFunctions,
                "glClear not found",
            ));
        }

        debug_assert_eq!(gl_attr.context_profile(), GLProfile::Core);
        let (gl_major, gl_minor) = glutils::gl_version();
        debug!("Loaded OpenGL {gl_major}.{gl_minor}");

        if config.vsync {
            if let Err(e) = video_subsystem.gl_set_swap_interval(SwapInterval::VSync) {
                warn!("could not enable vsync: {e}");
            }
        }

        window.show();
        info!(
            "created {}x{} window \"{}\"",
            config.width, config.height, config.title
        );

        Ok(WindowSession {
            gl_ctx: Some(gl_ctx),
            window,
            events: EventPump::new(SdlEventSource::new(sdl_context)),
            _video_subsystem: video_subsystem,
        })
    }

    pub fn state(&self) -> WindowState {
        self.events.state()
    }

    pub fn has_context(&self) -> bool {
        self.gl_ctx.is_some()
    }

    /// Returns whether the application should keep running.
    pub fn poll_events(&mut self) -> Result<bool> {
        let running = self.events.poll_events()?;

        for action in self.events.take_actions() {
            if let Action::Viewport { width, height } = action {
                if self.has_context() {
                    unsafe { gl::Viewport(0, 0, width as i32, height as i32) };
                }
            }
        }
        Ok(running)
    }

    pub fn present(&mut self) -> Result<()> {
        if !self.has_context() {
            return Err(Error::Present("OpenGL context already released".to_string()));
        }
        let stale = glutils::drain_gl_errors();
        self.window.gl_swap_window();
        check_swap(&stale, glutils::gl_error())
    }

    /// Releases the GL context. Later calls do nothing.
    pub fn release_context(&mut self) {
        if let Some(ctx) = self.gl_ctx.take() {
            drop(ctx);
            info!("released OpenGL context");
        }
    }
}

impl Drop for WindowSession {
    fn drop(&mut self) {
        self.release_context();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_and_quit_map_to_lifecycle_events() {
        let close = SdlEvent::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::Close,
        };
        assert_eq!(translate(close), Event::Destroy);
        assert_eq!(translate(SdlEvent::Quit { timestamp: 0 }), Event::Quit);
    }

    #[test]
    fn draw_errors_do_not_fail_the_present() {
        assert!(check_swap(&[gl::INVALID_OPERATION, gl::INVALID_ENUM], None).is_ok());
    }

    #[test]
    fn swap_error_fails_the_present() {
        match check_swap(&[], Some(gl::INVALID_FRAMEBUFFER_OPERATION)) {
            Err(Error::Present(msg)) => assert_eq!(msg, "GL error 0x0506"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn minimize_and_resize() {
        let minimized = SdlEvent::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::Minimized,
        };
        assert!(matches!(
            translate(minimized),
            Event::Resize {
                minimized: true,
                ..
            }
        ));

        let resized = SdlEvent::Window {
            timestamp: 0,
            window_id: 1,
            win_event: WindowEvent::SizeChanged(1024, 768),
        };
        assert_eq!(
            translate(resized),
            Event::Resize {
                width: 1024,
                height: 768,
                minimized: false
            }
        );
    }
}
