//! Window-system event pump.
//!
//! Platform notifications are translated into [`Event`] values and fed through
//! [`WindowState::apply`], a pure transition function over the
//! `{normal, minimized, quitting}` states. [`EventPump`] decides when to block:
//!
//! * normal: one non-blocking check, then hand control back for rendering
//! * minimized: block until the window is restored or closed
//! * quitting: block until the explicit [`Event::Quit`] has been drained

use log::debug;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Create,
    /// The window was closed or destroyed.
    Destroy,
    Resize {
        width: u32,
        height: u32,
        minimized: bool,
    },
    KeyPress(Key),
    /// End of the event stream.
    Quit,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// User asked to close the window (ESC).
    RequestClose,
    /// Window is going away, the quit event must follow.
    PostQuit,
    Viewport { width: u32, height: u32 },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    minimized: bool,
    quitting: bool,
}

impl WindowState {
    pub fn minimized(&self) -> bool {
        self.minimized
    }

    /// Once set this never clears.
    pub fn quitting(&self) -> bool {
        self.quitting
    }

    pub fn apply(&mut self, event: &Event) -> Option<Action> {
        match *event {
            Event::Destroy => {
                let was_quitting = self.quitting;
                self.quitting = true;
                (!was_quitting).then_some(Action::PostQuit)
            }
            Event::Quit => {
                self.quitting = true;
                None
            }
            Event::Resize {
                minimized: true, ..
            } => {
                self.minimized = true;
                None
            }
            Event::Resize { width, height, .. } => {
                self.minimized = false;
                (width > 0 && height > 0).then_some(Action::Viewport { width, height })
            }
            Event::KeyPress(Key::Escape) if !self.quitting => Some(Action::RequestClose),
            _ => None,
        }
    }
}

/// Where events come from. The SDL-backed source lives in [`crate::window`].
pub trait EventSource {
    /// Returns the next pending event without blocking.
    fn poll_event(&mut self) -> Result<Option<Event>>;

    /// Blocks until an event is available.
    fn wait_event(&mut self) -> Result<Event>;

    /// Queues a [`Event::Destroy`], as if the window had been closed.
    fn request_close(&mut self);

    /// Queues the [`Event::Quit`] that ends draining.
    fn post_quit(&mut self);
}

pub struct EventPump<S> {
    source: S,
    state: WindowState,
    quit_received: bool,
    actions: Vec<Action>,
}

impl<S: EventSource> EventPump<S> {
    pub fn new(source: S) -> EventPump<S> {
        EventPump {
            source,
            state: WindowState::default(),
            quit_received: false,
            actions: Vec::new(),
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Actions the caller has to carry out, in arrival order.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    /// Returns whether the application should keep running.
    pub fn poll_events(&mut self) -> Result<bool> {
        if self.state.quitting() {
            return self.drain_until_quit();
        }

        if self.state.minimized() {
            while self.state.minimized() && !self.state.quitting() {
                let event = self.source.wait_event()?;
                self.dispatch(event);
            }
            if self.state.quitting() {
                return self.drain_until_quit();
            }
            return Ok(true);
        }

        if let Some(event) = self.source.poll_event()? {
            self.dispatch(event);
        }
        Ok(true)
    }

    fn drain_until_quit(&mut self) -> Result<bool> {
        while !self.quit_received {
            let event = self.source.wait_event()?;
            self.dispatch(event);
        }
        Ok(false)
    }

    fn dispatch(&mut self, event: Event) {
        if event == Event::Quit {
            self.quit_received = true;
        }

        let before = self.state;
        let action = self.state.apply(&event);
        if before != self.state {
            debug!("{event:?}: {before:?} -> {:?}", self.state);
        }

        match action {
            Some(Action::RequestClose) => self.source.request_close(),
            Some(Action::PostQuit) => self.source.post_quit(),
            Some(a) => self.actions.push(a),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::VecDeque;

    /// Scripted source. `pending` is what a non-blocking poll can see; `later`
    /// only shows up once the pump blocks.
    #[derive(Default)]
    struct FakeSource {
        pub pending: VecDeque<Event>,
        pub later: VecDeque<Event>,
        pub posted: VecDeque<Event>,
        pub fail_wait: bool,
        pub waits: usize,
    }

    impl FakeSource {
        pub fn with(pending: &[Event], later: &[Event]) -> FakeSource {
            FakeSource {
                pending: pending.iter().copied().collect(),
                later: later.iter().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl EventSource for FakeSource {
        fn poll_event(&mut self) -> Result<Option<Event>> {
            Ok(self.posted.pop_front().or_else(|| self.pending.pop_front()))
        }

        fn wait_event(&mut self) -> Result<Event> {
            self.waits += 1;
            if self.fail_wait {
                return Err(Error::WindowSystem("wait failed".to_string()));
            }
            self.posted
                .pop_front()
                .or_else(|| self.pending.pop_front())
                .or_else(|| self.later.pop_front())
                .ok_or_else(|| Error::WindowSystem("would block forever".to_string()))
        }

        fn request_close(&mut self) {
            self.posted.push_back(Event::Destroy);
        }

        fn post_quit(&mut self) {
            self.posted.push_back(Event::Quit);
        }
    }

    fn minimize() -> Event {
        Event::Resize {
            width: 0,
            height: 0,
            minimized: true,
        }
    }

    fn restore() -> Event {
        Event::Resize {
            width: 800,
            height: 600,
            minimized: false,
        }
    }

    #[test]
    fn normal_state_never_blocks() {
        let mut pump = EventPump::new(FakeSource::with(&[], &[]));
        assert!(pump.poll_events().unwrap());
        assert_eq!(pump.source.waits, 0);

        pump.source.pending.push_back(Event::Create);
        assert!(pump.poll_events().unwrap());
        assert_eq!(pump.source.waits, 0);
    }

    #[test]
    fn normal_state_dispatches_one_event_per_call() {
        let mut pump = EventPump::new(FakeSource::with(&[Event::Other, Event::Other], &[]));
        assert!(pump.poll_events().unwrap());
        assert_eq!(pump.source.pending.len(), 1);
    }

    #[test]
    fn close_then_drain_returns_false() {
        let mut pump = EventPump::new(FakeSource::with(&[Event::Create, Event::Destroy], &[]));
        assert!(pump.poll_events().unwrap());
        assert!(pump.poll_events().unwrap());
        assert!(pump.state().quitting());
        // quit was posted by the destroy transition
        assert!(!pump.poll_events().unwrap());
        assert!(!pump.poll_events().unwrap());
    }

    #[test]
    fn quitting_drains_everything_up_to_quit() {
        let mut pump = EventPump::new(FakeSource::with(
            &[Event::Destroy],
            &[Event::Other, Event::KeyPress(Key::Other), Event::Quit, Event::Other],
        ));
        // drop the posted quit so the platform one has to be drained
        assert!(pump.poll_events().unwrap());
        pump.source.posted.clear();
        assert!(!pump.poll_events().unwrap());
        assert_eq!(pump.source.later, VecDeque::from([Event::Other]));
    }

    #[test]
    fn quit_seen_while_polling_stops_the_next_call() {
        let mut pump = EventPump::new(FakeSource::with(&[Event::Quit], &[]));
        assert!(pump.poll_events().unwrap());
        assert!(!pump.poll_events().unwrap());
        assert_eq!(pump.source.waits, 0);
    }

    #[test]
    fn minimized_blocks_until_restored() {
        let mut pump = EventPump::new(FakeSource::with(
            &[minimize()],
            &[Event::Other, Event::Other, restore(), Event::Other],
        ));
        assert!(pump.poll_events().unwrap());
        assert!(pump.state().minimized());

        assert!(pump.poll_events().unwrap());
        assert!(!pump.state().minimized());
        assert_eq!(pump.source.waits, 3);
        assert_eq!(pump.source.later.len(), 1);
        assert_eq!(
            pump.take_actions(),
            vec![Action::Viewport {
                width: 800,
                height: 600
            }]
        );
    }

    #[test]
    fn destroy_while_minimized_drains_and_stops() {
        let mut pump = EventPump::new(FakeSource::with(
            &[minimize()],
            &[Event::Other, Event::Destroy, Event::Other],
        ));
        assert!(pump.poll_events().unwrap());
        assert!(!pump.poll_events().unwrap());
        assert!(pump.state().quitting());
    }

    #[test]
    fn quit_while_minimized_stops() {
        let mut pump = EventPump::new(FakeSource::with(&[minimize()], &[Event::Quit]));
        assert!(pump.poll_events().unwrap());
        assert!(!pump.poll_events().unwrap());
    }

    #[test]
    fn escape_requests_close() {
        let mut pump = EventPump::new(FakeSource::with(&[Event::KeyPress(Key::Escape)], &[]));
        assert!(pump.poll_events().unwrap());
        assert_eq!(pump.source.posted, VecDeque::from([Event::Destroy]));
        assert!(pump.poll_events().unwrap());
        assert!(pump.state().quitting());
        assert!(!pump.poll_events().unwrap());
    }

    #[test]
    fn wait_error_is_reported() {
        let mut source = FakeSource::with(&[Event::Destroy], &[]);
        source.fail_wait = true;
        let mut pump = EventPump::new(source);
        assert!(pump.poll_events().unwrap());
        assert!(matches!(pump.poll_events(), Err(Error::WindowSystem(_))));
    }

    #[test]
    fn window_closed_right_after_creation() {
        let config = crate::config::WindowConfig::default();
        assert_eq!(config.title, "OpenGL Triangle");
        assert_eq!((config.width, config.height), (800, 600));

        let mut pump = EventPump::new(FakeSource::with(
            &[
                Event::Create,
                Event::Resize {
                    width: config.width,
                    height: config.height,
                    minimized: false,
                },
                Event::Destroy,
            ],
            &[],
        ));
        let mut frames = 0;
        while pump.poll_events().unwrap() {
            if !pump.state().quitting() {
                frames += 1;
            }
        }
        assert_eq!(frames, 2);
        assert!(pump.source.posted.is_empty());
    }

    #[test]
    fn quitting_is_monotonic() {
        let events = [
            Event::Destroy,
            restore(),
            minimize(),
            Event::Create,
            Event::KeyPress(Key::Escape),
            Event::Other,
            Event::Destroy,
        ];
        let mut state = WindowState::default();
        for e in &events {
            state.apply(e);
            assert!(state.quitting());
        }
    }

    #[test]
    fn repeated_destroy_posts_quit_once() {
        let mut state = WindowState::default();
        assert_eq!(state.apply(&Event::Destroy), Some(Action::PostQuit));
        assert_eq!(state.apply(&Event::Destroy), None);
    }

    #[test]
    fn zero_sized_resize_has_no_viewport() {
        let mut state = WindowState::default();
        state.apply(&minimize());
        let action = state.apply(&Event::Resize {
            width: 0,
            height: 0,
            minimized: false,
        });
        assert_eq!(action, None);
        assert!(!state.minimized());
    }
}
