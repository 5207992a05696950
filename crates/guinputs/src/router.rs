//! Window router: the multi-window event dispatch state machine.
//!
//! The router owns the registration table (window → handler). Each event
//! pulled from [`Toolkit::poll`] is routed to the handler of its source
//! window; a handler answering [`Flow::Stop`] gets its window closed and
//! deregistered. Once no window is left the router is `Terminated`.
//!
//! Events for windows without a handler (already closed) are dropped.

use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::layout::Layout;
use crate::store::ManualValueStore;
use crate::toolkit::{Toolkit, Values, WindowEvent, WindowId};

/// Answer of a handler to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep the window open.
    Continue,
    /// Close and deregister the window.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Running,
    Terminated,
}

/// Per-window event handler.
pub trait WindowHandler {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn handle(&mut self, cx: &mut HandlerContext<'_>, event: &WindowEvent) -> Result<Flow>;
}

/// State shared by all windows for the duration of one run.
#[derive(Debug, Default)]
pub struct Session {
    pub store: ManualValueStore,
    /// Final main-window read, recorded on submission.
    pub submission: Option<Values>,
}

/// Everything a handler may touch while processing one event.
pub struct HandlerContext<'a> {
    pub toolkit: &'a mut dyn Toolkit,
    pub session: &'a mut Session,
    open: Vec<WindowId>,
    spawned: Vec<(WindowId, Box<dyn WindowHandler>)>,
}

impl<'a> HandlerContext<'a> {
    /// Number of registered windows, including the one handling the event.
    pub fn open_windows(&self) -> usize {
        self.open.len()
    }

    /// Whether `window` was registered when the current event arrived.
    pub fn is_open(&self, window: WindowId) -> bool {
        self.open.contains(&window)
    }

    /// Create a window and register `handler` for it once the current event is done.
    pub fn open_window(&mut self, layout: &Layout, handler: Box<dyn WindowHandler>) -> Result<WindowId> {
        let id = self.toolkit.create(layout)?;
        debug!(window = %id, handler = handler.name(), title = %layout.title, "window opened");
        self.spawned.push((id, handler));
        Ok(id)
    }

    pub fn store(&mut self) -> &mut ManualValueStore {
        &mut self.session.store
    }

    pub fn submit(&mut self, values: Values) {
        self.session.submission = Some(values);
    }
}

pub struct WindowRouter {
    handlers: IndexMap<WindowId, Box<dyn WindowHandler>>,
    main: WindowId,
    state: RouterState,
}

impl WindowRouter {
    /// Router with the already created main window registered.
    pub fn new(main: WindowId, handler: Box<dyn WindowHandler>) -> Self {
        let mut handlers = IndexMap::new();
        handlers.insert(main, handler);
        Self {
            handlers,
            main,
            state: RouterState::Running,
        }
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn open_windows(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_open(&self, window: WindowId) -> bool {
        self.handlers.contains_key(&window)
    }

    pub fn is_main_open(&self) -> bool {
        self.is_open(self.main)
    }

    /// Route one event and apply the handler's answer.
    pub fn dispatch(
        &mut self,
        toolkit: &mut dyn Toolkit,
        session: &mut Session,
        event: WindowEvent,
    ) -> Result<RouterState> {
        if self.state == RouterState::Terminated {
            return Ok(self.state);
        }

        let open: Vec<WindowId> = self.handlers.keys().copied().collect();
        let Some(handler) = self.handlers.get_mut(&event.window) else {
            trace!(window = %event.window, event = ?event.event, "ignoring stale event");
            return Ok(self.state);
        };

        let mut cx = HandlerContext {
            toolkit,
            session,
            open,
            spawned: Vec::new(),
        };
        let flow = handler.handle(&mut cx, &event)?;
        let HandlerContext { toolkit, spawned, .. } = cx;

        for (id, handler) in spawned {
            self.handlers.insert(id, handler);
        }

        if flow == Flow::Stop {
            toolkit.close(event.window)?;
            if let Some(handler) = self.handlers.shift_remove(&event.window) {
                debug!(window = %event.window, handler = handler.name(), "window closed");
            }
        }

        if self.handlers.is_empty() {
            debug!("last window closed");
            self.state = RouterState::Terminated;
        }
        Ok(self.state)
    }

    /// Poll and dispatch until every window is closed.
    pub fn run(&mut self, toolkit: &mut dyn Toolkit, session: &mut Session) -> Result<()> {
        while self.state == RouterState::Running {
            let event = toolkit.poll()?;
            self.dispatch(toolkit, session, event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Widget;
    use crate::testing::ScriptedToolkit;
    use crate::toolkit::Event;

    /// Stops on `Pressed("-STOP-")`, opens a child on `Pressed("-OPEN-")`.
    struct Probe {
        seen: usize,
    }

    impl WindowHandler for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn handle(&mut self, cx: &mut HandlerContext<'_>, event: &WindowEvent) -> Result<Flow> {
            self.seen += 1;
            match &event.event {
                Event::Pressed(key) if key == "-OPEN-" => {
                    cx.open_window(&probe_layout(), Box::new(Probe { seen: 0 }))?;
                    Ok(Flow::Continue)
                }
                Event::Pressed(key) if key == "-STOP-" => Ok(Flow::Stop),
                Event::Closed => Ok(Flow::Stop),
                _ => Ok(Flow::Continue),
            }
        }
    }

    fn probe_layout() -> Layout {
        Layout::new("probe").row(vec![
            Widget::Button {
                key: "-OPEN-".into(),
                label: "Open".into(),
            },
            Widget::Button {
                key: "-STOP-".into(),
                label: "Stop".into(),
            },
        ])
    }

    fn setup() -> (ScriptedToolkit, WindowRouter, WindowId) {
        let mut toolkit = ScriptedToolkit::new();
        let main = toolkit.create(&probe_layout()).unwrap();
        let router = WindowRouter::new(main, Box::new(Probe { seen: 0 }));
        (toolkit, router, main)
    }

    #[test]
    fn stop_closes_and_terminates_last_window() {
        let (mut toolkit, mut router, main) = setup();
        let mut session = Session::default();
        toolkit.press(main, "-STOP-");
        router.run(&mut toolkit, &mut session).unwrap();
        assert_eq!(router.state(), RouterState::Terminated);
        assert!(!toolkit.is_open(main));
    }

    #[test]
    fn spawned_window_is_registered_and_keeps_run_alive() {
        let (mut toolkit, mut router, main) = setup();
        let mut session = Session::default();
        let child = WindowId(main.0 + 1);
        toolkit.press(main, "-OPEN-").press(main, "-STOP-");

        let ev = toolkit.poll().unwrap();
        router.dispatch(&mut toolkit, &mut session, ev).unwrap();
        assert_eq!(router.open_windows(), 2);
        assert!(router.is_open(child));

        let ev = toolkit.poll().unwrap();
        let state = router.dispatch(&mut toolkit, &mut session, ev).unwrap();
        assert_eq!(state, RouterState::Running);
        assert!(!router.is_main_open());
        assert!(toolkit.is_open(child));
    }

    #[test]
    fn stale_events_are_ignored() {
        let (mut toolkit, mut router, main) = setup();
        let mut session = Session::default();
        let event = WindowEvent {
            window: WindowId(99),
            event: Event::Pressed("-STOP-".into()),
            values: Values::new(),
        };
        let state = router.dispatch(&mut toolkit, &mut session, event).unwrap();
        assert_eq!(state, RouterState::Running);
        assert!(router.is_open(main));
    }
}
