//! DOM Events
//!
//! Input events delivered to document-level listeners.

/// Event kinds a document listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    Click,
    FocusIn,
}

/// Keyboard event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Named key value ("F6", "Tab", "a")
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    default_prevented: bool,
}

impl KeyboardEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
            default_prevented: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Mouse event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseEvent {
    pub x: f64,
    pub y: f64,
    pub button: u16,
}

impl MouseEvent {
    pub fn click(x: f64, y: f64) -> Self {
        Self { x, y, button: 0 }
    }
}

/// Listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Document-level listener registrations
///
/// Records which event kinds have a subscriber. The document does not
/// dispatch; the embedder routes input to the subscriber itself.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u32,
    listeners: Vec<(ListenerId, EventKind)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind));
        id
    }

    /// Remove a listener; false if it was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(_, k)| *k == kind).count()
    }
}
