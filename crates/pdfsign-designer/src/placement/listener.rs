//! Global pointer listener registration.
//!
//! While a drag or resize is active the host must deliver pointer-move and
//! pointer-up from the whole interaction surface, not just the overlay. The
//! registration is held by a [`ListenerRegistration`] guard stored inside the
//! active interaction mode; dropping the mode detaches the listeners, so every
//! path back to idle releases them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::debug;
use uuid::Uuid;

/// Handle identifying one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", &self.0.to_string()[..8])
    }
}

/// Host side of the global pointer-move / pointer-up subscription.
///
/// A UI toolkit implements this by adding and removing its surface-wide
/// event handlers.
pub trait PointerListenerHost {
    /// Begin routing surface-wide pointer events to the placement controller.
    fn attach(&self, id: ListenerId);

    /// Stop routing events for `id`.
    fn detach(&self, id: ListenerId);
}

/// Guard for an attached listener; detaches on drop.
pub struct ListenerRegistration {
    id: ListenerId,
    host: Rc<dyn PointerListenerHost>,
}

impl ListenerRegistration {
    /// Attaches a new listener on `host`.
    pub fn acquire(host: &Rc<dyn PointerListenerHost>) -> Self {
        let id = ListenerId::new();
        host.attach(id);
        debug!("{} attached", id);
        Self {
            id,
            host: Rc::clone(host),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.host.detach(self.id);
        debug!("{} detached", self.id);
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("id", &self.id)
            .finish()
    }
}

/// In-process listener host that records what is attached.
///
/// Used by headless sessions and by tests to observe that registrations
/// never outlive an interaction.
#[derive(Debug, Default)]
pub struct TrackedListeners {
    active: RefCell<Vec<ListenerId>>,
    total_attached: Cell<usize>,
}

impl TrackedListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations currently attached.
    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    /// Number of registrations ever attached.
    pub fn total_attached(&self) -> usize {
        self.total_attached.get()
    }
}

impl PointerListenerHost for TrackedListeners {
    fn attach(&self, id: ListenerId) {
        self.active.borrow_mut().push(id);
        self.total_attached.set(self.total_attached.get() + 1);
    }

    fn detach(&self, id: ListenerId) {
        self.active.borrow_mut().retain(|active| *active != id);
    }
}
