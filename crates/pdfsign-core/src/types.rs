//! Type aliases for single-threaded shared state.
//!
//! The signing workspace is event driven on one thread, so sharing between
//! the session and host-side callbacks uses `Rc<RefCell<T>>`.

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// # Example
/// ```rust,ignore
/// let navigator: Shared<PageNavigator> = shared(PageNavigator::new(5, 1.5)?);
/// navigator.borrow_mut().next();
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`].
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
