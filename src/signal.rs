//! Ordered observer lists.

/// A list of observers invoked synchronously, in registration order, each
/// time the owner emits.
pub struct Signal<T: ?Sized> {
    slots: Vec<Box<dyn FnMut(&T)>>,
}

impl<T: ?Sized> Signal<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn connect(&mut self, slot: impl FnMut(&T) + 'static) {
        self.slots.push(Box::new(slot));
    }

    pub fn emit(&mut self, value: &T) {
        for slot in &mut self.slots {
            slot(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<str> = Signal::new();
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            signal.connect(move |value| seen.borrow_mut().push(format!("{tag}:{value}")));
        }

        signal.emit("x");

        assert_eq!(*seen.borrow(), vec!["first:x", "second:x"]);
        assert_eq!(signal.len(), 2);
    }

    #[test]
    fn test_emit_without_slots() {
        let mut signal: Signal<()> = Signal::default();
        signal.emit(&());
        assert!(signal.is_empty());
    }
}
