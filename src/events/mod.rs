#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    CloseModal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Document-level key listeners. Every listener is owned by whoever
/// subscribed it and must be handed back through [`KeyBindings::unsubscribe`].
#[derive(Debug, Default)]
pub struct KeyBindings {
    next: u64,
    listeners: Vec<(Subscription, Key, Action)>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, key: Key, action: Action) -> Subscription {
        self.next += 1;
        let sub = Subscription(self.next);
        self.listeners.push((sub, key, action));
        sub
    }

    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _, _)| *s != sub);
        before != self.listeners.len()
    }

    pub fn dispatch(&self, key: Key) -> Vec<Action> {
        self.listeners
            .iter()
            .filter(|(_, k, _)| *k == key)
            .map(|(_, _, a)| *a)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_only_reaches_matching_key() {
        let mut keys = KeyBindings::new();
        keys.subscribe(Key::Escape, Action::CloseModal);
        assert_eq!(keys.dispatch(Key::Escape), vec![Action::CloseModal]);
        assert!(keys.dispatch(Key::Enter).is_empty());
    }

    #[test]
    fn unsubscribe_releases_once() {
        let mut keys = KeyBindings::new();
        let sub = keys.subscribe(Key::Escape, Action::CloseModal);
        assert!(keys.unsubscribe(sub));
        assert!(!keys.unsubscribe(sub));
        assert!(keys.is_empty());
    }
}
