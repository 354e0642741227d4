//! Publish/subscribe notification of game state changes.
//!
//! The [`Game`] is the only publisher. Subscribers are held weakly, so the
//! game never keeps a renderer alive; dropped subscribers are pruned on the
//! next notification.

use crate::Game;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Receives a callback after every notification pass.
///
/// By the time `update` runs the game's legal destinations, threat marks and
/// state are already current. The game is handed over read-only.
pub trait Observer {
    fn update(&mut self, game: &Game);
}

/// Handle returned by [`Game::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The list of subscribers, in subscription order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Weak<RefCell<dyn Observer>>)>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self, observer: Weak<RefCell<dyn Observer>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Removes a subscription. Returns false if the id was not subscribed.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Upgrades every live subscriber, dropping the dead ones.
    pub(crate) fn live(&mut self) -> Vec<Rc<RefCell<dyn Observer>>> {
        self.entries.retain(|(_, observer)| observer.strong_count() > 0);
        self.entries
            .iter()
            .filter_map(|(_, observer)| observer.upgrade())
            .collect()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(usize);

    impl Observer for Counter {
        fn update(&mut self, _game: &Game) {
            self.0 += 1;
        }
    }

    #[test]
    fn subscribe_and_unsubscribe() {
        let counter: Rc<RefCell<dyn Observer>> = Rc::new(RefCell::new(Counter(0)));
        let mut subscribers = Subscribers::default();

        let first = subscribers.subscribe(Rc::downgrade(&counter));
        let second = subscribers.subscribe(Rc::downgrade(&counter));
        assert_ne!(first, second);
        assert_eq!(subscribers.len(), 2);

        assert!(subscribers.unsubscribe(first));
        assert!(!subscribers.unsubscribe(first));
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn dropped_observers_are_pruned() {
        let mut subscribers = Subscribers::default();
        {
            let counter: Rc<RefCell<dyn Observer>> = Rc::new(RefCell::new(Counter(0)));
            subscribers.subscribe(Rc::downgrade(&counter));
            assert_eq!(subscribers.live().len(), 1);
        }
        assert!(subscribers.live().is_empty());
        assert_eq!(subscribers.len(), 0);
    }
}
