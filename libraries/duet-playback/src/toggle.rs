//! Active/inactive pair
//!
//! Holds exactly two items and a single flag saying which one is active.
//! `active`/`inactive` are derived from the flag, so they are always
//! complementary and a swap relabels both at once.

use crate::types::SlotId;

/// Two items, one of which is active
#[derive(Debug, Clone)]
pub struct SlotToggle<T> {
    a: T,
    b: T,
    a_is_active: bool,
}

impl<T> SlotToggle<T> {
    /// Create a toggle with `a` initially active
    pub fn new(a: T, b: T) -> Self {
        Self {
            a,
            b,
            a_is_active: true,
        }
    }

    /// Id of the active item
    pub fn active_id(&self) -> SlotId {
        if self.a_is_active {
            SlotId::A
        } else {
            SlotId::B
        }
    }

    /// Id of the inactive item
    pub fn inactive_id(&self) -> SlotId {
        self.active_id().other()
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.active_id() == id
    }

    pub fn active(&self) -> &T {
        self.get(self.active_id())
    }

    pub fn inactive(&self) -> &T {
        self.get(self.inactive_id())
    }

    pub fn active_mut(&mut self) -> &mut T {
        self.get_mut(self.active_id())
    }

    pub fn get(&self, id: SlotId) -> &T {
        match id {
            SlotId::A => &self.a,
            SlotId::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> &mut T {
        match id {
            SlotId::A => &mut self.a,
            SlotId::B => &mut self.b,
        }
    }

    /// Both items mutably, as `(active, inactive)`
    pub fn pair_mut(&mut self) -> (&mut T, &mut T) {
        if self.a_is_active {
            (&mut self.a, &mut self.b)
        } else {
            (&mut self.b, &mut self.a)
        }
    }

    /// Flip which item is active. Never touches the items themselves.
    pub fn swap(&mut self) {
        self.a_is_active = !self.a_is_active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_first_active() {
        let toggle = SlotToggle::new("first", "second");
        assert_eq!(toggle.active_id(), SlotId::A);
        assert_eq!(*toggle.active(), "first");
        assert_eq!(*toggle.inactive(), "second");
    }

    #[test]
    fn swap_relabels_without_moving_items() {
        let mut toggle = SlotToggle::new(1, 2);
        toggle.swap();

        assert_eq!(toggle.active_id(), SlotId::B);
        assert_eq!(*toggle.active(), 2);
        assert_eq!(*toggle.inactive(), 1);
        assert_eq!(*toggle.get(SlotId::A), 1);
        assert_eq!(*toggle.get(SlotId::B), 2);

        toggle.swap();
        assert_eq!(*toggle.active(), 1);
    }

    #[test]
    fn pair_mut_follows_active_flag() {
        let mut toggle = SlotToggle::new(vec![1], vec![2]);
        toggle.swap();
        {
            let (active, inactive) = toggle.pair_mut();
            active.push(20);
            inactive.push(10);
        }
        assert_eq!(toggle.get(SlotId::A), &vec![1, 10]);
        assert_eq!(toggle.get(SlotId::B), &vec![2, 20]);
    }

    #[test]
    fn active_and_inactive_are_always_complementary() {
        let mut toggle = SlotToggle::new((), ());
        for _ in 0..5 {
            assert_ne!(toggle.active_id(), toggle.inactive_id());
            assert!(toggle.is_active(toggle.active_id()));
            assert!(!toggle.is_active(toggle.inactive_id()));
            toggle.swap();
        }
    }
}
