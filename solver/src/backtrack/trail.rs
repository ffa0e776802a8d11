use crate::backtrack::DecLvl;

/// A sequence of events recording the changes made to a data structure, so that they
/// can be undone to restore a previous state.
///
/// Events are only recorded once a state has been saved: changes made at the root
/// cannot be undone and are never stored.
#[derive(Clone, Debug)]
pub struct Trail<Event> {
    events: Vec<Event>,
    saved_states: Vec<usize>,
}

impl<Event> Trail<Event> {
    pub fn new() -> Self {
        Trail {
            events: Vec::new(),
            saved_states: Vec::new(),
        }
    }

    pub fn push(&mut self, e: Event) {
        if !self.saved_states.is_empty() {
            self.events.push(e);
        }
    }

    pub fn save_state(&mut self) -> DecLvl {
        self.saved_states.push(self.events.len());
        DecLvl::new(self.saved_states.len() as u32)
    }

    pub fn num_saved(&self) -> u32 {
        self.saved_states.len() as u32
    }

    /// Number of events recorded since the root.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pops all events recorded since the last saved state, most recent first,
    /// and passes them to `undo`. Does nothing if no state was saved.
    pub fn restore_last_with(&mut self, mut undo: impl FnMut(Event)) {
        if let Some(saved) = self.saved_states.pop() {
            while self.events.len() > saved {
                if let Some(e) = self.events.pop() {
                    undo(e)
                }
            }
        }
    }
}

impl<Event> Default for Trail<Event> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_events_are_not_recorded() {
        let mut trail = Trail::new();
        trail.push(1);
        assert!(trail.is_empty());
        assert_eq!(trail.save_state(), DecLvl::new(1));
        trail.push(2);
        trail.push(3);
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn restore_in_reverse_order() {
        let mut trail = Trail::new();
        trail.save_state();
        trail.push(1);
        trail.save_state();
        trail.push(2);
        trail.push(3);

        let mut undone = Vec::new();
        trail.restore_last_with(|e| undone.push(e));
        assert_eq!(undone, vec![3, 2]);
        assert_eq!(trail.num_saved(), 1);

        trail.restore_last_with(|e| undone.push(e));
        assert_eq!(undone, vec![3, 2, 1]);
        assert_eq!(trail.num_saved(), 0);
    }
}
