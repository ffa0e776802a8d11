mod trail;

pub use trail::Trail;

/// Decision level of the search: the number of saved states currently on a trail.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct DecLvl(u32);

impl DecLvl {
    pub const ROOT: DecLvl = DecLvl(0);

    pub const fn new(num_saved: u32) -> Self {
        DecLvl(num_saved)
    }

    pub const fn to_int(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DecLvl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Backtrack {
    /// Saves the current state and returns the decision level entered.
    fn save_state(&mut self) -> DecLvl;

    fn num_saved(&self) -> u32;

    /// Undoes every change made since the last saved state.
    fn restore_last(&mut self);

    /// Restores saved states until reaching the given decision level.
    fn restore(&mut self, lvl: DecLvl) {
        while self.num_saved() > lvl.to_int() {
            self.restore_last();
        }
    }

    fn reset(&mut self) {
        self.restore(DecLvl::ROOT)
    }

    fn current_decision_level(&self) -> DecLvl {
        DecLvl::new(self.num_saved())
    }
}
