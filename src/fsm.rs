/// Small state-machine container.
///
/// `S` is usually an enum. The machine remembers the current state, the one
/// before it, and how long it has been in the current state. Transition
/// rules live with whoever drives the machine; the machine only records.
///
/// ```
/// use phaseshift::fsm::StateMachine;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Door { Open, Closed }
///
/// let mut fsm = StateMachine::new(Door::Closed);
/// fsm.tick(0.5);
/// fsm.go(Door::Open);
/// assert_eq!(fsm.previous, Door::Closed);
/// assert_eq!(fsm.elapsed, 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    /// Seconds spent in `state`. Reset on each transition.
    pub elapsed: f32,
    entered_this_tick: bool,
}

impl<S: Clone> StateMachine<S> {
    /// `just_entered()` is true until the first `tick`.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            elapsed: 0.0,
            entered_this_tick: true,
        }
    }

    /// Transition only if `next` is a different variant (compared by
    /// discriminant, so payload changes inside one variant are ignored).
    /// Returns whether a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if std::mem::discriminant(&self.state) == std::mem::discriminant(&next) {
            return false;
        }
        self.force_go(next);
        true
    }

    /// Always transition, even into the same variant. Used when the payload
    /// matters (an airborne fall turning into an airborne jump).
    pub fn force_go(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.entered_this_tick = true;
    }

    /// Advance the in-state clock and clear the `just_entered` flag.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_tick = false;
    }

    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }

    /// Put the machine back to a fresh start in `state`.
    pub fn reset(&mut self, state: S) {
        *self = Self::new(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Mode {
        Walk,
        Air { boosted: bool },
    }

    #[test]
    fn go_ignores_same_variant() {
        let mut fsm = StateMachine::new(Mode::Air { boosted: false });
        fsm.tick(0.2);
        assert!(!fsm.go(Mode::Air { boosted: true }));
        assert_eq!(fsm.state, Mode::Air { boosted: false });
        assert_eq!(fsm.elapsed, 0.2);
    }

    #[test]
    fn force_go_replaces_payload_and_resets_clock() {
        let mut fsm = StateMachine::new(Mode::Air { boosted: false });
        fsm.tick(0.2);
        fsm.force_go(Mode::Air { boosted: true });
        assert_eq!(fsm.state, Mode::Air { boosted: true });
        assert_eq!(fsm.elapsed, 0.0);
        assert!(fsm.just_entered());
    }

    #[test]
    fn tick_clears_entry_flag() {
        let mut fsm = StateMachine::new(Mode::Walk);
        assert!(fsm.just_entered());
        fsm.tick(1.0 / 60.0);
        assert!(!fsm.just_entered());
        assert!(fsm.go(Mode::Air { boosted: false }));
        assert_eq!(fsm.previous, Mode::Walk);
    }
}
