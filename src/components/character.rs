/// Vertical-axis state of the player.
///
/// Wall contact is tracked separately as a flag on the player, since the
/// player can be airborne and touching a wall at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Standing on a solid, non-ghost floor.
    Grounded,
    /// In the air. `jumped` is true when the player left the ground by
    /// jumping, which rules out coyote-time jumps.
    Airborne { jumped: bool },
}

impl PlayerState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grounded => "Grounded",
            Self::Airborne { jumped: true } => "Airborne(jump)",
            Self::Airborne { jumped: false } => "Airborne(fall)",
        }
    }
}

/// Jump outcome of one physics step. Returned to the owning world, which
/// routes it to the twin-platform registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JumpKind {
    #[default]
    None,
    Ground,
    Wall,
}

impl JumpKind {
    pub fn fired(&self) -> bool {
        !matches!(self, Self::None)
    }
}
