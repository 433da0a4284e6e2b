use std::fmt;

/// Discrete move primitives the planner searches over.
///
/// This is the single action set shared by the transition model, the planner
/// and the control-key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    None,
    WalkRight,
    WalkLeft,
    RunRight,
    Jump,
    RunJump,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::None,
        Action::WalkRight,
        Action::WalkLeft,
        Action::Jump,
        Action::RunRight,
        Action::RunJump,
    ];

    /// Stable numeric code handed to engine adapters.
    pub fn code(self) -> u8 {
        match self {
            Action::None => 0,
            Action::WalkRight => 1,
            Action::WalkLeft => 2,
            Action::Jump => 3,
            Action::RunRight => 4,
            Action::RunJump => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Action> {
        Action::ALL.into_iter().find(|action| action.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::None => "None",
            Action::WalkRight => "WalkRight",
            Action::WalkLeft => "WalkLeft",
            Action::RunRight => "RunRight",
            Action::Jump => "Jump",
            Action::RunJump => "RunJump",
        }
    }

    /// Actions that move the agent to the right (jumps carry rightward velocity).
    pub fn is_forward(self) -> bool {
        matches!(
            self,
            Action::WalkRight | Action::RunRight | Action::Jump | Action::RunJump
        )
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Action::Jump | Action::RunJump)
    }

    /// Engine-neutral button state for this action.
    pub fn keys(self) -> ControlKeys {
        let mut keys = ControlKeys::default();
        match self {
            Action::None => {}
            Action::WalkRight => keys.right = true,
            Action::WalkLeft => keys.left = true,
            Action::RunRight => {
                keys.right = true;
                keys.speed = true;
            }
            Action::Jump => {
                keys.right = true;
                keys.jump = true;
            }
            Action::RunJump => {
                keys.right = true;
                keys.jump = true;
                keys.speed = true;
            }
        }
        keys
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Buttons held for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlKeys {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub speed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_reversible() {
        for action in Action::ALL {
            assert_eq!(Action::from_code(action.code()), Some(action));
        }
        assert_eq!(Action::from_code(6), None);
    }

    #[test]
    fn test_forward_actions() {
        assert!(Action::RunJump.is_forward());
        assert!(Action::Jump.is_forward());
        assert!(!Action::WalkLeft.is_forward());
        assert!(!Action::None.is_forward());
    }

    #[test]
    fn test_keys() {
        assert_eq!(Action::None.keys(), ControlKeys::default());

        let run_jump = Action::RunJump.keys();
        assert!(run_jump.right && run_jump.jump && run_jump.speed);
        assert!(!run_jump.left);

        let left = Action::WalkLeft.keys();
        assert!(left.left && !left.right);
    }
}
