use serde::Deserialize;

/// Seconds each walk frame stays on screen before toggling.
pub const ANIM_FRAME_TIME: f32 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AnimState {
    IdleLeft,
    IdleRight,
    WalkLeftA,
    WalkLeftB,
    WalkRightA,
    WalkRightB,
}

impl AnimState {
    pub const ALL: [AnimState; 6] = [
        AnimState::IdleLeft,
        AnimState::IdleRight,
        AnimState::WalkLeftA,
        AnimState::WalkLeftB,
        AnimState::WalkRightA,
        AnimState::WalkRightB,
    ];

    pub fn faces_right(self) -> bool {
        matches!(
            self,
            AnimState::IdleRight | AnimState::WalkRightA | AnimState::WalkRightB
        )
    }

    pub fn is_walk_frame_for(self, facing_right: bool) -> bool {
        if facing_right {
            matches!(self, AnimState::WalkRightA | AnimState::WalkRightB)
        } else {
            matches!(self, AnimState::WalkLeftA | AnimState::WalkLeftB)
        }
    }

    fn idle(facing_right: bool) -> Self {
        if facing_right {
            AnimState::IdleRight
        } else {
            AnimState::IdleLeft
        }
    }

    fn first_walk_frame(facing_right: bool) -> Self {
        if facing_right {
            AnimState::WalkRightA
        } else {
            AnimState::WalkLeftA
        }
    }

    fn toggled_walk_frame(self, facing_right: bool) -> Self {
        match (facing_right, self) {
            (true, AnimState::WalkRightA) => AnimState::WalkRightB,
            (true, _) => AnimState::WalkRightA,
            (false, AnimState::WalkLeftA) => AnimState::WalkLeftB,
            (false, _) => AnimState::WalkLeftA,
        }
    }
}

/// Facing used by controllers: positive vx faces right, zero vx keeps the
/// horizontal facing of the current frame.
pub fn derive_facing_right(vx: f32, current: AnimState) -> bool {
    vx > 0.0 || (vx == 0.0 && current.faces_right())
}

/// Two-frame walk cycle with instant idle snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animator {
    state: AnimState,
    timer: f32,
    was_moving: bool,
    was_facing_right: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            state: AnimState::IdleLeft,
            timer: 0.0,
            was_moving: false,
            was_facing_right: true,
        }
    }
}

impl Animator {
    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn set_state(&mut self, state: AnimState) {
        self.state = state;
    }

    pub fn update(&mut self, dt: f32, moving: bool, facing_right: bool) -> AnimState {
        self.timer += dt;

        if !moving {
            self.state = AnimState::idle(facing_right);
            self.timer = 0.0;
        } else {
            if !self.was_moving || self.was_facing_right != facing_right {
                self.timer = 0.0;
            }

            if self.timer >= ANIM_FRAME_TIME {
                self.state = self.state.toggled_walk_frame(facing_right);
                self.timer = 0.0;
            } else if !self.state.is_walk_frame_for(facing_right) {
                self.state = AnimState::first_walk_frame(facing_right);
            }
        }

        self.was_moving = moving;
        self.was_facing_right = facing_right;
        self.state
    }
}
