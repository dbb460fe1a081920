//! Replica membership: `Replica -> {Up, Down}`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    Up,
    Down,
}

impl Membership {
    pub fn is_up(self) -> bool {
        matches!(self, Membership::Up)
    }
}
