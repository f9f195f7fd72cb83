use tileworld_objects::{Object, TypeId};

use crate::config::PlayerTuning;
use crate::physics::Actor;

/// The player: a resolver-driven actor plus life and inventory bookkeeping.
///
/// The player is never stored in a room's object collection.
#[derive(Debug, Clone)]
pub struct Player {
    pub actor: Actor,
    /// In `0..=max_health`.
    pub health: i32,
    pub max_health: i32,
    /// Remaining invincibility, ms. Never negative.
    pub invincibility: f64,
    pub lives: u32,
    pub coins: u32,
    pub keys: u32,
    /// Items picked up, owned by the player.
    pub items: Vec<Object>,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            actor: Actor::new(TypeId::Player),
            health: tuning.max_health,
            max_health: tuning.max_health,
            invincibility: 0.0,
            lives: tuning.lives,
            coins: 0,
            keys: 0,
            items: Vec::new(),
        }
    }

    pub fn object(&self) -> &Object {
        &self.actor.object
    }

    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.actor.object
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, self.max_health);
    }
}

/// Alpha of a blinking, invincible player: opaque and hidden on alternate
/// `period_ms` windows of the remaining invincibility.
pub fn blink_alpha(invincibility_ms: f64, period_ms: f64) -> u8 {
    if period_ms <= 0.0 {
        return 255;
    }
    let phase = (invincibility_ms / period_ms).floor() as i64;
    if phase.rem_euclid(2) == 0 { 255 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_has_full_health_and_lives() {
        let player = Player::new(&PlayerTuning::default());
        assert_eq!(player.health, 100);
        assert_eq!(player.lives, 3);
        assert!(!player.is_invincible());
        assert!(player.items.is_empty());
        assert_eq!(player.object().type_id(), TypeId::Player);
    }

    #[test]
    fn heal_clamps_to_max() {
        let mut player = Player::new(&PlayerTuning::default());
        player.health = 90;
        player.heal(25);
        assert_eq!(player.health, 100);
    }

    #[test]
    fn blink_toggles_every_period() {
        assert_eq!(blink_alpha(0.0, 200.0), 255);
        assert_eq!(blink_alpha(150.0, 200.0), 255);
        assert_eq!(blink_alpha(200.0, 200.0), 0);
        assert_eq!(blink_alpha(399.0, 200.0), 0);
        assert_eq!(blink_alpha(400.0, 200.0), 255);
        assert_eq!(blink_alpha(1999.0, 200.0), 0);
    }
}
