//! Attack generator
//!
//! Turns the attacker's controls into a raw volume of fake requests for
//! one tick. An IP block overrides activation: the volume is zero and
//! the attack is switched off.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::constants::{DEFAULT_BOTS, MAX_BOTS, MIN_BOTS};
use types::log::LogCategory;
use types::status::AttackType;

use crate::config::SimConfig;
use crate::trail::LogTrail;

/// Attacker controls as held in the simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attacker {
    pub running: bool,
    pub blocked: bool,
    pub attack_type: AttackType,
    pub num_bots: u32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            running: false,
            blocked: false,
            attack_type: AttackType::VolumeFlood,
            num_bots: DEFAULT_BOTS,
        }
    }
}

/// Clamp an operator-supplied bot count into `[MIN_BOTS, MAX_BOTS]`.
pub fn clamp_bots(num_bots: i64) -> u32 {
    num_bots.clamp(MIN_BOTS as i64, MAX_BOTS as i64) as u32
}

/// Raw volume for an unblocked, running attack.
///
/// A volume flood draws once from `[1, attack_strength]` and scales by
/// the bot count; a slow-connection attack costs a fixed amount per bot.
pub fn attack_volume<R: Rng>(
    attack_type: AttackType,
    num_bots: u32,
    config: &SimConfig,
    rng: &mut R,
) -> u32 {
    match attack_type {
        AttackType::VolumeFlood => {
            let draw = rng.gen_range(1..=config.attack_strength.max(1));
            draw.saturating_mul(num_bots)
        }
        AttackType::SlowConnection => num_bots.saturating_mul(config.slow_connection_cost),
    }
}

impl Attacker {
    /// Generate this tick's raw attack volume.
    ///
    /// When blocked, forces `running` to false and returns 0 without
    /// touching the trail; the block itself was already logged.
    pub fn generate<R: Rng>(
        &mut self,
        config: &SimConfig,
        rng: &mut R,
        trail: &mut LogTrail,
    ) -> u32 {
        if self.blocked {
            if self.running {
                self.running = false;
                info!("attack halted: attacker is blocked");
            }
            return 0;
        }
        if !self.running {
            return 0;
        }

        let num_bots = clamp_bots(self.num_bots as i64);
        let volume = attack_volume(self.attack_type, num_bots, config, rng);
        debug!(
            attack_type = self.attack_type.label(),
            num_bots,
            volume,
            "attack volume generated"
        );

        let message = match self.attack_type {
            AttackType::VolumeFlood => format!(
                "Volume flood: {} bots injected {} fake requests.",
                num_bots, volume
            ),
            AttackType::SlowConnection => format!(
                "Slow connection attack: {} bots holding {} units of open connections.",
                num_bots, volume
            ),
        };
        trail.record(LogCategory::Attack, message);
        volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn trail() -> LogTrail {
        LogTrail::new(20, Utc::now())
    }

    fn running(attack_type: AttackType, num_bots: u32) -> Attacker {
        Attacker {
            running: true,
            attack_type,
            num_bots,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_attacker_generates_nothing() {
        let mut attacker = Attacker::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut log = trail();
        assert_eq!(attacker.generate(&SimConfig::default(), &mut rng, &mut log), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_volume_flood_range() {
        let config = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for bots in [1u32, 7, 100] {
            for _ in 0..200 {
                let v = attack_volume(AttackType::VolumeFlood, bots, &config, &mut rng);
                assert!(v >= bots && v <= 3 * bots, "volume {} out of range for {} bots", v, bots);
                assert_eq!(v % bots, 0);
            }
        }
    }

    #[test]
    fn test_slow_connection_is_fixed_cost() {
        let mut attacker = running(AttackType::SlowConnection, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut log = trail();
        assert_eq!(attacker.generate(&SimConfig::default(), &mut rng, &mut log), 40);
        assert_eq!(attacker.generate(&SimConfig::default(), &mut rng, &mut log), 40);
        assert!(log.latest().unwrap().message().contains("Slow connection"));
    }

    #[test]
    fn test_attack_log_names_type() {
        let mut attacker = running(AttackType::VolumeFlood, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut log = trail();
        attacker.generate(&SimConfig::default(), &mut rng, &mut log);
        let entry = log.latest().unwrap();
        assert_eq!(entry.category(), LogCategory::Attack);
        assert!(entry.message().starts_with("Volume flood"));
    }

    #[test]
    fn test_block_overrides_running() {
        let mut attacker = running(AttackType::VolumeFlood, 50);
        attacker.blocked = true;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut log = trail();

        assert_eq!(attacker.generate(&SimConfig::default(), &mut rng, &mut log), 0);
        assert!(!attacker.running);
        assert!(log.is_empty());
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let config = SimConfig::default();
        let mut a = ChaCha8Rng::seed_from_u64(77);
        let mut b = ChaCha8Rng::seed_from_u64(77);
        let va: Vec<u32> = (0..20).map(|_| attack_volume(AttackType::VolumeFlood, 10, &config, &mut a)).collect();
        let vb: Vec<u32> = (0..20).map(|_| attack_volume(AttackType::VolumeFlood, 10, &config, &mut b)).collect();
        assert_eq!(va, vb);
    }

    #[test]
    fn test_clamp_bots() {
        assert_eq!(clamp_bots(-5), 1);
        assert_eq!(clamp_bots(0), 1);
        assert_eq!(clamp_bots(42), 42);
        assert_eq!(clamp_bots(1_000), 100);
    }
}
