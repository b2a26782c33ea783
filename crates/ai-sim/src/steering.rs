//! Kinematic stand-in for steering: behaviours produce a displacement, no forces.

use ai_core::DeterministicRng;
use ai_nav::Vec2;

/// Behaviour switches plus the state wander needs between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub target: Vec2,
    pub seek: bool,
    pub arrive: bool,
    pub wander: bool,
    pub speed_factor: f32,
    wander_angle: f32,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            seek: false,
            arrive: false,
            wander: false,
            speed_factor: 1.0,
            wander_angle: 0.0,
        }
    }
}

impl Steering {
    /// Radians of heading jitter per second of wandering.
    const WANDER_JITTER: f32 = 3.0;
    const WANDER_SPEED: f32 = 0.5;
    /// Arrive slows down inside this distance of the target.
    const SLOWING_RADIUS: f32 = 20.0;
    const MIN_ARRIVE_SPEED: f32 = 0.25;

    pub fn is_idle(&self) -> bool {
        !(self.seek || self.arrive || self.wander)
    }

    /// Movement for one tick. Seek and arrive never overshoot the target; seek wins over
    /// wander when both are on.
    pub fn displacement(
        &mut self,
        position: Vec2,
        max_speed: f32,
        dt: f32,
        rng: &mut impl DeterministicRng,
    ) -> Vec2 {
        let speed = max_speed * self.speed_factor;

        if self.seek || self.arrive {
            let to_target = self.target - position;
            let distance = to_target.length();
            if distance <= f32::EPSILON {
                return Vec2::ZERO;
            }
            let mut step = speed * dt;
            if self.arrive && !self.seek {
                let ramp = (distance / Self::SLOWING_RADIUS).clamp(Self::MIN_ARRIVE_SPEED, 1.0);
                step *= ramp;
            }
            return to_target * (step.min(distance) / distance);
        }

        if self.wander {
            let jitter = Self::WANDER_JITTER * dt;
            self.wander_angle += rng.next_f32_range(-jitter, jitter);
            let heading = Vec2::new(self.wander_angle.cos(), self.wander_angle.sin());
            return heading * (speed * Self::WANDER_SPEED * dt);
        }

        Vec2::ZERO
    }

    /// Movement was blocked by geometry: wander turns around, the others just wait.
    pub fn on_blocked(&mut self) {
        if self.wander {
            self.wander_angle += std::f32::consts::PI;
        }
    }
}
