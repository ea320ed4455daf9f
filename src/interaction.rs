//! Pointer tracking and the damped follow of the composition root.
//!
//! Pointer notifications overwrite the latest offset; nothing is queued. Each
//! frame the yaw and pitch each close a fixed fraction of the distance to
//! their target (offset times gain). The two axes are smoothed independently
//! and never clamped.

use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::config::InteractionConfig;

/// Latest pointer offset from the viewport centre, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    /// No pointer sample has arrived yet.
    #[default]
    Idle,
    Tracking { x: f32, y: f32 },
}

impl PointerState {
    pub fn offset(&self) -> (f32, f32) {
        match *self {
            PointerState::Idle => (0.0, 0.0),
            PointerState::Tracking { x, y } => (x, y),
        }
    }

    pub fn record(&mut self, x: f32, y: f32) {
        *self = PointerState::Tracking { x, y };
    }
}

/// Root rotation in radians: yaw about Y, pitch about X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

/// Offset of the cursor from the viewport centre in logical pixels, so the
/// pointer gain means the same on every display scale.
pub fn pointer_offset(
    position: PhysicalPosition<f64>,
    size: PhysicalSize<u32>,
    scale_factor: f64,
) -> (f32, f32) {
    let position = position.to_logical::<f32>(scale_factor);
    let size = size.to_logical::<f32>(scale_factor);
    (position.x - size.width / 2.0, position.y - size.height / 2.0)
}

/// Moves `current` by `rate` of the way towards `target`.
pub fn damp(current: f32, target: f32, rate: f32) -> f32 {
    current + rate * (target - current)
}

#[derive(Debug, Clone)]
pub struct Interaction {
    config: InteractionConfig,
    pointer: PointerState,
    rotation: Rotation,
}

impl Interaction {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            pointer: PointerState::Idle,
            rotation: Rotation::default(),
        }
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn on_pointer_moved(&mut self, x: f32, y: f32) {
        if self.pointer == PointerState::Idle {
            log::debug!("pointer tracking started at ({x}, {y})");
        }
        self.pointer.record(x, y);
    }

    pub fn target(&self) -> Rotation {
        let (x, y) = self.pointer.offset();
        Rotation {
            yaw: x * self.config.gain,
            pitch: y * self.config.gain,
        }
    }

    /// Advances one frame and returns the new rotation.
    pub fn step(&mut self) -> Rotation {
        let target = self.target();
        self.rotation = Rotation {
            yaw: damp(self.rotation.yaw, target.yaw, self.config.yaw_rate),
            pitch: damp(self.rotation.pitch, target.pitch, self.config.pitch_rate),
        };
        self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_targets_zero() {
        let mut interaction = Interaction::new(InteractionConfig::default());
        assert_eq!(interaction.pointer(), PointerState::Idle);
        assert_eq!(interaction.step(), Rotation::default());
    }

    #[test]
    fn latest_sample_wins() {
        let mut interaction = Interaction::new(InteractionConfig::default());
        interaction.on_pointer_moved(10.0, 20.0);
        interaction.on_pointer_moved(-300.0, 40.0);
        assert_eq!(interaction.pointer(), PointerState::Tracking { x: -300.0, y: 40.0 });
        let target = interaction.target();
        assert!((target.yaw + 0.3).abs() < 1e-6);
        assert!((target.pitch - 0.04).abs() < 1e-6);
    }

    #[test]
    fn axes_use_their_own_rate() {
        let mut interaction = Interaction::new(InteractionConfig::default());
        interaction.on_pointer_moved(100.0, 100.0);
        let rotation = interaction.step();
        assert!((rotation.yaw - 0.01).abs() < 1e-7);
        assert!((rotation.pitch - 0.005).abs() < 1e-7);
    }

    #[test]
    fn centred_pointer_has_no_offset() {
        let size = PhysicalSize::new(800, 600);
        assert_eq!(pointer_offset(PhysicalPosition::new(400.0, 300.0), size, 1.0), (0.0, 0.0));
        assert_eq!(pointer_offset(PhysicalPosition::new(0.0, 0.0), size, 1.0), (-400.0, -300.0));
        assert_eq!(pointer_offset(PhysicalPosition::new(800.0, 600.0), size, 1.0), (400.0, 300.0));
    }

    #[test]
    fn offset_is_measured_in_logical_pixels() {
        // a 1280x800 logical window on a 2x display
        let size = PhysicalSize::new(2560, 1600);
        assert_eq!(pointer_offset(PhysicalPosition::new(1280.0, 800.0), size, 2.0), (0.0, 0.0));
        assert_eq!(pointer_offset(PhysicalPosition::new(2560.0, 0.0), size, 2.0), (640.0, -400.0));

        let mut interaction = Interaction::new(InteractionConfig::default());
        let (x, y) = pointer_offset(PhysicalPosition::new(2560.0, 800.0), size, 2.0);
        interaction.on_pointer_moved(x, y);
        assert!((interaction.target().yaw - 0.64).abs() < 1e-6);
        assert_eq!(interaction.target().pitch, 0.0);
    }

    #[test]
    fn damp_moves_a_fraction_of_the_gap() {
        assert_eq!(damp(0.0, 1.0, 0.25), 0.25);
        assert_eq!(damp(2.0, 2.0, 0.1), 2.0);
        assert_eq!(damp(-1.0, 1.0, 0.5), 0.0);
    }
}
