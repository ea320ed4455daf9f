//! The colonnaded platform: a base slab, a ring of pillars around its
//! rectangle and four beams resting on them.
//!
//! Pillars walk the rectangle from the front-left corner, clockwise seen from
//! above, one `STEP` at a time, so slot `i` and slot `i + 1` are always
//! neighbours and the last slot closes the ring next to the first.

use cgmath::Deg;

use super::{PartKit, Structure};
use crate::{data_structures::instance::Instance, palette::FinishName, primitives::PrimitiveId};

pub const NAME: &str = "colonnade";
pub const PILLARS: usize = 46;
pub const STEP: f32 = 0.5;

const LEFT: f32 = -4.0;
const RIGHT: f32 = 4.0;
const FRONT: f32 = 2.0;
const BACK: f32 = -1.5;
const PILLAR_Y: f32 = 1.5;
const BEAM_Y: f32 = 3.0;
const MID_Z: f32 = (FRONT + BACK) / 2.0;

/// Extra orientation of one pillar, about its own axis (yaw) and end over end
/// (roll), so the capital detail lines up with the beam above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillarTrim {
    pub yaw: f32,
    pub roll: f32,
}

/// Trims by 1-based perimeter slot. Slots not listed stand untrimmed.
const TRIMS: [(usize, PillarTrim); 24] = [
    (1, PillarTrim { yaw: 0.0, roll: 180.0 }),
    (2, PillarTrim { yaw: 90.0, roll: 0.0 }),
    (3, PillarTrim { yaw: 45.0, roll: 0.0 }),
    (5, PillarTrim { yaw: 180.0, roll: 180.0 }),
    (8, PillarTrim { yaw: 0.0, roll: 180.0 }),
    (12, PillarTrim { yaw: 90.0, roll: 0.0 }),
    (13, PillarTrim { yaw: 0.0, roll: 180.0 }),
    (14, PillarTrim { yaw: 180.0, roll: 0.0 }),
    (18, PillarTrim { yaw: 90.0, roll: 0.0 }),
    (19, PillarTrim { yaw: 45.0, roll: 180.0 }),
    (20, PillarTrim { yaw: 180.0, roll: 0.0 }),
    (22, PillarTrim { yaw: 45.0, roll: 0.0 }),
    (24, PillarTrim { yaw: 0.0, roll: 180.0 }),
    (26, PillarTrim { yaw: 0.0, roll: 180.0 }),
    (27, PillarTrim { yaw: 180.0, roll: 0.0 }),
    (28, PillarTrim { yaw: 90.0, roll: 0.0 }),
    (30, PillarTrim { yaw: 0.0, roll: 180.0 }),
    (31, PillarTrim { yaw: 180.0, roll: 0.0 }),
    (33, PillarTrim { yaw: 90.0, roll: 180.0 }),
    (37, PillarTrim { yaw: 45.0, roll: 180.0 }),
    (40, PillarTrim { yaw: 0.0, roll: 180.0 }),
    (41, PillarTrim { yaw: 180.0, roll: 0.0 }),
    (42, PillarTrim { yaw: 90.0, roll: 0.0 }),
    (46, PillarTrim { yaw: 45.0, roll: 180.0 }),
];

pub fn trim(slot: usize) -> Option<PillarTrim> {
    TRIMS
        .iter()
        .find(|(s, _)| *s == slot)
        .map(|(_, trim)| *trim)
}

/// (x, z) of every pillar on the base plane, slot 1 first.
pub fn perimeter() -> Vec<(f32, f32)> {
    // (direction, steps) for front, right, back and left side
    let sides = [
        ((1.0, 0.0), ((RIGHT - LEFT) / STEP) as usize),
        ((0.0, -1.0), ((FRONT - BACK) / STEP) as usize),
        ((-1.0, 0.0), ((RIGHT - LEFT) / STEP) as usize),
        ((0.0, 1.0), ((FRONT - BACK) / STEP) as usize),
    ];
    let mut slots = Vec::with_capacity(PILLARS);
    let (mut x, mut z) = (LEFT, FRONT);
    for ((dx, dz), steps) in sides {
        for _ in 0..steps {
            slots.push((x, z));
            x += dx * STEP;
            z += dz * STEP;
        }
    }
    slots
}

pub fn build(kit: &PartKit) -> Structure {
    let stone = FinishName::Stone;
    let mut parts = vec![kit.part(
        "base",
        PrimitiveId::PlatformBase,
        stone,
        Instance::at(0.0, 0.0, MID_Z),
    )];
    parts.extend(perimeter().into_iter().enumerate().map(|(i, (x, z))| {
        let slot = i + 1;
        let position = Instance::at(x, PILLAR_Y, z);
        let local = match trim(slot) {
            Some(PillarTrim { yaw, roll }) => position.with_euler(Deg(0.0), Deg(yaw), Deg(roll)),
            None => position,
        };
        kit.part(format!("pillar_{slot}"), PrimitiveId::Pillar, stone, local)
    }));
    parts.extend([
        kit.part(
            "beam_front",
            PrimitiveId::BeamLong,
            stone,
            Instance::at(0.0, BEAM_Y, FRONT),
        ),
        kit.part(
            "beam_back",
            PrimitiveId::BeamLong,
            stone,
            Instance::at(0.0, BEAM_Y, BACK),
        ),
        kit.part(
            "beam_left",
            PrimitiveId::BeamShort,
            stone,
            Instance::at(LEFT, BEAM_Y, MID_Z),
        ),
        kit.part(
            "beam_right",
            PrimitiveId::BeamShort,
            stone,
            Instance::at(RIGHT, BEAM_Y, MID_Z),
        ),
    ]);
    Structure::new(NAME, Instance::new()).with_children(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::test_kit;

    #[test]
    fn ring_has_forty_six_slots() {
        let slots = perimeter();
        assert_eq!(slots.len(), PILLARS);
        assert_eq!(slots[0], (-4.0, 2.0));
        assert_eq!(slots[16], (4.0, 2.0));
        assert_eq!(slots[23], (4.0, -1.5));
        assert_eq!(slots[39], (-4.0, -1.5));
        assert_eq!(slots[45], (-4.0, 1.5));
    }

    #[test]
    fn trims_follow_the_slot_table() {
        assert_eq!(trim(5), Some(PillarTrim { yaw: 180.0, roll: 180.0 }));
        assert_eq!(trim(46), Some(PillarTrim { yaw: 45.0, roll: 180.0 }));
        assert_eq!(trim(4), None);
        let rolled = TRIMS.iter().filter(|(_, t)| t.roll != 0.0).count();
        assert_eq!(rolled, 12);
    }

    #[test]
    fn platform_parts() {
        let (library, palette) = test_kit::tables();
        let colonnade = build(&PartKit::new(&library, &palette));
        let parts = colonnade.parts();
        assert_eq!(parts.len(), 1 + PILLARS + 4);
        let pillars = parts.iter().filter(|p| p.primitive_id() == PrimitiveId::Pillar).count();
        assert_eq!(pillars, PILLARS);
        assert!(parts.iter().all(|p| p.finish_name() == FinishName::Stone));
        assert_eq!(colonnade.part_transforms()[0].translation(), [0.0, 0.0, 0.25]);
    }
}
