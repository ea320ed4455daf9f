//! The spired basilica: five tapering spires fanned out by distinct yaws,
//! each crowned by a sphere finial.

use cgmath::Deg;

use super::{PartKit, Structure};
use crate::{data_structures::instance::Instance, palette::FinishName, primitives::PrimitiveId};

pub const NAME: &str = "basilica";

struct Spire {
    name: &'static str,
    primitive: PrimitiveId,
    x: f32,
    base_y: f32,
    yaw: f32,
    finial_y: f32,
}

/// Outer pair, middle pair, then the centre spire.
const SPIRES: [Spire; 5] = [
    Spire {
        name: "outer_left",
        primitive: PrimitiveId::SpireOuter,
        x: -2.0,
        base_y: -0.5,
        yaw: 45.0,
        finial_y: 2.5,
    },
    Spire {
        name: "outer_right",
        primitive: PrimitiveId::SpireOuter,
        x: 2.0,
        base_y: -0.5,
        yaw: 180.0,
        finial_y: 2.5,
    },
    Spire {
        name: "middle_left",
        primitive: PrimitiveId::SpireMiddle,
        x: -1.0,
        base_y: 0.0,
        yaw: 30.0,
        finial_y: 3.5,
    },
    Spire {
        name: "middle_right",
        primitive: PrimitiveId::SpireMiddle,
        x: 1.0,
        base_y: 0.0,
        yaw: 75.0,
        finial_y: 3.5,
    },
    Spire {
        name: "centre",
        primitive: PrimitiveId::SpireInner,
        x: 0.0,
        base_y: -1.25,
        yaw: 90.0,
        finial_y: 1.0,
    },
];

pub fn build(kit: &PartKit) -> Structure {
    let finish = FinishName::RedRock;
    let parts = SPIRES
        .iter()
        .flat_map(|spire| {
            [
                kit.part(
                    format!("spire_{}", spire.name),
                    spire.primitive,
                    finish,
                    Instance::at(spire.x, spire.base_y, 0.0).with_yaw(Deg(spire.yaw)),
                ),
                kit.part(
                    format!("finial_{}", spire.name),
                    PrimitiveId::Finial,
                    finish,
                    Instance::at(spire.x, spire.finial_y, 0.0),
                ),
            ]
        })
        .collect();
    Structure::new(NAME, Instance::new()).with_children(parts)
}
