//! The leaning tower: a drum, a stack of tapered segments and a head.
//!
//! The stack is built upright. The lean is the structure's own rotation about
//! Z, so it does not depend on how many segments are stacked.

use cgmath::Deg;

use super::{PartKit, Structure};
use crate::{
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, SceneNode},
    },
    palette::FinishName,
    primitives::PrimitiveId,
};

pub const NAME: &str = "leaning_tower";
pub const LEAN: Deg<f32> = Deg(10.0);
pub const DEFAULT_SEGMENTS: u32 = 6;

const AXIS_Z: f32 = 2.0;
const DRUM_Y: f32 = -1.5;
const DRUM_TOP: f32 = -0.5;
const FIRST_SEGMENT_Y: f32 = -0.1;
const SEGMENT_HEIGHT: f32 = 0.8;
/// Head centre above the top of the stack; the head sinks slightly into it.
const HEAD_OFFSET: f32 = 0.3;

pub fn segment_y(k: u32) -> f32 {
    FIRST_SEGMENT_Y + SEGMENT_HEIGHT * k as f32
}

pub fn head_y(segments: u32) -> f32 {
    let stack_top = match segments {
        0 => DRUM_TOP,
        n => segment_y(n - 1) + SEGMENT_HEIGHT * 0.5,
    };
    stack_top + HEAD_OFFSET
}

pub fn build(kit: &PartKit, segments: u32) -> Structure {
    let finish = FinishName::Rock;

    let mut body = ContainerNode::new("body", Instance::new());
    body.children.push(kit.part(
        "drum",
        PrimitiveId::TowerDrum,
        finish,
        Instance::at(0.0, DRUM_Y, AXIS_Z),
    ));
    body.children.extend((0..segments).map(|k| {
        kit.part(
            format!("segment_{}", k + 1),
            PrimitiveId::TowerSegment,
            finish,
            Instance::at(0.0, segment_y(k), AXIS_Z),
        )
    }));
    let head = kit.part(
        "head",
        PrimitiveId::TowerHead,
        finish,
        Instance::at(0.0, head_y(segments), AXIS_Z),
    );

    Structure::new(NAME, Instance::new().with_euler(Deg(0.0), Deg(0.0), LEAN))
        .with_children(vec![Box::new(body) as Box<dyn SceneNode>, head])
}
