//! The twin-tower cathedral facade.
//!
//! Two towers flank a lower centre block. A rose window disc sits just in
//! front of the centre block's face; in the ornate variant thin strips frame
//! it. All overlay parts share the window's depth so they stay coplanar.

use super::{PartKit, Structure};
use crate::{
    config::SceneVariant, data_structures::instance::Instance, palette::FinishName,
    primitives::PrimitiveId,
};

pub const NAME: &str = "cathedral";

/// Depth of the facade overlay plane (window and strips).
pub const FACADE_Z: f32 = -4.24;

const CENTRE_X: f32 = -11.0;
const BODY_Z: f32 = -5.0;
const WINDOW_Y: f32 = -2.0;

/// (name, primitive, x, y) of every strip, all placed at `FACADE_Z`.
const STRIPS: [(&str, PrimitiveId, f32, f32); 7] = [
    ("strip_flank_left", PrimitiveId::StripVertical, CENTRE_X - 0.7, WINDOW_Y),
    ("strip_flank_right", PrimitiveId::StripVertical, CENTRE_X + 0.7, WINDOW_Y),
    ("strip_above", PrimitiveId::StripHorizontal, CENTRE_X, WINDOW_Y + 0.7),
    ("strip_below", PrimitiveId::StripHorizontal, CENTRE_X, WINDOW_Y - 0.7),
    ("strip_lower_left", PrimitiveId::StripVertical, CENTRE_X - 0.4, WINDOW_Y - 1.6),
    ("strip_lower_centre", PrimitiveId::StripVertical, CENTRE_X, WINDOW_Y - 1.6),
    ("strip_lower_right", PrimitiveId::StripVertical, CENTRE_X + 0.4, WINDOW_Y - 1.6),
];

pub fn build(kit: &PartKit, variant: SceneVariant) -> Structure {
    let stone = FinishName::LightRock;
    let overlay = FinishName::DarkRock;

    let mut parts = vec![
        kit.part(
            "tower_left",
            PrimitiveId::FacadeTower,
            stone,
            Instance::at(CENTRE_X - 1.5, -2.0, BODY_Z),
        ),
        kit.part(
            "tower_right",
            PrimitiveId::FacadeTower,
            stone,
            Instance::at(CENTRE_X + 1.5, -2.0, BODY_Z),
        ),
        kit.part(
            "centre_block",
            PrimitiveId::FacadeCentre,
            stone,
            Instance::at(CENTRE_X, -2.75, BODY_Z),
        ),
        kit.part(
            "rose_window",
            PrimitiveId::RoseWindow,
            overlay,
            Instance::at(CENTRE_X, WINDOW_Y, FACADE_Z),
        ),
    ];
    if variant == SceneVariant::Ornate {
        parts.extend(
            STRIPS
                .iter()
                .map(|&(name, primitive, x, y)| kit.part(name, primitive, overlay, Instance::at(x, y, FACADE_Z))),
        );
    }
    Structure::new(NAME, Instance::new()).with_children(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data_structures::scene_graph::SceneNode, primitives::Shape, structures::test_kit,
    };

    #[test]
    fn base_variant_has_no_strips() {
        let (library, palette) = test_kit::tables();
        let cathedral = build(&PartKit::new(&library, &palette), SceneVariant::Base);
        let names: Vec<_> = cathedral.parts().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["tower_left", "tower_right", "centre_block", "rose_window"]);
        let translations: Vec<_> = cathedral.part_transforms().iter().map(|t| t.translation()).collect();
        assert_eq!(translations[0], [-12.5, -2.0, -5.0]);
        assert_eq!(translations[1], [-9.5, -2.0, -5.0]);
        assert_eq!(translations[3], [-11.0, -2.0, -4.24]);
    }

    #[test]
    fn ornate_overlay_is_coplanar_with_the_window() {
        let (library, palette) = test_kit::tables();
        let cathedral = build(&PartKit::new(&library, &palette), SceneVariant::Ornate);
        let parts = cathedral.parts();
        assert_eq!(parts.len(), 4 + STRIPS.len());
        let overlay: Vec<_> = parts
            .iter()
            .zip(cathedral.part_transforms())
            .filter(|(p, _)| p.finish_name() == FinishName::DarkRock)
            .map(|(_, t)| t.translation()[2])
            .collect();
        assert_eq!(overlay.len(), 1 + STRIPS.len());
        assert!(overlay.iter().all(|&z| z == FACADE_Z));
    }

    #[test]
    fn overlay_floats_just_in_front_of_the_facade() {
        let (library, _) = test_kit::tables();
        let Shape::Cuboid { depth, .. } = *library.get(PrimitiveId::FacadeCentre).shape() else {
            panic!("the centre block is a cuboid");
        };
        let face = BODY_Z + depth / 2.0;
        assert!(FACADE_Z > face && FACADE_Z - face < 0.05);
    }
}
