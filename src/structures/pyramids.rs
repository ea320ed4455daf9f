//! Two grounded tetrahedra, the small one in front of the large one.

use super::{PartKit, Structure};
use crate::{data_structures::instance::Instance, palette::FinishName, primitives::PrimitiveId};

pub const NAME: &str = "pyramids";

pub fn build(kit: &PartKit) -> Structure {
    let finish = FinishName::PyramidStone;
    Structure::new(NAME, Instance::new()).with_children(vec![
        kit.part(
            "large",
            PrimitiveId::PyramidLarge,
            finish,
            Instance::at(-7.5, -2.5, 0.0),
        ),
        kit.part(
            "small",
            PrimitiveId::PyramidSmall,
            finish,
            Instance::at(-7.0, -2.5, 1.75),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::structures::test_kit;

    #[test]
    fn small_pyramid_stands_in_front() {
        let (library, palette) = test_kit::tables();
        let pyramids = build(&PartKit::new(&library, &palette));
        let parts = pyramids.parts();
        assert_eq!(parts.len(), 2);
        assert!(Arc::ptr_eq(parts[0].finish(), parts[1].finish()));
        let [large, small] = [0, 1].map(|i| pyramids.part_transforms()[i].translation());
        // closer to the camera (larger z) and on the same ground line
        assert!(small[2] > large[2]);
        assert_eq!(small[1], large[1]);
        assert!(parts[0].primitive().orientation().is_some());
    }
}
