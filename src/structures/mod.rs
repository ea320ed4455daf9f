//! Structure builders, one per landmark.
//!
//! Every builder takes the shared [`PartKit`] and returns a fully assembled
//! [`Structure`]. Builders never fail: all of their numbers are fixed layout
//! constants, and the primitives and finishes they draw on were validated when
//! the kit's tables were built.

pub mod basilica;
pub mod cathedral;
pub mod colonnade;
pub mod leaning_tower;
pub mod pyramids;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        scene_graph::{ContainerNode, PartNode, SceneNode},
    },
    palette::{FinishName, Palette},
    primitives::{PrimitiveId, PrimitiveLibrary},
};

/// Read access to the constructed-once primitive and finish tables.
#[derive(Debug, Clone, Copy)]
pub struct PartKit<'a> {
    pub library: &'a PrimitiveLibrary,
    pub palette: &'a Palette,
}

impl<'a> PartKit<'a> {
    pub fn new(library: &'a PrimitiveLibrary, palette: &'a Palette) -> Self {
        Self { library, palette }
    }

    /// A part sharing the kit's primitive and finish through `Arc`.
    pub fn part(
        &self,
        name: impl Into<String>,
        primitive: PrimitiveId,
        finish: FinishName,
        local: Instance,
    ) -> Box<dyn SceneNode> {
        Box::new(PartNode::new(
            name,
            (primitive, self.library.get(primitive).clone()),
            (finish, self.palette.get(finish).clone()),
            local,
        ))
    }
}

/// A named landmark: parts and sub-groups under one local transform.
#[derive(Debug)]
pub struct Structure {
    root: ContainerNode,
}

impl Structure {
    pub fn new(name: &str, local: Instance) -> Self {
        Self {
            root: ContainerNode::new(name, local),
        }
    }

    pub fn with_children(mut self, children: Vec<Box<dyn SceneNode>>) -> Self {
        self.root.children.extend(children);
        self
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn local_transform(&self) -> Instance {
        self.root.get_local_transform()
    }

    pub fn node(&self) -> &dyn SceneNode {
        &self.root
    }

    pub fn parts(&self) -> Vec<&PartNode> {
        let mut parts = Vec::new();
        self.root.collect_parts(&mut parts);
        parts
    }

    /// Every part's transform in the structure's parent frame, in part order.
    pub fn part_transforms(&self) -> Vec<InstanceRaw> {
        let mut out = Vec::new();
        compose(&self.root, &Instance::default(), &mut out);
        out
    }

    pub fn into_node(self) -> Box<dyn SceneNode> {
        Box::new(self.root)
    }
}

fn compose(node: &dyn SceneNode, parent: &Instance, out: &mut Vec<InstanceRaw>) {
    let world = parent * &node.get_local_transform();
    if node.as_part().is_some() {
        out.push(world.to_raw());
    }
    for child in node.get_children() {
        compose(child.as_ref(), &world, out);
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn parts_share_the_kit_tables() {
        let (library, palette) = test_kit::tables();
        let kit = PartKit::new(&library, &palette);
        let structure = Structure::new("pair", Instance::at(0.0, 1.0, 0.0)).with_children(vec![
            kit.part("a", PrimitiveId::Pillar, FinishName::Stone, Instance::at(1.0, 0.0, 0.0)),
            kit.part("b", PrimitiveId::Pillar, FinishName::Stone, Instance::at(2.0, 0.0, 0.0)),
        ]);
        let parts = structure.parts();
        assert!(Arc::ptr_eq(parts[0].primitive(), parts[1].primitive()));
        assert!(Arc::ptr_eq(parts[0].finish(), palette.get(FinishName::Stone)));
        let transforms = structure.part_transforms();
        assert_eq!(transforms[1].translation(), [2.0, 1.0, 0.0]);
    }
}
