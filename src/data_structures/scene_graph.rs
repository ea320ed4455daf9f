//! Scene graph and hierarchical scene organization.
//!
//! Groups ([`ContainerNode`]) and rendered parts ([`PartNode`]) form a tree.
//! Every node keeps its local transform next to a cached world transform that
//! is refreshed top-down by [`SceneNode::update_world_transforms`].

use std::{fmt::Debug, sync::Arc};

use crate::{
    data_structures::instance::Instance,
    palette::{Finish, FinishName},
    primitives::{Primitive, PrimitiveId},
};

pub trait SceneNode: Debug {
    fn name(&self) -> &str;

    fn get_local_transform(&self) -> Instance;

    fn set_local_transform(&mut self, instance: Instance);

    /// Only valid after the last `update_world_transforms` call that followed a
    /// change anywhere above this node.
    fn get_world_transform(&self) -> Instance;

    /// Parts are leaves; only groups have children.
    fn get_children(&self) -> &[Box<dyn SceneNode>] {
        &[]
    }

    /// Recomputes this node's world transform from `parent` and recurses.
    fn update_world_transforms(&mut self, parent: &Instance);

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    fn as_part(&self) -> Option<&PartNode> {
        None
    }

    /// Appends every part in this subtree, depth first, in insertion order.
    fn collect_parts<'a>(&'a self, out: &mut Vec<&'a PartNode>) {
        if let Some(part) = self.as_part() {
            out.push(part);
        }
        for child in self.get_children() {
            child.collect_parts(out);
        }
    }

    /// Depth-first search of the descendants (not `self`) by name.
    fn find_child(&self, name: &str) -> Option<&dyn SceneNode> {
        for child in self.get_children() {
            if child.name() == name {
                return Some(child.as_ref());
            }
            if let Some(found) = child.find_child(name) {
                return Some(found);
            }
        }
        None
    }
}

/// A group: no geometry of its own, only a transform shared by its children.
#[derive(Debug)]
pub struct ContainerNode {
    name: String,
    pub children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
}

impl ContainerNode {
    pub fn new(name: impl Into<String>, local: Instance) -> Self {
        Self {
            name: name.into(),
            children: vec![],
            local,
            world: local,
        }
    }

    pub fn with_children(mut self, children: Vec<Box<dyn SceneNode>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }
}

impl SceneNode for ContainerNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> Instance {
        self.local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> Instance {
        self.world
    }

    fn get_children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }
}

/// One rendered element: a shared primitive drawn with a shared finish.
#[derive(Debug)]
pub struct PartNode {
    name: String,
    primitive_id: PrimitiveId,
    primitive: Arc<Primitive>,
    finish_name: FinishName,
    finish: Arc<Finish>,
    local: Instance,
    world: Instance,
}

impl PartNode {
    pub fn new(
        name: impl Into<String>,
        (primitive_id, primitive): (PrimitiveId, Arc<Primitive>),
        (finish_name, finish): (FinishName, Arc<Finish>),
        local: Instance,
    ) -> Self {
        Self {
            name: name.into(),
            primitive_id,
            primitive,
            finish_name,
            finish,
            local,
            world: local,
        }
    }

    pub fn primitive_id(&self) -> PrimitiveId {
        self.primitive_id
    }

    pub fn primitive(&self) -> &Arc<Primitive> {
        &self.primitive
    }

    pub fn finish_name(&self) -> FinishName {
        self.finish_name
    }

    pub fn finish(&self) -> &Arc<Finish> {
        &self.finish
    }
}

impl SceneNode for PartNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> Instance {
        self.local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> Instance {
        self.world
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
    }

    fn as_part(&self) -> Option<&PartNode> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, InnerSpace, Vector3};

    use super::*;
    use crate::{palette::Palette, primitives::PrimitiveLibrary};

    fn part(name: &str, local: Instance) -> Box<dyn SceneNode> {
        let library = PrimitiveLibrary::new().unwrap();
        let palette = Palette::new().unwrap();
        Box::new(PartNode::new(
            name,
            (PrimitiveId::Finial, library.get(PrimitiveId::Finial).clone()),
            (FinishName::Stone, palette.get(FinishName::Stone).clone()),
            local,
        ))
    }

    #[test]
    fn world_transforms_follow_the_hierarchy() {
        let inner = ContainerNode::new("inner", Instance::at(1.0, 0.0, 0.0))
            .with_children(vec![part("leaf", Instance::at(0.0, 2.0, 0.0))]);
        let mut root = ContainerNode::new("root", Instance::new().with_yaw(Deg(90.0)))
            .with_children(vec![Box::new(inner) as Box<dyn SceneNode>]);
        root.update_world_transform_all();

        let leaf = root.find_child("leaf").unwrap();
        // yaw +90 takes +x to -z
        let expected = Vector3::new(0.0, 2.0, -1.0);
        assert!((leaf.get_world_transform().position - expected).magnitude() < 1e-5);
        assert!(root.find_child("root").is_none());
    }

    #[test]
    fn parts_are_leaves() {
        let mut leaf = part("leaf", Instance::at(0.0, 1.0, 0.0));
        leaf.update_world_transforms(&Instance::at(2.0, 0.0, 0.0));
        assert!(leaf.get_children().is_empty());
        assert!(leaf.as_part().is_some());
        assert_eq!(leaf.get_world_transform().position, Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn parts_are_collected_in_insertion_order() {
        let mut root = ContainerNode::new("root", Instance::new());
        root.add_child(part("a", Instance::new()));
        root.add_child(Box::new(
            ContainerNode::new("group", Instance::new()).with_children(vec![part("b", Instance::new())]),
        ));
        root.add_child(part("c", Instance::new()));

        let mut parts = Vec::new();
        root.collect_parts(&mut parts);
        let names: Vec<_> = parts.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
