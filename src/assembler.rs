//! Scene assembler: lays the five landmarks out in world space under one
//! rotatable root and owns the interaction state that turns it.

use std::collections::BTreeMap;

use cgmath::{Deg, Quaternion, Rad, Rotation3};

use crate::{
    config::TableauConfig,
    data_structures::{
        instance::{Instance, InstanceRaw},
        scene_graph::{ContainerNode, PartNode, SceneNode},
    },
    interaction::{Interaction, Rotation},
    palette::FinishName,
    primitives::PrimitiveId,
    structures::{
        PartKit, Structure, basilica, cathedral, colonnade, leaning_tower, pyramids,
    },
};

pub const ROOT_NAME: &str = "tableau";

/// Hand-tuned world placement of each landmark.
pub fn placement(structure: &str) -> Instance {
    match structure {
        leaning_tower::NAME => Instance::at(0.0, 0.0, 4.0).with_yaw(Deg(180.0)),
        basilica::NAME => Instance::at(6.0, 0.0, -1.0),
        colonnade::NAME => Instance::at(-1.0, -3.0, -7.0),
        _ => Instance::new(),
    }
}

/// All parts drawn with one primitive and one finish, as GPU instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub primitive: PrimitiveId,
    pub finish: FinishName,
    pub instances: Vec<InstanceRaw>,
}

/// The composition root and the interaction that rotates it.
#[derive(Debug)]
pub struct Composition {
    root: ContainerNode,
    interaction: Interaction,
}

/// Builds every landmark exactly once and places it under the root.
pub fn assemble(kit: &PartKit, config: &TableauConfig) -> Composition {
    let structures: [Structure; 5] = [
        leaning_tower::build(kit, config.tower_segments),
        pyramids::build(kit),
        basilica::build(kit),
        cathedral::build(kit, config.variant),
        colonnade::build(kit),
    ];
    let mut root = ContainerNode::new(ROOT_NAME, Instance::new());
    for structure in structures {
        let name = structure.name().to_string();
        log::debug!("placing {name} ({} parts)", structure.parts().len());
        let placed = ContainerNode::new(format!("{name}_placement"), placement(&name))
            .with_children(vec![structure.into_node()]);
        root.add_child(Box::new(placed));
    }
    root.update_world_transform_all();
    log::info!(
        "assembled {} landmarks ({:?} variant)",
        root.children.len(),
        config.variant
    );

    Composition {
        root,
        interaction: Interaction::new(config.interaction),
    }
}

impl Composition {
    pub fn root(&self) -> &dyn SceneNode {
        &self.root
    }

    pub fn structure(&self, name: &str) -> Option<&dyn SceneNode> {
        self.root.find_child(name)
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn rotation(&self) -> Rotation {
        self.interaction.rotation()
    }

    /// Pointer offset from the viewport centre.
    pub fn on_pointer_moved(&mut self, x: f32, y: f32) {
        self.interaction.on_pointer_moved(x, y);
    }

    /// One frame: damp the root rotation and refresh world transforms.
    pub fn update(&mut self) -> Rotation {
        let rotation = self.interaction.step();
        let turn = Quaternion::from_angle_x(Rad(rotation.pitch)) * Quaternion::from_angle_y(Rad(rotation.yaw));
        self.root.set_local_transform(Instance {
            rotation: turn,
            ..self.root.get_local_transform()
        });
        self.root.update_world_transform_all();
        rotation
    }

    pub fn parts(&self) -> Vec<&PartNode> {
        let mut parts = Vec::new();
        self.root.collect_parts(&mut parts);
        parts
    }

    /// World transforms grouped by (primitive, finish), in a stable order.
    pub fn batches(&self) -> Vec<Batch> {
        let mut grouped: BTreeMap<(PrimitiveId, FinishName), Vec<InstanceRaw>> = BTreeMap::new();
        for part in self.parts() {
            grouped
                .entry((part.primitive_id(), part.finish_name()))
                .or_default()
                .push(part.get_world_transform().to_raw());
        }
        grouped
            .into_iter()
            .map(|((primitive, finish), instances)| Batch {
                primitive,
                finish,
                instances,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::InnerSpace;

    use super::*;
    use crate::structures::test_kit;

    #[test]
    fn every_landmark_is_placed_once() {
        let (library, palette) = test_kit::tables();
        let composition = assemble(&PartKit::new(&library, &palette), &TableauConfig::default());
        let names: Vec<_> = composition.root().get_children().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(
            names,
            [
                "leaning_tower_placement",
                "pyramids_placement",
                "basilica_placement",
                "cathedral_placement",
                "colonnade_placement"
            ]
        );
        assert_eq!(composition.parts().len(), 8 + 2 + 10 + 4 + 51);
    }

    #[test]
    fn tower_placement_combines_with_its_lean() {
        let (library, palette) = test_kit::tables();
        let composition = assemble(&PartKit::new(&library, &palette), &TableauConfig::default());
        let drum = composition.structure("drum").unwrap().get_world_transform();
        // T(0,0,4) * Ry(180) * Rz(10) applied to the drum at (0,-1.5,2)
        let lean = Quaternion::from_angle_z(leaning_tower::LEAN);
        let expected = Instance::at(0.0, 0.0, 4.0).with_yaw(Deg(180.0)).rotation * (lean * cgmath::Vector3::new(0.0, -1.5, 2.0))
            + cgmath::Vector3::new(0.0, 0.0, 4.0);
        assert!((drum.position - expected).magnitude() < 1e-5);
        assert!((drum.position.z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn batches_cover_every_part() {
        let (library, palette) = test_kit::tables();
        let composition = assemble(&PartKit::new(&library, &palette), &TableauConfig::default());
        let batches = composition.batches();
        let total: usize = batches.iter().map(|b| b.instances.len()).sum();
        assert_eq!(total, composition.parts().len());
        let pillars = batches
            .iter()
            .find(|b| b.primitive == PrimitiveId::Pillar)
            .unwrap();
        assert_eq!(pillars.instances.len(), colonnade::PILLARS);
        assert_eq!(pillars.finish, FinishName::Stone);
    }

    #[test]
    fn update_only_turns_the_root() {
        let (library, palette) = test_kit::tables();
        let mut composition = assemble(&PartKit::new(&library, &palette), &TableauConfig::default());
        let before: Vec<_> = composition.parts().iter().map(|p| p.get_local_transform()).collect();
        composition.on_pointer_moved(400.0, -200.0);
        composition.update();
        let after: Vec<_> = composition.parts().iter().map(|p| p.get_local_transform()).collect();
        assert_eq!(before, after);
        assert_ne!(composition.root().get_local_transform().rotation, Quaternion::from_angle_y(Rad(0.0)));
    }
}
