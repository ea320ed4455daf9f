use cgmath::{Deg, InnerSpace, Quaternion, Rotation3, Vector3};
use landmark_tableau::{
    TableauError,
    config::SceneVariant,
    data_structures::scene_graph::SceneNode,
    palette::FinishName,
    primitives::PrimitiveId,
    structures::{PartKit, cathedral, colonnade, leaning_tower},
};

use crate::common::test_utils::{close, composition, tables};

mod common;

#[test]
fn assembly_is_deterministic() {
    let first = composition(SceneVariant::Base);
    let second = composition(SceneVariant::Base);
    let first = first.batches();
    let second = second.batches();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!((a.primitive, a.finish), (b.primitive, b.finish));
        let a: &[u8] = bytemuck::cast_slice(&a.instances);
        let b: &[u8] = bytemuck::cast_slice(&b.instances);
        assert_eq!(a, b);
    }
}

#[test]
fn tower_tilt_does_not_depend_on_segment_count() {
    let (library, palette) = tables();
    let kit = PartKit::new(&library, &palette);
    let short = leaning_tower::build(&kit, 3);
    let tall = leaning_tower::build(&kit, 9);
    assert_eq!(short.local_transform(), tall.local_transform());
    assert_eq!(
        short.local_transform().rotation,
        Quaternion::from_angle_z(Deg(10.0))
    );
    assert_eq!(tall.parts().len(), short.parts().len() + 6);
}

#[test]
fn colonnade_ring_is_evenly_spaced_and_closed() {
    let ring = colonnade::perimeter();
    assert_eq!(ring.len(), colonnade::PILLARS);
    let gaps = ring.iter().zip(ring.iter().cycle().skip(1));
    for (&(ax, az), &(bx, bz)) in gaps {
        let gap = ((bx - ax).powi(2) + (bz - az).powi(2)).sqrt();
        assert!(close(gap, colonnade::STEP), "gap {gap} between ({ax}, {az}) and ({bx}, {bz})");
    }
}

#[test]
fn ornate_overlay_stays_coplanar_in_world_space() {
    let ornate = composition(SceneVariant::Ornate);
    let base = composition(SceneVariant::Base);
    assert_eq!(ornate.parts().len(), base.parts().len() + 7);

    let overlay: Vec<_> = ornate
        .parts()
        .into_iter()
        .filter(|p| p.finish_name() == FinishName::DarkRock)
        .collect();
    assert_eq!(overlay.len(), 8);
    assert!(
        overlay
            .iter()
            .all(|p| close(p.get_world_transform().position.z, cathedral::FACADE_Z))
    );
    assert!(
        overlay
            .iter()
            .any(|p| p.primitive_id() == PrimitiveId::RoseWindow)
    );
}

#[test]
fn landmarks_sit_where_they_were_placed() {
    let tableau = composition(SceneVariant::Base);
    let basilica = tableau.structure("basilica").unwrap().get_world_transform();
    assert_eq!(basilica.position, Vector3::new(6.0, 0.0, -1.0));
    let colonnade = tableau.structure("colonnade").unwrap().get_world_transform();
    assert_eq!(colonnade.position, Vector3::new(-1.0, -3.0, -7.0));
    let pyramids = tableau.structure("pyramids").unwrap().get_world_transform();
    assert_eq!(pyramids.position, Vector3::new(0.0, 0.0, 0.0));
    // the tower faces away: its placement turns it half way round
    let tower = tableau.structure("leaning_tower").unwrap().get_world_transform();
    let forward = tower.rotation * Vector3::unit_z();
    assert!((forward - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
}

#[test]
fn unknown_variant_is_rejected() {
    assert_eq!(" Ornate ".parse::<SceneVariant>(), Ok(SceneVariant::Ornate));
    assert!(matches!(
        "gothic".parse::<SceneVariant>(),
        Err(TableauError::InvalidParameter { what: "variant", .. })
    ));
}
