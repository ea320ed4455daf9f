use landmark_tableau::{
    assembler::{Composition, assemble},
    config::{SceneVariant, TableauConfig},
    palette::Palette,
    primitives::PrimitiveLibrary,
    structures::PartKit,
};

pub fn tables() -> (PrimitiveLibrary, Palette) {
    (
        PrimitiveLibrary::new().expect("default primitives are valid"),
        Palette::new().expect("default finishes are valid"),
    )
}

pub fn composition(variant: SceneVariant) -> Composition {
    let (library, palette) = tables();
    let config = TableauConfig::default().with_variant(variant);
    assemble(&PartKit::new(&library, &palette), &config)
}

pub fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}
