use landmark_tableau::config::{SceneVariant, TableauConfig};

fn main() -> anyhow::Result<()> {
    let mut settings = TableauConfig::from_env()?;
    if let Some(variant) = std::env::args().nth(1) {
        settings = settings.with_variant(variant.parse::<SceneVariant>()?);
    }
    landmark_tableau::run(settings)
}
