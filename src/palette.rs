//! Material palette: the six named surface finishes.
//!
//! A [`Finish`] only records a tint and the texture file it samples; the
//! texture itself is loaded later by the asset loader and bound per finish.

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    config::hex_rgb,
    error::{Result, TableauError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FinishName {
    PyramidStone,
    Stone,
    Rock,
    LightRock,
    DarkRock,
    RedRock,
}

impl FinishName {
    pub const ALL: [FinishName; 6] = [
        FinishName::PyramidStone,
        FinishName::Stone,
        FinishName::Rock,
        FinishName::LightRock,
        FinishName::DarkRock,
        FinishName::RedRock,
    ];

    fn defaults(self) -> (u32, &'static str) {
        match self {
            FinishName::PyramidStone => (0xb3b3b3, "pyramid-texture.jpg"),
            FinishName::Stone => (0xffffff, "stone.jpg"),
            FinishName::Rock => (0xb3b3b3, "rock.jpg"),
            FinishName::LightRock => (0xc3c3c3, "light-rock.jpg"),
            FinishName::DarkRock => (0xffffff, "dark-rock.jpg"),
            FinishName::RedRock => (0xf5c6a5, "red-rock.jpg"),
        }
    }
}

/// An immutable (tint, texture) pair. The tint is linear RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct Finish {
    tint: [f32; 3],
    texture: String,
}

impl Finish {
    pub fn new(tint: [f32; 3], texture: impl Into<String>) -> Result<Self> {
        if tint.iter().any(|c| !c.is_finite() || !(0.0..=1.0).contains(c)) {
            return Err(TableauError::invalid(
                "tint",
                format!("expected channels within 0..=1, got {tint:?}"),
            ));
        }
        let texture = texture.into();
        if texture.trim().is_empty() {
            return Err(TableauError::invalid("texture", "expected a file name"));
        }
        Ok(Self { tint, texture })
    }

    pub fn tint(&self) -> [f32; 3] {
        self.tint
    }

    /// Texture file name, relative to the asset root.
    pub fn texture(&self) -> &str {
        &self.texture
    }
}

/// The shared, constructed-once table of finishes.
#[derive(Debug, Clone)]
pub struct Palette {
    finishes: BTreeMap<FinishName, Arc<Finish>>,
}

impl Palette {
    pub fn new() -> Result<Self> {
        let finishes = FinishName::ALL
            .into_iter()
            .map(|name| {
                let (tint, texture) = name.defaults();
                Ok((name, Arc::new(Finish::new(hex_rgb(tint), texture)?)))
            })
            .collect::<Result<_>>()?;
        Ok(Self { finishes })
    }

    /// Replaces the tint of one finish; parts built afterwards pick it up.
    pub fn with_tint(mut self, name: FinishName, tint: [f32; 3]) -> Result<Self> {
        let texture = self.get(name).texture().to_string();
        self.finishes.insert(name, Arc::new(Finish::new(tint, texture)?));
        Ok(self)
    }

    pub fn get(&self, name: FinishName) -> &Arc<Finish> {
        &self.finishes[&name]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FinishName, &Arc<Finish>)> {
        self.finishes.iter().map(|(name, finish)| (*name, finish))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_holds_six_textured_finishes() {
        let palette = Palette::new().unwrap();
        assert_eq!(palette.iter().count(), 6);
        assert_eq!(palette.get(FinishName::RedRock).texture(), "red-rock.jpg");
        assert_eq!(palette.get(FinishName::Stone).tint(), [1.0, 1.0, 1.0]);
        let rock = palette.get(FinishName::Rock).tint();
        assert!(rock[0] == rock[1] && rock[1] == rock[2] && rock[0] < 1.0);
    }

    #[test]
    fn finishes_are_independently_tintable() {
        let palette = Palette::new()
            .unwrap()
            .with_tint(FinishName::DarkRock, [0.2, 0.2, 0.25])
            .unwrap();
        assert_eq!(palette.get(FinishName::DarkRock).tint(), [0.2, 0.2, 0.25]);
        assert_eq!(palette.get(FinishName::Stone).tint(), [1.0, 1.0, 1.0]);
        assert_eq!(palette.get(FinishName::DarkRock).texture(), "dark-rock.jpg");
    }

    #[test]
    fn rejects_out_of_range_tints() {
        assert!(Finish::new([1.5, 0.0, 0.0], "stone.jpg").is_err());
        assert!(Finish::new([f32::NAN, 0.0, 0.0], "stone.jpg").is_err());
        assert!(Finish::new([0.5, 0.5, 0.5], " ").is_err());
    }
}
