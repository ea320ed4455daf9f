use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Texture files the finishes sample; missing ones render as flat tints.
const FINISH_TEXTURES: [&str; 6] = [
    "pyramid-texture.jpg",
    "stone.jpg",
    "rock.jpg",
    "light-rock.jpg",
    "dark-rock.jpg",
    "red-rock.jpg",
];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");

    let missing: Vec<_> = FINISH_TEXTURES
        .iter()
        .filter(|name| !assets_src.join(name).is_file())
        .collect();
    if !missing.is_empty() {
        println!(
            "cargo:warning=finish textures not found under assets/: {missing:?}; those finishes fall back to their tint"
        );
    }

    if assets_src.exists() {
        let out_dir = env::var("OUT_DIR")?;
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src], out_dir, &copy_options)
            .context("copying assets next to the build output")?;
    }

    Ok(())
}
