//! landmark-tableau
//!
//! A small 3D tableau of simplified world landmarks (a leaning tower, two
//! pyramids, a domed basilica, a twin-tower cathedral and a colonnaded
//! platform) built from a handful of shared primitives and finishes. The whole
//! composition turns gently towards the mouse pointer. Runs natively and in the
//! browser.
//!
//! High-level modules
//! - `primitives` / `palette`: the shared shapes and surface finishes
//! - `structures`: one builder per landmark
//! - `assembler`: lays the landmarks out under the rotatable root
//! - `interaction`: pointer tracking and damped rotation
//! - `data_structures`: transforms, the scene graph, GPU meshes and textures
//! - `camera`, `context`, `pipelines`, `render`, `resources`: the wgpu host
//! - `tableau` / `flow`: the per-frame loop tying it all together
//!

pub mod assembler;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod interaction;
pub mod palette;
pub mod pipelines;
pub mod primitives;
pub mod render;
pub mod resources;
pub mod structures;
pub mod tableau;

use crate::{
    config::TableauConfig,
    flow::{FlowConstructor, GraphicsFlow},
    tableau::Tableau,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub use crate::error::{Result, TableauError};

/// Opens a window (or binds the page canvas) and shows the tableau.
pub fn run(settings: TableauConfig) -> anyhow::Result<()> {
    let constructor: FlowConstructor = Box::new(|ctx| {
        Box::pin(async move {
            let flow: Box<dyn GraphicsFlow> = Box::new(Tableau::new(ctx).await?);
            anyhow::Ok(flow)
        })
    });
    flow::run(settings, constructor)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> std::result::Result<(), JsValue> {
    run(TableauConfig::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
