//! Engine data structures: models, textures, scene graphs, and instances.
//!
//! - `model` holds GPU meshes, materials and the vertex layout
//! - `texture` wraps GPU textures and their creation
//! - `instance` holds rigid transforms and their GPU layout
//! - `scene_graph` organises parts into nested groups

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
