//! The tableau flow: owns the composition and the GPU copies of its meshes,
//! materials and instance batches.

use std::collections::BTreeMap;

use instant::Duration;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, event::WindowEvent};

use crate::{
    assembler::{Batch, Composition, assemble},
    context::{Context, InitContext},
    data_structures::{
        model::{Material, Mesh},
        scene_graph::SceneNode,
    },
    flow::GraphicsFlow,
    interaction::pointer_offset,
    palette::{FinishName, Palette},
    primitives::{PrimitiveId, PrimitiveLibrary},
    render::Instanced,
    resources::texture::load_material,
    structures::PartKit,
};

/// A (primitive, finish) batch resident on the GPU.
#[derive(Debug)]
struct GpuBatch {
    primitive: PrimitiveId,
    finish: FinishName,
    buffer: wgpu::Buffer,
    amount: usize,
}

#[derive(Debug)]
pub struct Tableau {
    composition: Composition,
    meshes: BTreeMap<PrimitiveId, Mesh>,
    materials: BTreeMap<FinishName, Material>,
    batches: Vec<GpuBatch>,
}

impl Tableau {
    pub async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let library = PrimitiveLibrary::new()?;
        let palette = Palette::new()?;
        let composition = assemble(&PartKit::new(&library, &palette), &ctx.settings);

        let meshes: BTreeMap<_, _> = library
            .iter()
            .map(|(id, primitive)| {
                let mesh = Mesh::new(&ctx.device, &format!("{id:?}"), &primitive.tessellate());
                (id, mesh)
            })
            .collect();

        let asset_root = ctx.settings.asset_root.as_str();
        let (device, queue, layout) = (&ctx.device, &ctx.queue, &ctx.material_layout);
        let material_futures = palette.iter().map(|(name, finish)| async move {
            let material = load_material(asset_root, name, finish, device, queue, layout).await;
            (name, material)
        });
        let materials: BTreeMap<_, _> = futures::future::join_all(material_futures)
            .await
            .into_iter()
            .collect();

        let batches = composition
            .batches()
            .into_iter()
            .map(|batch| upload_batch(&ctx.device, batch))
            .collect::<Vec<_>>();
        log::info!(
            "uploaded {} meshes, {} materials and {} instance batches",
            meshes.len(),
            materials.len(),
            batches.len()
        );

        Ok(Self {
            composition,
            meshes,
            materials,
            batches,
        })
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    fn write_batches(&self, queue: &wgpu::Queue) {
        // The part set never changes, so batches line up one to one.
        for (gpu, batch) in self.batches.iter().zip(self.composition.batches()) {
            queue.write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(&batch.instances));
        }
    }
}

fn upload_batch(device: &wgpu::Device, batch: Batch) -> GpuBatch {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?}/{:?} Instance Buffer", batch.primitive, batch.finish)),
        contents: bytemuck::cast_slice(&batch.instances),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });
    GpuBatch {
        primitive: batch.primitive,
        finish: batch.finish,
        buffer,
        amount: batch.instances.len(),
    }
}

impl GraphicsFlow for Tableau {
    fn on_init(&mut self, ctx: &mut Context) {
        log::info!(
            "tableau ready: {} parts in {} landmarks",
            self.composition.parts().len(),
            self.composition.root().get_children().len()
        );
        ctx.window.request_redraw();
    }

    fn on_update(&mut self, ctx: &Context, _dt: Duration) {
        self.composition.update();
        self.write_batches(&ctx.queue);
    }

    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) {
        if let WindowEvent::CursorMoved { position, .. } = event {
            let size = PhysicalSize::new(ctx.config.width, ctx.config.height);
            let (x, y) = pointer_offset(*position, size, ctx.window.scale_factor());
            self.composition.on_pointer_moved(x, y);
        }
    }

    fn on_render(&self) -> Vec<Instanced<'_>> {
        self.batches
            .iter()
            .filter_map(|batch| {
                Some(Instanced {
                    instance: &batch.buffer,
                    mesh: self.meshes.get(&batch.primitive)?,
                    material: self.materials.get(&batch.finish)?,
                    amount: batch.amount,
                })
            })
            .collect()
    }
}
