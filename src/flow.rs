//! Flow control and application event loop.
//!
//! A "flow" is a self-contained scene that handles window input, updates its
//! state and hands renderable batches to the engine every frame.
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Forward window events to the orbit controller and to the flow
//! 2. Draw the flow's [`Instanced`] batches with the basic pipeline
//! 3. Present the frame
//! 4. Update the camera uniform and call `on_update` on the flow

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::TableauConfig,
    context::{Context, InitContext, apply_resize},
    data_structures::{model::DrawModel, texture::Texture},
    render::Instanced,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once after the flow is constructed
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_render()` is called each frame and specifies how to render `self`
/// 4. `on_update()` is called every frame after the frame was presented
pub trait GraphicsFlow {
    /// Initialize the flow. This is the only place to modify the Context.
    fn on_init(&mut self, ctx: &mut Context);

    /// Update state every frame with the elapsed time `dt`.
    fn on_update(&mut self, ctx: &Context, dt: Duration);

    /// Handle window events (mouse, window resizing, etc.).
    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent);

    /// Return the instanced draws for this frame.
    fn on_render(&self) -> Vec<Instanced<'_>>;
}

// Dummy impl to make wasm work
impl Debug for dyn GraphicsFlow + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Factory that asynchronously builds the flow once the GPU is ready.
pub type FlowConstructor = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow>>>>>,
>;

/// GPU context plus surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, settings: TableauConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, settings).await?;
        Ok(Self {
            ctx,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if apply_resize(&mut self.ctx.config, &mut self.ctx.projection, width, height) {
            self.is_surface_configured = true;
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
            log::debug!("resized to {width}x{height}");
        }
    }

    fn render(&mut self, flow: &dyn GraphicsFlow) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            for instanced in flow.on_render() {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("skipping a batch with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_mesh_instanced(
                    instanced.mesh,
                    instanced.material,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    settings: TableauConfig,
    state: Option<AppState>,
    graphics_flow: Option<Box<dyn GraphicsFlow>>,
    constructor: Option<FlowConstructor>,
    last_time: Instant,
    setup_error: Option<anyhow::Error>,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        settings: TableauConfig,
        constructor: FlowConstructor,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            settings,
            state: None,
            graphics_flow: None,
            constructor: Some(constructor),
            last_time: Instant::now(),
            setup_error: None,
        })
    }

    fn start(&mut self, mut state: AppState, mut flow: Box<dyn GraphicsFlow>) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        flow.on_init(&mut state.ctx);
        state.ctx.window.request_redraw();
        self.graphics_flow = Some(flow);
        self.state = Some(state);
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("setup failed: {error:#}");
        self.setup_error = Some(error);
        event_loop.exit();
    }
}

pub enum FlowEvent {
    #[allow(dead_code)]
    Initialized {
        state: AppState,
        flow: Box<dyn GraphicsFlow>,
    },
    #[allow(dead_code)]
    Failed(anyhow::Error),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flow } => {
                f.debug_struct("Initialized").field("flow", flow).finish()
            }
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructor) = self.constructor.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Landmark Tableau");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes =
                        window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => {
                    let error = crate::error::TableauError::missing(format!("<canvas id=\"{CANVAS_ID}\">"));
                    return self.abort(event_loop, error.into());
                }
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                let error = crate::error::TableauError::missing(format!("window ({e})"));
                return self.abort(event_loop, error.into());
            }
        };

        let settings = self.settings.clone();
        let init_future = async move {
            let app_state = AppState::new(window, settings).await?;
            let flow = constructor((&app_state.ctx).into()).await?;
            anyhow::Ok((app_state, flow))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok((app_state, flow)) => self.start(app_state, flow),
                Err(e) => self.abort(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((state, flow)) => FlowEvent::Initialized { state, flow },
                    Err(e) => FlowEvent::Failed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before setup finished");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized { state, flow } => self.start(state, flow),
            FlowEvent::Failed(e) => self.abort(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (Some(state), Some(flow)) = (&mut self.state, &mut self.graphics_flow) else {
            return;
        };

        state.ctx.camera.controller.handle_window_events(&event);
        flow.on_window_events(&state.ctx, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(&**flow) {
                    Ok(_) => {
                        let ctx = &mut state.ctx;
                        ctx.camera.controller.update_camera(&mut ctx.camera.camera);
                        ctx.write_camera();
                        flow.on_update(&state.ctx, dt);
                    }
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Opens the viewport and runs the flow built by `constructor` until the
/// window closes.
pub fn run(settings: TableauConfig, constructor: FlowConstructor) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    log::info!("starting the {:?} tableau", settings.variant);
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, settings, constructor)?;

    event_loop.run_app(&mut app)?;

    match app.setup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
