//! Side Scroller: main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All simulation
//! runs inside `RedrawRequested` using a **fixed-timestep** model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- drain queued key events, run one game tick
//!      against a `FrameBuilder` canvas
//!   3. Upload the mesh produced by the last tick
//!   4. Upload camera uniform, issue draw calls, composite egui overlay
//!
//! Keyboard events are queued as they arrive and only consumed by a tick, so
//! a key press on a frame that runs zero ticks is carried to the next one.
//!
//! Hot reload: the config JSON is watched via mtime polling. New physics values
//! are handed to the world and take effect at its next reset.

mod assets;
mod collision;
mod config;
mod entities;
mod frame;
mod game_loop;
mod level;
mod player;
#[cfg(test)]
mod replay;
#[cfg(test)]
mod test_support;
mod world;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::{load_config_from_path, load_config_or_default, FileWatcher, GameConfig};
use frame::{count_texture_binds, DrawCall, FrameBuilder, SOLID_FILL};
use game_loop::tick;
use ssp_core::input::{InputQueue, Key, KeyEvent};
use ssp_core::time::TimeState;
use ssp_devtools::{DebugOverlay, OverlayStats};
use ssp_platform::window::PlatformConfig;
use ssp_render::{CanvasCamera, GpuContext, SpritePipeline, SpriteVertex, Texture};
use world::World;

const CONFIG_PATH: &str = "assets/config/game.json";
const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

struct GpuImage {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable engine state lives here. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputQueue,
    camera: CanvasCamera,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,

    config_path: PathBuf,
    config_watcher: FileWatcher,
    config: GameConfig,
    world: World,
    missing_images: usize,
    won: bool,
    paused: bool,
    single_step_requested: bool,
    reset_requested: bool,
    textures: HashMap<Arc<str>, GpuImage>,
    texture_keys: HashSet<Arc<str>>,

    // The mesh is rebuilt on the CPU by every tick, then streamed into these
    // GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    quad_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: GameConfig, config_path: PathBuf) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let time = TimeState::new(config.physics.tick_rate_hz);
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        // Every image is decoded before the level reads its size.
        let assets_dir = PathBuf::from(&config.assets_dir);
        let library = assets::load_game_images(&assets_dir);
        let missing_images = library.missing_count();
        if missing_images > 0 {
            log::warn!(
                "{} of {} images missing under '{}'",
                missing_images,
                assets::IMAGE_NAMES.len(),
                assets_dir.display()
            );
        }

        let mut textures = HashMap::new();
        for decoded in &library.decoded {
            let texture = Texture::from_image(
                &gpu.device,
                &gpu.queue,
                &decoded.pixels,
                decoded.handle.key(),
            );
            let bind_group = sprite_pipeline.create_texture_bind_group(&gpu.device, &texture);
            textures.insert(
                decoded.handle.shared_key(),
                GpuImage {
                    texture,
                    bind_group,
                },
            );
        }
        let solid = Texture::from_rgba8(&gpu.device, &gpu.queue, &[255; 4], 1, 1, SOLID_FILL);
        let solid_bind_group = sprite_pipeline.create_texture_bind_group(&gpu.device, &solid);
        textures.insert(
            Arc::from(SOLID_FILL),
            GpuImage {
                texture: solid,
                bind_group: solid_bind_group,
            },
        );
        let texture_keys: HashSet<Arc<str>> = textures.keys().cloned().collect();

        let world = World::new(library.images, config.physics);

        let camera = CanvasCamera::new(config.canvas.width, config.canvas.height);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time,
            input: InputQueue::new(),
            camera,
            sprite_pipeline,
            debug_overlay,
            config_watcher: FileWatcher::new(config_path.clone()),
            config_path,
            config,
            world,
            missing_images,
            won: false,
            paused: false,
            single_step_requested: false,
            reset_requested: false,
            textures,
            texture_keys,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
            quad_count: 0,
        };
        state.ensure_mesh_capacity(4, 6);
        Ok(state)
    }

    fn reload_config(&mut self) {
        match load_config_from_path(&self.config_path) {
            Ok(config) => {
                log::info!(
                    "Reloaded config '{}'; physics apply on next reset",
                    self.config_path.display()
                );
                if config.physics.tick_rate_hz != self.config.physics.tick_rate_hz {
                    log::warn!("tick_rate_hz changes take effect after a restart");
                }
                self.world.set_physics(config.physics);
                self.config = config;
            }
            Err(err) => {
                log::warn!("{err}. Keeping previous config.");
            }
        }
    }

    fn reset_world(&mut self, reason: &str) {
        self.world.init();
        self.won = false;
        log::info!("World reset ({reason})");
    }

    /// One fixed step: deliver queued input, tick the world and keep the
    /// mesh it drew.
    fn step(&mut self) {
        for event in self.input.drain() {
            self.world.handle_key(event);
        }

        let canvas_size = Vec2::new(self.config.canvas.width, self.config.canvas.height);
        let mut frame = FrameBuilder::new(canvas_size, &self.texture_keys);
        let report = tick(&mut self.world, &mut frame);
        let mesh = frame.finish();

        if report.reset {
            self.won = false;
        } else if report.won && !self.won {
            self.won = true;
            log::info!("You win! Scroll offset {:.0}", self.world.scroll_offset);
        }

        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        self.quad_count = mesh.quad_count();
        if !mesh.vertices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&mesh.vertices),
            );
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.draw_calls = mesh.draw_calls;
    }

    fn estimate_memory_mb(&self) -> f32 {
        let mut bytes: usize = 0;
        for image in self.textures.values() {
            let (w, h) = image.texture.size;
            bytes += (w as usize) * (h as usize) * 4;
        }
        bytes += self.mesh_vertex_capacity * std::mem::size_of::<SpriteVertex>();
        bytes += self.mesh_index_capacity * std::mem::size_of::<u32>();
        bytes as f32 / (1024.0 * 1024.0)
    }

    fn overlay_stats(&self) -> OverlayStats {
        let player = &self.world.player;
        OverlayStats {
            draw_calls: self.draw_calls.len() as u32,
            texture_binds: count_texture_binds(&self.draw_calls) as u32,
            quad_count: self.quad_count as u32,
            memory_estimate_mb: self.estimate_memory_mb(),
            scroll_offset: self.world.scroll_offset,
            win_threshold: self.world.win_threshold(),
            player_position: player.position.to_array(),
            player_velocity: player.velocity.to_array(),
            animation_label: player.animation.label().to_string(),
            animation_frame: player.frames,
            platform_count: self.world.platforms.len() as u32,
            missing_images: self.missing_images as u32,
            resets: self.world.resets,
            won: self.won,
            paused: self.paused,
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn render(&mut self) {
        let camera_uniform = self.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let (egui_primitives, egui_textures_delta, overlay_actions) =
            self.debug_overlay
                .prepare(&self.window, &self.time, Some(stats));

        if overlay_actions.toggle_pause {
            self.toggle_pause();
        }
        if overlay_actions.single_step {
            self.single_step_requested = true;
        }
        if overlay_actions.reset_world {
            self.reset_requested = true;
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut last_bound_texture_key: Option<&Arc<str>> = None;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.draw_calls {
                if let Some(image) = self.textures.get(&draw.texture_key) {
                    let need_rebind = match last_bound_texture_key {
                        Some(last) => **last != *draw.texture_key,
                        None => true,
                    };
                    if need_rebind {
                        render_pass.set_bind_group(1, &image.bind_group, &[]);
                        last_bound_texture_key = Some(&draw.texture_key);
                    }
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// While paused no tick consumes the queue. Held keys still follow the
    /// keyboard so resuming sees the real key state; jump presses are dropped.
    fn track_paused_input(&mut self) {
        for event in self.input.drain() {
            self.world.track_key(event);
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!(
            "Simulation {}",
            if self.paused { "PAUSED" } else { "RESUMED" }
        );
    }
}

struct App {
    config_path: PathBuf,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config_path: PathBuf::from(CONFIG_PATH),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let config = load_config_or_default(&self.config_path);
        let platform_config = PlatformConfig {
            title: config.window.title.clone(),
            width: config.window.width,
            height: config.window.height,
            ..PlatformConfig::default()
        };
        let window = match ssp_platform::window::create_window(event_loop, &platform_config) {
            Ok(window) => window,
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            platform_config.width,
            platform_config.height
        );
        match EngineState::new(window, config, self.config_path.clone()) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return;
                };
                if let Some(key) = map_key(key_code) {
                    // Auto-repeat presses are forwarded like any other key-down.
                    let key_event = match event.state {
                        ElementState::Pressed => KeyEvent::down(key),
                        ElementState::Released => KeyEvent::up(key),
                    };
                    log::trace!(
                        "Queued key {} {:?}",
                        key.key_code(),
                        key_event.action
                    );
                    state.input.push(key_event);
                } else if event.state == ElementState::Pressed && !event.repeat {
                    match key_code {
                        KeyCode::Escape => {
                            log::info!("Escape pressed, exiting.");
                            event_loop.exit();
                        }
                        KeyCode::F3 => state.debug_overlay.toggle(),
                        KeyCode::KeyR => state.reset_requested = true,
                        KeyCode::KeyP => state.toggle_pause(),
                        _ => {}
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.time.begin_frame();

                // Frame boundary is the safe point for reloads and resets.
                if state.config_watcher.should_reload() {
                    state.reload_config();
                }
                if state.reset_requested {
                    state.reset_requested = false;
                    state.reset_world("manual");
                }

                while state.time.should_step() {
                    if state.paused && !state.single_step_requested {
                        continue;
                    }
                    state.single_step_requested = false;
                    state.step();
                }
                if state.paused && !state.single_step_requested {
                    state.track_paused_input();
                }

                state.render();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Canvas Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Canvas Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Game keys only; developer keys are handled directly in `window_event`.
fn map_key(key_code: KeyCode) -> Option<Key> {
    dom_key_code(key_code).and_then(Key::from_key_code)
}

/// Legacy DOM `keyCode` for the letter keys the game listens to.
fn dom_key_code(key_code: KeyCode) -> Option<u32> {
    match key_code {
        KeyCode::KeyA => Some(65),
        KeyCode::KeyD => Some(68),
        KeyCode::KeyW => Some(87),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Side Scroller starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        std::process::exit(1);
    }
}
