use glam::Vec3;
use weave_engine::{
    ConfigError, EventRecord, FixedTimestep, Rgba, ThreadState, TubeVertex, WeavingConfig,
    WeavingLayer, WeavingSession,
};
#[cfg(feature = "vectors")]
use weave_engine::{StrokeVertex, ThreadStroke};

/// Fixed simulation step of the session.
pub const SIM_DT: f32 = 1.0 / 60.0;

/// Owns a weaving session and the flat buffers the browser reads each frame.
///
/// wasm-bindgen cannot export this directly with its borrowing accessors, so
/// the crate root keeps one in a `thread_local!` and exposes free functions.
pub struct WeaveRunner {
    session: WeavingSession,
    layers: Vec<WeavingLayer>,
    timestep: FixedTimestep,
    tube_vertices: Vec<TubeVertex>,
    tube_indices: Vec<u32>,
    centerline: Vec<f32>,
    canvas_colors: Vec<f32>,
    events: Vec<EventRecord>,
    #[cfg(feature = "vectors")]
    stroke: ThreadStroke,
}

impl WeaveRunner {
    pub fn new(config: WeavingConfig) -> Result<Self, ConfigError> {
        let session = WeavingSession::new(config)?;
        let mut runner = Self {
            session,
            layers: Vec::new(),
            timestep: FixedTimestep::new(SIM_DT),
            tube_vertices: Vec::new(),
            tube_indices: Vec::new(),
            centerline: Vec::new(),
            canvas_colors: Vec::new(),
            events: Vec::with_capacity(64),
            #[cfg(feature = "vectors")]
            stroke: ThreadStroke::new(),
        };
        runner.refresh_buffers();
        Ok(runner)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(WeavingConfig::from_json(json)?)
    }

    pub fn session(&self) -> &WeavingSession {
        &self.session
    }

    /// Register a layer; returns its index for `request_weave`.
    pub fn add_layer(&mut self, layer: WeavingLayer) -> u32 {
        log::info!("layer {} registered: {:?}", self.layers.len(), layer.name);
        self.layers.push(layer);
        (self.layers.len() - 1) as u32
    }

    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    pub fn request_weave(&mut self, index: u32) -> bool {
        match self.layers.get(index as usize) {
            Some(layer) => self.session.request_weave(layer),
            None => {
                log::warn!("no layer at index {}", index);
                false
            }
        }
    }

    pub fn request_reset(&mut self) -> bool {
        let accepted = self.session.request_reset();
        self.refresh_buffers();
        accepted
    }

    pub fn on_config_changed(&mut self, json: &str) -> Result<(), ConfigError> {
        let config = WeavingConfig::from_json(json)?;
        self.session.on_config_changed(config)?;
        self.refresh_buffers();
        Ok(())
    }

    /// Run one frame: step the session on the fixed timestep, then repack buffers.
    pub fn tick(&mut self, dt: f32) {
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.session.tick(self.timestep.dt());
        }

        self.events.clear();
        self.events
            .extend(self.session.drain_events().iter().map(|e| e.to_record()));
        self.refresh_buffers();
    }

    fn refresh_buffers(&mut self) {
        let thread = self.session.thread();

        self.tube_vertices.clear();
        self.tube_indices.clear();
        if let Some(mesh) = thread.mesh() {
            self.tube_vertices = mesh.interleaved();
            self.tube_indices.extend_from_slice(&mesh.indices);
        }

        let line: &[Vec3] = thread.centerline();
        self.centerline.clear();
        for p in line {
            self.centerline.extend_from_slice(&p.to_array());
        }

        #[cfg(feature = "vectors")]
        self.stroke.rebuild(
            line,
            thread.stroke_width(self.session.config().thread_width),
            thread.color(),
        );

        self.session.canvas().write_colors(&mut self.canvas_colors);
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn tube_vertices_ptr(&self) -> *const f32 {
        self.tube_vertices.as_ptr() as *const f32
    }

    pub fn tube_vertex_count(&self) -> u32 {
        self.tube_vertices.len() as u32
    }

    pub fn tube_indices_ptr(&self) -> *const u32 {
        self.tube_indices.as_ptr()
    }

    pub fn tube_index_count(&self) -> u32 {
        self.tube_indices.len() as u32
    }

    pub fn tube_vertex_floats(&self) -> u32 {
        TubeVertex::FLOATS as u32
    }

    pub fn centerline(&self) -> &[f32] {
        &self.centerline
    }

    pub fn centerline_point_count(&self) -> u32 {
        (self.centerline.len() / 3) as u32
    }

    pub fn canvas_colors_ptr(&self) -> *const f32 {
        self.canvas_colors.as_ptr()
    }

    pub fn canvas_colors(&self) -> &[f32] {
        &self.canvas_colors
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn grid_size(&self) -> u32 {
        self.session.canvas().grid_size()
    }

    pub fn block_size(&self) -> f32 {
        self.session.canvas().block_size()
    }

    pub fn is_weaving(&self) -> bool {
        self.session.is_weaving()
    }

    /// 0 = idle, 1 = attached, 2 = moving.
    pub fn thread_state(&self) -> u32 {
        match self.session.thread().state() {
            ThreadState::Idle => 0,
            ThreadState::Attached => 1,
            ThreadState::Moving => 2,
        }
    }

    pub fn thread_color(&self) -> Rgba {
        self.session.thread().color()
    }

    #[cfg(feature = "vectors")]
    pub fn stroke_vertices_ptr(&self) -> *const f32 {
        self.stroke.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn stroke_vertex_count(&self) -> u32 {
        self.stroke.vertex_count() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn stroke_vertex_floats(&self) -> u32 {
        StrokeVertex::FLOATS as u32
    }
}
