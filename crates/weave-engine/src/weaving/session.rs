//! Weaving session: walks the thread tip over a layer's visible cells,
//! painting each block once the tip reaches it.
//!
//! The host owns the loop: it calls [`WeavingSession::tick`] once per frame
//! and drains events afterward. Weave and reset requests are refused while a
//! weave is running.

use super::canvas::WeavingCanvas;
use super::events::{WeavingEvent, WeavingEvents};
use super::layer::WeavingLayer;
use super::path::{PathGenerator, SelectivePath};
use crate::api::config::WeavingConfig;
use crate::api::types::GridPos;
use crate::error::ConfigError;
use crate::thread::controller::{MotionStatus, ThreadMotionController};
use crate::thread::model::ChainRope;

/// A weave in progress.
#[derive(Debug, Clone)]
struct WeaveJob {
    layer: WeavingLayer,
    path: Vec<GridPos>,
    /// Index of the cell the tip is heading to.
    cursor: usize,
}

pub struct WeavingSession {
    config: WeavingConfig,
    canvas: WeavingCanvas,
    thread: ThreadMotionController<ChainRope>,
    job: Option<WeaveJob>,
    /// Canvas geometry changed mid-weave; rebuild once it ends.
    canvas_stale: bool,
    events: WeavingEvents,
}

impl WeavingSession {
    pub fn new(config: WeavingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rope = ChainRope::new(&config.thread)?;
        let thread = ThreadMotionController::new(rope)
            .with_swing(config.swing)
            .with_anchor_right(config.anchor_right);

        log::info!(
            "weaving session: {}x{} grid, block {}, {} rope nodes",
            config.grid_size,
            config.grid_size,
            config.block_size,
            config.thread.node_count
        );

        Ok(Self {
            canvas: WeavingCanvas::new(&config),
            config,
            thread,
            job: None,
            canvas_stale: false,
            events: WeavingEvents::new(),
        })
    }

    pub fn config(&self) -> &WeavingConfig {
        &self.config
    }

    pub fn canvas(&self) -> &WeavingCanvas {
        &self.canvas
    }

    pub fn thread(&self) -> &ThreadMotionController<ChainRope> {
        &self.thread
    }

    pub fn is_weaving(&self) -> bool {
        self.job.is_some()
    }

    /// (cells reached, cells on the path) for the running weave.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.job.as_ref().map(|j| (j.cursor, j.path.len()))
    }

    pub fn events(&self) -> &WeavingEvents {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WeavingEvent> {
        self.events.drain()
    }

    /// Start weaving `layer`. Returns false if a weave is already running.
    pub fn request_weave(&mut self, layer: &WeavingLayer) -> bool {
        if self.is_weaving() {
            log::debug!("weave of {:?} ignored: already weaving", layer.name);
            return false;
        }

        let path = SelectivePath::new(layer, self.config.alpha_threshold)
            .generate(self.config.grid_size);
        log::info!("weaving layer {:?}: {} cells", layer.name, path.len());

        self.thread.attach(self.config.spool_anchor, layer.thread_color);
        self.events.push(WeavingEvent::WeavingStarted);
        self.job = Some(WeaveJob {
            layer: layer.clone(),
            path,
            cursor: 0,
        });
        self.dispatch_next();
        true
    }

    /// Clear the canvas. Returns false if a weave is running.
    pub fn request_reset(&mut self) -> bool {
        if self.is_weaving() {
            log::debug!("reset ignored: weaving in progress");
            return false;
        }
        self.canvas.reset(&mut self.events);
        true
    }

    /// Advance the thread by `dt` seconds and paint any block reached.
    pub fn tick(&mut self, dt: f32) {
        let status = self.thread.tick(dt);
        let MotionStatus::Arrived(tip) = status else {
            return;
        };
        self.events.push(WeavingEvent::ThreadMoved(tip));

        let Some(job) = self.job.as_mut() else {
            return;
        };
        let cell = job.path[job.cursor];
        let sprite_y = self.config.grid_size as i32 - 1 - cell.y;
        if job
            .layer
            .is_pixel_visible(cell.x, sprite_y, self.config.alpha_threshold)
        {
            let color = job.layer.pixel(cell.x, sprite_y);
            self.canvas.color_block(cell.x, cell.y, color, &mut self.events);
        }
        job.cursor += 1;
        self.dispatch_next();
    }

    /// Send the tip to the next reachable cell, or finish the weave.
    fn dispatch_next(&mut self) {
        let Some(job) = self.job.as_mut() else {
            return;
        };

        while job.cursor < job.path.len() {
            let cell = job.path[job.cursor];
            if let Some(block) = self.canvas.block_world_position(cell.x, cell.y) {
                let target = block + self.config.tip_lift;
                match self.thread.move_tip_to(target, self.config.thread_speed) {
                    Ok(()) => return,
                    Err(e) => {
                        log::error!("aborting weave: {}", e);
                        break;
                    }
                }
            }
            job.cursor += 1;
        }

        self.finish();
    }

    fn finish(&mut self) {
        self.thread.detach();
        if let Some(job) = self.job.take() {
            log::info!("finished weaving {:?}", job.layer.name);
        }
        self.events.push(WeavingEvent::WeavingCompleted);

        if self.canvas_stale {
            self.canvas = WeavingCanvas::new(&self.config);
            self.canvas_stale = false;
        }
    }

    /// Adopt a new configuration. Thread tunables apply immediately (node
    /// count on the next weave); a new canvas geometry waits for the running
    /// weave to end and starts from a blank canvas.
    pub fn on_config_changed(&mut self, config: WeavingConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.thread.rope_mut().apply_config(&config.thread)?;
        self.thread.set_swing(config.swing);
        self.thread.set_anchor_right(config.anchor_right);

        let geometry_changed = config.grid_size != self.config.grid_size
            || config.block_size != self.config.block_size
            || config.default_block_color != self.config.default_block_color;
        self.config = config;

        if geometry_changed {
            if self.is_weaving() {
                self.canvas_stale = true;
            } else {
                self.canvas = WeavingCanvas::new(&self.config);
            }
        }
        Ok(())
    }
}
