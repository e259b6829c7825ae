use glam::Vec3;
use crate::api::types::EventRecord;

pub use crate::core::queue::EventQueue;

/// Things a weaving session reports to its host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeavingEvent {
    BlockColored { x: i32, y: i32 },
    WeavingStarted,
    WeavingCompleted,
    CanvasReset,
    /// The thread tip reached a block.
    ThreadMoved(Vec3),
}

impl WeavingEvent {
    /// Numeric kind used in [`EventRecord`].
    pub fn kind(&self) -> u32 {
        match self {
            WeavingEvent::BlockColored { .. } => 1,
            WeavingEvent::WeavingStarted => 2,
            WeavingEvent::WeavingCompleted => 3,
            WeavingEvent::CanvasReset => 4,
            WeavingEvent::ThreadMoved(_) => 5,
        }
    }

    pub fn to_record(&self) -> EventRecord {
        let kind = self.kind() as f32;
        match *self {
            WeavingEvent::BlockColored { x, y } => EventRecord {
                kind,
                a: x as f32,
                b: y as f32,
                c: 0.0,
            },
            WeavingEvent::ThreadMoved(p) => EventRecord {
                kind,
                a: p.x,
                b: p.y,
                c: p.z,
            },
            _ => EventRecord {
                kind,
                ..Default::default()
            },
        }
    }
}

pub type WeavingEvents = EventQueue<WeavingEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_carry_payload() {
        let r = WeavingEvent::BlockColored { x: 3, y: 7 }.to_record();
        assert_eq!((r.kind, r.a, r.b), (1.0, 3.0, 7.0));

        let r = WeavingEvent::ThreadMoved(Vec3::new(0.5, -1.0, 0.02)).to_record();
        assert_eq!((r.kind, r.a, r.b, r.c), (5.0, 0.5, -1.0, 0.02));

        assert_eq!(WeavingEvent::CanvasReset.to_record().a, 0.0);
    }

    #[test]
    fn queue_drains_in_order() {
        let mut q = WeavingEvents::new();
        q.push(WeavingEvent::WeavingStarted);
        q.push(WeavingEvent::WeavingCompleted);
        assert_eq!(
            q.drain(),
            vec![WeavingEvent::WeavingStarted, WeavingEvent::WeavingCompleted]
        );
    }
}
