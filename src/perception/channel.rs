//! The handoff between the perception thread and the simulation loop.
//!
//! Two single-slot cells, never queues: only the newest frame matters and at
//! most one jump can be pending. The writer replaces, the reader copies out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::perception::frame::Frame;

/// Latest-frame slot plus an edge-triggered jump latch.
///
/// One writer (the perception worker), one reader (the simulation loop).
/// Frames are published as `Arc<Frame>` so the slot lock only ever covers a
/// pointer swap or clone; a reader can never observe a half-written frame.
#[derive(Debug, Default)]
pub struct SharedChannel {
    jump: AtomicBool,
    frame: Mutex<Option<Arc<Frame>>>,
}

impl SharedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the jump latch. Raising an already raised latch is a no-op, so
    /// there is never more than one unconsumed jump.
    pub fn raise_jump(&self) {
        self.jump.store(true, Ordering::Release);
    }

    /// Whether a jump is waiting, without consuming it.
    pub fn jump_pending(&self) -> bool {
        self.jump.load(Ordering::Acquire)
    }

    /// Consume the latch. Returns true at most once per raise.
    pub fn take_jump(&self) -> bool {
        self.jump.swap(false, Ordering::AcqRel)
    }

    /// Replace the published frame wholesale.
    pub fn publish_frame(&self, frame: Frame) {
        let frame = Arc::new(frame);
        *self.frame.lock() = Some(frame);
    }

    /// The newest frame, if any. Never waits: if the writer happens to hold
    /// the slot right now this returns `None` and the caller keeps what it
    /// already has.
    pub fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.frame.try_lock().and_then(|slot| (*slot).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use std::thread;

    #[test]
    fn test_jump_latch_edge_triggered() {
        let channel = SharedChannel::new();
        assert!(!channel.take_jump());

        channel.raise_jump();
        channel.raise_jump();
        assert!(channel.jump_pending());
        assert!(channel.take_jump());
        assert!(!channel.take_jump());
        assert!(!channel.jump_pending());
    }

    #[test]
    fn test_frame_slot_overwrites() {
        let channel = SharedChannel::new();
        assert!(channel.latest_frame().is_none());

        channel.publish_frame(Frame::new(2, 2, Rgb(1, 1, 1)));
        channel.publish_frame(Frame::new(3, 3, Rgb(2, 2, 2)));

        let frame = channel.latest_frame().unwrap();
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.get(0, 0), Rgb(2, 2, 2));

        // Reading does not drain the slot.
        assert!(channel.latest_frame().is_some());
    }

    #[test]
    fn test_reader_never_sees_mixed_frame() {
        let channel = Arc::new(SharedChannel::new());
        let writer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                for i in 0..500u32 {
                    let shade = (i % 250) as u8;
                    channel.publish_frame(Frame::new(16, 16, Rgb(shade, shade, shade)));
                }
            })
        };

        for _ in 0..2000 {
            if let Some(frame) = channel.latest_frame() {
                let first = frame.get(0, 0);
                assert!(frame.pixels().all(|(_, _, c)| c == first));
            }
        }
        writer.join().unwrap();
    }
}
