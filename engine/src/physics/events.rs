//! Contact events produced by stepping the world

use crate::physics::components::BodyHandle;
use crate::physics::filter::FilterMasks;
use glam::Vec2;
use tracing::{info, trace};

/// A contact-reportable overlap between two bodies during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Masks of body A at the time of contact
    pub masks_a: FilterMasks,
    /// Masks of body B at the time of contact
    pub masks_b: FilterMasks,
    /// World space contact point
    pub point: Vec2,
    /// Normal pointing from A to B
    pub normal: Vec2,
    /// First step this pair has been in contact
    pub began: bool,
}

impl ContactEvent {
    /// Whether the event involves `handle`
    pub fn involves(&self, handle: BodyHandle) -> bool {
        self.body_a == handle || self.body_b == handle
    }

    /// The other body of the pair, if `handle` is one of them
    pub fn other(&self, handle: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == handle {
            Some(self.body_b)
        } else if self.body_b == handle {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Consumer of contact events, e.g. logging or telemetry
pub trait ContactSink {
    fn record(&mut self, event: &ContactEvent);

    fn record_all(&mut self, events: &[ContactEvent]) {
        for event in events {
            self.record(event);
        }
    }
}

impl ContactSink for Vec<ContactEvent> {
    fn record(&mut self, event: &ContactEvent) {
        self.push(*event);
    }
}

/// Logs every new contact with the three masks of both bodies
#[derive(Debug, Default)]
pub struct TracingContactSink {
    /// Contacts seen so far, including persisting ones
    pub recorded: u64,
}

impl ContactSink for TracingContactSink {
    fn record(&mut self, event: &ContactEvent) {
        self.recorded += 1;
        if event.began {
            info!(
                body_a = event.body_a.index(),
                body_b = event.body_b.index(),
                collision_a = event.masks_a.collision,
                collision_b = event.masks_b.collision,
                category_a = event.masks_a.category,
                category_b = event.masks_b.category,
                contact_a = event.masks_a.contact,
                contact_b = event.masks_b.contact,
                "Contact began"
            );
        } else {
            trace!(
                body_a = event.body_a.index(),
                body_b = event.body_b.index(),
                "Contact persisted"
            );
        }
    }
}
