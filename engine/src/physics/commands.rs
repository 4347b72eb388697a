//! Deferred world mutations
//!
//! Input handlers run outside the frame loop, so they never touch the
//! world directly. They push commands here and the frame driver applies
//! them before the next step.

use crate::physics::components::BodyHandle;
use glam::Vec2;
use std::sync::{Arc, RwLock};

/// World mutation to be applied at the start of the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCommand {
    /// Spawn a ball at a world position
    SpawnBall {
        /// Position in scene points
        position: Vec2,
    },

    /// Remove a body and every joint attached to it
    RemoveBody {
        /// Body to remove
        handle: BodyHandle,
    },
}

/// Thread-safe world command queue
pub type WorldCommandQueue = Arc<RwLock<Vec<WorldCommand>>>;

/// Create a new world command queue
pub fn create_command_queue() -> WorldCommandQueue {
    Arc::new(RwLock::new(Vec::new()))
}

/// Take every queued command, leaving the queue empty
///
/// A poisoned lock still holds valid commands, so they are recovered.
pub fn drain_commands(queue: &WorldCommandQueue) -> Vec<WorldCommand> {
    let mut commands = match queue.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    std::mem::take(&mut *commands)
}

/// Append a command to the queue
pub fn push_command(queue: &WorldCommandQueue, command: WorldCommand) {
    let mut commands = match queue.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    commands.push(command);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let queue = create_command_queue();
        push_command(&queue, WorldCommand::SpawnBall { position: Vec2::X });
        push_command(&queue, WorldCommand::SpawnBall { position: Vec2::Y });

        let drained = drain_commands(&queue);
        assert_eq!(
            drained,
            vec![
                WorldCommand::SpawnBall { position: Vec2::X },
                WorldCommand::SpawnBall { position: Vec2::Y },
            ]
        );
        assert!(drain_commands(&queue).is_empty());
    }

    #[test]
    fn test_queue_shared_across_threads() {
        let queue = create_command_queue();
        let producer = queue.clone();
        std::thread::spawn(move || {
            push_command(&producer, WorldCommand::SpawnBall { position: Vec2::ZERO });
        })
        .join()
        .unwrap();
        assert_eq!(drain_commands(&queue).len(), 1);
    }
}
