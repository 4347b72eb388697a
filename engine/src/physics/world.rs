//! Physics world owning every body and joint
//!
//! A step runs in a fixed order: gravity, spring joints, restoring
//! controllers, integration, then the pairwise collision pass. The order
//! is part of the world's determinism and must not be rearranged.

use crate::physics::collision::broad_phase::{brute_force_pairs, BroadPhaseEntry};
use crate::physics::collision::narrow_phase::test_collision;
use crate::physics::collision::Manifold;
use crate::physics::components::{Body, BodyDesc, BodyHandle};
use crate::physics::error::PhysicsError;
use crate::physics::events::ContactEvent;
use crate::physics::filter::PairFilter;
use crate::physics::joint::{JointHandle, SpringJoint, SpringJointDesc};
use crate::physics::restoring::RestoringController;
use glam::Vec2;
use std::collections::HashSet;
use tracing::{debug, info, trace};

/// Tuning parameters for the solver
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity acceleration
    pub gravity: Vec2,
    /// Fraction of penetration removed per step
    pub position_correction: f32,
    /// Penetration tolerated without correction
    pub penetration_slop: f32,
    /// Closing speeds below this do not bounce
    pub restitution_threshold: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
            position_correction: 0.8,
            penetration_slop: 0.01,
            restitution_threshold: 0.5,
        }
    }
}

/// Outcome of a single `step`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Duration simulated by the step
    pub dt: f32,
    /// Contact events in pair order
    pub contacts: Vec<ContactEvent>,
    /// Number of unordered body pairs examined by the broad phase
    pub pairs_tested: usize,
    /// Number of pairs that were physically separated
    pub collisions_resolved: usize,
}

/// Physics world resource containing bodies, joints and controllers
#[derive(Debug)]
pub struct PhysicsWorld {
    /// Solver tuning
    pub config: PhysicsConfig,

    /// Bodies in creation order; removed bodies leave an empty slot
    bodies: Vec<Option<Body>>,

    /// Joints in creation order; removed joints leave an empty slot
    joints: Vec<Option<SpringJoint>>,

    /// Bodies enrolled in self-leveling, in enrollment order
    controllers: Vec<(BodyHandle, RestoringController)>,

    /// Contact-reporting pairs that overlapped during the last step
    active_contacts: HashSet<(BodyHandle, BodyHandle)>,

    /// Total simulated time
    elapsed_time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world with the given settings
    pub fn new(config: PhysicsConfig) -> Self {
        info!(gravity = ?config.gravity, "Initializing physics world");

        Self {
            config,
            bodies: Vec::new(),
            joints: Vec::new(),
            controllers: Vec::new(),
            active_contacts: HashSet::new(),
            elapsed_time: 0.0,
        }
    }

    /// Set the gravity vector for the simulation
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
        debug!("Physics gravity set to: {:?}", gravity);
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Simulated seconds since the world was created
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    /// Insert a body; it takes part in simulation from the next step
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        let body = desc.build();
        debug!(
            handle = handle.index(),
            position = ?body.position,
            shape = ?body.shape,
            dynamic = body.is_dynamic,
            "Added body"
        );
        self.bodies.push(Some(body));
        handle
    }

    /// Insert a spring joint between two live bodies
    pub fn add_joint(&mut self, desc: SpringJointDesc) -> Result<JointHandle, PhysicsError> {
        desc.validate()?;
        let body_a = self.body(desc.body_a)?;
        let body_b = self.body(desc.body_b)?;
        let joint = SpringJoint::new(&desc, body_a, body_b);

        let handle = JointHandle(self.joints.len() as u32);
        debug!(
            joint = ?handle,
            body_a = desc.body_a.index(),
            body_b = desc.body_b.index(),
            frequency = desc.frequency,
            damping = desc.damping,
            "Added spring joint"
        );
        self.joints.push(Some(joint));
        Ok(handle)
    }

    /// Enroll a body in self-leveling, replacing any previous controller
    pub fn enroll_restoring(
        &mut self,
        handle: BodyHandle,
        controller: RestoringController,
    ) -> Result<(), PhysicsError> {
        self.body(handle)?;
        match self.controllers.iter_mut().find(|(h, _)| *h == handle) {
            Some((_, existing)) => *existing = controller,
            None => self.controllers.push((handle, controller)),
        }
        debug!(handle = handle.index(), ?controller, "Enrolled restoring controller");
        Ok(())
    }

    /// Stop self-leveling a body; returns whether it was enrolled
    pub fn unenroll_restoring(&mut self, handle: BodyHandle) -> bool {
        let before = self.controllers.len();
        self.controllers.retain(|(h, _)| *h != handle);
        before != self.controllers.len()
    }

    /// Remove a body together with every joint and controller attached to it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body, PhysicsError> {
        let body = self
            .bodies
            .get_mut(handle.index())
            .and_then(Option::take)
            .ok_or(PhysicsError::InvalidBody(handle))?;

        for slot in self.joints.iter_mut() {
            if slot
                .as_ref()
                .is_some_and(|joint| joint.body_a == handle || joint.body_b == handle)
            {
                *slot = None;
            }
        }
        self.controllers.retain(|(h, _)| *h != handle);
        self.active_contacts
            .retain(|(a, b)| *a != handle && *b != handle);

        debug!(handle = handle.index(), "Removed body");
        Ok(body)
    }

    /// Remove a single joint
    pub fn remove_joint(&mut self, handle: JointHandle) -> Result<SpringJoint, PhysicsError> {
        self.joints
            .get_mut(handle.0 as usize)
            .and_then(Option::take)
            .ok_or(PhysicsError::InvalidJoint(handle))
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        self.bodies
            .get(handle.index())
            .and_then(Option::as_ref)
            .ok_or(PhysicsError::InvalidBody(handle))
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, PhysicsError> {
        self.bodies
            .get_mut(handle.index())
            .and_then(Option::as_mut)
            .ok_or(PhysicsError::InvalidBody(handle))
    }

    pub fn joint(&self, handle: JointHandle) -> Result<&SpringJoint, PhysicsError> {
        self.joints
            .get(handle.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(PhysicsError::InvalidJoint(handle))
    }

    pub fn contains_body(&self, handle: BodyHandle) -> bool {
        self.body(handle).is_ok()
    }

    /// Live bodies in creation order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|body| (BodyHandle(index as u32), body)))
    }

    /// Live joints in creation order
    pub fn joints(&self) -> impl Iterator<Item = (JointHandle, &SpringJoint)> {
        self.joints
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|joint| (JointHandle(index as u32), joint)))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.iter().flatten().count()
    }

    /// Apply an impulse at a world-space point of a body
    pub fn apply_impulse(
        &mut self,
        handle: BodyHandle,
        impulse: Vec2,
        point: Vec2,
    ) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.apply_impulse_at(impulse, point);
        Ok(())
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// A zero `dt` changes nothing and reports no contacts.
    pub fn step(&mut self, dt: f32) -> Result<StepReport, PhysicsError> {
        if dt.is_nan() || dt < 0.0 {
            return Err(PhysicsError::NegativeTimestep { dt });
        }
        if !dt.is_finite() {
            return Err(PhysicsError::NonFiniteTimestep { dt });
        }
        if dt == 0.0 {
            return Ok(StepReport::default());
        }

        // Nothing is mutated until every reference is known to be live
        self.validate_references()?;

        self.apply_gravity(dt);
        self.solve_joints(dt);
        self.apply_restoring(dt);
        self.integrate(dt);
        let mut report = self.detect_and_resolve_collisions();

        self.elapsed_time += dt;
        report.dt = dt;

        debug!(
            dt,
            elapsed = self.elapsed_time,
            pairs_tested = report.pairs_tested,
            resolved = report.collisions_resolved,
            contacts = report.contacts.len(),
            "Physics step"
        );

        Ok(report)
    }

    fn validate_references(&self) -> Result<(), PhysicsError> {
        for (handle, joint) in self.joints() {
            for body in [joint.body_a, joint.body_b] {
                if !self.contains_body(body) {
                    return Err(PhysicsError::DanglingJoint {
                        joint: handle,
                        body,
                    });
                }
            }
        }
        for (handle, _) in &self.controllers {
            self.body(*handle)?;
        }
        Ok(())
    }

    fn apply_gravity(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut().flatten() {
            if body.is_dynamic && body.affected_by_gravity {
                body.linear_velocity += gravity * dt;
            }
        }
    }

    fn solve_joints(&mut self, dt: f32) {
        for joint in self.joints.iter().flatten() {
            if let Some((body_a, body_b)) =
                pair_mut(&mut self.bodies, joint.body_a.index(), joint.body_b.index())
            {
                joint.solve(body_a, body_b, dt);
            }
        }
    }

    fn apply_restoring(&mut self, dt: f32) {
        for (handle, controller) in &self.controllers {
            if let Some(body) = self.bodies.get_mut(handle.index()).and_then(Option::as_mut) {
                controller.apply(body, dt);
            }
        }
    }

    fn integrate(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().flatten() {
            if !body.is_dynamic {
                continue;
            }
            body.position += body.linear_velocity * dt;
            if body.allows_rotation {
                body.rotation += body.angular_velocity * dt;
            }
        }
    }

    fn detect_and_resolve_collisions(&mut self) -> StepReport {
        let entries: Vec<BroadPhaseEntry> = self
            .bodies()
            .map(|(handle, body)| BroadPhaseEntry {
                handle,
                aabb: body.shape.world_aabb(body.position, body.rotation),
            })
            .collect();

        let broad = brute_force_pairs(&entries);
        let mut report = StepReport {
            pairs_tested: broad.pairs_tested,
            ..Default::default()
        };
        let mut touching = HashSet::new();

        for (i, j) in broad.pairs {
            let handle_a = entries[i].handle;
            let handle_b = entries[j].handle;
            let Some((body_a, body_b)) =
                pair_mut(&mut self.bodies, handle_a.index(), handle_b.index())
            else {
                continue;
            };

            let filter = PairFilter::evaluate(&body_a.masks, &body_b.masks);
            if filter.is_ignored() {
                continue;
            }

            let Some(manifold) = test_collision(
                &body_a.shape,
                (body_a.position, body_a.rotation),
                &body_b.shape,
                (body_b.position, body_b.rotation),
            ) else {
                continue;
            };

            if filter.collide && resolve_contact(body_a, body_b, &manifold, &self.config) {
                report.collisions_resolved += 1;
                trace!(
                    body_a = handle_a.index(),
                    body_b = handle_b.index(),
                    penetration = manifold.penetration,
                    "Resolved collision"
                );
            }

            if filter.report {
                let key = (handle_a, handle_b);
                let began = !self.active_contacts.contains(&key);
                touching.insert(key);
                report.contacts.push(ContactEvent {
                    body_a: handle_a,
                    body_b: handle_b,
                    masks_a: body_a.masks,
                    masks_b: body_b.masks,
                    point: manifold.point,
                    normal: manifold.normal,
                    began,
                });
            }
        }

        self.active_contacts = touching;
        report
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Borrow two distinct bodies mutably
fn pair_mut(bodies: &mut [Option<Body>], a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
    if a == b || a >= bodies.len() || b >= bodies.len() {
        return None;
    }
    if a < b {
        let (low, high) = bodies.split_at_mut(b);
        let body_a = low[a].as_mut()?;
        let body_b = high[0].as_mut()?;
        Some((body_a, body_b))
    } else {
        let (low, high) = bodies.split_at_mut(a);
        let body_b = low[b].as_mut()?;
        let body_a = high[0].as_mut()?;
        Some((body_a, body_b))
    }
}

/// Separate two blocking bodies and apply the bounce and friction response
///
/// Returns false when neither body can move.
fn resolve_contact(a: &mut Body, b: &mut Body, manifold: &Manifold, config: &PhysicsConfig) -> bool {
    let inv_mass_a = a.inverse_mass();
    let inv_mass_b = b.inverse_mass();
    let total_inv_mass = inv_mass_a + inv_mass_b;
    if total_inv_mass <= 0.0 {
        return false;
    }

    let normal = manifold.normal;
    let point = manifold.point;

    // Position correction split by inverse mass
    let correction = (manifold.penetration - config.penetration_slop).max(0.0)
        * config.position_correction
        / total_inv_mass;
    a.position -= normal * correction * inv_mass_a;
    b.position += normal * correction * inv_mass_b;

    let relative_velocity = b.velocity_at(point) - a.velocity_at(point);
    let velocity_along_normal = relative_velocity.dot(normal);

    // Already separating
    if velocity_along_normal >= 0.0 {
        return true;
    }

    let restitution = if -velocity_along_normal < config.restitution_threshold {
        0.0
    } else {
        a.restitution.max(b.restitution)
    };

    let inv_inertia_a = a.inverse_inertia();
    let inv_inertia_b = b.inverse_inertia();
    let r_a = point - a.position;
    let r_b = point - b.position;

    let effective_mass = |direction: Vec2| {
        let arm_a = r_a.perp_dot(direction);
        let arm_b = r_b.perp_dot(direction);
        total_inv_mass + arm_a * arm_a * inv_inertia_a + arm_b * arm_b * inv_inertia_b
    };

    let normal_impulse = -(1.0 + restitution) * velocity_along_normal / effective_mass(normal);
    a.apply_impulse_at(-normal * normal_impulse, point);
    b.apply_impulse_at(normal * normal_impulse, point);

    // Coulomb friction along the sliding direction
    let relative_velocity = b.velocity_at(point) - a.velocity_at(point);
    let sliding = relative_velocity - normal * relative_velocity.dot(normal);
    if sliding.length_squared() > 1e-12 {
        let tangent = sliding.normalize();
        let friction = (a.friction * b.friction).sqrt();
        let max_friction = friction * normal_impulse;
        let tangent_impulse = (-relative_velocity.dot(tangent) / effective_mass(tangent))
            .clamp(-max_friction, max_friction);
        a.apply_impulse_at(-tangent * tangent_impulse, point);
        b.apply_impulse_at(tangent * tangent_impulse, point);
    }

    true
}
