//! Per-actor attack sequencing.
//!
//! This module provides:
//! - Attack timing (windup, duration, cooldown, multi-instance spacing)
//! - The explicit attack phase state machine
//! - Token-guarded checkpoints before every side effect
//! - Out-of-band cancellation (knockback, target death, death)
//!
//! The sequencer never touches the world directly. Every checkpoint goes
//! through a [`StrikeContext`] that the owning actor builds for the step.

use grimhold_common::EntityId;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::Suspension;
use crate::status::adjusted_cooldown;
use crate::timed_damage::{ApplierStatus, TickOutcome, TimedDamageApplier};
use crate::token::{ActionToken, ActionTokenCounter};

// ============================================================================
// Attack Phases
// ============================================================================

/// Phase of an attack sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackPhase {
    /// No sequence owns the actor.
    #[default]
    Idle,
    /// Waiting out the windup.
    WindupPending,
    /// Checking preconditions after the windup.
    ValidatingRange,
    /// Delivering instance `index` of `count`.
    DeliveringDamage {
        /// Zero-based instance index
        index: u32,
        /// Configured instance count
        count: u32,
    },
    /// Waiting out the rest of the attack duration.
    Recovering,
    /// Waiting out the cooldown.
    OnCooldown,
}

impl AttackPhase {
    /// Whether the attack itself is in progress (windup through recovery).
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        matches!(
            self,
            Self::WindupPending
                | Self::ValidatingRange
                | Self::DeliveringDamage { .. }
                | Self::Recovering
        )
    }

    /// Whether the actor is cooling down.
    #[must_use]
    pub fn is_cooling_down(&self) -> bool {
        *self == Self::OnCooldown
    }
}

/// Why a checkpoint failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbortReason {
    /// The captured token was retired while the sequence was suspended.
    StaleToken,
    /// The attacker is no longer alive.
    AttackerDead,
    /// The target can no longer be located.
    TargetMissing,
    /// The target died or was disabled.
    TargetDead,
    /// The target left attack range.
    OutOfRange,
}

/// What cancelled a sequence out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelCause {
    /// Knockback overlay engaged.
    Knockback,
    /// The sequence target died.
    TargetDied,
    /// The attacker died.
    Death,
    /// The host cancelled directly.
    Host,
}

// ============================================================================
// Attack Timing
// ============================================================================

/// Timing configuration for one attack cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackTiming {
    /// Maximum distance at which the attack may start and land.
    pub attack_range: f32,
    /// Delay between starting and the first damage-capable moment.
    pub windup: f32,
    /// Total attack duration measured from the start.
    pub duration: f32,
    /// Base cooldown after the attack.
    pub cooldown: f32,
    /// Damage instances per attack.
    pub instance_count: u32,
    /// Delay between consecutive instances.
    pub instance_interval: f32,
}

impl Default for AttackTiming {
    fn default() -> Self {
        Self {
            attack_range: 1.0,
            windup: 0.3,
            duration: 0.6,
            cooldown: 1.0,
            instance_count: 1,
            instance_interval: 0.0,
        }
    }
}

impl AttackTiming {
    /// Single-instance timing. Delays clamp to zero.
    #[must_use]
    pub fn new(attack_range: f32, windup: f32, duration: f32, cooldown: f32) -> Self {
        Self {
            attack_range: attack_range.max(0.0),
            windup: windup.max(0.0),
            duration: duration.max(0.0),
            cooldown: cooldown.max(0.0),
            instance_count: 1,
            instance_interval: 0.0,
        }
    }

    /// Deliver `count` instances `interval` seconds apart.
    #[must_use]
    pub fn with_instances(mut self, count: u32, interval: f32) -> Self {
        self.instance_count = count.max(1);
        self.instance_interval = interval.max(0.0);
        self
    }

    /// Copy with every field clamped into its legal range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self::new(self.attack_range, self.windup, self.duration, self.cooldown)
            .with_instances(self.instance_count, self.instance_interval)
    }

    /// Time consumed by the windup and the inter-instance delays.
    #[must_use]
    pub fn scheduled_delays(&self) -> f32 {
        let gaps = self.instance_count.max(1) - 1;
        self.windup.max(0.0) + self.instance_interval.max(0.0) * gaps as f32
    }

    /// Duration left after the scheduled delays. Never negative.
    #[must_use]
    pub fn remaining_duration(&self) -> f32 {
        (self.duration - self.scheduled_delays()).max(0.0)
    }
}

// ============================================================================
// Strike Context
// ============================================================================

/// The actor's view of the world for one sequencer step.
pub trait StrikeContext {
    /// Whether the attacker is alive.
    fn attacker_alive(&self) -> bool;

    /// Whether the target is alive and enabled.
    fn target_alive(&self, target: EntityId) -> bool;

    /// Distance from attacker to target, `None` if the target is gone.
    fn target_distance(&self, target: EntityId) -> Option<f32>;

    /// Additive cooldown bonus from status effects.
    fn cooldown_bonus(&self) -> f32 {
        0.0
    }

    /// Deliver instance `instance` of `count` to `target`.
    fn strike(&mut self, target: EntityId, instance: u32, count: u32);

    /// Called on every phase transition.
    fn phase_changed(&mut self, _phase: AttackPhase) {}
}

/// Result of one sequencer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStatus {
    /// Nothing in flight.
    Idle,
    /// Still running in the given phase.
    Running(AttackPhase),
    /// A checkpoint failed; the actor is idle again.
    Aborted {
        /// Failed check
        reason: AbortReason,
        /// Instances delivered before the abort
        delivered: u32,
    },
    /// Cooldown finished.
    Completed {
        /// Instances delivered by the run
        delivered: u32,
    },
}

// ============================================================================
// Action Sequencer
// ============================================================================

#[derive(Debug, Clone)]
enum Stage {
    Windup(Suspension),
    Delivering(TimedDamageApplier),
    Recovering(Suspension),
    Cooldown(Suspension),
}

#[derive(Debug, Clone)]
struct SequenceRun {
    token: ActionToken,
    target: EntityId,
    stage: Stage,
    delivered: u32,
}

impl SequenceRun {
    fn phase(&self) -> AttackPhase {
        match &self.stage {
            Stage::Windup(_) => AttackPhase::WindupPending,
            Stage::Delivering(applier) => AttackPhase::DeliveringDamage {
                index: applier.next_index().map_or(applier.delivered(), |i| i as u32),
                count: applier.instance_count(),
            },
            Stage::Recovering(_) => AttackPhase::Recovering,
            Stage::Cooldown(_) => AttackPhase::OnCooldown,
        }
    }
}

/// Runs at most one attack cycle at a time for one actor.
#[derive(Debug, Clone)]
pub struct ActionSequencer {
    timing: AttackTiming,
    tokens: ActionTokenCounter,
    run: Option<SequenceRun>,
}

impl ActionSequencer {
    /// Create an idle sequencer.
    #[must_use]
    pub fn new(timing: AttackTiming) -> Self {
        Self {
            timing: timing.sanitized(),
            tokens: ActionTokenCounter::new(),
            run: None,
        }
    }

    /// Timing in use.
    #[must_use]
    pub fn timing(&self) -> &AttackTiming {
        &self.timing
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AttackPhase {
        self.run.as_ref().map_or(AttackPhase::Idle, SequenceRun::phase)
    }

    /// Whether the attack itself is in progress.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.phase().is_attacking()
    }

    /// Whether the actor is cooling down.
    #[must_use]
    pub fn is_cooling_down(&self) -> bool {
        self.phase().is_cooling_down()
    }

    /// Target of the run in flight.
    #[must_use]
    pub fn target(&self) -> Option<EntityId> {
        self.run.as_ref().map(|r| r.target)
    }

    /// Token captured by the run in flight.
    #[must_use]
    pub fn token(&self) -> Option<ActionToken> {
        self.run.as_ref().map(|r| r.token)
    }

    /// Token counter (read-only).
    #[must_use]
    pub fn tokens(&self) -> &ActionTokenCounter {
        &self.tokens
    }

    /// Whether a new sequence may start (nothing in flight, no cooldown).
    #[must_use]
    pub fn can_begin(&self) -> bool {
        self.run.is_none()
    }

    /// Start a sequence against `target`. Returns `None` if one is already
    /// in flight.
    pub fn begin(&mut self, target: EntityId) -> Option<ActionToken> {
        if !self.can_begin() {
            return None;
        }
        let token = self.tokens.begin_action();
        self.run = Some(SequenceRun {
            token,
            target,
            stage: Stage::Windup(Suspension::new(self.timing.windup)),
            delivered: 0,
        });
        debug!(token = token.raw(), %target, "attack sequence started");
        Some(token)
    }

    /// Retire the current token and drop the run, including any cooldown.
    /// Returns whether something was in flight.
    pub fn cancel(&mut self) -> bool {
        self.tokens.cancel_action();
        self.run.take().is_some()
    }

    /// Retire the current token but leave the run suspended. It backs out
    /// at its next checkpoint.
    pub fn invalidate(&mut self) {
        self.tokens.cancel_action();
    }

    /// Feed `dt` seconds of attack time.
    pub fn advance<C: StrikeContext>(&mut self, dt: f32, ctx: &mut C) -> SequenceStatus {
        let Some(mut run) = self.run.take() else {
            return SequenceStatus::Idle;
        };

        let status = self.drive(&mut run, dt, ctx);
        if let SequenceStatus::Running(_) = status {
            self.run = Some(run);
        }
        status
    }

    fn drive<C: StrikeContext>(&mut self, run: &mut SequenceRun, dt: f32, ctx: &mut C) -> SequenceStatus {
        let mut budget = dt;

        loop {
            match &mut run.stage {
                Stage::Windup(wait) => {
                    let Some(overflow) = wait.advance(budget) else {
                        return SequenceStatus::Running(AttackPhase::WindupPending);
                    };
                    budget = overflow;

                    ctx.phase_changed(AttackPhase::ValidatingRange);
                    if let Err(reason) = self.check(run, ctx) {
                        return self.abort(run, reason, ctx);
                    }
                    run.stage = Stage::Delivering(TimedDamageApplier::evenly_spaced(
                        self.timing.instance_count,
                        self.timing.instance_interval,
                    ));
                },
                Stage::Delivering(applier) => {
                    let count = applier.instance_count();
                    let target = run.target;
                    let token = run.token;
                    let tokens = &self.tokens;
                    let range = self.timing.attack_range;
                    let mut failure = None;

                    let status = applier.advance(budget, |index| {
                        match validate(tokens, token, target, range, &*ctx) {
                            Ok(()) => {
                                ctx.phase_changed(AttackPhase::DeliveringDamage {
                                    index: index as u32,
                                    count,
                                });
                                ctx.strike(target, index as u32, count);
                                trace!(%target, instance = index, count, "damage instance delivered");
                                TickOutcome::Delivered
                            },
                            Err(reason) => {
                                failure = Some(reason);
                                TickOutcome::Stop
                            },
                        }
                    });
                    run.delivered = applier.delivered();

                    match status {
                        ApplierStatus::Waiting => {
                            return SequenceStatus::Running(run.phase());
                        },
                        ApplierStatus::Stopped => {
                            let reason = failure.unwrap_or(AbortReason::StaleToken);
                            return self.abort(run, reason, ctx);
                        },
                        ApplierStatus::Finished { overflow } => {
                            budget = overflow;
                            run.stage = Stage::Recovering(Suspension::new(self.timing.remaining_duration()));
                            ctx.phase_changed(AttackPhase::Recovering);
                        },
                    }
                },
                Stage::Recovering(wait) => {
                    let Some(overflow) = wait.advance(budget) else {
                        return SequenceStatus::Running(AttackPhase::Recovering);
                    };
                    budget = overflow;

                    if !self.tokens.is_current(run.token) {
                        return self.abort(run, AbortReason::StaleToken, ctx);
                    }
                    let cooldown = adjusted_cooldown(self.timing.cooldown, ctx.cooldown_bonus());
                    run.stage = Stage::Cooldown(Suspension::new(cooldown));
                    ctx.phase_changed(AttackPhase::OnCooldown);
                },
                Stage::Cooldown(wait) => {
                    if wait.advance(budget).is_none() {
                        return SequenceStatus::Running(AttackPhase::OnCooldown);
                    }
                    ctx.phase_changed(AttackPhase::Idle);
                    debug!(target = %run.target, delivered = run.delivered, "attack sequence completed");
                    return SequenceStatus::Completed {
                        delivered: run.delivered,
                    };
                },
            }
        }
    }

    fn check<C: StrikeContext>(&self, run: &SequenceRun, ctx: &C) -> Result<(), AbortReason> {
        validate(&self.tokens, run.token, run.target, self.timing.attack_range, ctx)
    }

    fn abort<C: StrikeContext>(&mut self, run: &SequenceRun, reason: AbortReason, ctx: &mut C) -> SequenceStatus {
        if reason != AbortReason::StaleToken {
            // Release ownership so nothing else resumes on this token
            self.tokens.cancel_action();
        }
        ctx.phase_changed(AttackPhase::Idle);
        debug!(target = %run.target, ?reason, delivered = run.delivered, "attack sequence aborted");
        SequenceStatus::Aborted {
            reason,
            delivered: run.delivered,
        }
    }
}

fn validate<C: StrikeContext>(
    tokens: &ActionTokenCounter,
    token: ActionToken,
    target: EntityId,
    range: f32,
    ctx: &C,
) -> Result<(), AbortReason> {
    if !tokens.is_current(token) {
        return Err(AbortReason::StaleToken);
    }
    if !ctx.attacker_alive() {
        return Err(AbortReason::AttackerDead);
    }
    if !ctx.target_alive(target) {
        return Err(AbortReason::TargetDead);
    }
    match ctx.target_distance(target) {
        None => Err(AbortReason::TargetMissing),
        Some(d) if d > range => Err(AbortReason::OutOfRange),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Ctx {
        alive: bool,
        target_alive: bool,
        distance: Option<f32>,
        bonus: f32,
        strikes: Vec<u32>,
        phases: Vec<AttackPhase>,
    }

    impl Default for Ctx {
        fn default() -> Self {
            Self {
                alive: true,
                target_alive: true,
                distance: Some(1.0),
                bonus: 0.0,
                strikes: Vec::new(),
                phases: Vec::new(),
            }
        }
    }

    impl StrikeContext for Ctx {
        fn attacker_alive(&self) -> bool {
            self.alive
        }

        fn target_alive(&self, _target: EntityId) -> bool {
            self.target_alive
        }

        fn target_distance(&self, _target: EntityId) -> Option<f32> {
            self.distance
        }

        fn cooldown_bonus(&self) -> f32 {
            self.bonus
        }

        fn strike(&mut self, _target: EntityId, instance: u32, _count: u32) {
            self.strikes.push(instance);
        }

        fn phase_changed(&mut self, phase: AttackPhase) {
            self.phases.push(phase);
        }
    }

    const STEP: f32 = 0.05;

    fn target() -> EntityId {
        EntityId::from_raw(77)
    }

    fn run_for(seq: &mut ActionSequencer, ctx: &mut Ctx, seconds: f32) -> SequenceStatus {
        let steps = (seconds / STEP).round() as usize;
        let mut last = SequenceStatus::Idle;
        for _ in 0..steps {
            last = seq.advance(STEP, ctx);
            if !matches!(last, SequenceStatus::Running(_)) {
                break;
            }
        }
        last
    }

    #[test]
    fn test_timing_remaining_duration_clamps() {
        let timing = AttackTiming::new(1.2, 0.2, 0.4, 1.0);
        assert!((timing.remaining_duration() - 0.2).abs() < 1e-6);

        let over = AttackTiming::new(1.0, 0.5, 0.4, 1.0).with_instances(3, 0.2);
        assert_eq!(over.remaining_duration(), 0.0);
    }

    #[test]
    fn test_timing_sanitized() {
        let timing = AttackTiming {
            attack_range: -1.0,
            windup: -0.5,
            duration: 0.4,
            cooldown: -2.0,
            instance_count: 0,
            instance_interval: -0.1,
        }
        .sanitized();
        assert_eq!(timing.attack_range, 0.0);
        assert_eq!(timing.windup, 0.0);
        assert_eq!(timing.cooldown, 0.0);
        assert_eq!(timing.instance_count, 1);
        assert_eq!(timing.instance_interval, 0.0);
    }

    #[test]
    fn test_single_instance_full_cycle() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.2, 0.2, 0.4, 0.5));
        let mut ctx = Ctx::default();

        assert!(seq.begin(target()).is_some());
        assert!(seq.is_attacking());
        assert!(seq.begin(target()).is_none());

        run_for(&mut seq, &mut ctx, 0.15);
        assert!(ctx.strikes.is_empty());

        run_for(&mut seq, &mut ctx, 0.05);
        assert_eq!(ctx.strikes, vec![0]);
        assert_eq!(seq.phase(), AttackPhase::Recovering);

        run_for(&mut seq, &mut ctx, 0.2);
        assert!(seq.is_cooling_down());
        assert!(!seq.is_attacking());

        let status = run_for(&mut seq, &mut ctx, 0.5);
        assert_eq!(status, SequenceStatus::Completed { delivered: 1 });
        assert_eq!(seq.phase(), AttackPhase::Idle);
        assert!(seq.can_begin());
        assert_eq!(ctx.strikes.len(), 1);
    }

    #[test]
    fn test_phase_order() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.1, 0.3, 0.1).with_instances(2, 0.1));
        let mut ctx = Ctx::default();
        seq.begin(target());
        run_for(&mut seq, &mut ctx, 1.0);

        assert_eq!(
            ctx.phases,
            vec![
                AttackPhase::ValidatingRange,
                AttackPhase::DeliveringDamage { index: 0, count: 2 },
                AttackPhase::DeliveringDamage { index: 1, count: 2 },
                AttackPhase::Recovering,
                AttackPhase::OnCooldown,
                AttackPhase::Idle,
            ]
        );
    }

    #[test]
    fn test_cooldown_uses_bonus() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.0, 0.0, 0.5));
        let mut ctx = Ctx {
            bonus: 0.5,
            ..Ctx::default()
        };
        seq.begin(target());
        run_for(&mut seq, &mut ctx, 0.9);
        assert!(seq.is_cooling_down());
        let status = run_for(&mut seq, &mut ctx, 0.15);
        assert!(matches!(status, SequenceStatus::Completed { .. }));
    }

    #[test]
    fn test_negative_bonus_clamps_to_zero_cooldown() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.0, 0.0, 0.5));
        let mut ctx = Ctx {
            bonus: -3.0,
            ..Ctx::default()
        };
        seq.begin(target());
        let status = seq.advance(STEP, &mut ctx);
        assert_eq!(status, SequenceStatus::Completed { delivered: 1 });
    }

    #[test]
    fn test_out_of_range_after_windup_aborts_without_damage() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.2, 0.2, 0.4, 1.0));
        let mut ctx = Ctx::default();
        seq.begin(target());
        run_for(&mut seq, &mut ctx, 0.1);
        ctx.distance = Some(3.0);

        let status = run_for(&mut seq, &mut ctx, 0.1);
        assert_eq!(
            status,
            SequenceStatus::Aborted {
                reason: AbortReason::OutOfRange,
                delivered: 0
            }
        );
        assert!(ctx.strikes.is_empty());
        assert!(seq.can_begin());
        assert_eq!(ctx.phases.last(), Some(&AttackPhase::Idle));
    }

    #[test]
    fn test_target_death_between_instances_keeps_prefix() {
        let mut seq = ActionSequencer::new(AttackTiming::new(2.0, 0.1, 1.0, 1.0).with_instances(3, 0.2));
        let mut ctx = Ctx::default();
        seq.begin(target());
        run_for(&mut seq, &mut ctx, 0.2);
        assert_eq!(ctx.strikes, vec![0]);

        ctx.target_alive = false;
        let status = run_for(&mut seq, &mut ctx, 0.2);
        assert_eq!(
            status,
            SequenceStatus::Aborted {
                reason: AbortReason::TargetDead,
                delivered: 1
            }
        );
        assert_eq!(ctx.strikes, vec![0]);
    }

    #[test]
    fn test_target_missing() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.1, 0.2, 0.1));
        let mut ctx = Ctx {
            distance: None,
            ..Ctx::default()
        };
        seq.begin(target());
        let status = run_for(&mut seq, &mut ctx, 0.1);
        assert!(matches!(
            status,
            SequenceStatus::Aborted {
                reason: AbortReason::TargetMissing,
                ..
            }
        ));
    }

    #[test]
    fn test_attacker_death_aborts() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.1, 0.2, 0.1));
        let mut ctx = Ctx::default();
        seq.begin(target());
        ctx.alive = false;
        let status = run_for(&mut seq, &mut ctx, 0.1);
        assert!(matches!(
            status,
            SequenceStatus::Aborted {
                reason: AbortReason::AttackerDead,
                ..
            }
        ));
    }

    #[test]
    fn test_cancel_during_windup() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 1.0, 1.2, 1.0));
        let mut ctx = Ctx::default();
        let first = seq.begin(target());
        run_for(&mut seq, &mut ctx, 0.4);

        assert!(seq.cancel());
        run_for(&mut seq, &mut ctx, 2.0);
        assert!(ctx.strikes.is_empty());

        let second = seq.begin(target());
        assert!(second > first);
        assert!(second.is_some_and(|t| seq.tokens().is_current(t)));
    }

    #[test]
    fn test_cancel_clears_cooldown() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.0, 0.0, 5.0));
        let mut ctx = Ctx::default();
        seq.begin(target());
        seq.advance(STEP, &mut ctx);
        assert!(seq.is_cooling_down());
        assert!(seq.cancel());
        assert!(seq.can_begin());
    }

    #[test]
    fn test_invalidate_detected_at_next_checkpoint() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.2, 0.4, 1.0));
        let mut ctx = Ctx::default();
        seq.begin(target());
        run_for(&mut seq, &mut ctx, 0.1);
        seq.invalidate();
        assert!(seq.is_attacking());

        let status = run_for(&mut seq, &mut ctx, 0.1);
        assert_eq!(
            status,
            SequenceStatus::Aborted {
                reason: AbortReason::StaleToken,
                delivered: 0
            }
        );
        assert!(ctx.strikes.is_empty());
    }

    #[test]
    fn test_zero_dt_never_progresses() {
        let mut seq = ActionSequencer::new(AttackTiming::new(1.0, 0.2, 0.4, 1.0));
        let mut ctx = Ctx::default();
        seq.begin(target());
        for _ in 0..1000 {
            seq.advance(0.0, &mut ctx);
        }
        assert_eq!(seq.phase(), AttackPhase::WindupPending);
        assert!(ctx.strikes.is_empty());
    }

    proptest! {
        #[test]
        fn prop_cancel_delivers_prefix(
            count in 1u32..6,
            cancel_after in 0usize..60,
        ) {
            let mut seq = ActionSequencer::new(
                AttackTiming::new(1.0, 0.2, 2.0, 0.5).with_instances(count, 0.15),
            );
            let mut ctx = Ctx::default();
            seq.begin(target());
            for _ in 0..cancel_after {
                seq.advance(STEP, &mut ctx);
            }
            seq.cancel();
            for _ in 0..60 {
                seq.advance(STEP, &mut ctx);
            }

            let expected: Vec<u32> = (0..ctx.strikes.len() as u32).collect();
            prop_assert_eq!(&ctx.strikes, &expected);
            prop_assert!(ctx.strikes.len() as u32 <= count);
        }
    }
}
