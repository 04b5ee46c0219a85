//! Per-species tallies built from the drained event stream.

use grimhold_behavior::{Arena, BehaviorEvent};
use grimhold_common::EntityId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Outcome counters for one species.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeciesTally {
    /// Actors spawned
    pub actors: u32,
    /// Sequences started
    pub started: u32,
    /// Sequences that ran through cooldown
    pub completed: u32,
    /// Sequences aborted by a failed check
    pub aborted: u32,
    /// Sequences cancelled from outside
    pub cancelled: u32,
    /// Projectiles launched
    pub projectiles: u32,
    /// Damage instances delivered
    pub hits: u32,
    /// Total damage delivered
    pub damage: f32,
}

/// Tallies keyed by species name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimReport {
    /// Simulated seconds
    pub seconds: f32,
    /// Events observed
    pub events: u64,
    /// Per-species tallies
    pub species: BTreeMap<String, SpeciesTally>,
    #[serde(skip)]
    pub(crate) owners: BTreeMap<EntityId, String>,
}

impl SimReport {
    /// Register an actor under its species.
    pub fn track(&mut self, entity: EntityId, species: &str) {
        self.owners.insert(entity, species.to_string());
        self.species.entry(species.to_string()).or_default().actors += 1;
    }

    /// Fold one batch of drained events.
    pub fn record(&mut self, arena: &Arena, events: &[BehaviorEvent]) {
        self.events += events.len() as u64;
        for event in events {
            let Some(entity) = attributed_actor(event) else {
                continue;
            };
            let Some(species) = self.species_of(arena, entity) else {
                continue;
            };
            let tally = self.species.entry(species).or_default();
            match event {
                BehaviorEvent::SequenceStarted { .. } => tally.started += 1,
                BehaviorEvent::SequenceCompleted { .. } => tally.completed += 1,
                BehaviorEvent::SequenceAborted { .. } => tally.aborted += 1,
                BehaviorEvent::SequenceCancelled { .. } => tally.cancelled += 1,
                BehaviorEvent::ProjectileSpawned { .. } => tally.projectiles += 1,
                BehaviorEvent::DamageDelivered { amount, .. } => {
                    tally.hits += 1;
                    tally.damage += amount;
                },
                _ => {},
            }
        }
    }

    fn species_of(&self, arena: &Arena, entity: EntityId) -> Option<String> {
        self.owners
            .get(&entity)
            .cloned()
            .or_else(|| arena.enemy(entity).ok().map(|e| e.species().to_string()))
    }
}

/// Actor an event is credited to, if any.
fn attributed_actor(event: &BehaviorEvent) -> Option<EntityId> {
    match event {
        BehaviorEvent::SequenceStarted { entity, .. }
        | BehaviorEvent::SequenceCompleted { entity, .. }
        | BehaviorEvent::SequenceAborted { entity, .. }
        | BehaviorEvent::SequenceCancelled { entity, .. } => Some(*entity),
        BehaviorEvent::ProjectileSpawned { owner, .. } => Some(*owner),
        BehaviorEvent::DamageDelivered { source, .. } => Some(*source),
        _ => None,
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulated {:.1}s, {} events", self.seconds, self.events)?;
        writeln!(
            f,
            "{:<12} {:>6} {:>8} {:>9} {:>7} {:>9} {:>6} {:>8}",
            "species", "actors", "started", "completed", "aborted", "cancelled", "hits", "damage"
        )?;
        for (name, t) in &self.species {
            writeln!(
                f,
                "{:<12} {:>6} {:>8} {:>9} {:>7} {:>9} {:>6} {:>8.1}",
                name, t.actors, t.started, t.completed, t.aborted, t.cancelled, t.hits, t.damage
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimhold_behavior::{ActionTokenCounter, CancelCause, DamageReceiver};

    #[test]
    fn test_record_folds_by_species() {
        let arena = Arena::default();
        let grunt = EntityId::from_raw(40);
        let mut report = SimReport::default();
        report.track(grunt, "brawler");

        let events = vec![
            BehaviorEvent::SequenceStarted {
                entity: grunt,
                token: ActionTokenCounter::new().begin_action(),
                target: EntityId::from_raw(1),
            },
            BehaviorEvent::DamageDelivered {
                source: grunt,
                receiver: DamageReceiver::health(EntityId::from_raw(1)),
                amount: 15.0,
                instance: 0,
            },
            BehaviorEvent::SequenceCancelled {
                entity: grunt,
                cause: CancelCause::Knockback,
            },
            BehaviorEvent::EnemyDied {
                entity: EntityId::from_raw(99),
            },
        ];
        report.record(&arena, &events);

        let tally = &report.species["brawler"];
        assert_eq!(tally.actors, 1);
        assert_eq!(tally.started, 1);
        assert_eq!(tally.cancelled, 1);
        assert_eq!(tally.hits, 1);
        assert_eq!(tally.damage, 15.0);
        assert_eq!(report.events, 4);
    }

    #[test]
    fn test_display_lists_species() {
        let mut report = SimReport::default();
        report.track(EntityId::from_raw(41), "archer");
        let text = report.to_string();
        assert!(text.contains("archer"));
        assert!(text.contains("damage"));
    }
}
