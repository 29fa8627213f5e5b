//! Uid propagation across the event graph.
//!
//! Every record of one logical meeting (a master, its recurrence
//! exceptions, and its mirror copies on other calendars) shares one uid.
//! Discovery of the related records happens after the caller's primary
//! change-set is already computed, so propagation is split in two phases:
//! [`propagate_uid`] computes the uid and the out-of-band corrections
//! without touching anything, and the caller persists the returned
//! [`EventUidChange`]s through whatever write path it owns
//! ([`EventGraph::apply`] does this for the in-memory graph).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::event::{CalendarEvent, EventId};

/// Source of fresh uids for groups that have none yet.
pub trait UidGenerator {
    fn generate(&self) -> String;
}

/// Default generator backed by random (v4) uuids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl UidGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// One out-of-band uid correction for the caller to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUidChange {
    pub event_id: EventId,
    pub uid: String,
}

/// Result of the pure propagation phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidPropagation {
    /// The event whose write triggered propagation.
    pub event_id: EventId,
    /// The uid the whole group settles on.
    pub assigned_uid: String,
    /// Corrections for group members other than the trigger that still
    /// lack the uid. Empty when the group is already consistent.
    pub extra_updates: Vec<EventUidChange>,
}

/// The in-memory set of events affected by one logical write.
///
/// Supplied by the caller's persistence layer; the graph itself never
/// performs I/O.
#[derive(Debug, Clone, Default)]
pub struct EventGraph {
    events: BTreeMap<EventId, CalendarEvent>,
}

impl EventGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = CalendarEvent>) -> Self {
        Self {
            events: events.into_iter().map(|event| (event.id, event)).collect(),
        }
    }

    pub fn insert(&mut self, event: CalendarEvent) {
        self.events.insert(event.id, event);
    }

    #[must_use]
    pub fn get(&self, id: EventId) -> Option<&CalendarEvent> {
        self.events.get(&id)
    }

    /// Neighbors across both link axes, in both directions: the parent
    /// and children of the mirror axis, the master and exceptions of the
    /// recurrence axis.
    fn neighbors(&self, id: EventId) -> Vec<EventId> {
        let mut related = Vec::new();
        if let Some(event) = self.events.get(&id) {
            related.extend(event.parent_id);
            related.extend(event.recurring_event_id);
        }
        for (other_id, other) in &self.events {
            if other.parent_id == Some(id) || other.recurring_event_id == Some(id) {
                related.push(*other_id);
            }
        }
        related
    }

    /// ## Summary
    /// Collects the uid-group of `id`: the transitive closure over both
    /// link axes, starting from `id` itself.
    ///
    /// The link structure is expected to be a forest, but traversal keeps
    /// a visited set so malformed cyclic data terminates instead of
    /// looping.
    #[must_use]
    pub fn uid_group(&self, id: EventId) -> Vec<EventId> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for neighbor in self.neighbors(current) {
                if !visited.contains(&neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        visited.into_iter().collect()
    }

    /// ## Summary
    /// Phase 2 for the in-memory graph: assigns the uid to the trigger
    /// event and applies every extra update.
    ///
    /// ## Errors
    /// [`Error::UnknownEvent`] for an update naming an event outside the
    /// graph; [`Error::UidAlreadySet`] if an event's uid changed since
    /// the propagation was computed.
    pub fn apply(&mut self, propagation: &UidPropagation) -> Result<()> {
        let trigger = self
            .events
            .get_mut(&propagation.event_id)
            .ok_or(Error::UnknownEvent(propagation.event_id))?;
        trigger.set_uid(&propagation.assigned_uid)?;
        for update in &propagation.extra_updates {
            let event = self
                .events
                .get_mut(&update.event_id)
                .ok_or(Error::UnknownEvent(update.event_id))?;
            event.set_uid(&update.uid)?;
        }
        Ok(())
    }
}

/// ## Summary
/// Computes the uid assignment for the group containing `event_id`.
///
/// The group uid is the trigger's own uid if set, else any uid already
/// present in the group, else a fresh one from `generator`. The returned
/// updates cover every other group member whose uid is still null;
/// running the propagation again after applying them yields no further
/// updates.
///
/// ## Errors
/// - [`Error::UnknownEvent`] if `event_id` is not in the graph
/// - [`Error::UidAlreadySet`] if the group holds two different non-null
///   uids (no silent override)
pub fn propagate_uid(
    graph: &EventGraph,
    event_id: EventId,
    generator: &dyn UidGenerator,
) -> Result<UidPropagation> {
    let trigger = graph.get(event_id).ok_or(Error::UnknownEvent(event_id))?;
    let group = graph.uid_group(event_id);

    let mut candidate: Option<&str> = trigger.uid();
    for member_id in &group {
        let Some(member_uid) = graph.get(*member_id).and_then(CalendarEvent::uid) else {
            continue;
        };
        match candidate {
            None => candidate = Some(member_uid),
            Some(existing) if existing != member_uid => {
                return Err(Error::UidAlreadySet {
                    existing: member_uid.to_string(),
                    attempted: existing.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    let assigned_uid = candidate.map_or_else(|| generator.generate(), ToString::to_string);
    let extra_updates = group
        .iter()
        .filter(|member_id| **member_id != event_id)
        .filter(|member_id| {
            graph
                .get(**member_id)
                .is_some_and(|member| member.uid().is_none())
        })
        .map(|member_id| EventUidChange {
            event_id: *member_id,
            uid: assigned_uid.clone(),
        })
        .collect();

    tracing::trace!(
        trigger = %event_id,
        group_size = group.len(),
        uid = %assigned_uid,
        "Resolved uid group"
    );
    Ok(UidPropagation {
        event_id,
        assigned_uid,
        extra_updates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct FixedGenerator(&'static str);

    impl UidGenerator for FixedGenerator {
        fn generate(&self) -> String {
            self.0.to_string()
        }
    }

    fn event(title: &str) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        CalendarEvent::new(title, start, end)
    }

    /// Master with two mirror children and one recurrence exception.
    fn family() -> (EventGraph, EventId, EventId, EventId, EventId) {
        let master = event("planning");
        let child1 = event("planning").with_parent(master.id);
        let child2 = event("planning").with_parent(master.id);
        let original = Utc.with_ymd_and_hms(2024, 2, 7, 9, 0, 0).unwrap();
        let exception = event("planning").as_exception_of(master.id, original);
        let ids = (master.id, child1.id, child2.id, exception.id);
        let graph = EventGraph::from_events([master, child1, child2, exception]);
        (graph, ids.0, ids.1, ids.2, ids.3)
    }

    #[test]
    fn uid_set_on_a_child_reaches_the_whole_group() {
        let (mut graph, master, child1, child2, exception) = family();
        // The caller assigned "X" to child1 before the write.
        graph.events.get_mut(&child1).unwrap().set_uid("X").unwrap();

        let propagation =
            propagate_uid(&graph, child1, &UuidGenerator).expect("propagation should succeed");
        assert_eq!(propagation.assigned_uid, "X");
        let mut updated: Vec<EventId> = propagation
            .extra_updates
            .iter()
            .map(|change| change.event_id)
            .collect();
        updated.sort();
        let mut expected = vec![master, child2, exception];
        expected.sort();
        assert_eq!(updated, expected);

        graph.apply(&propagation).unwrap();
        for id in [master, child1, child2, exception] {
            assert_eq!(graph.get(id).unwrap().uid(), Some("X"));
        }
    }

    #[test]
    fn fresh_uid_is_generated_when_the_group_has_none() {
        let (graph, master, ..) = family();
        let propagation = propagate_uid(&graph, master, &FixedGenerator("generated-uid")).unwrap();
        assert_eq!(propagation.assigned_uid, "generated-uid");
        // Everyone but the trigger needs the correction.
        assert_eq!(propagation.extra_updates.len(), 3);
    }

    #[test]
    fn propagation_is_idempotent() {
        let (mut graph, _, child1, ..) = family();
        graph.events.get_mut(&child1).unwrap().set_uid("X").unwrap();

        let first = propagate_uid(&graph, child1, &UuidGenerator).unwrap();
        graph.apply(&first).unwrap();

        let second = propagate_uid(&graph, child1, &UuidGenerator).unwrap();
        assert_eq!(second.assigned_uid, "X");
        assert!(second.extra_updates.is_empty());
    }

    #[test]
    fn conflicting_uids_in_one_group_fail() {
        let (mut graph, master, child1, ..) = family();
        graph.events.get_mut(&master).unwrap().set_uid("Y").unwrap();
        graph.events.get_mut(&child1).unwrap().set_uid("X").unwrap();

        let err = propagate_uid(&graph, child1, &UuidGenerator).unwrap_err();
        assert!(matches!(
            err,
            Error::UidAlreadySet { existing, attempted }
                if existing == "Y" && attempted == "X"
        ));
    }

    #[test]
    fn traversal_terminates_on_cyclic_data() {
        // Two events naming each other as parent: malformed, but the
        // visited set must keep traversal finite.
        let mut a = event("a");
        let mut b = event("b");
        a.parent_id = Some(b.id);
        b.parent_id = Some(a.id);
        let (a_id, b_id) = (a.id, b.id);
        let graph = EventGraph::from_events([a, b]);

        let group = graph.uid_group(a_id);
        assert_eq!(group.len(), 2);
        assert!(group.contains(&a_id) && group.contains(&b_id));

        let propagation = propagate_uid(&graph, a_id, &FixedGenerator("cycle")).unwrap();
        assert_eq!(propagation.extra_updates.len(), 1);
    }

    #[test]
    fn unknown_trigger_is_an_error() {
        let graph = EventGraph::new();
        let err = propagate_uid(&graph, EventId::new(), &UuidGenerator).unwrap_err();
        assert!(matches!(err, Error::UnknownEvent(_)));
    }
}
