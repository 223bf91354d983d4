//! Optimistic editing session for one page.
//!
//! Local edits apply immediately so the surface can re-render without
//! waiting for the server. Every edit hands back a [`PendingChange`] ticket
//! that must be settled exactly once:
//!
//! - `reconcile_*` / [`EditSession::confirm`] when the request succeeded,
//!   adopting the server's record (and its real id for creations);
//! - [`EditSession::revert`] when it failed, restoring the local state the
//!   edit replaced.
//!
//! Locally created records use negative temporary ids until reconciled.
//! Edits may stack on a record that is still pending; settling one edit
//! never discards the local effect of a later one.

use std::collections::HashMap;

use uuid::Uuid;

use crate::annotation::{AnnotationSource, PageAnnotation};
use crate::connection::{validate_endpoints, validate_waypoints, LineType, PageConnection};
use crate::error::CoreError;
use crate::geometry::{BoundingBox, Point};
use crate::types::DbId;

/// Ticket for an edit awaiting its server response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingChange(Uuid);

impl PendingChange {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// What it takes to undo one local edit.
#[derive(Debug, Clone)]
enum Undo {
    AnnotationCreated {
        temp_id: DbId,
    },
    AnnotationUpdated {
        previous: PageAnnotation,
    },
    AnnotationDeleted {
        index: usize,
        annotation: PageAnnotation,
        /// Connections removed alongside, with their original positions.
        connections: Vec<(usize, PageConnection)>,
    },
    ConnectionCreated {
        temp_id: DbId,
    },
    ConnectionUpdated {
        previous: PageConnection,
    },
    ConnectionDeleted {
        index: usize,
        connection: PageConnection,
    },
}

fn rename_endpoints(connection: &mut PageConnection, from: DbId, to: DbId) {
    if connection.from_annotation_id == from {
        connection.from_annotation_id = to;
    }
    if connection.to_annotation_id == from {
        connection.to_annotation_id = to;
    }
}

impl Undo {
    fn touches_annotation(&self, id: DbId) -> bool {
        match self {
            Undo::AnnotationCreated { temp_id } => *temp_id == id,
            Undo::AnnotationUpdated { previous } => previous.id == id,
            Undo::AnnotationDeleted { annotation, .. } => annotation.id == id,
            _ => false,
        }
    }

    fn touches_connection(&self, id: DbId) -> bool {
        match self {
            Undo::ConnectionCreated { temp_id } => *temp_id == id,
            Undo::ConnectionUpdated { previous } => previous.id == id,
            Undo::ConnectionDeleted { connection, .. } => connection.id == id,
            Undo::AnnotationDeleted { connections, .. } => {
                connections.iter().any(|(_, c)| c.id == id)
            }
            _ => false,
        }
    }

    /// Swap a temporary annotation id for the real one in stored snapshots.
    fn rename_annotation(&mut self, from: DbId, to: DbId) {
        match self {
            Undo::AnnotationCreated { temp_id } => {
                if *temp_id == from {
                    *temp_id = to;
                }
            }
            Undo::AnnotationUpdated { previous } => {
                if previous.id == from {
                    previous.id = to;
                }
            }
            Undo::AnnotationDeleted {
                annotation,
                connections,
                ..
            } => {
                if annotation.id == from {
                    annotation.id = to;
                }
                for (_, c) in connections {
                    rename_endpoints(c, from, to);
                }
            }
            Undo::ConnectionCreated { .. } => {}
            Undo::ConnectionUpdated { previous } => rename_endpoints(previous, from, to),
            Undo::ConnectionDeleted { connection, .. } => rename_endpoints(connection, from, to),
        }
    }

    /// Swap a temporary connection id for the real one in stored snapshots.
    fn rename_connection(&mut self, from: DbId, to: DbId) {
        match self {
            Undo::ConnectionCreated { temp_id } => {
                if *temp_id == from {
                    *temp_id = to;
                }
            }
            Undo::ConnectionUpdated { previous: c } | Undo::ConnectionDeleted { connection: c, .. } => {
                if c.id == from {
                    c.id = to;
                }
            }
            Undo::AnnotationDeleted { connections, .. } => {
                for (_, c) in connections {
                    if c.id == from {
                        c.id = to;
                    }
                }
            }
            Undo::AnnotationCreated { .. } | Undo::AnnotationUpdated { .. } => {}
        }
    }
}

/// A pending edit and its position in edit order.
#[derive(Debug, Clone)]
struct Tracked {
    seq: u64,
    undo: Undo,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    page_id: DbId,
    annotations: Vec<PageAnnotation>,
    connections: Vec<PageConnection>,
    pending: HashMap<PendingChange, Tracked>,
    next_temp_id: DbId,
    next_seq: u64,
}

impl EditSession {
    /// Start a session from the page's stored records, in render order.
    pub fn new(
        page_id: DbId,
        annotations: Vec<PageAnnotation>,
        connections: Vec<PageConnection>,
    ) -> Self {
        Self {
            page_id,
            annotations,
            connections,
            pending: HashMap::new(),
            next_temp_id: -1,
            next_seq: 0,
        }
    }

    pub fn page_id(&self) -> DbId {
        self.page_id
    }

    pub fn annotations(&self) -> &[PageAnnotation] {
        &self.annotations
    }

    pub fn connections(&self) -> &[PageConnection] {
        &self.connections
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_temporary(id: DbId) -> bool {
        id < 0
    }

    /// Replace everything with a fresh server snapshot, dropping tickets.
    pub fn reload(&mut self, annotations: Vec<PageAnnotation>, connections: Vec<PageConnection>) {
        self.annotations = annotations;
        self.connections = connections;
        self.pending.clear();
    }

    fn temp_id(&mut self) -> DbId {
        let id = self.next_temp_id;
        self.next_temp_id -= 1;
        id
    }

    fn track(&mut self, undo: Undo) -> PendingChange {
        let ticket = PendingChange::new();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(ticket, Tracked { seq, undo });
        ticket
    }

    fn annotation_index(&self, id: DbId) -> Result<usize, CoreError> {
        self.annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(CoreError::NotFound {
                entity: "Annotation",
                id,
            })
    }

    fn connection_index(&self, id: DbId) -> Result<usize, CoreError> {
        self.connections
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::NotFound {
                entity: "Connection",
                id,
            })
    }

    // -- annotations --------------------------------------------------------

    /// Append a new annotation on top of the stack.
    pub fn create_annotation(
        &mut self,
        bbox: BoundingBox,
        source: AnnotationSource,
    ) -> Result<(DbId, PendingChange), CoreError> {
        bbox.validate()?;
        let temp_id = self.temp_id();
        self.annotations.push(PageAnnotation {
            id: temp_id,
            bbox,
            source,
            symbol_id: None,
            tag_id: None,
        });
        Ok((temp_id, self.track(Undo::AnnotationCreated { temp_id })))
    }

    /// Replace an annotation's fields in place, keeping its paint position.
    pub fn update_annotation(&mut self, updated: PageAnnotation) -> Result<PendingChange, CoreError> {
        updated.bbox.validate()?;
        let index = self.annotation_index(updated.id)?;
        let previous = std::mem::replace(&mut self.annotations[index], updated);
        Ok(self.track(Undo::AnnotationUpdated { previous }))
    }

    /// Move an annotation's box, e.g. after a drag on the surface.
    pub fn move_annotation(&mut self, id: DbId, bbox: BoundingBox) -> Result<PendingChange, CoreError> {
        let index = self.annotation_index(id)?;
        let mut updated = self.annotations[index].clone();
        updated.bbox = bbox;
        self.update_annotation(updated)
    }

    /// Remove an annotation together with every connection touching it.
    pub fn delete_annotation(&mut self, id: DbId) -> Result<PendingChange, CoreError> {
        let index = self.annotation_index(id)?;
        let annotation = self.annotations.remove(index);

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.connections.len());
        for (i, c) in std::mem::take(&mut self.connections).into_iter().enumerate() {
            if c.from_annotation_id == id || c.to_annotation_id == id {
                removed.push((i, c));
            } else {
                kept.push(c);
            }
        }
        self.connections = kept;

        Ok(self.track(Undo::AnnotationDeleted {
            index,
            annotation,
            connections: removed,
        }))
    }

    // -- connections --------------------------------------------------------

    pub fn create_connection(
        &mut self,
        from: DbId,
        to: DbId,
        line_type: LineType,
        waypoints: Vec<Point>,
    ) -> Result<(DbId, PendingChange), CoreError> {
        validate_endpoints(from, to)?;
        validate_waypoints(&waypoints)?;
        self.annotation_index(from)?;
        self.annotation_index(to)?;

        let temp_id = self.temp_id();
        self.connections.push(PageConnection {
            id: temp_id,
            from_annotation_id: from,
            to_annotation_id: to,
            line_type,
            waypoints,
        });
        Ok((temp_id, self.track(Undo::ConnectionCreated { temp_id })))
    }

    pub fn update_connection(
        &mut self,
        id: DbId,
        line_type: LineType,
        waypoints: Vec<Point>,
    ) -> Result<PendingChange, CoreError> {
        validate_waypoints(&waypoints)?;
        let index = self.connection_index(id)?;
        let previous = self.connections[index].clone();
        let current = &mut self.connections[index];
        current.line_type = line_type;
        current.waypoints = waypoints;
        Ok(self.track(Undo::ConnectionUpdated { previous }))
    }

    pub fn delete_connection(&mut self, id: DbId) -> Result<PendingChange, CoreError> {
        let index = self.connection_index(id)?;
        let connection = self.connections.remove(index);
        Ok(self.track(Undo::ConnectionDeleted { index, connection }))
    }

    // -- settlement ---------------------------------------------------------

    fn take(&mut self, ticket: PendingChange) -> Result<Tracked, CoreError> {
        self.pending.remove(&ticket).ok_or_else(|| unknown_ticket(ticket))
    }

    /// Settle a ticket whose edit yields a local record id under `local_id`,
    /// returning its sequence number and that id. Other tickets stay pending.
    fn take_for_reconcile(
        &mut self,
        ticket: PendingChange,
        local_id: impl Fn(&Undo) -> Option<DbId>,
    ) -> Result<(u64, DbId), CoreError> {
        let tracked = self.pending.get(&ticket).ok_or_else(|| unknown_ticket(ticket))?;
        let id = local_id(&tracked.undo).ok_or_else(|| {
            CoreError::Conflict(format!(
                "change {} cannot be reconciled with this record kind",
                ticket.id()
            ))
        })?;
        let seq = tracked.seq;
        self.pending.remove(&ticket);
        Ok((seq, id))
    }

    /// Whether an edit made after `seq` is still pending on the annotation.
    fn annotation_superseded(&self, id: DbId, seq: u64) -> bool {
        self.pending
            .values()
            .any(|t| t.seq > seq && t.undo.touches_annotation(id))
    }

    fn connection_superseded(&self, id: DbId, seq: u64) -> bool {
        self.pending
            .values()
            .any(|t| t.seq > seq && t.undo.touches_connection(id))
    }

    /// Settle a successful update or delete whose local state is final.
    ///
    /// Creations need the server record and go through `reconcile_*`.
    pub fn confirm(&mut self, ticket: PendingChange) -> Result<(), CoreError> {
        match self.pending.get(&ticket).map(|t| &t.undo) {
            Some(Undo::AnnotationCreated { .. }) | Some(Undo::ConnectionCreated { .. }) => {
                Err(CoreError::Conflict(
                    "created records must be reconciled with the server record".to_string(),
                ))
            }
            _ => self.take(ticket).map(|_| ()),
        }
    }

    /// Adopt the server's copy of an annotation created or updated locally.
    ///
    /// For creations the temporary id is swapped for the real one everywhere:
    /// the local record, connection endpoints and the snapshots held by other
    /// pending edits. The server's fields are adopted only when no later edit
    /// on the same annotation is still pending. Returns the real id.
    pub fn reconcile_annotation(
        &mut self,
        ticket: PendingChange,
        server: PageAnnotation,
    ) -> Result<DbId, CoreError> {
        let (seq, local_id) = self.take_for_reconcile(ticket, |undo| match undo {
            Undo::AnnotationCreated { temp_id } => Some(*temp_id),
            Undo::AnnotationUpdated { previous } => Some(previous.id),
            _ => None,
        })?;

        let real_id = server.id;
        let superseded = self.annotation_superseded(local_id, seq);
        if let Some(slot) = self.annotations.iter_mut().find(|a| a.id == local_id) {
            if superseded {
                slot.id = real_id;
            } else {
                *slot = server;
            }
        }
        if local_id != real_id {
            for c in &mut self.connections {
                rename_endpoints(c, local_id, real_id);
            }
            for t in self.pending.values_mut() {
                t.undo.rename_annotation(local_id, real_id);
            }
        }
        Ok(real_id)
    }

    /// Adopt the server's copy of a connection created or updated locally.
    ///
    /// Follows the same rules as [`EditSession::reconcile_annotation`].
    pub fn reconcile_connection(
        &mut self,
        ticket: PendingChange,
        server: PageConnection,
    ) -> Result<DbId, CoreError> {
        let (seq, local_id) = self.take_for_reconcile(ticket, |undo| match undo {
            Undo::ConnectionCreated { temp_id } => Some(*temp_id),
            Undo::ConnectionUpdated { previous } => Some(previous.id),
            _ => None,
        })?;

        let real_id = server.id;
        let superseded = self.connection_superseded(local_id, seq);
        if let Some(slot) = self.connections.iter_mut().find(|c| c.id == local_id) {
            if superseded {
                slot.id = real_id;
            } else {
                *slot = server;
            }
        }
        if local_id != real_id {
            for t in self.pending.values_mut() {
                t.undo.rename_connection(local_id, real_id);
            }
        }
        Ok(real_id)
    }

    /// Undo a failed edit, restoring what it replaced.
    pub fn revert(&mut self, ticket: PendingChange) -> Result<(), CoreError> {
        match self.take(ticket)?.undo {
            Undo::AnnotationCreated { temp_id } => {
                self.annotations.retain(|a| a.id != temp_id);
                self.connections
                    .retain(|c| c.from_annotation_id != temp_id && c.to_annotation_id != temp_id);
            }
            Undo::AnnotationUpdated { previous } => {
                if let Some(slot) = self.annotations.iter_mut().find(|a| a.id == previous.id) {
                    *slot = previous;
                }
            }
            Undo::AnnotationDeleted {
                index,
                annotation,
                connections,
            } => {
                let at = index.min(self.annotations.len());
                self.annotations.insert(at, annotation);
                for (i, c) in connections {
                    let at = i.min(self.connections.len());
                    self.connections.insert(at, c);
                }
            }
            Undo::ConnectionCreated { temp_id } => {
                self.connections.retain(|c| c.id != temp_id);
            }
            Undo::ConnectionUpdated { previous } => {
                if let Some(slot) = self.connections.iter_mut().find(|c| c.id == previous.id) {
                    *slot = previous;
                }
            }
            Undo::ConnectionDeleted { index, connection } => {
                let at = index.min(self.connections.len());
                self.connections.insert(at, connection);
            }
        }
        Ok(())
    }
}

fn unknown_ticket(ticket: PendingChange) -> CoreError {
    CoreError::Conflict(format!(
        "change {} is unknown or already settled",
        ticket.id()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ann(id: DbId, x: f64) -> PageAnnotation {
        PageAnnotation::manual(id, BoundingBox::new(x, 10.0, 20.0, 20.0))
    }

    fn conn(id: DbId, from: DbId, to: DbId) -> PageConnection {
        PageConnection {
            id,
            from_annotation_id: from,
            to_annotation_id: to,
            line_type: LineType::Signal,
            waypoints: Vec::new(),
        }
    }

    fn seeded() -> EditSession {
        EditSession::new(
            5,
            vec![ann(1, 0.0), ann(2, 100.0), ann(3, 200.0)],
            vec![conn(10, 1, 2), conn(11, 2, 3), conn(12, 1, 3)],
        )
    }

    #[test]
    fn create_then_reconcile_swaps_temp_id() {
        let mut s = seeded();
        let (temp, ticket) = s
            .create_annotation(BoundingBox::new(5.0, 5.0, 30.0, 30.0), AnnotationSource::Manual)
            .unwrap();
        assert!(EditSession::is_temporary(temp));
        let (_, conn_ticket) = s.create_connection(temp, 1, LineType::Process, vec![]).unwrap();

        let mut server = s.annotations().last().unwrap().clone();
        server.id = 42;
        assert_eq!(s.reconcile_annotation(ticket, server).unwrap(), 42);

        assert_eq!(s.annotations().last().unwrap().id, 42);
        assert_eq!(s.connections().last().unwrap().from_annotation_id, 42);
        assert_eq!(s.pending_count(), 1);

        let mut server_conn = s.connections().last().unwrap().clone();
        server_conn.id = 77;
        s.reconcile_connection(conn_ticket, server_conn).unwrap();
        assert_eq!(s.connections().last().unwrap().id, 77);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn failed_create_is_removed() {
        let mut s = seeded();
        let (temp, ticket) = s
            .create_annotation(BoundingBox::new(5.0, 5.0, 30.0, 30.0), AnnotationSource::Manual)
            .unwrap();
        s.create_connection(temp, 2, LineType::Process, vec![]).unwrap();
        s.revert(ticket).unwrap();
        assert_eq!(s.annotations().len(), 3);
        assert!(s.connections().iter().all(|c| c.from_annotation_id != temp));
    }

    #[test]
    fn invalid_box_never_enters_session() {
        let mut s = seeded();
        let result = s.create_annotation(BoundingBox::new(0.0, 0.0, -4.0, 5.0), AnnotationSource::Manual);
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(s.annotations().len(), 3);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn failed_update_restores_previous() {
        let mut s = seeded();
        let ticket = s.move_annotation(2, BoundingBox::new(500.0, 500.0, 40.0, 40.0)).unwrap();
        assert_eq!(s.annotations()[1].bbox.x, 500.0);
        s.revert(ticket).unwrap();
        assert_eq!(s.annotations()[1], ann(2, 100.0));
    }

    #[test]
    fn delete_cascades_and_revert_restores_order() {
        let mut s = seeded();
        let before_annotations = s.annotations().to_vec();
        let before_connections = s.connections().to_vec();

        let ticket = s.delete_annotation(2).unwrap();
        assert_eq!(s.annotations().len(), 2);
        assert_eq!(s.connections(), &[conn(12, 1, 3)]);

        s.revert(ticket).unwrap();
        assert_eq!(s.annotations(), before_annotations.as_slice());
        assert_eq!(s.connections(), before_connections.as_slice());
    }

    #[test]
    fn confirmed_delete_stays_deleted() {
        let mut s = seeded();
        let ticket = s.delete_connection(11).unwrap();
        s.confirm(ticket).unwrap();
        assert_eq!(s.connections().len(), 2);
        assert_matches!(s.revert(ticket), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn creations_cannot_be_blindly_confirmed() {
        let mut s = seeded();
        let (_, ticket) = s.create_connection(1, 2, LineType::Process, vec![]).unwrap();
        assert_matches!(s.confirm(ticket), Err(CoreError::Conflict(_)));
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn connection_rules_enforced_locally() {
        let mut s = seeded();
        assert_matches!(
            s.create_connection(1, 1, LineType::Process, vec![]),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            s.create_connection(1, 99, LineType::Process, vec![]),
            Err(CoreError::NotFound { entity: "Annotation", id: 99 })
        );
    }

    #[test]
    fn failed_connection_update_restores_waypoints() {
        let mut s = seeded();
        let ticket = s
            .update_connection(10, LineType::Instrument, vec![Point::new(1.0, 2.0)])
            .unwrap();
        assert_eq!(s.connections()[0].line_type, LineType::Instrument);
        s.revert(ticket).unwrap();
        assert_eq!(s.connections()[0], conn(10, 1, 2));
    }

    #[test]
    fn reload_drops_pending_tickets() {
        let mut s = seeded();
        let ticket = s.delete_annotation(1).unwrap();
        s.reload(vec![ann(1, 0.0)], vec![]);
        assert_eq!(s.pending_count(), 0);
        assert!(s.revert(ticket).is_err());
    }

    fn create_box(s: &mut EditSession) -> (DbId, PendingChange) {
        s.create_annotation(BoundingBox::new(5.0, 5.0, 30.0, 30.0), AnnotationSource::Manual)
            .unwrap()
    }

    #[test]
    fn move_pending_on_unsettled_create_survives_reconcile() {
        let mut s = seeded();
        let (temp, created) = create_box(&mut s);
        let moved = s.move_annotation(temp, BoundingBox::new(200.0, 200.0, 30.0, 30.0)).unwrap();

        let server = PageAnnotation::manual(42, BoundingBox::new(5.0, 5.0, 30.0, 30.0));
        assert_eq!(s.reconcile_annotation(created, server).unwrap(), 42);

        let last = s.annotations().last().unwrap();
        assert_eq!(last.id, 42);
        assert_eq!(last.bbox.x, 200.0);

        s.revert(moved).unwrap();
        let last = s.annotations().last().unwrap();
        assert_eq!(last.id, 42);
        assert_eq!(last.bbox, BoundingBox::new(5.0, 5.0, 30.0, 30.0));
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn move_pending_on_unsettled_create_can_be_reconciled() {
        let mut s = seeded();
        let (temp, created) = create_box(&mut s);
        let moved = s.move_annotation(temp, BoundingBox::new(200.0, 200.0, 30.0, 30.0)).unwrap();
        s.reconcile_annotation(created, PageAnnotation::manual(42, BoundingBox::new(5.0, 5.0, 30.0, 30.0)))
            .unwrap();

        let server = PageAnnotation::manual(42, BoundingBox::new(200.0, 200.0, 30.0, 30.0));
        assert_eq!(s.reconcile_annotation(moved, server.clone()).unwrap(), 42);
        assert_eq!(s.annotations().last().unwrap(), &server);
    }

    #[test]
    fn earlier_update_reconcile_keeps_later_local_edit() {
        let mut s = seeded();
        let first = s.move_annotation(2, BoundingBox::new(300.0, 10.0, 20.0, 20.0)).unwrap();
        s.move_annotation(2, BoundingBox::new(400.0, 10.0, 20.0, 20.0)).unwrap();

        s.reconcile_annotation(first, PageAnnotation::manual(2, BoundingBox::new(300.0, 10.0, 20.0, 20.0)))
            .unwrap();
        assert_eq!(s.annotations()[1].bbox.x, 400.0);
    }

    #[test]
    fn delete_of_unsettled_create_reverts_under_real_id() {
        let mut s = seeded();
        let (temp, created) = create_box(&mut s);
        let (conn_temp, conn_created) = s.create_connection(temp, 1, LineType::Process, vec![]).unwrap();
        let deleted = s.delete_annotation(temp).unwrap();
        assert!(s.connections().iter().all(|c| c.id != conn_temp));

        s.reconcile_annotation(created, PageAnnotation::manual(42, BoundingBox::new(5.0, 5.0, 30.0, 30.0)))
            .unwrap();
        let mut server_conn = conn(77, 42, 1);
        server_conn.line_type = LineType::Process;
        s.reconcile_connection(conn_created, server_conn).unwrap();

        s.revert(deleted).unwrap();
        let last = s.annotations().last().unwrap();
        assert_eq!(last.id, 42);
        assert_eq!(last.bbox.x, 5.0);
        let restored = s.connections().iter().find(|c| c.id == 77).unwrap();
        assert_eq!(restored.from_annotation_id, 42);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn reconcile_with_wrong_kind_keeps_ticket() {
        let mut s = seeded();
        let ticket = s.delete_annotation(1).unwrap();
        assert_matches!(
            s.reconcile_annotation(ticket, ann(1, 0.0)),
            Err(CoreError::Conflict(_))
        );
        assert_eq!(s.pending_count(), 1);
        s.revert(ticket).unwrap();
        assert_eq!(s.annotations().len(), 3);
    }
}
