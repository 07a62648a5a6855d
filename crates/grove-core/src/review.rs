//! Candidate review state for capture matching.
//!
//! An upstream matching process proposes candidate groups that may show the
//! same tree as the capture under review. The operator opens each group's
//! images, then reports "same tree" or "different tree".
//!
//! [`CandidateReviewQueue`] owns only the expanded/collapsed state of each
//! group. Decisions go out through a [`DecisionSink`]; the sink holds the
//! authoritative candidate list and is the only party that may remove a
//! group from it.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::models::{CandidateGroup, Decision, GroupId};
use crate::traits::DecisionSink;

/// One row of the review list, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateView<'a> {
    /// 1-based position in the list.
    pub position: usize,
    pub group_id: GroupId,
    pub label: String,
    pub expanded: bool,
    /// Images to review. Empty while collapsed; the group's primary image
    /// when it has no captures.
    pub images: Vec<&'a str>,
}

/// Per-group expansion state plus the decision callback.
pub struct CandidateReviewQueue {
    groups: Arc<[CandidateGroup]>,
    expanded: HashSet<GroupId>,
    sink: Box<dyn DecisionSink>,
}

impl CandidateReviewQueue {
    /// Start a review session. Every group begins expanded.
    pub fn new(groups: Arc<[CandidateGroup]>, sink: impl DecisionSink + 'static) -> Self {
        let expanded = all_ids(&groups);
        Self {
            groups,
            expanded,
            sink: Box::new(sink),
        }
    }

    pub fn groups(&self) -> &[CandidateGroup] {
        &self.groups
    }

    /// Hand the queue the current candidate list.
    ///
    /// Passing the same list again (same allocation) keeps the expansion
    /// state. A different list resets it: every group in the new list is
    /// expanded, and nothing carries over from the old one. Returns whether a
    /// reset happened.
    pub fn sync_groups(&mut self, groups: Arc<[CandidateGroup]>) -> bool {
        if Arc::ptr_eq(&self.groups, &groups) {
            return false;
        }
        self.expanded = all_ids(&groups);
        self.groups = groups;
        debug!(
            subsystem = "review",
            component = "queue",
            op = "reset",
            result_count = self.groups.len(),
            "Candidate list replaced, all groups expanded"
        );
        true
    }

    pub fn is_expanded(&self, group_id: GroupId) -> bool {
        self.expanded.contains(&group_id)
    }

    /// Expanded group ids in list order.
    pub fn expanded_ids(&self) -> Vec<GroupId> {
        self.groups
            .iter()
            .map(|g| g.id)
            .filter(|id| self.expanded.contains(id))
            .collect()
    }

    /// Show a group's images. Idempotent. Ids not in the list are ignored.
    ///
    /// Returns whether the state changed.
    pub fn expand(&mut self, group_id: GroupId) -> bool {
        if !self.contains(group_id) {
            debug!(
                subsystem = "review",
                group_id,
                "Ignoring expand for unknown group"
            );
            return false;
        }
        self.expanded.insert(group_id)
    }

    /// Hide a group's images. Idempotent. Records no decision.
    ///
    /// Returns whether the state changed.
    pub fn collapse(&mut self, group_id: GroupId) -> bool {
        self.expanded.remove(&group_id)
    }

    /// Flip a group between expanded and collapsed.
    pub fn toggle(&mut self, group_id: GroupId) -> bool {
        if self.is_expanded(group_id) {
            self.collapse(group_id)
        } else {
            self.expand(group_id)
        }
    }

    /// Report that a group shows the same tree.
    ///
    /// Local state is untouched; the sink is expected to drop the group from
    /// the candidate list it owns.
    pub fn report_same_tree(&self, group_id: GroupId) {
        debug!(
            subsystem = "review",
            component = "queue",
            op = "same_tree",
            group_id,
            "Reporting same tree"
        );
        self.sink.on_decision(group_id, Decision::Same);
    }

    /// Report that a group shows a different tree.
    ///
    /// Collapses the group, reports the decision, and returns the id for the
    /// caller's own bookkeeping.
    pub fn report_different_tree(&mut self, group_id: GroupId) -> GroupId {
        self.collapse(group_id);
        debug!(
            subsystem = "review",
            component = "queue",
            op = "different_tree",
            group_id,
            "Reporting different tree"
        );
        self.sink.on_decision(group_id, Decision::Different);
        group_id
    }

    /// Rows for rendering, in input order.
    pub fn views(&self) -> Vec<CandidateView<'_>> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let expanded = self.expanded.contains(&group.id);
                CandidateView {
                    position: i + 1,
                    group_id: group.id,
                    label: group.label(),
                    expanded,
                    images: if expanded { review_images(group) } else { Vec::new() },
                }
            })
            .collect()
    }

    fn contains(&self, group_id: GroupId) -> bool {
        self.groups.iter().any(|g| g.id == group_id)
    }
}

fn all_ids(groups: &[CandidateGroup]) -> HashSet<GroupId> {
    groups.iter().map(|g| g.id).collect()
}

fn review_images(group: &CandidateGroup) -> Vec<&str> {
    if group.captures.is_empty() {
        vec![group.image_url.as_str()]
    } else {
        group.captures.iter().map(|c| c.image_url.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateCapture;
    use std::sync::Mutex;

    fn group(id: GroupId, captures: usize) -> CandidateGroup {
        CandidateGroup {
            id,
            tree_id: id * 100,
            image_url: format!("https://img/tree-{}.jpg", id),
            captures: (0..captures as i64)
                .map(|c| CandidateCapture {
                    id: id * 10 + c,
                    image_url: format!("https://img/capture-{}-{}.jpg", id, c),
                })
                .collect(),
        }
    }

    fn groups(ids: &[GroupId]) -> Arc<[CandidateGroup]> {
        ids.iter().map(|&id| group(id, 2)).collect()
    }

    fn recording_queue(
        list: Arc<[CandidateGroup]>,
    ) -> (CandidateReviewQueue, Arc<Mutex<Vec<(GroupId, Decision)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink_log = Arc::clone(&log);
        let queue = CandidateReviewQueue::new(list, move |id: GroupId, decision: Decision| {
            sink_log.lock().unwrap().push((id, decision));
        });
        (queue, log)
    }

    #[test]
    fn test_all_groups_start_expanded() {
        let (queue, _) = recording_queue(groups(&[1, 2, 3]));
        assert_eq!(queue.expanded_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_collapse_survives_same_list() {
        let list = groups(&[1, 2, 3]);
        let (mut queue, _) = recording_queue(Arc::clone(&list));

        assert!(queue.collapse(2));
        assert!(!queue.sync_groups(Arc::clone(&list)));
        assert_eq!(queue.expanded_ids(), vec![1, 3]);
    }

    #[test]
    fn test_new_list_resets_expansion() {
        let (mut queue, _) = recording_queue(groups(&[1, 2, 3]));
        queue.collapse(1);
        queue.collapse(2);

        assert!(queue.sync_groups(groups(&[4, 5])));
        assert_eq!(queue.expanded_ids(), vec![4, 5]);
        assert!(!queue.is_expanded(3));
    }

    #[test]
    fn test_equal_but_distinct_list_still_resets() {
        let (mut queue, _) = recording_queue(groups(&[1, 2]));
        queue.collapse(1);
        assert!(queue.sync_groups(groups(&[1, 2])));
        assert_eq!(queue.expanded_ids(), vec![1, 2]);
    }

    #[test]
    fn test_expand_and_collapse_are_idempotent() {
        let (mut queue, _) = recording_queue(groups(&[1, 2]));
        assert!(!queue.expand(1));
        assert!(queue.collapse(1));
        assert!(!queue.collapse(1));
        assert!(queue.expand(1));
        assert!(!queue.expand(1));
        assert_eq!(queue.expanded_ids(), vec![1, 2]);
    }

    #[test]
    fn test_expand_unknown_group_is_ignored() {
        let (mut queue, _) = recording_queue(groups(&[1]));
        assert!(!queue.expand(99));
        assert!(!queue.is_expanded(99));
    }

    #[test]
    fn test_toggle() {
        let (mut queue, _) = recording_queue(groups(&[1]));
        assert!(queue.toggle(1));
        assert!(!queue.is_expanded(1));
        assert!(queue.toggle(1));
        assert!(queue.is_expanded(1));
    }

    #[test]
    fn test_same_tree_reports_without_local_change() {
        let (queue, log) = recording_queue(groups(&[1, 2, 3]));
        queue.report_same_tree(2);

        assert_eq!(*log.lock().unwrap(), vec![(2, Decision::Same)]);
        assert_eq!(queue.expanded_ids(), vec![1, 2, 3]);
        assert_eq!(queue.groups().len(), 3);
    }

    #[test]
    fn test_different_tree_collapses_and_reports() {
        let (mut queue, log) = recording_queue(groups(&[1, 2, 3]));
        let id = queue.report_different_tree(3);

        assert_eq!(id, 3);
        assert_eq!(queue.expanded_ids(), vec![1, 2]);
        assert_eq!(*log.lock().unwrap(), vec![(3, Decision::Different)]);
        // Still addressable after collapsing.
        assert!(queue.expand(3));
    }

    #[test]
    fn test_views_hide_images_of_collapsed_groups() {
        let list: Arc<[CandidateGroup]> = vec![group(1, 2), group(2, 0)].into();
        let (mut queue, _) = recording_queue(list);

        let views = queue.views();
        assert_eq!(views[0].position, 1);
        assert_eq!(views[0].label, "Tree 100");
        assert_eq!(
            views[0].images,
            vec!["https://img/capture-1-0.jpg", "https://img/capture-1-1.jpg"]
        );
        // No captures: the primary image stands in.
        assert_eq!(views[1].images, vec!["https://img/tree-2.jpg"]);

        queue.collapse(1);
        let views = queue.views();
        assert!(!views[0].expanded);
        assert!(views[0].images.is_empty());
        assert_eq!(views.len(), 2);
    }
}
