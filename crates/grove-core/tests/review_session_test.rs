//! End-to-end review session: the decision sink owns the candidate list and
//! feeds a new list back to the queue after each "same tree" decision.

use std::sync::{Arc, Mutex};

use grove_core::{CandidateCapture, CandidateGroup, CandidateReviewQueue, Decision, GroupId};

fn candidate(id: GroupId) -> CandidateGroup {
    CandidateGroup {
        id,
        tree_id: 5000 + id,
        image_url: format!("https://images.example/trees/{}.jpg", id),
        captures: vec![CandidateCapture {
            id: id * 7,
            image_url: format!("https://images.example/captures/{}.jpg", id * 7),
        }],
    }
}

/// Upstream owner of the candidate list.
#[derive(Default)]
struct CandidateOwner {
    candidates: Vec<CandidateGroup>,
    decisions: Vec<(GroupId, Decision)>,
}

impl CandidateOwner {
    fn apply(&mut self, group_id: GroupId, decision: Decision) {
        self.decisions.push((group_id, decision));
        if decision == Decision::Same {
            self.candidates.retain(|c| c.id != group_id);
        }
    }

    fn snapshot(&self) -> Arc<[CandidateGroup]> {
        self.candidates.clone().into()
    }
}

#[test]
fn test_review_session_with_upstream_owner() {
    let owner = Arc::new(Mutex::new(CandidateOwner {
        candidates: vec![candidate(1), candidate(2), candidate(3)],
        decisions: Vec::new(),
    }));

    let initial = owner.lock().unwrap().snapshot();
    let sink_owner = Arc::clone(&owner);
    let mut queue = CandidateReviewQueue::new(
        Arc::clone(&initial),
        move |id: GroupId, decision: Decision| sink_owner.lock().unwrap().apply(id, decision),
    );

    // Operator rules out group 1, then keeps reviewing.
    queue.report_different_tree(1);
    queue.sync_groups(Arc::clone(&initial));
    assert_eq!(queue.expanded_ids(), vec![2, 3]);

    // Group 2 is the same tree; the owner drops it and publishes a new list.
    queue.report_same_tree(2);
    assert_eq!(queue.expanded_ids(), vec![2, 3]);

    let next = owner.lock().unwrap().snapshot();
    assert!(queue.sync_groups(next));
    assert_eq!(
        queue.groups().iter().map(|g| g.id).collect::<Vec<_>>(),
        vec![1, 3]
    );
    // New list, fresh state: the earlier collapse of group 1 is gone.
    assert_eq!(queue.expanded_ids(), vec![1, 3]);

    let decisions = owner.lock().unwrap().decisions.clone();
    assert_eq!(
        decisions,
        vec![(1, Decision::Different), (2, Decision::Same)]
    );
}

#[test]
fn test_views_serialize_for_presentation() {
    let list: Arc<[CandidateGroup]> = vec![candidate(4)].into();
    let mut queue = CandidateReviewQueue::new(list, |_: GroupId, _: Decision| {});
    queue.collapse(4);

    let json = serde_json::to_value(queue.views()).unwrap();
    assert_eq!(json[0]["position"], 1);
    assert_eq!(json[0]["label"], "Tree 5004");
    assert_eq!(json[0]["expanded"], false);
    assert_eq!(json[0]["images"].as_array().unwrap().len(), 0);
}
