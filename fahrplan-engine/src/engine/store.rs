use crate::engine::index::DateIndex;
use fahrplan_common::{
    model::post::{Post, PostDraft, PostStatus},
    provisional::ProvisionalIdGenerator,
};
use fahrplan_gateway::payload::Snapshot;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use time::{Date, UtcOffset};
use tracing::{debug, warn};

/// The authoritative local view of scheduled posts.
///
/// A cheaply cloneable handle; all mutation happens under one mutex, and the
/// date index is rebuilt under the same lock acquisition as the post list it
/// derives from, so readers never observe the two out of step.
#[derive(Clone)]
pub struct PostStore {
    inner: Arc<Mutex<StoreInner>>,
}

struct StoreInner {
    posts: Vec<Post>,
    index: DateIndex,
    ids: ProvisionalIdGenerator,
}

/// What a reconciliation pass did: how many snapshot entries were applied
/// and how many were dropped (malformed on the wire, or duplicate ids).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct ReconcileSummary {
    pub applied: usize,
    pub rejected: usize,
}

impl PostStore {
    #[must_use]
    pub fn new(calendar_offset: UtcOffset) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                posts: Vec::new(),
                index: DateIndex::new(calendar_offset),
                ids: ProvisionalIdGenerator::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a pending record with a freshly minted provisional id at the
    /// head of the display order and returns it. Synchronous and free of
    /// I/O, so the caller can render the post before any network round trip
    /// completes.
    pub fn optimistic_insert(&self, draft: &PostDraft) -> Post {
        let mut inner = self.lock();

        let post = Post {
            id: inner.ids.generate(),
            text_content: draft.text_content.clone(),
            platforms: draft.platforms.clone(),
            scheduled_time: draft.scheduled_time,
            image_path: draft.image_path.clone(),
            status: PostStatus::Pending,
        };
        inner.posts.insert(0, post.clone());

        let StoreInner { posts, index, .. } = &mut *inner;
        index.rebuild(posts);

        post
    }

    /// Replaces the entire collection with the snapshot: a full replace, not
    /// a merge, so an optimistic record the server has not echoed back yet
    /// disappears until a later snapshot includes it.
    ///
    /// Duplicate ids are dropped (first occurrence wins) and counted into
    /// the summary next to the entries already rejected on the wire.
    pub fn reconcile(&self, snapshot: Snapshot) -> ReconcileSummary {
        let Snapshot { posts, rejected } = snapshot;

        let mut seen = HashSet::with_capacity(posts.len());
        let mut duplicates = 0;
        let mut fresh: Vec<Post> = Vec::with_capacity(posts.len());
        for post in posts {
            if seen.insert(post.id) {
                fresh.push(post);
            } else {
                duplicates += 1;
                warn!(id = %post.id, "Dropping duplicate post id from snapshot");
            }
        }

        fresh.sort_by(|a, b| b.scheduled_time.cmp(&a.scheduled_time));

        let summary = ReconcileSummary {
            applied: fresh.len(),
            rejected: rejected + duplicates,
        };

        let mut inner = self.lock();
        inner.posts = fresh;
        let StoreInner { posts, index, .. } = &mut *inner;
        index.rebuild(posts);

        debug!(
            applied = summary.applied,
            rejected = summary.rejected,
            "Applied reconciliation snapshot"
        );
        summary
    }

    /// All posts in display order: newest scheduled time first, with
    /// optimistic records at the head until the next reconciliation.
    #[must_use]
    pub fn all_posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    /// Posts scheduled on the given calendar day, ascending by time.
    #[must_use]
    pub fn posts_for_date(&self, date: Date) -> Vec<Post> {
        let inner = self.lock();
        inner
            .index
            .ids_for(date)
            .iter()
            .filter_map(|id| inner.posts.iter().find(|post| post.id == *id))
            .cloned()
            .collect()
    }

    /// Days with at least one post, for the calendar highlight.
    #[must_use]
    pub fn occupied_dates(&self) -> Vec<Date> {
        self.lock().index.occupied_dates()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().posts.is_empty()
    }
}
