use fahrplan_common::model::{
    Id,
    post::{Post, PostMarker},
};
use std::collections::HashMap;
use time::{Date, UtcOffset};

/// Mapping from calendar date to the posts scheduled that day.
///
/// Purely derived state: rebuilt wholesale from the full post list on every
/// store mutation, never patched incrementally, so it cannot drift from the
/// collection it indexes. Within a bucket ids are ordered ascending by
/// scheduled time.
#[derive(Clone, Debug)]
pub struct DateIndex {
    offset: UtcOffset,
    buckets: HashMap<Date, Vec<Id<PostMarker>>>,
}

impl DateIndex {
    #[must_use]
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            offset,
            buckets: HashMap::new(),
        }
    }

    #[must_use]
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// The calendar day a post lands on, in this index's zone.
    #[must_use]
    pub fn bucket_of(&self, post: &Post) -> Date {
        post.scheduled_time.to_offset(self.offset).date()
    }

    pub fn rebuild(&mut self, posts: &[Post]) {
        self.buckets.clear();

        let mut ordered: Vec<&Post> = posts.iter().collect();
        ordered.sort_by_key(|post| post.scheduled_time);

        for post in ordered {
            let date = self.bucket_of(post);
            self.buckets.entry(date).or_default().push(post.id);
        }
    }

    #[must_use]
    pub fn ids_for(&self, date: Date) -> &[Id<PostMarker>] {
        self.buckets.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Days that have at least one post, for the calendar highlight.
    #[must_use]
    pub fn occupied_dates(&self) -> Vec<Date> {
        let mut dates: Vec<Date> = self.buckets.keys().copied().collect();
        dates.sort_unstable();
        dates
    }
}
