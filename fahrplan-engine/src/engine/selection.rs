use crate::engine::store::PostStore;
use fahrplan_common::model::post::Post;
use time::Date;

/// What a calendar-day click resulted in.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum DaySelection {
    /// The detail view opened with this many posts.
    Opened(usize),
    /// Nothing scheduled that day; the caller should show a notice.
    Empty,
}

/// Tracks what the user is currently inspecting. Pure state transitions;
/// nothing here performs I/O or is written by the store or the sync loop.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    selected_date: Option<Date>,
    selected_posts: Vec<Post>,
    detail_open: bool,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a calendar-day click. The clicked date is always recorded so
    /// the calendar highlight follows the click, even when the day is empty.
    pub fn select_date(&mut self, date: Date, store: &PostStore) -> DaySelection {
        self.selected_date = Some(date);

        let posts = store.posts_for_date(date);
        if posts.is_empty() {
            self.detail_open = false;
            DaySelection::Empty
        } else {
            let count = posts.len();
            self.selected_posts = posts;
            self.detail_open = true;
            DaySelection::Opened(count)
        }
    }

    /// Handles a click on a single post card, independent of any selected
    /// date.
    pub fn select_post(&mut self, post: Post) {
        self.selected_posts = vec![post];
        self.detail_open = true;
    }

    /// Closes the detail view but keeps the selection, so reopening shows
    /// the last thing inspected without recomputation.
    pub fn close(&mut self) {
        self.detail_open = false;
    }

    #[must_use]
    pub fn selected_date(&self) -> Option<Date> {
        self.selected_date
    }

    #[must_use]
    pub fn selected_posts(&self) -> &[Post] {
        &self.selected_posts
    }

    #[must_use]
    pub fn is_detail_open(&self) -> bool {
        self.detail_open
    }
}
