//! In-session notification list

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};
use crate::routes::Route;

/// One notification entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationItem {
    /// Display time, e.g. `08:00pm`
    pub time: String,
    pub is_seen: bool,
    pub text: String,
    /// Page the notification links to
    pub url: Route,
}

impl NotificationItem {
    pub fn new(time: impl Into<String>, text: impl Into<String>, url: Route) -> Self {
        Self {
            time: time.into(),
            is_seen: false,
            text: text.into(),
            url,
        }
    }
}

/// Ordered notifications. Order never changes and entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationList {
    items: Vec<NotificationItem>,
}

impl NotificationList {
    pub fn new(items: Vec<NotificationItem>) -> Self {
        Self { items }
    }

    /// The session's seeded notifications
    pub fn demo() -> Self {
        Self::new(vec![
            NotificationItem::new(
                "08:00pm",
                "New quiz is now available! Test your knowledge now.",
                Route::ShortQuiz,
            ),
            NotificationItem::new(
                "09:00pm",
                "Ahsan Habib, Hadi Himel and 3 people liked your blog",
                Route::Blogs,
            ),
            NotificationItem::new(
                "10:00pm",
                "New module has been added to Learning C programming course",
                Route::Courses,
            ),
            NotificationItem::new("11:00pm", "Ahsan Habib has posted a new blog", Route::Blogs),
            NotificationItem::new(
                "12:00am",
                "New Job circular available! Check them out now.",
                Route::JobCircular,
            ),
        ])
    }

    pub fn items(&self) -> &[NotificationItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NotificationItem> {
        self.items.get(index)
    }

    /// Mark one entry seen. Marking an already-seen entry is a no-op.
    pub fn mark_as_seen(&mut self, index: usize) -> Result<()> {
        let item = self
            .items
            .get_mut(index)
            .ok_or(PortalError::NotificationNotFound(index))?;
        item.is_seen = true;
        Ok(())
    }

    pub fn mark_all_as_seen(&mut self) {
        for item in &mut self.items {
            item.is_seen = true;
        }
    }

    pub fn unseen_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_seen).count()
    }
}

impl<'a> IntoIterator for &'a NotificationList {
    type Item = &'a NotificationItem;
    type IntoIter = std::slice::Iter<'a, NotificationItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
