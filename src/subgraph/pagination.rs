//! Sequential page walking
//!
//! A page shorter than requested ends its dimension. Pages are fetched one at
//! a time since each offset depends on the previous page.

use super::SubgraphError;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

/// Offset and size of one page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub skip: usize,
    pub first: usize,
}

impl PageCursor {
    /// First page; a zero page size is bumped to one
    pub fn first_page(page_size: usize) -> Self {
        Self {
            skip: 0,
            first: page_size.max(1),
        }
    }

    pub fn next(self) -> Self {
        Self {
            skip: self.skip + self.first,
            first: self.first,
        }
    }

    /// A short page signals end of data
    pub fn is_last_page(&self, returned: usize) -> bool {
        returned < self.first
    }
}

/// One fetched page
///
/// `returned` counts the records the indexer sent, which can exceed
/// `items.len()` when malformed records were dropped. Termination is decided
/// on `returned`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub returned: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, returned: usize) -> Self {
        Self { items, returned }
    }

    /// A page where every returned record was kept
    pub fn complete(items: Vec<T>) -> Self {
        let returned = items.len();
        Self { items, returned }
    }
}

/// Records carrying an ordering timestamp
pub trait Timestamped {
    fn timestamp(&self) -> u64;
}

/// Parent records whose children are paginated independently
pub trait Nested {
    /// Children the indexer returned for this parent on the current page
    fn child_count(&self) -> usize;
}

/// Fetch flat pages until a short page, concatenating in order
pub async fn collect_pages<T, F, Fut>(
    page_size: usize,
    mut fetch: F,
) -> Result<Vec<T>, SubgraphError>
where
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = Result<Page<T>, SubgraphError>>,
{
    let mut cursor = PageCursor::first_page(page_size);
    let mut items = Vec::new();

    loop {
        let page = fetch(cursor).await?;
        let done = cursor.is_last_page(page.returned);
        items.extend(page.items);

        if done {
            break;
        }
        cursor = cursor.next();
    }

    Ok(items)
}

/// Like [`collect_pages`], dropping a leading item that repeats the previous
/// page's last timestamp
pub async fn collect_time_ordered_pages<T, F, Fut>(
    page_size: usize,
    mut fetch: F,
) -> Result<Vec<T>, SubgraphError>
where
    T: Timestamped,
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = Result<Page<T>, SubgraphError>>,
{
    let mut cursor = PageCursor::first_page(page_size);
    let mut items = Vec::new();

    loop {
        let page = fetch(cursor).await?;
        let done = cursor.is_last_page(page.returned);
        append_time_ordered(&mut items, page.items);

        if done {
            break;
        }
        cursor = cursor.next();
    }

    Ok(items)
}

/// Walk two pagination dimensions
///
/// For each outer page the inner cursor advances while any parent came back
/// with a full page of children. Every fetched page is handed to `absorb`,
/// which is expected to merge repeated parents by ID.
pub async fn walk_nested_pages<P, F, Fut, A>(
    page_size: usize,
    mut fetch: F,
    mut absorb: A,
) -> Result<(), SubgraphError>
where
    P: Nested,
    F: FnMut(PageCursor, PageCursor) -> Fut,
    Fut: Future<Output = Result<Page<P>, SubgraphError>>,
    A: FnMut(Vec<P>),
{
    let mut outer = PageCursor::first_page(page_size);

    loop {
        let mut inner = PageCursor::first_page(page_size);
        let parent_count = loop {
            let page = fetch(outer, inner).await?;
            let parents = page.returned;
            let more_children = page
                .items
                .iter()
                .any(|p| !inner.is_last_page(p.child_count()));
            absorb(page.items);

            if !more_children {
                break parents;
            }
            inner = inner.next();
        };

        if outer.is_last_page(parent_count) {
            break;
        }
        outer = outer.next();
    }

    Ok(())
}

/// Append a page, dropping its first item when it repeats the last timestamp
///
/// Only a single boundary duplicate is removed.
pub fn append_time_ordered<T: Timestamped>(items: &mut Vec<T>, page: Vec<T>) {
    let mut page = page.into_iter().peekable();

    if let (Some(last), Some(first)) = (items.last(), page.peek()) {
        if last.timestamp() == first.timestamp() {
            page.next();
        }
    }

    items.extend(page);
}

/// Order-preserving accumulator that merges parents seen more than once
#[derive(Debug)]
pub struct ParentAccumulator<K, P> {
    index: HashMap<K, usize>,
    parents: Vec<P>,
}

impl<K: Eq + Hash, P> ParentAccumulator<K, P> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            parents: Vec::new(),
        }
    }

    /// Insert a new parent or merge it into the existing one with the same key
    pub fn merge(&mut self, key: K, parent: P, merge: impl FnOnce(&mut P, P)) {
        match self.index.get(&key) {
            Some(&i) => merge(&mut self.parents[i], parent),
            None => {
                self.index.insert(key, self.parents.len());
                self.parents.push(parent);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn into_vec(self) -> Vec<P> {
        self.parents
    }
}

impl<K: Eq + Hash, P> Default for ParentAccumulator<K, P> {
    fn default() -> Self {
        Self::new()
    }
}
