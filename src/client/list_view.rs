use crate::data::student::Student;
use serde::Deserialize;

pub const PAGE_SIZES: [usize; 3] = [5, 10, 25];
pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZES[0];
pub const DELETE_PROMPT: &str = "Want to Delete?";

/// Search and paging state for the student table, as sent by the table's controls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListView {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of the filtered list.
#[derive(Debug, PartialEq, Eq)]
pub struct ListPage<'a> {
    pub rows: Vec<&'a Student>,
    pub matching: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
}

impl ListPage<'_> {
    pub const fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub const fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }

    /// 1-based index of the first and last row shown, for the "x-y of z" caption.
    pub fn shown_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            None
        } else {
            let first = self.page * self.page_size + 1;
            Some((first, first + self.rows.len() - 1))
        }
    }
}

impl ListView {
    /// Unknown page sizes fall back to the default rather than erroring.
    pub fn page_size(&self) -> usize {
        if PAGE_SIZES.contains(&self.page_size) {
            self.page_size
        } else {
            DEFAULT_PAGE_SIZE
        }
    }

    /// Case-insensitive substring match on the first name. An empty search matches everyone.
    pub fn matches(&self, student: &Student) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || student.first_name.to_lowercase().contains(&needle)
    }

    pub fn filter<'a>(&self, records: &'a [Student]) -> Vec<&'a Student> {
        records.iter().filter(|s| self.matches(s)).collect()
    }

    /// Filter, then cut out the requested page. A page past the end clamps to the last one.
    pub fn project<'a>(&self, records: &'a [Student]) -> ListPage<'a> {
        let page_size = self.page_size();
        let filtered = self.filter(records);
        let matching = filtered.len();
        let page_count = matching.div_ceil(page_size).max(1);
        let page = self.page.min(page_count - 1);

        let rows = filtered
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect();

        ListPage {
            rows,
            matching,
            page,
            page_count,
            page_size,
        }
    }

    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}
