//! Dynamic SQL for contact listings.

use contacts_core::ContactFilter;
use sqlx::{Postgres, QueryBuilder};

use crate::models::CONTACT_COLUMNS;

/// Build the listing query for a validated filter.
///
/// Absent filter fields add no predicate. The sort column comes from a fixed
/// set, never from raw input; ties are broken by `id` for stable paging.
pub(crate) fn find_all_query(filter: &ContactFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {CONTACT_COLUMNS} FROM contacts"));
    let mut keyword = " WHERE ";

    if let Some(search) = &filter.search {
        builder.push(keyword).push("name ILIKE ");
        builder.push_bind(contains_pattern(search));
        keyword = " AND ";
    }

    if let Some(group) = filter.group {
        builder.push(keyword).push(r#""group" = "#);
        builder.push_bind(group.as_str());
    }

    builder
        .push(" ORDER BY ")
        .push(filter.sort_field().column())
        .push(" ")
        .push(filter.sort.as_sql())
        .push(", id ASC");
    builder
}

/// Wrap `text` in `%` wildcards, escaping LIKE metacharacters so the search
/// matches literally.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
