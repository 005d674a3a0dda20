//! Generic table with independent per-column filters.
//!
//! Rows are typed; each [`Column`] reads its cell through a plain accessor
//! function instead of indexing by key string. [`TableState`] owns only the
//! filter values and which filter popover is open. The filtered row set is a
//! pure function of (rows, filters), recomputed on every render.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::forms::FormKind;
use crate::models::Entity;
use crate::navigation::NavCommand;

/// Filter value meaning "no filtering on this column".
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    /// Case-insensitive substring match.
    Text,
    /// Case-insensitive exact match against one of the options.
    Options(Vec<String>),
}

/// What activating a cell does in the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellAction {
    Navigate { command: NavCommand },
    /// Opens a drawer; the payload matches the body of `POST /api/v1/drawers`.
    OpenForm {
        form: FormKind,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
        defaults: serde_json::Map<String, serde_json::Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub key: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CellAction>,
}

pub struct Column<R> {
    pub key: &'static str,
    pub label: &'static str,
    pub value: fn(&R) -> String,
    pub render: Option<fn(&R) -> (String, Option<CellAction>)>,
    /// Multi-valued cells (e.g. a user's roles) match an option filter when
    /// any term matches.
    pub terms: Option<fn(&R) -> Vec<String>>,
    pub filter: Option<FilterKind>,
}

impl<R> Column<R> {
    pub fn new(key: &'static str, label: &'static str, value: fn(&R) -> String) -> Self {
        Self {
            key,
            label,
            value,
            render: None,
            terms: None,
            filter: None,
        }
    }

    pub fn text_filter(mut self) -> Self {
        self.filter = Some(FilterKind::Text);
        self
    }

    pub fn options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.filter = Some(FilterKind::Options(
            options.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn render(mut self, render: fn(&R) -> (String, Option<CellAction>)) -> Self {
        self.render = Some(render);
        self
    }

    pub fn terms(mut self, terms: fn(&R) -> Vec<String>) -> Self {
        self.terms = Some(terms);
        self
    }

    fn matches(&self, row: &R, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match &self.filter {
            Some(FilterKind::Options(_)) => match self.terms {
                Some(terms) => terms(row).iter().any(|t| t.to_lowercase() == needle),
                None => (self.value)(row).to_lowercase() == needle,
            },
            _ => (self.value)(row).to_lowercase().contains(&needle),
        }
    }

    fn cell(&self, row: &R) -> Cell {
        let (text, action) = match self.render {
            Some(render) => render(row),
            None => ((self.value)(row), None),
        };
        Cell {
            key: self.key,
            text,
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EmptyState {
    Loading,
    NoData { message: String },
    NoMatches { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub key: &'static str,
    pub label: &'static str,
    pub filterable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub popover_open: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyState>,
}

/// Filter state of one rendered table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    filters: BTreeMap<String, String>,
    open_filter: Option<String>,
}

impl TableState {
    /// Sets a column filter and closes the popover, like picking a value in it.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.filters.insert(key.into(), value.into());
        self.open_filter = None;
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.filters.remove(key);
    }

    /// Opens a column's filter popover, closing any other; toggles it shut
    /// when it is already the open one.
    pub fn toggle_popover(&mut self, key: &str) {
        if self.open_filter.as_deref() == Some(key) {
            self.open_filter = None;
        } else {
            self.open_filter = Some(key.to_string());
        }
    }

    pub fn open_popover(&self) -> Option<&str> {
        self.open_filter.as_deref()
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    fn active<'a, R>(&'a self, columns: &'a [Column<R>]) -> Vec<(&'a Column<R>, &'a str)> {
        columns
            .iter()
            .filter_map(|c| {
                let value = self.filters.get(c.key)?.as_str();
                // typed text is matched as entered, spaces included
                if value.is_empty() || value == ALL {
                    None
                } else {
                    Some((c, value))
                }
            })
            .collect()
    }

    /// Rows passing every active column filter.
    pub fn apply<'r, R>(&self, columns: &[Column<R>], rows: &'r [R]) -> Vec<&'r R> {
        let active = self.active(columns);
        rows.iter()
            .filter(|row| active.iter().all(|(col, needle)| col.matches(row, needle)))
            .collect()
    }

    pub fn view<R: Entity>(
        &self,
        columns: &[Column<R>],
        rows: &[R],
        loading: bool,
        empty_message: &str,
    ) -> TableView {
        let column_views = columns
            .iter()
            .map(|c| ColumnView {
                key: c.key,
                label: c.label,
                filterable: c.filter.is_some(),
                options: match &c.filter {
                    Some(FilterKind::Options(opts)) => Some(opts.clone()),
                    _ => None,
                },
                filter: self.filters.get(c.key).cloned(),
                popover_open: self.open_filter.as_deref() == Some(c.key),
            })
            .collect();

        if loading {
            return TableView {
                columns: column_views,
                rows: Vec::new(),
                total: rows.len(),
                empty: Some(EmptyState::Loading),
            };
        }

        let visible = self.apply(columns, rows);
        let empty = if rows.is_empty() {
            Some(EmptyState::NoData {
                message: "No data available".to_string(),
            })
        } else if visible.is_empty() {
            Some(EmptyState::NoMatches {
                message: empty_message.to_string(),
            })
        } else {
            None
        };

        TableView {
            columns: column_views,
            rows: visible
                .into_iter()
                .map(|row| RowView {
                    id: row.id().to_string(),
                    cells: columns.iter().map(|c| c.cell(row)).collect(),
                })
                .collect(),
            total: rows.len(),
            empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Row {
        id: &'static str,
        name: &'static str,
        industry: &'static str,
        tags: Vec<&'static str>,
    }

    impl Entity for Row {
        fn id(&self) -> &str {
            self.id
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: "1", name: "TechCorp Inc", industry: "Technology", tags: vec!["Admin"] },
            Row { id: "2", name: "Innovate Solutions", industry: "Consulting", tags: vec!["Recruiter", "Admin"] },
            Row { id: "3", name: "FinTech Partners", industry: "Finance", tags: vec![] },
        ]
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", "Name", |r: &Row| r.name.to_string()).text_filter(),
            Column::new("industry", "Industry", |r: &Row| r.industry.to_string())
                .options(["Technology", "Consulting", "Finance"]),
            Column::new("tags", "Tags", |r: &Row| r.tags.join(", "))
                .options(["Admin", "Recruiter"])
                .terms(|r: &Row| r.tags.iter().map(|t| t.to_string()).collect()),
        ]
    }

    fn ids(rows: Vec<&Row>) -> Vec<&'static str> {
        rows.into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let mut state = TableState::default();
        state.set_filter("name", "TECH");
        assert_eq!(ids(state.apply(&columns(), &rows())), vec!["1", "3"]);
    }

    #[test]
    fn test_option_filter_is_exact_match() {
        let mut state = TableState::default();
        state.set_filter("industry", "tech");
        assert!(state.apply(&columns(), &rows()).is_empty());
        state.set_filter("industry", "technology");
        assert_eq!(ids(state.apply(&columns(), &rows())), vec!["1"]);
    }

    #[test]
    fn test_all_sentinel_and_empty_value_do_not_filter() {
        let mut state = TableState::default();
        state.set_filter("industry", "all");
        state.set_filter("name", "");
        assert_eq!(state.apply(&columns(), &rows()).len(), 3);
    }

    #[test]
    fn test_text_filter_keeps_surrounding_spaces() {
        let mut state = TableState::default();
        state.set_filter("name", "Inc ");
        assert!(state.apply(&columns(), &rows()).is_empty());
        state.set_filter("name", " Inc");
        assert_eq!(ids(state.apply(&columns(), &rows())), vec!["1"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut state = TableState::default();
        state.set_filter("name", "tech");
        state.set_filter("industry", "Finance");
        assert_eq!(ids(state.apply(&columns(), &rows())), vec!["3"]);
    }

    #[test]
    fn test_clearing_filter_restores_rows_hidden_only_by_it() {
        let mut state = TableState::default();
        state.set_filter("name", "tech");
        state.set_filter("industry", "Finance");
        state.clear_filter("industry");
        assert_eq!(ids(state.apply(&columns(), &rows())), vec!["1", "3"]);
        state.clear_filter("name");
        assert_eq!(state.apply(&columns(), &rows()).len(), 3);
    }

    #[test]
    fn test_multi_valued_option_filter_matches_any_term() {
        let mut state = TableState::default();
        state.set_filter("tags", "admin");
        assert_eq!(ids(state.apply(&columns(), &rows())), vec!["1", "2"]);
    }

    #[test]
    fn test_filter_on_unknown_column_is_ignored() {
        let mut state = TableState::default();
        state.set_filter("missing", "zzz");
        assert_eq!(state.apply(&columns(), &rows()).len(), 3);
    }

    #[test]
    fn test_only_one_popover_open() {
        let mut state = TableState::default();
        state.toggle_popover("name");
        state.toggle_popover("industry");
        assert_eq!(state.open_popover(), Some("industry"));
        state.toggle_popover("industry");
        assert_eq!(state.open_popover(), None);
        state.toggle_popover("name");
        state.set_filter("name", "x");
        assert_eq!(state.open_popover(), None);
    }

    #[test]
    fn test_empty_states_are_distinct() {
        let state = TableState::default();
        let view = state.view(&columns(), &[], false, "No clients match");
        assert!(matches!(view.empty, Some(EmptyState::NoData { .. })));

        let mut state = TableState::default();
        state.set_filter("name", "nothing-like-this");
        let view = state.view(&columns(), &rows(), false, "No clients match");
        assert_eq!(
            view.empty,
            Some(EmptyState::NoMatches {
                message: "No clients match".to_string()
            })
        );
        assert_eq!(view.total, 3);

        let view = state.view(&columns(), &rows(), true, "No clients match");
        assert_eq!(view.empty, Some(EmptyState::Loading));
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_view_renders_cells_in_column_order() {
        let state = TableState::default();
        let view = state.view(&columns(), &rows(), false, "");
        assert_eq!(view.rows.len(), 3);
        let keys: Vec<_> = view.rows[1].cells.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["name", "industry", "tags"]);
        assert_eq!(view.rows[1].cells[2].text, "Recruiter, Admin");
    }
}
