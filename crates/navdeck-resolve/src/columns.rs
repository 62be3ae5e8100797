//! Column bucketing for display
//!
//! Columns carry no resolution semantics; this only arranges an already
//! resolved top-level link list under the catalog's columns.

use navdeck_model::{Column, Link};
use serde::Serialize;

/// Links rendered under one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnBucket<'a> {
    /// Target column, `None` for links whose column is unknown
    pub column: Option<&'a Column>,
    /// Links in input order
    pub links: Vec<&'a Link>,
}

/// Bucket top-level links by `column_id`
///
/// Buckets follow column order and empty columns are omitted. Links naming
/// an unknown column are collected in one trailing bucket.
#[must_use]
pub fn group_by_column<'a>(links: &'a [Link], columns: &'a [Column]) -> Vec<ColumnBucket<'a>> {
    let mut buckets: Vec<ColumnBucket<'a>> = columns
        .iter()
        .map(|column| ColumnBucket {
            column: Some(column),
            links: links.iter().filter(|link| link.column_id == column.id).collect(),
        })
        .filter(|bucket| !bucket.links.is_empty())
        .collect();

    let orphans: Vec<&Link> = links
        .iter()
        .filter(|link| !columns.iter().any(|column| column.id == link.column_id))
        .collect();
    if !orphans.is_empty() {
        buckets.push(ColumnBucket {
            column: None,
            links: orphans,
        });
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_column_order() {
        let columns = vec![Column::new("dash", "Dashboards"), Column::new("logs", "Logs")];
        let links = vec![
            Link::new("l1", "Kibana", "").with_column("logs"),
            Link::new("d1", "Grafana", "").with_column("dash"),
            Link::new("x1", "Stray", "").with_column("gone"),
            Link::new("l2", "Loki", "").with_column("logs"),
        ];

        let buckets = group_by_column(&links, &columns);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].column.map(|c| c.id.as_str()), Some("dash"));
        assert_eq!(
            buckets[1].links.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
            vec!["l1", "l2"]
        );
        assert!(buckets[2].column.is_none());
        assert_eq!(buckets[2].links[0].id, "x1");
    }

    #[test]
    fn empty_columns_are_omitted() {
        let columns = vec![Column::new("dash", "Dashboards")];
        assert!(group_by_column(&[], &columns).is_empty());
    }
}
