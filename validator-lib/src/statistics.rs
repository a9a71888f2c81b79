use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::report_builder::ReportRow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbgBanDetail {
    pub distinct_bans: usize,
    pub total_records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub distinct_sbgs: usize,
    pub sbg_ban_details: BTreeMap<String, SbgBanDetail>,
}

/// Summary of the report rows, returned next to the report bytes.
///
/// Value lists keep first-appearance order; breakdown maps are sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub total_records: usize,
    pub unique_sbg_count: usize,
    pub unique_ban_count: usize,
    pub unique_categories: usize,
    pub sbg_list: Vec<String>,
    pub category_list: Vec<String>,
    pub sbg_breakdown: BTreeMap<String, usize>,
    pub ban_breakdown: BTreeMap<String, usize>,
    pub category_breakdown: BTreeMap<String, usize>,
    pub category_details: BTreeMap<String, CategoryDetail>,
}

impl ReportStatistics {
    /// Aggregate the report rows. An empty slice yields the zeroed structure.
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let sbg_list = distinct_in_order(rows.iter().map(|row| row.sbg.as_str()));
        let category_list = distinct_in_order(rows.iter().map(|row| row.category.as_str()));
        let ban_breakdown = occurrences(rows.iter().map(|row| row.ban.as_str()));

        let category_details = category_list
            .iter()
            .map(|category| {
                let in_category: Vec<&ReportRow> =
                    rows.iter().filter(|row| &row.category == category).collect();
                let sbgs = distinct_in_order(in_category.iter().map(|row| row.sbg.as_str()));

                let sbg_ban_details = sbgs
                    .iter()
                    .map(|sbg| {
                        let bans: Vec<&str> = in_category
                            .iter()
                            .filter(|row| &row.sbg == sbg)
                            .map(|row| row.ban.as_str())
                            .collect();
                        let detail = SbgBanDetail {
                            distinct_bans: bans.iter().collect::<HashSet<_>>().len(),
                            total_records: bans.len(),
                        };
                        (sbg.clone(), detail)
                    })
                    .collect();

                let detail = CategoryDetail {
                    distinct_sbgs: sbgs.len(),
                    sbg_ban_details,
                };
                (category.clone(), detail)
            })
            .collect();

        ReportStatistics {
            total_records: rows.len(),
            unique_sbg_count: sbg_list.len(),
            unique_ban_count: ban_breakdown.len(),
            unique_categories: category_list.len(),
            sbg_breakdown: occurrences(rows.iter().map(|row| row.sbg.as_str())),
            ban_breakdown,
            category_breakdown: occurrences(rows.iter().map(|row| row.category.as_str())),
            sbg_list,
            category_list,
            category_details,
        }
    }

    /// Compact JSON, as carried in a response header
    pub fn to_header_value(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

fn occurrences<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}
