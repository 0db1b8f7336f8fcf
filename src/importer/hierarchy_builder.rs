// ==========================================
// Hierarchy builder
// ==========================================
// Folds validated price rows into the Section -> Subsection -> Group tree
// and merges the auxiliary sheets by part number. Grouping key is the raw
// label text; group ids are sequential in first-appearance order and only
// stable within one snapshot.
// ==========================================

use crate::domain::{
    CatalogueSnapshot, CatalogueTree, DiscontinuedRecord, GroupNode, MasterDataRecord,
    NewReleaseRecord, PartNumberState, PriceListRecord, ReferenceRecord, SectionNode,
    SubsectionNode,
};
use crate::importer::report::ImportViolation;
use std::collections::{HashMap, HashSet};

/// Build result: the snapshot plus everything worth reporting
#[derive(Debug)]
pub struct BuildOutcome {
    pub snapshot: CatalogueSnapshot,
    pub violations: Vec<ImportViolation>,
}

/// Fold validated records into a catalogue snapshot
///
/// Duplicate keys keep the first occurrence and report a conflict.
/// Dangling auxiliary records are reported and still persisted: flags and
/// master data create a bare part number, reference edges are kept as
/// given because supersession may point outside the price list.
pub fn build_catalogue(
    price_rows: Vec<PriceListRecord>,
    master_data: Vec<MasterDataRecord>,
    new_releases: Vec<NewReleaseRecord>,
    discontinued: Vec<DiscontinuedRecord>,
    references: Vec<ReferenceRecord>,
) -> BuildOutcome {
    let mut violations = Vec::new();

    let mut sections: Vec<SectionNode> = Vec::new();
    let mut next_group_id: i64 = 1;

    let mut part_numbers: Vec<PartNumberState> = Vec::new();
    let mut part_index: HashMap<String, usize> = HashMap::new();

    // ===== Price rows -> tree =====
    for record in price_rows {
        if part_index.contains_key(&record.part_no) {
            violations.push(ImportViolation::conflict(
                record.part_no.clone(),
                "duplicate part number in the price list, first row kept".to_string(),
            ));
            continue;
        }

        part_index.insert(record.part_no.clone(), part_numbers.len());
        part_numbers.push(PartNumberState {
            part_no: record.part_no.clone(),
            new_release: false,
            discontinued: false,
        });

        let section = section_entry(&mut sections, &record.section);
        let subsection = subsection_entry(section, &record.subsection);
        let group = group_entry(subsection, &record.group, &mut next_group_id);
        group.parts.push(record);
    }

    // ===== Lifecycle flags =====
    for NewReleaseRecord { part_no } in new_releases {
        match part_index.get(&part_no) {
            Some(&idx) => part_numbers[idx].new_release = true,
            None => {
                violations.push(ImportViolation::warning(
                    part_no.clone(),
                    "new release flag for a part number absent from the price list".to_string(),
                ));
                part_index.insert(part_no.clone(), part_numbers.len());
                part_numbers.push(PartNumberState {
                    part_no,
                    new_release: true,
                    discontinued: false,
                });
            }
        }
    }

    for DiscontinuedRecord { part_no } in discontinued {
        match part_index.get(&part_no) {
            Some(&idx) => part_numbers[idx].discontinued = true,
            None => {
                violations.push(ImportViolation::warning(
                    part_no.clone(),
                    "discontinued flag for a part number absent from the price list".to_string(),
                ));
                part_index.insert(part_no.clone(), part_numbers.len());
                part_numbers.push(PartNumberState {
                    part_no,
                    new_release: false,
                    discontinued: true,
                });
            }
        }
    }

    // ===== Master data, 1:1 by part number =====
    let mut kept_master_data: Vec<MasterDataRecord> = Vec::new();
    let mut seen_master: HashSet<String> = HashSet::new();
    for record in master_data {
        if !seen_master.insert(record.part_no.clone()) {
            violations.push(ImportViolation::conflict(
                record.part_no.clone(),
                "duplicate master data row, first row kept".to_string(),
            ));
            continue;
        }

        if !part_index.contains_key(&record.part_no) {
            violations.push(ImportViolation::warning(
                record.part_no.clone(),
                "master data for a part number absent from the price list".to_string(),
            ));
            part_index.insert(record.part_no.clone(), part_numbers.len());
            part_numbers.push(PartNumberState {
                part_no: record.part_no.clone(),
                new_release: false,
                discontinued: false,
            });
        }

        kept_master_data.push(record);
    }

    // ===== Supersession edges =====
    for edge in &references {
        for endpoint in [&edge.predecessor, &edge.successor] {
            if !part_index.contains_key(endpoint) {
                violations.push(ImportViolation::info(
                    endpoint.clone(),
                    "reference endpoint absent from the price list".to_string(),
                ));
                part_index.insert(endpoint.clone(), part_numbers.len());
                part_numbers.push(PartNumberState {
                    part_no: endpoint.clone(),
                    new_release: false,
                    discontinued: false,
                });
            }
        }
    }

    BuildOutcome {
        snapshot: CatalogueSnapshot {
            tree: CatalogueTree { sections },
            part_numbers,
            master_data: kept_master_data,
            references,
        },
        violations,
    }
}

fn section_entry<'a>(sections: &'a mut Vec<SectionNode>, title: &str) -> &'a mut SectionNode {
    let idx = match sections.iter().position(|s| s.title == title) {
        Some(idx) => idx,
        None => {
            sections.push(SectionNode {
                title: title.to_string(),
                subsections: Vec::new(),
            });
            sections.len() - 1
        }
    };
    &mut sections[idx]
}

fn subsection_entry<'a>(section: &'a mut SectionNode, title: &str) -> &'a mut SubsectionNode {
    let idx = match section.subsections.iter().position(|s| s.title == title) {
        Some(idx) => idx,
        None => {
            section.subsections.push(SubsectionNode {
                title: title.to_string(),
                groups: Vec::new(),
            });
            section.subsections.len() - 1
        }
    };
    &mut section.subsections[idx]
}

fn group_entry<'a>(
    subsection: &'a mut SubsectionNode,
    title: &str,
    next_group_id: &mut i64,
) -> &'a mut GroupNode {
    let idx = match subsection.groups.iter().position(|g| g.title == title) {
        Some(idx) => idx,
        None => {
            subsection.groups.push(GroupNode {
                id: *next_group_id,
                title: title.to_string(),
                parts: Vec::new(),
            });
            *next_group_id += 1;
            subsection.groups.len() - 1
        }
    };
    &mut subsection.groups[idx]
}
