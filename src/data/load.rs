use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use super::parse::{RawRecord, parse_records, split_tokens};

#[derive(Clone, Debug)]
pub struct DatasetRecord {
    pub name: String,
    pub kind: String,
    pub designtechs: Vec<String>,
    pub interoperability: String,
    pub description: String,
    pub website: String,
}

/// The loaded dataset: an ordered record list plus the interoperability
/// token cache, parsed exactly once per record and keyed by record name.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub records: Vec<DatasetRecord>,
    interop_tokens: HashMap<String, Vec<String>>,
    record_by_name: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(records: Vec<DatasetRecord>) -> Self {
        let mut interop_tokens = HashMap::with_capacity(records.len());
        let mut record_by_name = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            interop_tokens
                .entry(record.name.clone())
                .or_insert_with(|| split_tokens(&record.interoperability));
            record_by_name.entry(record.name.clone()).or_insert(index);
        }

        Self {
            records,
            interop_tokens,
            record_by_name,
        }
    }

    pub fn record(&self, name: &str) -> Option<&DatasetRecord> {
        self.record_by_name
            .get(name)
            .and_then(|&index| self.records.get(index))
    }

    /// Usage mapping: record name -> deduplicated tool list, grouped over
    /// all records sharing that name. Built on demand by the edge builder.
    pub fn usage_map(&self) -> HashMap<&str, Vec<&str>> {
        let mut map: HashMap<&str, Vec<&str>> = HashMap::new();
        for record in &self.records {
            let tools = map.entry(record.name.as_str()).or_default();
            for tool in &record.designtechs {
                if !tools.contains(&tool.as_str()) {
                    tools.push(tool.as_str());
                }
            }
        }
        map
    }

    pub fn interop_tokens(&self, name: &str) -> Option<&[String]> {
        self.interop_tokens.get(name).map(Vec::as_slice)
    }
}

pub fn load_dataset(path: &str) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {path}"))?;
    let raw_records =
        parse_records(&raw).with_context(|| format!("failed to parse dataset file {path}"))?;

    let mut records = Vec::with_capacity(raw_records.len());
    for raw_record in raw_records {
        let RawRecord {
            name,
            kind,
            designtechs,
            interoperability,
            description,
            website,
        } = raw_record;

        let name = name.trim().to_string();
        if name.is_empty() {
            // The engine assumes every record has a name; drop bad rows here.
            warn!("skipping dataset record with empty Name");
            continue;
        }

        records.push(DatasetRecord {
            name,
            kind,
            designtechs,
            interoperability,
            description,
            website,
        });
    }

    if records.is_empty() {
        return Err(anyhow!("dataset {path} contains no usable records"));
    }

    info!("loaded {} dataset records from {path}", records.len());
    Ok(Dataset::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, kind: &str, designtechs: &[&str], interop: &str) -> DatasetRecord {
        DatasetRecord {
            name: name.to_string(),
            kind: kind.to_string(),
            designtechs: designtechs.iter().map(|tool| tool.to_string()).collect(),
            interoperability: interop.to_string(),
            description: String::new(),
            website: String::new(),
        }
    }

    #[test]
    fn usage_map_groups_and_dedups_by_name() {
        let dataset = Dataset::new(vec![
            record("Acme", "Company", &["Figma", "Blender"], ""),
            record("Acme", "Company", &["Figma", "Sketch"], ""),
            record("Orbit", "Company", &[], ""),
        ]);

        let usage = dataset.usage_map();
        assert_eq!(usage["Acme"], vec!["Figma", "Blender", "Sketch"]);
        assert!(usage["Orbit"].is_empty());
    }

    #[test]
    fn interop_tokens_are_cached_per_record_name() {
        let dataset = Dataset::new(vec![record("Figma", "Tool", &[], "Sketch, Figma, Sketch")]);

        assert_eq!(
            dataset.interop_tokens("Figma"),
            Some(["Sketch", "Figma", "Sketch"].map(String::from).as_slice())
        );
        assert_eq!(dataset.interop_tokens("Sketch"), None);
    }

    #[test]
    fn record_lookup_returns_first_occurrence() {
        let dataset = Dataset::new(vec![
            record("Acme", "Company", &["Figma"], ""),
            record("Acme", "Company", &["Sketch"], ""),
        ]);

        assert_eq!(dataset.record("Acme").unwrap().designtechs, vec!["Figma"]);
        assert!(dataset.record("Ghost").is_none());
    }
}
