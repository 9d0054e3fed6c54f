//! Arrow catalog collaborator.
//!
//! The matching engine only needs two capabilities from a catalog: a filtered
//! range search returning record summaries, and a lookup of full spine detail
//! by id. [`InMemoryCatalog`] implements both over a vector of records and is
//! what tests and demos use; a database-backed catalog lives with the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One stocked spine of an arrow model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineSpecification {
    /// Spine number, or pound rating for wood shafts
    pub spine: f64,
    #[serde(default)]
    pub outer_diameter: Option<f64>,
    #[serde(default)]
    pub inner_diameter: Option<f64>,
    /// Shaft mass (grains per inch)
    pub gpi_weight: f64,
    /// Available cut lengths (inches)
    #[serde(default)]
    pub length_options: Vec<f64>,
}

impl SpineSpecification {
    pub fn new(spine: f64, gpi_weight: f64, outer_diameter: Option<f64>) -> Self {
        Self { spine, outer_diameter, inner_diameter: None, gpi_weight, length_options: Vec::new() }
    }

    /// Spine value usable for matching
    pub fn is_valid(&self) -> bool {
        self.spine.is_finite() && self.spine > 0.0
    }
}

/// Full catalog entry for one arrow model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowCatalogRecord {
    pub id: u64,
    pub manufacturer: String,
    pub model_name: String,
    pub material: String,
    #[serde(default)]
    pub arrow_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub spine_specifications: Vec<SpineSpecification>,
}

impl ArrowCatalogRecord {
    pub fn is_wood(&self) -> bool {
        self.material.trim().eq_ignore_ascii_case("wood")
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            id: self.id,
            manufacturer: self.manufacturer.clone(),
            model_name: self.model_name.clone(),
            material: self.material.clone(),
            arrow_type: self.arrow_type.clone(),
            spine_count: self.spine_specifications.len(),
        }
    }
}

/// Lightweight search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub id: u64,
    pub manufacturer: String,
    pub model_name: String,
    pub material: String,
    pub arrow_type: Option<String>,
    pub spine_count: usize,
}

/// Range/filter search over the catalog.
///
/// A record matches when at least one of its spine specifications lies within
/// `[spine_min, spine_max]` and satisfies the diameter and GPI bounds, and the
/// record itself passes the manufacturer, material and arrow-type filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub spine_min: f64,
    pub spine_max: f64,
    /// Case-insensitive substrings; empty means any manufacturer
    #[serde(default)]
    pub manufacturers: Vec<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub arrow_type: Option<String>,
    #[serde(default)]
    pub diameter_min: Option<f64>,
    #[serde(default)]
    pub diameter_max: Option<f64>,
    #[serde(default)]
    pub gpi_min: Option<f64>,
    #[serde(default)]
    pub gpi_max: Option<f64>,
    pub limit: usize,
}

impl CatalogQuery {
    pub fn spine_window(spine_min: f64, spine_max: f64, limit: usize) -> Self {
        Self {
            spine_min,
            spine_max,
            manufacturers: Vec::new(),
            material: None,
            arrow_type: None,
            diameter_min: None,
            diameter_max: None,
            gpi_min: None,
            gpi_max: None,
            limit,
        }
    }

    fn spec_matches(&self, spec: &SpineSpecification) -> bool {
        if !spec.is_valid() || spec.spine < self.spine_min || spec.spine > self.spine_max {
            return false;
        }
        if let Some(d) = spec.outer_diameter {
            if self.diameter_min.is_some_and(|min| d < min) || self.diameter_max.is_some_and(|max| d > max) {
                return false;
            }
        }
        !(self.gpi_min.is_some_and(|min| spec.gpi_weight < min)
            || self.gpi_max.is_some_and(|max| spec.gpi_weight > max))
    }

    /// Whether a record satisfies this query
    pub fn matches(&self, record: &ArrowCatalogRecord) -> bool {
        if !self.manufacturers.is_empty() {
            let name = record.manufacturer.to_lowercase();
            if !self.manufacturers.iter().any(|m| name.contains(&m.to_lowercase())) {
                return false;
            }
        }
        if let Some(material) = &self.material {
            if !record.material.trim().eq_ignore_ascii_case(material.trim()) {
                return false;
            }
        }
        if let Some(arrow_type) = &self.arrow_type {
            let matches_type = record
                .arrow_type
                .as_deref()
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(arrow_type.trim()));
            if !matches_type {
                return false;
            }
        }
        record.spine_specifications.iter().any(|s| self.spec_matches(s))
    }
}

/// Read-only arrow catalog
pub trait ArrowCatalog: Send + Sync {
    /// Summaries of records matching `query`, at most `query.limit`
    fn search(&self, query: &CatalogQuery) -> Vec<CatalogSummary>;

    /// Full record with every spine specification
    fn get_arrow(&self, id: u64) -> Option<ArrowCatalogRecord>;
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: Vec<ArrowCatalogRecord>,
    index: HashMap<u64, usize>,
}

impl InMemoryCatalog {
    /// Build from records; a later record replaces an earlier one with the same id
    pub fn new(records: Vec<ArrowCatalogRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let records: Vec<ArrowCatalogRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn insert(&mut self, record: ArrowCatalogRecord) {
        match self.index.get(&record.id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.id, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ArrowCatalog for InMemoryCatalog {
    fn search(&self, query: &CatalogQuery) -> Vec<CatalogSummary> {
        self.records
            .iter()
            .filter(|r| query.matches(r))
            .take(query.limit)
            .map(ArrowCatalogRecord::summary)
            .collect()
    }

    fn get_arrow(&self, id: u64) -> Option<ArrowCatalogRecord> {
        self.index.get(&id).map(|&pos| self.records[pos].clone())
    }
}
