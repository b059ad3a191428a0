//! Import plan builder
//!
//! Binds every generated resource address to the live provider id so the
//! existing zones can be adopted into state instead of recreated.

use serde::{Deserialize, Serialize};

use crate::delegation::ZoneDelegation;
use crate::model::ModuleNames;
use crate::synth::{outputs::DEFAULT_ZONES_MODULE, quote};
use crate::types::{Record, Zone};

/// How an [`ImportPlan`] is rendered. One mode per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// `terraform import` command lines.
    #[default]
    Commands,
    /// `import {}` blocks for an `imports.tf` file.
    Blocks,
}

/// Kind of resource a directive adopts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Zone,
    DelegationSet,
    Record,
}

/// One resource address bound to its provider id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportDirective {
    pub kind: ResourceKind,
    pub address: String,
    pub id: String,
    /// Human readable subject (zone name or record key).
    pub label: String,
}

impl ImportDirective {
    fn comment(&self) -> String {
        match self.kind {
            ResourceKind::Zone => format!("# Import hosted zone: {}", self.label),
            ResourceKind::DelegationSet => format!("# Import delegation set: {}", self.label),
            ResourceKind::Record => format!("# Import record: {}", self.label),
        }
    }
}

/// Import plan builder
#[derive(Debug, Clone)]
pub struct ImportPlanner {
    zones_module: String,
}

impl Default for ImportPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_ZONES_MODULE)
    }
}

impl ImportPlanner {
    pub fn new(zones_module: impl Into<String>) -> Self {
        Self {
            zones_module: zones_module.into(),
        }
    }

    /// Directives for every resource the zone's artifact declares that
    /// already exists live: the zone, its records, and for a delegated zone
    /// its reusable delegation set and the parent NS record when present.
    pub fn plan(
        &self,
        zone: &Zone,
        records: &[Record],
        delegation: &ZoneDelegation,
    ) -> Vec<ImportDirective> {
        let names = ModuleNames::for_zone(&zone.name, delegation.parent.is_some());
        let zone_key = quote(&zone.name);
        let mut directives = Vec::new();

        directives.push(ImportDirective {
            kind: ResourceKind::Zone,
            address: self.address(&names.zone, "aws_route53_zone", &zone_key),
            id: zone.id.clone(),
            label: zone.name.clone(),
        });

        if let Some(parent) = &delegation.parent
            && let (Some(set_module), Some(set_id)) =
                (&names.delegation_set, &parent.delegation_set_id)
        {
            directives.push(ImportDirective {
                kind: ResourceKind::DelegationSet,
                address: self.address(set_module, "aws_route53_delegation_set", &zone_key),
                id: set_id.clone(),
                label: zone.name.clone(),
            });
        }

        for record in records.iter().filter(|r| delegation.owns(r)) {
            directives.push(self.record_directive(&names.records, record, &zone.id));
        }

        if let Some(parent) = delegation.parent.as_ref().filter(|p| p.live_record)
            && let Some(module) = &names.delegation_records
        {
            let key = format!("{} NS", parent.label);
            directives.push(ImportDirective {
                kind: ResourceKind::Record,
                address: self.address(module, "aws_route53_record", &quote(&key)),
                id: format!("{}_{}_NS", parent.parent_zone_id, zone.name),
                label: key,
            });
        }

        directives
    }

    fn record_directive(&self, module: &str, record: &Record, zone_id: &str) -> ImportDirective {
        let key = record.key();
        ImportDirective {
            kind: ResourceKind::Record,
            address: self.address(module, "aws_route53_record", &quote(&key)),
            id: record.import_id(zone_id),
            label: key,
        }
    }

    fn address(&self, module: &str, resource: &str, quoted_key: &str) -> String {
        format!(
            "module.{}.module.{module}.{resource}.this[{quoted_key}]",
            self.zones_module
        )
    }
}

// ============ Plan ============

/// Import directives of a run, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    directives: Vec<ImportDirective>,
}

impl ImportPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, directives: impl IntoIterator<Item = ImportDirective>) {
        self.directives.extend(directives);
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Render every directive in `mode`.
    pub fn render(&self, mode: ImportMode) -> String {
        match mode {
            ImportMode::Commands => self
                .directives
                .iter()
                .map(|d| {
                    format!(
                        "terraform import {} {}\n",
                        shell_quote(&d.address),
                        shell_word(&d.id)
                    )
                })
                .collect(),
            ImportMode::Blocks => self
                .directives
                .iter()
                .map(|d| {
                    format!(
                        "{}\nimport {{\n  to = {}\n  id = {}\n}}\n\n",
                        d.comment(),
                        d.address,
                        quote(&d.id)
                    )
                })
                .collect::<String>()
                .trim_end()
                .to_string()
                + "\n",
        }
    }
}

/// Single-quote `value` for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Leave plain words alone, quote anything else.
fn shell_word(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/' | ':'))
    {
        value.to_string()
    } else {
        shell_quote(value)
    }
}
