//! Config synthesizer
//!
//! Renders a modelled zone into `terraform-aws-modules/route53` module blocks.

mod hcl;
pub mod outputs;

pub use hcl::{escape, quote};

use crate::delegation::ZoneDelegation;
use crate::model::ModuleNames;
use crate::types::{
    DelegationSetBlock, GeneratedArtifact, Record, RecordBody, RecordType, RecordsBlock,
    RoutingPolicy, Zone, ZoneBlock,
};

use hcl::{Lines, quote_value};

/// Registry source of the route53 submodules.
pub const MODULE_SOURCE: &str = "terraform-aws-modules/route53/aws";
/// Default version constraint of the route53 modules.
pub const DEFAULT_MODULE_VERSION: &str = "~> 5.0";

/// Config synthesizer
#[derive(Debug, Clone)]
pub struct Synthesizer {
    module_version: String,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_VERSION)
    }
}

impl Synthesizer {
    pub fn new(module_version: impl Into<String>) -> Self {
        Self {
            module_version: module_version.into(),
        }
    }

    /// Build the artifact of one zone.
    ///
    /// Records the zone does not own (NS records of delegated children) are
    /// left out. A delegated zone additionally gets its delegation set and
    /// the NS record in its parent, valued with the zone's nameservers. The
    /// zone block points at the delegation set only when the zone already
    /// uses a live reusable set.
    pub fn render(
        &self,
        zone: &Zone,
        records: &[Record],
        delegation: &ZoneDelegation,
    ) -> GeneratedArtifact {
        let names = ModuleNames::for_zone(&zone.name, delegation.parent.is_some());
        // delegation_set_id is force-new on the zone: reference live reusable sets only
        let adopts_live_set = delegation
            .parent
            .as_ref()
            .is_some_and(|p| p.delegation_set_id.is_some());

        let delegation_set = names
            .delegation_set
            .as_ref()
            .map(|module| DelegationSetBlock {
                module: module.clone(),
                reference_name: zone.name.clone(),
            });

        let owned: Vec<Record> = records
            .iter()
            .filter(|r| delegation.owns(r))
            .cloned()
            .collect();
        let records = (!owned.is_empty()).then(|| RecordsBlock {
            module: names.records.clone(),
            zone_name: zone.name.clone(),
            records: owned,
        });

        let parent_ns = delegation
            .parent
            .as_ref()
            .zip(names.delegation_records.as_ref())
            .map(|(parent, module)| RecordsBlock {
                module: module.clone(),
                zone_name: parent.parent_zone.clone(),
                records: vec![Record {
                    fqdn: zone.name.clone(),
                    name: parent.label.clone(),
                    record_type: RecordType::Ns,
                    set_identifier: None,
                    routing: RoutingPolicy::Simple,
                    body: RecordBody::Values {
                        ttl: parent.ttl,
                        values: zone.name_servers.clone(),
                    },
                    health_check_id: None,
                }],
            });

        GeneratedArtifact {
            zone_name: zone.name.clone(),
            output_name: names.base.clone(),
            module_version: self.module_version.clone(),
            zone: ZoneBlock {
                module: names.zone,
                zone_name: zone.name.clone(),
                comment: zone.comment.clone(),
                tags: zone.tags.clone(),
                delegation_set_module: delegation_set
                    .as_ref()
                    .filter(|_| adopts_live_set)
                    .map(|d| d.module.clone()),
            },
            delegation_set,
            records,
            parent_ns,
        }
    }
}

// ============ Rendering ============

impl GeneratedArtifact {
    /// Contents of the zone's `.tf` file.
    pub fn to_hcl(&self) -> String {
        let mut out = Lines::new();
        out.push(0, format!("# Terraform configuration for {}", self.zone_name));
        out.push(0, "# Generated automatically - review before applying");
        out.blank();

        if let Some(set) = &self.delegation_set {
            out.push(0, "# Create delegation set for subdomain");
            self.module_header(&mut out, &set.module, "delegation-sets");
            out.push(1, "delegation_sets = {");
            out.push(2, format!("{} = {{", quote(&set.reference_name)));
            out.push(3, format!("reference_name = {}", quote(&set.reference_name)));
            out.push(2, "}");
            out.push(1, "}");
            out.push(0, "}");
            out.blank();
        }

        self.render_zone(&mut out);

        if let Some(records) = &self.records {
            out.push(0, "# Create zone records");
            self.render_records(&mut out, records);
        }

        if let Some(parent_ns) = &self.parent_ns {
            out.push(0, "# Add NS records to the parent zone for delegation");
            self.render_records(&mut out, parent_ns);
        }

        out.finish()
    }

    fn module_header(&self, out: &mut Lines, module: &str, submodule: &str) {
        out.push(0, format!("module {} {{", quote(module)));
        out.push(1, format!("source  = \"{MODULE_SOURCE}//modules/{submodule}\""));
        out.push(1, format!("version = {}", quote(&self.module_version)));
        out.blank();
    }

    fn render_zone(&self, out: &mut Lines) {
        let zone = &self.zone;
        if self.is_delegated() {
            out.push(0, "# Create the subdomain zone");
        } else {
            out.push(0, "# Create the zone");
        }
        self.module_header(out, &zone.module, "zones");
        out.push(1, "zones = {");
        out.push(2, format!("{} = {{", quote(&zone.zone_name)));
        out.push(3, format!("comment = {}", quote(&zone.comment)));
        if let Some(set_module) = &zone.delegation_set_module {
            out.push(
                3,
                format!(
                    "delegation_set_id = module.{set_module}.route53_delegation_set_id[{}]",
                    quote(&zone.zone_name)
                ),
            );
        }
        if zone.tags.is_empty() {
            out.push(3, "tags = {}");
        } else {
            out.push(3, "tags = {");
            for (key, value) in &zone.tags {
                out.push(4, format!("{} = {}", quote(key), quote(value)));
            }
            out.push(3, "}");
        }
        out.push(2, "}");
        out.push(1, "}");
        if let Some(set_module) = &zone.delegation_set_module {
            out.blank();
            out.push(1, format!("depends_on = [module.{set_module}]"));
        }
        out.push(0, "}");
        out.blank();
    }

    fn render_records(&self, out: &mut Lines, block: &RecordsBlock) {
        self.module_header(out, &block.module, "records");
        out.push(1, format!("zone_name = {}", quote(&block.zone_name)));
        out.blank();
        out.push(1, "records = [");
        for record in &block.records {
            render_record(out, record);
        }
        out.push(1, "]");
        out.push(0, "}");
        out.blank();
    }
}

fn render_record(out: &mut Lines, record: &Record) {
    out.push(2, "{");
    out.push(3, format!("name = {}", quote(&record.name)));
    out.push(3, format!("type = {}", quote(record.record_type.as_str())));

    if let Some(set) = &record.set_identifier {
        out.push(3, format!("set_identifier = {}", quote(set)));
    }
    render_routing(out, &record.routing);
    if let Some(hc) = &record.health_check_id {
        out.push(3, format!("health_check_id = {}", quote(hc)));
    }

    match &record.body {
        RecordBody::Alias(alias) => {
            out.push(3, "alias = {");
            out.push(4, format!("name    = {}", quote(&alias.dns_name)));
            out.push(4, format!("zone_id = {}", quote(&alias.hosted_zone_id)));
            out.push(
                4,
                format!("evaluate_target_health = {}", alias.evaluate_target_health),
            );
            out.push(3, "}");
        }
        RecordBody::Values { ttl, values } => {
            let text = record.record_type.is_text();
            out.push(3, format!("ttl  = {ttl}"));
            match values.as_slice() {
                [single] => out.push(3, format!("records = [{}]", quote_value(single, text))),
                _ => {
                    out.push(3, "records = [");
                    for value in values {
                        out.push(4, format!("{},", quote_value(value, text)));
                    }
                    out.push(3, "]");
                }
            }
        }
    }

    out.push(2, "},");
}

fn render_routing(out: &mut Lines, routing: &RoutingPolicy) {
    match routing {
        RoutingPolicy::Simple => {}
        RoutingPolicy::Weighted { weight } => {
            out.push(3, "weighted_routing_policy = {");
            out.push(4, format!("weight = {weight}"));
            out.push(3, "}");
        }
        RoutingPolicy::Latency { region } => {
            out.push(3, "latency_routing_policy = {");
            out.push(4, format!("region = {}", quote(region)));
            out.push(3, "}");
        }
        RoutingPolicy::Failover { role } => {
            out.push(3, "failover_routing_policy = {");
            out.push(4, format!("type = {}", quote(role.as_str())));
            out.push(3, "}");
        }
        RoutingPolicy::Geolocation { location } => {
            out.push(3, "geolocation_routing_policy = {");
            let fields = [
                ("continent", &location.continent_code),
                ("country", &location.country_code),
                ("subdivision", &location.subdivision_code),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    out.push(4, format!("{key} = {}", quote(value)));
                }
            }
            out.push(3, "}");
        }
        RoutingPolicy::Multivalue => {
            out.push(3, "multivalue_answer_routing_policy = true");
        }
    }
}
