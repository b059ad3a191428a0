//! Aggregated outputs
//!
//! Both outputs files are rebuilt from the artifacts of the current run,
//! never patched.

use crate::types::GeneratedArtifact;

use super::hcl::{Lines, quote};

/// Name of the module the zones directory is mounted as in the root configuration.
pub const DEFAULT_ZONES_MODULE: &str = "zones";

/// `zones/outputs.tf`: one output per zone plus the combined `all_zones`.
pub fn render_zones_outputs(artifacts: &[GeneratedArtifact]) -> String {
    let mut out = Lines::new();

    for artifact in artifacts {
        out.push(0, format!("# Output {} details", artifact.zone_name));
        out.push(0, format!("output {} {{", quote(&artifact.output_name)));
        out.push(
            1,
            format!("description = {}", quote(&format!("Details for {}", artifact.zone_name))),
        );
        out.push(1, "value = {");
        zone_values(&mut out, 2, artifact);
        out.push(1, "}");
        out.push(0, "}");
        out.blank();
    }

    out.push(0, "# Combined output of all zones");
    out.push(0, "output \"all_zones\" {");
    out.push(1, "description = \"Combined information for all zones\"");
    out.push(1, "value = {");
    for artifact in artifacts {
        out.push(2, format!("{} = {{", artifact.output_name));
        zone_values(&mut out, 3, artifact);
        out.push(2, "}");
    }
    out.push(1, "}");
    out.push(0, "}");

    out.finish()
}

fn zone_values(out: &mut Lines, depth: usize, artifact: &GeneratedArtifact) {
    let zone_module = &artifact.zone.module;
    let key = quote(&artifact.zone_name);
    out.push(
        depth,
        format!("zone_id      = module.{zone_module}.route53_zone_zone_id[{key}]"),
    );
    out.push(
        depth,
        format!("name_servers = module.{zone_module}.route53_zone_name_servers[{key}]"),
    );
    match &artifact.records {
        Some(records) => out.push(
            depth,
            format!("records      = module.{}.route53_record_name", records.module),
        ),
        None => out.push(depth, "records      = {}"),
    }
}

/// Root `outputs.tf`: the combined view plus one pass-through per zone.
pub fn render_root_outputs(artifacts: &[GeneratedArtifact], zones_module: &str) -> String {
    let mut out = Lines::new();

    out.push(0, "output \"zones\" {");
    out.push(1, "description = \"All Route53 zone information\"");
    out.push(1, format!("value = module.{zones_module}.all_zones"));
    out.push(0, "}");
    out.blank();

    for artifact in artifacts {
        out.push(
            0,
            format!("output {} {{", quote(&format!("{}_details", artifact.output_name))),
        );
        out.push(
            1,
            format!("description = {}", quote(&format!("Details for {}", artifact.zone_name))),
        );
        out.push(
            1,
            format!("value = module.{zones_module}.{}", artifact.output_name),
        );
        out.push(0, "}");
        out.blank();
    }

    out.finish()
}
