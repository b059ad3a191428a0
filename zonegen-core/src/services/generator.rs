//! 生成服务：串联 provider → model → delegation → synth/import plan → writer

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use zonegen_provider::{DnsProvider, HostedZone, ProviderError, RecordSet, ZoneScope};

use crate::delegation::{
    self, DEFAULT_DELEGATION_TTL, DelegationContext, DelegationMap, ParentDelegation,
    ZoneDelegation,
};
use crate::error::{CoreError, CoreResult};
use crate::import_plan::{ImportDirective, ImportMode, ImportPlan, ImportPlanner};
use crate::model::{ModelBuilder, ModuleNames};
use crate::synth::outputs::{DEFAULT_ZONES_MODULE, render_root_outputs, render_zones_outputs};
use crate::synth::{DEFAULT_MODULE_VERSION, Synthesizer};
use crate::types::{GeneratedArtifact, Zone};

use super::artifact_writer::{ArtifactWriter, DEFAULT_PREVIEW_LINES, WriteOutcome};

/// Default directory of the per-zone files.
pub const DEFAULT_ZONES_DIR: &str = "root/zones";

const OUTPUTS_FILE: &str = "outputs.tf";
const IMPORTS_FILE: &str = "imports.tf";

// ============ Options ============

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Directory of the per-zone files and `outputs.tf`.
    pub zones_dir: PathBuf,
    /// Root configuration directory; the parent of `zones_dir` when unset.
    pub root_dir: Option<PathBuf>,
    pub dry_run: bool,
    /// Overwrite existing zone files.
    pub force: bool,
    pub import_mode: ImportMode,
    pub module_version: String,
    /// Module name of the zones directory in the root configuration.
    pub zones_module: String,
    pub preview_lines: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            zones_dir: PathBuf::from(DEFAULT_ZONES_DIR),
            root_dir: None,
            dry_run: false,
            force: false,
            import_mode: ImportMode::default(),
            module_version: DEFAULT_MODULE_VERSION.to_string(),
            zones_module: DEFAULT_ZONES_MODULE.to_string(),
            preview_lines: DEFAULT_PREVIEW_LINES,
        }
    }
}

impl GeneratorOptions {
    /// Root configuration directory.
    pub fn root_dir(&self) -> PathBuf {
        self.root_dir.clone().unwrap_or_else(|| {
            match self.zones_dir.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            }
        })
    }

    /// Path of a zone's file.
    pub fn zone_path(&self, zone_name: &str) -> PathBuf {
        self.zones_dir.join(format!("{zone_name}.tf"))
    }

    fn validate(&self) -> CoreResult<()> {
        let valid_module = self
            .zones_module
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self
                .zones_module
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_module {
            return Err(CoreError::Usage(format!(
                "'{}' is not a valid module name",
                self.zones_module
            )));
        }
        if self.module_version.trim().is_empty() {
            return Err(CoreError::Usage("module version must not be empty".to_string()));
        }
        for dir in [&self.zones_dir, &self.root_dir()] {
            if dir.exists() && !dir.is_dir() {
                return Err(CoreError::Usage(format!(
                    "{} exists and is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

// ============ Summary ============

/// A zone (or file) that was skipped or failed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunIssue {
    pub subject: String,
    pub reason: String,
}

impl RunIssue {
    fn new(subject: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.to_string(),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Zones whose artifact was generated, in processing order.
    pub processed: Vec<String>,
    pub skipped: Vec<RunIssue>,
    pub failed: Vec<RunIssue>,
    /// Record sets left out because they could not be expressed.
    pub malformed_records: usize,
    pub import_mode: ImportMode,
    pub import_plan: ImportPlan,
    /// Files written (empty on a dry run).
    pub written: Vec<PathBuf>,
    /// Dry-run previews, in write order.
    pub previews: Vec<String>,
    pub dry_run: bool,
}

impl RunSummary {
    /// No zone was skipped and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }

    /// Import commands to print, in commands mode only.
    pub fn import_commands(&self) -> Option<String> {
        (self.import_mode == ImportMode::Commands && !self.import_plan.is_empty())
            .then(|| self.import_plan.render(ImportMode::Commands))
    }

    fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written { path } => self.written.push(path),
            WriteOutcome::Previewed { preview, .. } => self.previews.push(preview),
        }
    }
}

// ============ Service ============

struct ProcessedZone {
    artifact: GeneratedArtifact,
    directives: Vec<ImportDirective>,
    malformed: usize,
    outcome: WriteOutcome,
}

/// Generates Terraform configuration for live hosted zones.
pub struct GeneratorService {
    provider: Arc<dyn DnsProvider>,
    options: GeneratorOptions,
    synthesizer: Synthesizer,
    planner: ImportPlanner,
    writer: ArtifactWriter,
}

impl GeneratorService {
    /// Create the service; invalid options are a usage error.
    pub fn new(provider: Arc<dyn DnsProvider>, options: GeneratorOptions) -> CoreResult<Self> {
        options.validate()?;
        Ok(Self {
            provider,
            synthesizer: Synthesizer::new(options.module_version.clone()),
            planner: ImportPlanner::new(options.zones_module.clone()),
            writer: ArtifactWriter::new(options.dry_run, options.force, options.preview_lines),
            options,
        })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate every zone in `scope`.
    ///
    /// Authorization failures and a single-domain scope that does not
    /// resolve to exactly one zone abort the run. Any other problem with a
    /// zone skips or fails that zone and the run moves on.
    pub async fn run(&self, scope: &ZoneScope) -> CoreResult<RunSummary> {
        let mut summary = RunSummary {
            import_mode: self.options.import_mode,
            dry_run: self.options.dry_run,
            ..RunSummary::default()
        };

        log::info!("Fetching hosted zones");
        let zones = self.provider.list_zones(&ZoneScope::All).await?;
        log::info!("Found {} public hosted zone(s)", zones.len());

        let (unique, duplicates) = split_duplicates(&zones);
        let targets = match scope {
            ZoneScope::Single(_) => scope.select(&zones, self.provider.id())?,
            ZoneScope::All => {
                for (name, ids) in &duplicates {
                    let reason = ProviderError::AmbiguousDomain {
                        provider: self.provider.id().to_string(),
                        domain: name.clone(),
                        zone_ids: ids.clone(),
                    };
                    log::warn!("Skipping {name}: {reason}");
                    for _ in ids {
                        summary.skipped.push(RunIssue::new(name.clone(), &reason));
                    }
                }
                unique.clone()
            }
        };

        let delegations = delegation::resolve(&unique);
        let reusable_sets = if targets.iter().any(|z| delegations.is_delegated(&z.name)) {
            self.provider
                .list_delegation_sets()
                .await?
                .into_iter()
                .map(|s| s.id)
                .collect()
        } else {
            HashSet::new()
        };

        let mut cache = HashMap::new();
        let mut artifacts = Vec::new();
        let mut plan = ImportPlan::new();
        let mut claimed: HashMap<String, String> = HashMap::new();

        for zone in &targets {
            if let Err(reason) = claim_module_names(&mut claimed, zone, &delegations) {
                log::warn!("Skipping {}: {reason}", zone.name);
                summary.skipped.push(RunIssue::new(zone.name.clone(), reason));
                continue;
            }

            let path = self.options.zone_path(&zone.name);
            if let Err(e) = self.writer.check_collision(&path) {
                log::warn!("Skipping {}: {e}", zone.name);
                summary.skipped.push(RunIssue::new(zone.name.clone(), e));
                continue;
            }

            match self
                .process_zone(zone, &delegations, &reusable_sets, &mut cache, &path)
                .await
            {
                Ok(done) => {
                    summary.processed.push(zone.name.clone());
                    summary.malformed_records += done.malformed;
                    summary.record(done.outcome);
                    plan.extend(done.directives);
                    artifacts.push(done.artifact);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    if e.is_expected() {
                        log::warn!("Failed to generate {}: {e}", zone.name);
                    } else {
                        log::error!("Failed to generate {}: {e}", zone.name);
                    }
                    summary.failed.push(RunIssue::new(zone.name.clone(), e));
                }
            }
        }

        if !artifacts.is_empty() {
            self.write_aggregates(&artifacts, &plan, &mut summary);
        }
        summary.import_plan = plan;

        log::info!(
            "Processed {} zone(s), skipped {}, failed {}",
            summary.processed.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn process_zone(
        &self,
        hosted: &HostedZone,
        delegations: &DelegationMap,
        reusable_sets: &HashSet<String>,
        cache: &mut HashMap<String, Vec<RecordSet>>,
        path: &Path,
    ) -> CoreResult<ProcessedZone> {
        log::info!("Processing zone {} ({})", hosted.name, hosted.id);

        let detail = self.provider.get_zone(&hosted.id).await?;
        let tags = self.provider.list_tags(&hosted.id).await?;
        let raw = self.records_for(&hosted.id, cache).await?.to_vec();
        let model = ModelBuilder::build(&detail, raw, tags);
        log::info!(
            "{}: {} record(s), {} skipped",
            model.zone.name,
            model.records.len(),
            model.malformed.len()
        );

        let context = delegations.context_for(&model.zone.name);
        let delegation = self
            .zone_delegation(&model.zone, context, reusable_sets, cache)
            .await?;

        let artifact = self
            .synthesizer
            .render(&model.zone, &model.records, &delegation);
        let outcome = self.writer.write(path, &artifact.to_hcl())?;
        let directives = self.planner.plan(&model.zone, &model.records, &delegation);

        Ok(ProcessedZone {
            artifact,
            directives,
            malformed: model.malformed.len(),
            outcome,
        })
    }

    /// Collect the live facts of a zone's delegation.
    async fn zone_delegation(
        &self,
        zone: &Zone,
        context: DelegationContext<'_>,
        reusable_sets: &HashSet<String>,
        cache: &mut HashMap<String, Vec<RecordSet>>,
    ) -> CoreResult<ZoneDelegation> {
        let child_labels = context.children.iter().map(|l| l.label.clone()).collect();

        let Some(link) = context.parent else {
            return Ok(ZoneDelegation {
                parent: None,
                child_labels,
            });
        };
        log::info!("{} is delegated from {}", zone.name, link.parent);

        let parent_records = self.records_for(&link.parent_id, cache).await?;
        let live = parent_records.iter().find(|r| {
            r.record_type.eq_ignore_ascii_case("NS")
                && r.set_identifier.is_none()
                && r.name.eq_ignore_ascii_case(&zone.name)
        });
        if live.is_none() {
            log::warn!(
                "{} has no NS record for {}; it will be created on apply",
                link.parent,
                zone.name
            );
        }

        let delegation_set_id = zone
            .delegation_set_id
            .clone()
            .filter(|id| reusable_sets.contains(id));
        if delegation_set_id.is_none() {
            log::warn!(
                "{} does not use a reusable delegation set; the zone keeps its current nameservers",
                zone.name
            );
        }

        Ok(ZoneDelegation {
            parent: Some(ParentDelegation {
                parent_zone: link.parent.clone(),
                parent_zone_id: link.parent_id.clone(),
                label: link.label.clone(),
                ttl: live
                    .and_then(|r| r.ttl)
                    .unwrap_or(DEFAULT_DELEGATION_TTL),
                live_record: live.is_some(),
                delegation_set_id,
            }),
            child_labels,
        })
    }

    /// Record sets of a zone, listed at most once per run.
    async fn records_for<'c>(
        &self,
        zone_id: &str,
        cache: &'c mut HashMap<String, Vec<RecordSet>>,
    ) -> CoreResult<&'c [RecordSet]> {
        if !cache.contains_key(zone_id) {
            let records = self.provider.list_records(zone_id).await?;
            cache.insert(zone_id.to_string(), records);
        }
        Ok(cache.get(zone_id).map(Vec::as_slice).unwrap_or_default())
    }

    /// Regenerate both outputs files and, in blocks mode, the imports file.
    fn write_aggregates(
        &self,
        artifacts: &[GeneratedArtifact],
        plan: &ImportPlan,
        summary: &mut RunSummary,
    ) {
        let root_dir = self.options.root_dir();
        let mut files = vec![
            (
                self.options.zones_dir.join(OUTPUTS_FILE),
                render_zones_outputs(artifacts),
            ),
            (
                root_dir.join(OUTPUTS_FILE),
                render_root_outputs(artifacts, &self.options.zones_module),
            ),
        ];
        if self.options.import_mode == ImportMode::Blocks {
            files.push((root_dir.join(IMPORTS_FILE), plan.render(ImportMode::Blocks)));
        }

        for (path, content) in files {
            match self.writer.write(&path, &content) {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    log::error!("{e}");
                    summary
                        .failed
                        .push(RunIssue::new(path.display().to_string(), e));
                }
            }
        }
    }
}

/// Reserve the module and output names of a zone, or name the zone that
/// already holds one of them.
fn claim_module_names(
    claimed: &mut HashMap<String, String>,
    zone: &HostedZone,
    delegations: &DelegationMap,
) -> Result<(), String> {
    let names = ModuleNames::for_zone(&zone.name, delegations.is_delegated(&zone.name));
    let ids = names.identifiers();
    if let Some((id, owner)) = ids
        .iter()
        .find_map(|id| claimed.get(*id).map(|owner| (*id, owner)))
    {
        return Err(format!("module name '{id}' is already used by {owner}"));
    }
    for id in ids {
        claimed.insert(id.to_string(), zone.name.clone());
    }
    Ok(())
}

/// Zones with a unique name, and the names shared by several zones.
fn split_duplicates(zones: &[HostedZone]) -> (Vec<HostedZone>, BTreeMap<String, Vec<String>>) {
    let mut ids_by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for zone in zones {
        ids_by_name
            .entry(zone.name.to_ascii_lowercase())
            .or_default()
            .push(zone.id.clone());
    }

    let unique = zones
        .iter()
        .filter(|z| ids_by_name[&z.name.to_ascii_lowercase()].len() == 1)
        .cloned()
        .collect();
    ids_by_name.retain(|_, ids| ids.len() > 1);

    (unique, ids_by_name)
}
