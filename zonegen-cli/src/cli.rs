//! Command line arguments

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use zonegen_core::services::DEFAULT_ZONES_DIR;
use zonegen_core::synth::DEFAULT_MODULE_VERSION;
use zonegen_core::synth::outputs::DEFAULT_ZONES_MODULE;
use zonegen_core::{GeneratorOptions, ImportMode, ZoneScope};
use zonegen_provider::DEFAULT_ENDPOINT;

const DEFAULT_MAX_RETRIES: u32 = 4;

/// Generate Terraform configuration for existing Route 53 hosted zones.
#[derive(Debug, Parser)]
#[command(name = "zonegen", version, about)]
#[command(group(
    ArgGroup::new("scope")
        .required(true)
        .args(["domain", "all_domains"]),
))]
pub struct Cli {
    /// Generate the public hosted zone with this name
    #[arg(long, value_name = "NAME")]
    pub domain: Option<String>,

    /// Generate every public hosted zone in the account
    #[arg(long)]
    pub all_domains: bool,

    /// Show what would be written without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite existing zone files
    #[arg(long)]
    pub force: bool,

    /// Write import blocks to imports.tf instead of printing import commands
    #[arg(long)]
    pub import_blocks: bool,

    /// Directory of the generated zone files
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ZONES_DIR)]
    pub zones_dir: PathBuf,

    /// Version constraint of the route53 modules
    #[arg(long, value_name = "CONSTRAINT", default_value = DEFAULT_MODULE_VERSION)]
    pub module_version: String,

    /// Module name of the zones directory in the root configuration
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ZONES_MODULE)]
    pub zones_module: String,

    /// Route 53 API endpoint
    #[arg(
        long,
        value_name = "URL",
        env = "AWS_ENDPOINT_URL_ROUTE53",
        default_value = DEFAULT_ENDPOINT
    )]
    pub endpoint_url: String,

    /// Retries for throttled or failed requests
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scope(&self) -> ZoneScope {
        match &self.domain {
            Some(domain) => ZoneScope::Single(domain.clone()),
            None => ZoneScope::All,
        }
    }

    pub fn import_mode(&self) -> ImportMode {
        if self.import_blocks {
            ImportMode::Blocks
        } else {
            ImportMode::Commands
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            zones_dir: self.zones_dir.clone(),
            dry_run: self.dry_run,
            force: self.force,
            import_mode: self.import_mode(),
            module_version: self.module_version.clone(),
            zones_module: self.zones_module.clone(),
            ..GeneratorOptions::default()
        }
    }
}
