//! Bundle Builder CLI
//!
//! BundleSpec JSON → MessagePack+LZ4 번들 변환 도구
//! clock_runoff.csv → clock rows

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bundle_builder")]
#[command(about = "Pack, inspect and verify simulation model bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Validate a bundle spec JSON and pack it
    Pack {
        /// Input BundleSpec JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Output MsgPack+LZ4 file path
        #[arg(long)]
        out: PathBuf,

        /// Schema version (e.g., "v1")
        #[arg(long, default_value = "v1")]
        schema_version: String,

        /// Replace the input bundle's clock rows with this runoff CSV
        #[arg(long)]
        clock_csv: Option<PathBuf>,

        /// Minimum sample count for imported clock rows (exclusive)
        #[arg(long, default_value_t = bundle_builder::DEFAULT_MIN_COUNT)]
        min_count: u64,

        /// Verify bundle after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Convert a runoff CSV into clock rows JSON
    Clock {
        /// Input CSV file path (clock_runoff.csv)
        #[arg(long)]
        csv: PathBuf,

        /// Output JSON file path
        #[arg(long)]
        out: PathBuf,

        /// Minimum sample count (exclusive)
        #[arg(long, default_value_t = bundle_builder::DEFAULT_MIN_COUNT)]
        min_count: u64,
    },

    /// Check a bundle against its checksum
    Verify {
        /// Bundle file path
        #[arg(long)]
        bundle: PathBuf,

        /// Expected SHA256 checksum (hex)
        #[arg(long)]
        checksum: String,
    },

    /// Load a bundle and print what it contains
    Inspect {
        /// Bundle file path
        #[arg(long)]
        bundle: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack { r#in, out, schema_version, clock_csv, min_count, verify, metadata } => {
            println!("🔨 Building model bundle...");
            println!("   Input:  {}", r#in.display());
            println!("   Output: {}", out.display());
            println!("   Schema: {}", schema_version);

            let mut spec = bundle_builder::read_bundle_spec(&r#in)?;
            if let Some(csv) = clock_csv {
                let (rows, stats) = bundle_builder::parse_clock_csv(&csv, min_count)?;
                print_clock_stats(&csv, &stats);
                spec.clock = rows;
            }

            let meta = bundle_builder::pack_spec(&spec, &out, &schema_version)?;

            print_metadata(&meta);

            if verify {
                verify_bundle_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Clock { csv, out, min_count } => {
            println!("🕒 Importing clock runoff table...");
            let (rows, stats) = bundle_builder::parse_clock_csv(&csv, min_count)?;
            print_clock_stats(&csv, &stats);

            let json = serde_json::to_string_pretty(&rows)?;
            std::fs::write(&out, json)
                .with_context(|| format!("Failed to write output file: {}", out.display()))?;
            println!("\n📄 Clock rows saved to: {}", out.display());
        }

        Commands::Verify { bundle, checksum } => {
            verify_bundle_integrity(&bundle, &checksum)?;
        }

        Commands::Inspect { bundle } => {
            println!("🔍 Inspecting {}", bundle.display());
            let spec = bundle_builder::load_bundle_spec(&bundle)?;
            gridiron_core::ModelBundle::from_spec(spec.clone()).context("Bundle failed validation")?;
            print_spec(&spec);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &bundle_builder::BundleMetadata) {
    println!("\n✅ Bundle built successfully!");
    println!(
        "   Original size:   {} bytes ({:.2} KB)",
        meta.original_size,
        meta.original_size as f64 / 1024.0
    );
    println!(
        "   Compressed size: {} bytes ({:.2} KB)",
        meta.compressed_size,
        meta.compressed_size as f64 / 1024.0
    );
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Clock rows:      {}", meta.clock_rows);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn print_clock_stats(csv: &Path, stats: &bundle_builder::ClockImportStats) {
    println!(
        "✅ Parsed {}: {} rows imported (total: {}, thin: {}, unknown bucket: {}, failed: {})",
        csv.display(),
        stats.imported,
        stats.total_rows,
        stats.below_min_count,
        stats.unknown_label,
        stats.failed
    );
}

#[cfg(feature = "cli")]
fn print_spec(spec: &gridiron_core::BundleSpec) {
    let samples = &spec.samples;
    println!("\n📦 Classifiers");
    for (name, model) in
        [("playcall", &spec.playcall), ("completion", &spec.completion), ("field_goal", &spec.field_goal)]
    {
        let model = model.clone().into_boxed();
        println!("   {:<11} {} features, classes {:?}", name, model.n_features(), model.classes());
    }
    println!("\n📊 Sample buffers");
    for (name, len) in [
        ("rush_open", samples.rush_open.len()),
        ("rush_red_zone", samples.rush_red_zone.len()),
        ("scramble", samples.scramble.len()),
        ("int_return", samples.int_return.len()),
        ("air_yards", samples.air_yards.all.len()),
        ("yac_open", samples.yac_open.all.len()),
        ("yac_red_zone", samples.yac_red_zone.all.len()),
    ] {
        println!("   {:<14} {}", name, len);
    }
    println!("\n🕒 Clock rows: {}", spec.clock.len());
    println!("\n⚙️  Engine config");
    println!("   fumble_rate:      {}", spec.config.fumble_rate);
    println!("   extra_point_rate: {}", spec.config.extra_point_rate);
    println!("   punt_net_yards:   {}", spec.config.punt_net_yards);
}

#[cfg(feature = "cli")]
fn verify_bundle_integrity(bundle_path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying bundle integrity...");
    let is_valid = bundle_builder::verify_bundle(bundle_path, checksum)?;

    if is_valid {
        println!("✅ Bundle verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ Bundle verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata(path: &Path, meta: &bundle_builder::BundleMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\n📄 Metadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("bundle_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
