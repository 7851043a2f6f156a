//! Bundle Builder Library
//!
//! BundleSpec JSON → 검증 → MessagePack → LZ4 압축 → SHA256 체크섬
//! clock_runoff.csv → ClockRow 목록

pub mod clock_csv;

use anyhow::{Context, Result};
use gridiron_core::{BundleSpec, ModelBundle};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub use clock_csv::{parse_clock_csv, read_clock_csv, ClockImportStats, DEFAULT_MIN_COUNT};

/// 번들 메타데이터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// 스키마 버전 (예: "v1")
    pub schema_version: String,
    /// SHA256 체크섬 (hex 문자열, 압축된 파일 기준)
    pub checksum: String,
    /// 생성 시각 (RFC3339 형식)
    pub created_at: String,
    /// MessagePack 크기 (bytes)
    pub original_size: u64,
    /// 압축 후 크기 (bytes)
    pub compressed_size: u64,
    /// 압축률 (압축 후 / 원본)
    pub compression_ratio: f64,
    /// Clock table rows carried by the bundle
    pub clock_rows: usize,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read and parse a BundleSpec JSON file.
pub fn read_bundle_spec(input_json: &Path) -> Result<BundleSpec> {
    let json_str = fs::read_to_string(input_json)
        .with_context(|| format!("Failed to read JSON file: {}", input_json.display()))?;
    BundleSpec::from_json(&json_str)
        .with_context(|| format!("Failed to parse bundle spec: {}", input_json.display()))
}

/// JSON 번들 스펙을 MessagePack+LZ4 번들로 변환
///
/// # Arguments
///
/// * `input_json` - 입력 BundleSpec JSON 파일 경로
/// * `output_bundle` - 출력 MsgPack+LZ4 파일 경로
/// * `schema_version` - 스키마 버전 문자열
pub fn build_bundle(
    input_json: &Path,
    output_bundle: &Path,
    schema_version: &str,
) -> Result<BundleMetadata> {
    let spec = read_bundle_spec(input_json)?;
    pack_spec(&spec, output_bundle, schema_version)
}

/// Validate `spec` as a ModelBundle, then write it compressed.
///
/// A spec the engine would reject is never written.
pub fn pack_spec(
    spec: &BundleSpec,
    output_bundle: &Path,
    schema_version: &str,
) -> Result<BundleMetadata> {
    // 1. 엔진 기준 검증
    ModelBundle::from_spec(spec.clone()).context("Bundle spec failed validation")?;

    // 2. MessagePack 직렬화 (named: tagged classifier specs need field names)
    let msgpack_bytes =
        rmp_serde::to_vec_named(spec).context("Failed to serialize to MessagePack")?;
    let original_size = msgpack_bytes.len() as u64;

    // 3. LZ4 압축 (크기 정보 포함)
    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;

    // 4. SHA256 체크섬 계산
    let checksum = sha256_hex(&compressed);

    // 5. 출력 파일 쓰기
    if let Some(parent) = output_bundle.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output_bundle, &compressed)
        .with_context(|| format!("Failed to write output file: {}", output_bundle.display()))?;

    log::info!(
        "packed bundle {} ({} -> {} bytes, {} clock rows)",
        output_bundle.display(),
        original_size,
        compressed_size,
        spec.clock.len()
    );

    Ok(BundleMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio: compressed_size as f64 / original_size.max(1) as f64,
        clock_rows: spec.clock.len(),
    })
}

/// 번들 파일의 무결성 검증
pub fn verify_bundle(bundle_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(bundle_file)
        .with_context(|| format!("Failed to read bundle file: {}", bundle_file.display()))?;
    Ok(sha256_hex(&bytes) == expected_checksum.trim().to_lowercase())
}

/// 번들 파일을 압축 해제하여 BundleSpec으로 디코딩
pub fn load_bundle_spec(bundle_file: &Path) -> Result<BundleSpec> {
    let compressed = fs::read(bundle_file)
        .with_context(|| format!("Failed to read bundle file: {}", bundle_file.display()))?;

    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;

    rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize MessagePack")
}

/// Load and validate a bundle ready for simulation.
pub fn load_bundle(bundle_file: &Path) -> Result<ModelBundle> {
    let spec = load_bundle_spec(bundle_file)?;
    ModelBundle::from_spec(spec)
        .with_context(|| format!("Invalid bundle: {}", bundle_file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture_spec() -> serde_json::Value {
        serde_json::json!({
            "playcall": {
                "kind": "logistic",
                "classes": ["field_goal", "pass", "punt", "run"],
                "coefficients": [
                    [0.0, 0.0, 0.0, 0.0, 0.0, -0.02, 0.0, 0.0, 0.0],
                    [0.1, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                    [0.6, 0.0, 0.0, 0.0, 0.0, 0.01, 0.0, 0.0, 0.0],
                    [0.0, -0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
                ],
                "intercepts": [-2.0, 0.3, -3.0, 0.0],
                "means": null,
                "scales": null
            },
            "completion": {
                "kind": "fixed",
                "classes": ["0", "1"],
                "probabilities": [0.35, 0.65],
                "n_features": 6
            },
            "field_goal": {
                "kind": "fixed",
                "classes": ["missed", "made"],
                "probabilities": [0.15, 0.85],
                "n_features": 6
            },
            "samples": {
                "rush_open": [0, 1, 2, 3, 4, 5, 6, 9, 15],
                "scramble": [2, 5, 8],
                "int_return": [0, 8, 20],
                "air_yards": { "all": [-2, 4, 8, 15, 25] },
                "yac_open": { "all": [0, 2, 4, 7] }
            },
            "clock": [
                {
                    "qtr_bucket": "regulation",
                    "time_bucket": "high",
                    "score_bucket": "tied",
                    "play_type_detail": "run",
                    "mean": 38.5
                }
            ],
            "config": { "fumble_rate": 0.01 }
        })
    }

    fn write_json(value: &serde_json::Value) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(value.to_string().as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_build_verify_and_load_bundle() -> Result<()> {
        let input = write_json(&fixture_spec())?;
        let output = NamedTempFile::new()?;

        let metadata = build_bundle(input.path(), output.path(), "v1")?;

        assert_eq!(metadata.schema_version, "v1");
        assert_eq!(metadata.clock_rows, 1);
        assert_eq!(metadata.checksum.len(), 64);
        assert!(verify_bundle(output.path(), &metadata.checksum)?);
        assert!(!verify_bundle(output.path(), &"0".repeat(64))?);

        let expected = read_bundle_spec(input.path())?;
        let loaded = load_bundle_spec(output.path())?;
        assert_eq!(loaded, expected);

        let bundle = load_bundle(output.path())?;
        assert_eq!(bundle.clock.len(), 1);
        assert_eq!(bundle.config.fumble_rate, 0.01);
        Ok(())
    }

    #[test]
    fn test_invalid_spec_is_not_written() -> Result<()> {
        let mut spec = fixture_spec();
        spec["samples"]["rush_open"] = serde_json::json!([]);
        let input = write_json(&spec)?;
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("bundle.msgpack.lz4");

        let result = build_bundle(input.path(), &output, "v1");

        assert!(result.is_err());
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_creates_output_directory() -> Result<()> {
        let input = write_json(&fixture_spec())?;
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("nested").join("models").join("bundle.bin");

        build_bundle(input.path(), &output, "v2")?;

        assert!(output.exists());
        Ok(())
    }

    #[test]
    fn test_corrupt_bundle_fails_to_load() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"not a bundle")?;

        assert!(load_bundle_spec(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_loaded_bundle_simulates() -> Result<()> {
        let input = write_json(&fixture_spec())?;
        let output = NamedTempFile::new()?;
        build_bundle(input.path(), output.path(), "v1")?;
        let bundle = load_bundle(output.path())?;

        let matchup = gridiron_core::Matchup::new(
            gridiron_core::TeamSnapshot::new("SF"),
            gridiron_core::TeamSnapshot::new("SEA"),
        );
        let rules = gridiron_core::ScoringRules::standard();
        let outcome = gridiron_core::GameState::new(&bundle, &matchup, &rules, 17)?.play_game()?;

        assert!(outcome.snaps > 0);
        Ok(())
    }
}
