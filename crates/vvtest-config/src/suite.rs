// crates/vvtest-config/src/suite.rs
// ============================================================================
// Module: vvtest Suite Loading
// Description: Parses test-suite documents into sample configurations.
// Purpose: Accept the native, Fluster, and Soothe catalog shapes.
// Dependencies: vvtest-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Suite documents come in three shapes, detected by their distinguishing
//! top-level key: the native shape (`samples`), the Fluster conformance
//! suite shape (`test_vectors`, decode only), and the Soothe asset catalog
//! shape (`assets`, encode only). Fluster and Soothe entries are converted
//! into the same [`SampleConfig`] model the native shape produces, so the
//! rest of the system never sees the source shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use vvtest_core::CodecType;
use vvtest_core::EncodeParams;
use vvtest_core::SampleConfig;
use vvtest_core::SampleSource;
use vvtest_core::SuiteFormat;
use vvtest_core::TestType;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error loading a test-suite document.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Filesystem error reading the document.
    #[error("test suite io error: {0}")]
    Io(String),
    /// The document is not valid JSON.
    #[error("test suite parse error: {0}")]
    Parse(String),
    /// The document shape or a field value is invalid.
    #[error("test suite invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Document Shapes
// ============================================================================

/// Native sample entry.
#[derive(Debug, Deserialize)]
struct RawSample {
    /// Stable base name.
    name: String,
    /// Codec short name.
    codec: String,
    /// Advisory description.
    #[serde(default)]
    description: String,
    /// Whether the sample runs by default.
    #[serde(default = "default_true")]
    enabled: bool,
    /// Per-test timeout override in seconds.
    #[serde(default)]
    timeout: Option<u64>,
    /// Extra executable arguments.
    #[serde(default)]
    extra_args: Option<Vec<String>>,
    /// Download URL of the source asset.
    #[serde(default)]
    source_url: String,
    /// Path of the asset relative to the resources root.
    #[serde(default)]
    source_filepath: String,
    /// Expected checksum; `md5:` prefix selects MD5.
    #[serde(default)]
    source_checksum: String,
    /// Source container format; `y4m` inputs carry their own geometry.
    #[serde(default)]
    source_format: String,
    /// Encoder profile override.
    #[serde(default)]
    profile: Option<String>,
    /// Raw input width in pixels.
    #[serde(default)]
    width: u32,
    /// Raw input height in pixels.
    #[serde(default)]
    height: u32,
}

/// Serde default for [`RawSample::enabled`].
const fn default_true() -> bool {
    true
}

/// Fluster test vector entry.
#[derive(Debug, Deserialize)]
struct FlusterVector {
    /// Vector name within the suite.
    name: String,
    /// Source URL; zip archives are provisioned out of band.
    #[serde(default)]
    source: String,
    /// MD5 checksum of the source file.
    #[serde(default)]
    source_checksum: String,
    /// Bitstream filename inside the suite directory.
    #[serde(default)]
    input_file: String,
}

/// Soothe asset entry.
#[derive(Debug, Deserialize)]
struct SootheAsset {
    /// Asset name within the catalog.
    name: Option<String>,
    /// Download URL.
    source: Option<String>,
    /// MD5 checksum of the asset.
    #[serde(default)]
    checksum: String,
    /// Filename within the catalog directory.
    filename: Option<String>,
}

/// Top-level suite document; the shape is detected by which array is set.
#[derive(Debug, Deserialize)]
struct RawSuite {
    /// Suite or catalog name (Fluster and Soothe shapes).
    #[serde(default)]
    name: Option<String>,
    /// Suite codec label (Fluster shape, e.g. `H.264`).
    #[serde(default)]
    codec: Option<String>,
    /// Native sample entries.
    #[serde(default)]
    samples: Option<Vec<RawSample>>,
    /// Fluster test vectors.
    #[serde(default)]
    test_vectors: Option<Vec<FlusterVector>>,
    /// Soothe assets.
    #[serde(default)]
    assets: Option<Vec<SootheAsset>>,
}

// ============================================================================
// SECTION: Loaded Result
// ============================================================================

/// A loaded suite: its samples plus the detected document format.
#[derive(Debug)]
pub struct SuiteLoad {
    /// Samples in document order.
    pub samples: Vec<SampleConfig>,
    /// Detected suite format, fed into skip rule evaluation.
    pub format: SuiteFormat,
}

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Parses a codec short name with a path-qualified diagnostic.
fn parse_codec(value: &str, context: &str) -> Result<CodecType, SuiteError> {
    value
        .parse()
        .map_err(|_| SuiteError::Invalid(format!("{context}: unknown codec {value:?}")))
}

/// Converts a native entry into a [`SampleConfig`].
fn convert_native(raw: RawSample, test_type: TestType) -> Result<SampleConfig, SuiteError> {
    let context = format!("samples ({})", raw.name);
    let codec = parse_codec(&raw.codec, &context)?;

    let source = (!raw.source_filepath.is_empty()).then(|| SampleSource {
        url: raw.source_url,
        filepath: raw.source_filepath,
        checksum: raw.source_checksum,
    });
    let encode = (test_type == TestType::Encode).then(|| EncodeParams {
        profile: raw.profile,
        width: raw.width,
        height: raw.height,
        y4m: raw.source_format.eq_ignore_ascii_case("y4m"),
    });

    Ok(SampleConfig {
        name: raw.name,
        codec,
        description: raw.description,
        enabled: raw.enabled,
        timeout_secs: raw.timeout,
        extra_args: raw.extra_args.unwrap_or_default(),
        source,
        encode,
    })
}

/// Maps a Fluster suite codec label to the internal short name.
fn fluster_codec(label: &str) -> Result<CodecType, SuiteError> {
    let short = match label {
        "H.264" => "h264",
        "H.265" => "h265",
        "AV1" => "av1",
        "VP9" => "vp9",
        other => other,
    };
    parse_codec(&short.to_ascii_lowercase(), "fluster suite")
}

/// Converts a Fluster suite into decode samples.
///
/// Vectors packed in zip archives have no per-file URL; their bitstreams
/// are expected to already exist under the resources root. Directly hosted
/// vectors keep their URL and MD5 checksum.
fn convert_fluster(suite: RawSuite) -> Result<Vec<SampleConfig>, SuiteError> {
    let suite_name = suite.name.unwrap_or_else(|| "unknown".to_string());
    let codec = fluster_codec(suite.codec.as_deref().unwrap_or("unknown"))?;
    let vectors = suite.test_vectors.unwrap_or_default();

    let mut samples = Vec::with_capacity(vectors.len());
    for vector in vectors {
        if vector.name.is_empty() || vector.input_file.is_empty() {
            continue;
        }
        let filepath = format!("fluster/{codec}/{suite_name}/{}", vector.input_file);
        let from_zip = vector.source.to_ascii_lowercase().ends_with(".zip");
        let (url, checksum) = if from_zip {
            (String::new(), String::new())
        } else {
            let checksum = if vector.source_checksum.is_empty() {
                String::new()
            } else {
                format!("md5:{}", vector.source_checksum)
            };
            (vector.source, checksum)
        };

        let mut sample = SampleConfig::new(
            format!("{}_{}", suite_name.to_ascii_lowercase(), vector.name.to_ascii_lowercase()),
            codec,
        );
        sample.description = format!("Fluster {suite_name} test: {}", vector.name);
        sample.source = Some(SampleSource { url, filepath, checksum });
        samples.push(sample);
    }
    Ok(samples)
}

/// Converts a Soothe asset catalog into encode samples, one per codec.
fn convert_soothe(suite: RawSuite) -> Vec<SampleConfig> {
    let catalog_name = suite.name.unwrap_or_else(|| "unknown".to_string());
    let catalog_dir = catalog_name.replace(['.', ' '], "_").to_ascii_lowercase();
    let assets = suite.assets.unwrap_or_default();

    let mut samples = Vec::new();
    for asset in assets {
        let (Some(name), Some(url), Some(filename)) = (asset.name, asset.source, asset.filename)
        else {
            continue;
        };
        let filepath = format!("soothe/{catalog_dir}/{filename}");
        let checksum = if asset.checksum.is_empty() {
            String::new()
        } else {
            format!("md5:{}", asset.checksum)
        };

        for codec in [CodecType::H264, CodecType::H265, CodecType::Av1] {
            let mut sample = SampleConfig::new(format!("{name}_{codec}"), codec);
            sample.description = format!(
                "Encode {name} using {} (Soothe: {catalog_name})",
                codec.as_str().to_ascii_uppercase()
            );
            sample.source = Some(SampleSource {
                url: url.clone(),
                filepath: filepath.clone(),
                checksum: checksum.clone(),
            });
            sample.encode = Some(EncodeParams {
                profile: None,
                width: 0,
                height: 0,
                y4m: true,
            });
            samples.push(sample);
        }
    }
    samples
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads a test-suite document, detecting its shape by top-level key.
///
/// # Errors
///
/// Returns [`SuiteError`] when the file is missing or unreadable, is not
/// valid JSON, has no recognized shape, or pairs a shape with the wrong
/// test type (Fluster is decode-only, Soothe is encode-only).
pub fn load_test_suite(path: &Path, test_type: TestType) -> Result<SuiteLoad, SuiteError> {
    let content = fs::read_to_string(path)
        .map_err(|err| SuiteError::Io(format!("{}: {err}", path.display())))?;
    let suite: RawSuite = serde_json::from_str(&content)
        .map_err(|err| SuiteError::Parse(format!("{}: {err}", path.display())))?;

    if suite.test_vectors.is_some() {
        if test_type != TestType::Decode {
            return Err(SuiteError::Invalid(
                "Fluster test suites are only supported for decode tests".to_string(),
            ));
        }
        let samples = convert_fluster(suite)?;
        return Ok(SuiteLoad {
            samples,
            format: SuiteFormat::Fluster,
        });
    }
    if suite.assets.is_some() {
        if test_type != TestType::Encode {
            return Err(SuiteError::Invalid(
                "Soothe asset catalogs are only supported for encode tests".to_string(),
            ));
        }
        return Ok(SuiteLoad {
            samples: convert_soothe(suite),
            format: SuiteFormat::Soothe,
        });
    }
    if let Some(raw_samples) = suite.samples {
        let mut samples = Vec::with_capacity(raw_samples.len());
        for raw in raw_samples {
            samples.push(convert_native(raw, test_type)?);
        }
        return Ok(SuiteLoad {
            samples,
            format: SuiteFormat::Vvs,
        });
    }
    Err(SuiteError::Invalid(format!(
        "{}: unrecognized test suite shape (expected samples, test_vectors, or assets)",
        path.display()
    )))
}
