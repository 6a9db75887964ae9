// crates/vvtest-runner/src/command.rs
// ============================================================================
// Module: vvtest Command Construction
// Description: Builds decoder and encoder invocation command lines.
// Purpose: Keep argument-vector shapes in one place, pure and testable.
// Dependencies: vvtest-core
// ============================================================================

//! ## Overview
//! Both executables are driven through argument vectors built here from a
//! sample configuration plus a handful of run-wide settings. Construction is
//! pure: no path is checked for existence and nothing is spawned. Argument
//! order is part of the contract with the executables and is covered by the
//! unit tests below.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use vvtest_core::CodecType;
use vvtest_core::SampleConfig;

// ============================================================================
// SECTION: Decoder Invocation
// ============================================================================

/// Builds the decoder argument vector for one bitstream input.
///
/// The post-process filter is disabled and presentation suppressed so the
/// run exercises the decode path without a display dependency.
#[must_use]
pub fn build_decode_command(
    executable: &Path,
    input: &Path,
    device_id: Option<u32>,
    extra_args: &[String],
) -> Vec<String> {
    let mut cmd = vec![
        executable.display().to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "--verbose".to_string(),
        "--enablePostProcessFilter".to_string(),
        "0".to_string(),
        "--noPresent".to_string(),
    ];
    if let Some(device) = device_id {
        cmd.push("--deviceID".to_string());
        cmd.push(device.to_string());
    }
    cmd.extend(extra_args.iter().cloned());
    cmd
}

// ============================================================================
// SECTION: Encoder Invocation
// ============================================================================

/// Builds the encoder argument vector for one raw-input sample.
///
/// Y4M inputs carry their geometry in-band; raw YUV inputs get explicit
/// width, height, and plane-count arguments. The output path always comes
/// last so trailing `extra_args` cannot displace it.
#[must_use]
pub fn build_encode_command(
    executable: &Path,
    input: &Path,
    sample: &SampleConfig,
    output: &Path,
    device_id: Option<u32>,
) -> Vec<String> {
    let mut cmd = vec![
        executable.display().to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "--codec".to_string(),
        sample.codec.as_str().to_string(),
    ];
    if let Some(encode) = &sample.encode {
        if !encode.y4m {
            cmd.push("--inputWidth".to_string());
            cmd.push(encode.width.to_string());
            cmd.push("--inputHeight".to_string());
            cmd.push(encode.height.to_string());
            cmd.push("--inputNumPlanes".to_string());
            cmd.push("3".to_string());
        }
    }
    cmd.push("--verbose".to_string());
    if let Some(profile) = sample.encode.as_ref().and_then(|e| e.profile.as_deref()) {
        cmd.push("--profile".to_string());
        cmd.push(profile.to_string());
    }
    if let Some(device) = device_id {
        cmd.push("--deviceID".to_string());
        cmd.push(device.to_string());
    }
    cmd.extend(sample.extra_args.iter().cloned());
    cmd.push("-o".to_string());
    cmd.push(output.display().to_string());
    cmd
}

/// File extension the encoder output should carry for a codec.
#[must_use]
pub const fn output_extension(codec: CodecType) -> &'static str {
    match codec {
        CodecType::H264 => "264",
        CodecType::H265 => "265",
        CodecType::Av1 => "ivf",
        CodecType::Vp9 => "bin",
    }
}

/// File name for the encoded artifact of one sample.
#[must_use]
pub fn encode_output_filename(sample: &SampleConfig) -> String {
    format!(
        "test_output_{}.{}",
        sample.name,
        output_extension(sample.codec)
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
