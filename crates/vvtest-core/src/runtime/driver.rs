// crates/vvtest-core/src/runtime/driver.rs
// ============================================================================
// Module: vvtest Driver Detection
// Description: Maps Vulkan vendor/driver identifiers to skip-list names.
// Purpose: Normalize device-layer identity for skip rule evaluation.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Skip rules name drivers by short lowercase identifiers (`nvidia`, `radv`,
//! `anv`, `nvk`, ...). The device layer reports identity three ways, in
//! decreasing precision: a Vulkan driver ID (`VK_KHR_driver_properties`), a
//! free-form driver name string, and a PCI vendor ID. [`DriverMapping`]
//! normalizes all three, and [`parse_driver_from_output`] extracts whichever
//! of them the executable printed in its device-selection line.

// ============================================================================
// SECTION: Vendor IDs
// ============================================================================

/// PCI vendor ID for NVIDIA.
pub const VENDOR_NVIDIA: u32 = 0x10DE;
/// PCI vendor ID for AMD.
pub const VENDOR_AMD: u32 = 0x1002;
/// PCI vendor ID for Intel.
pub const VENDOR_INTEL: u32 = 0x8086;
/// PCI vendor ID for ARM.
pub const VENDOR_ARM: u32 = 0x13B5;
/// PCI vendor ID for Qualcomm.
pub const VENDOR_QUALCOMM: u32 = 0x5143;
/// PCI vendor ID for Broadcom.
pub const VENDOR_BROADCOM: u32 = 0x14E4;
/// Khronos vendor ID for the Mesa software renderer.
pub const VENDOR_MESA: u32 = 0x10005;

// ============================================================================
// SECTION: Driver Mapping
// ============================================================================

/// Target platform for vendor-ID fallback mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPlatform {
    /// Linux and other Unix-likes; open-source drivers are the default.
    Linux,
    /// Windows; vendors ship proprietary drivers.
    Windows,
}

impl DriverPlatform {
    /// Platform of the process currently running.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }
}

/// Static lookup tables from device identity to skip-list driver names.
#[derive(Debug, Clone, Copy)]
pub struct DriverMapping;

impl DriverMapping {
    /// Maps a PCI vendor ID to the platform-default driver name.
    ///
    /// This is the least precise mapping and is used only when no driver
    /// ID or driver name is available.
    #[must_use]
    pub const fn vendor_id_to_driver(vendor_id: u32, platform: DriverPlatform) -> &'static str {
        match (vendor_id, platform) {
            (VENDOR_NVIDIA, _) => "nvidia",
            (VENDOR_AMD, DriverPlatform::Linux) => "radv",
            (VENDOR_AMD, DriverPlatform::Windows) => "amd",
            (VENDOR_INTEL, DriverPlatform::Linux) => "anv",
            (VENDOR_INTEL, DriverPlatform::Windows) => "intel",
            (VENDOR_ARM, _) => "arm",
            (VENDOR_QUALCOMM, _) => "qualcomm",
            (VENDOR_BROADCOM, _) => "broadcom",
            (VENDOR_MESA, _) => "mesa",
            _ => "unknown",
        }
    }

    /// Maps a Vulkan driver ID (`VkDriverId`) to a driver name.
    ///
    /// Preferred over vendor IDs when available (Vulkan 1.2+ with
    /// `VK_KHR_driver_properties`).
    #[must_use]
    pub const fn driver_id_to_driver(driver_id: u32) -> &'static str {
        match driver_id {
            1 | 2 => "amd",
            3 => "radv",
            4 => "nvidia",
            5 => "intel",
            6 => "anv",
            7 => "imagination",
            8 => "qualcomm",
            9 => "arm",
            10 => "google_swiftshader",
            11 => "ggp",
            12 => "broadcom",
            13 => "mesa_llvmpipe",
            14 => "moltenvk",
            15 => "coreavi",
            16 => "juice",
            17 => "verisilicon",
            18 => "mesa_turnip",
            19 => "mesa_v3dv",
            20 => "mesa_panvk",
            21 => "samsung",
            22 => "mesa_venus",
            23 => "mesa_dozen",
            24 => "mesa_nvk",
            25 => "imagination_open",
            26 => "mesa_honeykrisp",
            27 => "vulkan_sc_emu_google",
            _ => "unknown",
        }
    }

    /// Normalizes a free-form driver name string to the skip-list form.
    ///
    /// Unrecognized names pass through lowercased and trimmed rather than
    /// collapsing to `unknown`, so a rule can still name them verbatim.
    #[must_use]
    pub fn normalize_driver_name(driver_name: &str) -> String {
        let normalized = driver_name.trim().to_ascii_lowercase();
        let mapped = match normalized.as_str() {
            "nvidia" | "nvidia proprietary" => "nvidia",
            "nvk" | "mesa_nvk" | "mesa nvk" | "nouveau" => "nvk",
            "amd" | "amd proprietary" | "amdvlk" => "amd",
            "amd open source" | "radv" | "mesa_radv" | "mesa radv" => "radv",
            "intel" | "intel proprietary" => "intel",
            "intel open source" | "intel open source mesa" | "intel anv" | "anv" | "mesa anv" => {
                "anv"
            }
            "arm" => "arm",
            "qualcomm" => "qualcomm",
            "broadcom" => "broadcom",
            "mesa" => "mesa",
            "swiftshader" => "swiftshader",
            "llvmpipe" => "llvmpipe",
            _ => return normalized,
        };
        mapped.to_string()
    }

    /// Human-readable vendor name for diagnostics.
    #[must_use]
    pub fn vendor_name(vendor_id: u32) -> String {
        let known = match vendor_id {
            VENDOR_NVIDIA => "NVIDIA",
            VENDOR_AMD => "AMD",
            VENDOR_INTEL => "Intel",
            VENDOR_ARM => "ARM",
            VENDOR_QUALCOMM => "Qualcomm",
            VENDOR_BROADCOM => "Broadcom",
            VENDOR_MESA => "Mesa Software Renderer",
            _ => return format!("Unknown (0x{vendor_id:04X})"),
        };
        known.to_string()
    }

    /// Resolves a driver name from the most specific identity available:
    /// driver ID first, then driver name string, then vendor ID.
    #[must_use]
    pub fn resolve(
        vendor_id: u32,
        driver_id: Option<u32>,
        driver_name: Option<&str>,
        platform: DriverPlatform,
    ) -> String {
        if let Some(id) = driver_id {
            let detected = Self::driver_id_to_driver(id);
            if detected != "unknown" {
                return Self::normalize_driver_name(detected);
            }
        }
        if let Some(name) = driver_name
            && !name.trim().is_empty()
        {
            return Self::normalize_driver_name(name);
        }
        Self::vendor_id_to_driver(vendor_id, platform).to_string()
    }
}

// ============================================================================
// SECTION: Output Parsing
// ============================================================================

/// Finds the value following `key` in `haystack`, case-insensitively,
/// returning the remainder starting at the value.
fn value_after<'a>(haystack: &'a str, key: &str) -> Option<&'a str> {
    let lower = haystack.to_ascii_lowercase();
    let start = lower.find(&key.to_ascii_lowercase())? + key.len();
    Some(haystack.get(start..)?.trim_start())
}

/// Parses a leading hexadecimal token, with or without a `0x` prefix.
fn parse_hex_token(value: &str) -> Option<u32> {
    let value = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value);
    let digits: String = value.chars().take_while(char::is_ascii_hexdigit).collect();
    u32::from_str_radix(&digits, 16).ok()
}

/// Parses a leading decimal token.
fn parse_dec_token(value: &str) -> Option<u32> {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Extracts the driver name from an executable's device-selection line.
///
/// The executables print a line of the form
/// `*** Selected Vulkan physical device with name: ..., vendor ID: 0x10de,
/// device ID: 0x2206, driver ID: 5, driver name: NVIDIA ***`; driver ID and
/// driver name are optional. Both output streams are searched. Returns
/// `None` when no vendor ID is present.
#[must_use]
pub fn parse_driver_from_output(stdout: &str, stderr: &str) -> Option<String> {
    let combined = format!("{stdout}\n{stderr}");

    let vendor_id = parse_hex_token(value_after(&combined, "vendor ID:")?)?;
    let driver_id = value_after(&combined, "driver ID:").and_then(parse_dec_token);
    let driver_name = value_after(&combined, "driver name:")
        .map(|rest| rest.split([',', '\n', '*']).next().unwrap_or("").trim().to_string())
        .filter(|name| !name.is_empty());

    Some(DriverMapping::resolve(
        vendor_id,
        driver_id,
        driver_name.as_deref(),
        DriverPlatform::current(),
    ))
}
