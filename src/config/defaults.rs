//! Default values shared by configuration and the CLI.

/// Firmware libraries monitored when no list is configured.
pub const FIRMWARE_LIBRARIES: &[&str] = &[
    "FreeRTOS",
    "LwIP",
    "FatFs",
    "mbedTLS",
    "LibJPEG",
    "OpenAMP",
    "STM32_USB_Device_Library",
    "STM32_USB_Host_Library",
    "TouchGFX",
    "STemWin",
    "STM32_Audio",
    "STM32H7xx_HAL_Driver",
    "CMSIS-RTOS",
];

/// Default timeout for every outbound request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default NVD `resultsPerPage`.
pub const DEFAULT_NVD_MAX_RESULTS: u32 = 20;

/// NVD refuses pages larger than this.
pub const NVD_MAX_PAGE_SIZE: u32 = 2000;

pub const DEFAULT_OSV_API_BASE: &str = "https://api.osv.dev";

pub const DEFAULT_NVD_API_BASE: &str = "https://services.nvd.nist.gov";

/// Release catalog file looked up in the working directory when none is configured.
pub const DEFAULT_CATALOG_FILE: &str = "releases.json";

/// Monitored library names as owned strings.
#[must_use]
pub fn default_monitored_libraries() -> Vec<String> {
    FIRMWARE_LIBRARIES.iter().map(|s| (*s).to_string()).collect()
}
