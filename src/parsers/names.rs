//! Canonical library names for SBOM entries.
//!
//! SBOM generators name the same firmware library in many ways
//! (`component-freertos`, `FreeRTOS Kernel`, `lwip-lwip`). Entries are mapped
//! onto the monitored set in three passes: exact case-insensitive match,
//! alias table, substring heuristics.

use crate::config::FIRMWARE_LIBRARIES;
use crate::model::LibraryComponent;
use std::collections::HashSet;

/// Known spellings, lowercase, mapped to canonical names.
const ALIASES: &[(&str, &str)] = &[
    ("freertos", "FreeRTOS"),
    ("freertos kernel", "FreeRTOS"),
    ("freertos-kernel", "FreeRTOS"),
    ("component-freertos", "FreeRTOS"),
    ("freertos-freertos-kernel", "FreeRTOS"),
    ("rt", "FreeRTOS"),
    ("lwip", "LwIP"),
    ("component-lwip", "LwIP"),
    ("lwip-lwip", "LwIP"),
    ("fatfs", "FatFs"),
    ("fat-fs", "FatFs"),
    ("component-fatfs", "FatFs"),
    ("cmsis-rtos", "CMSIS-RTOS"),
    ("cmsis", "CMSIS-RTOS"),
    ("usb-host", "STM32_USB_Host_Library"),
    ("usb", "STM32_USB_Host_Library"),
    ("component-usb", "STM32_USB_Host_Library"),
    ("stm32cube_usb_host", "STM32_USB_Host_Library"),
    ("usb-device", "STM32_USB_Device_Library"),
    ("stm32cube_usb_device", "STM32_USB_Device_Library"),
    ("touchgfx", "TouchGFX"),
    ("mbed-tls", "mbedTLS"),
    ("mbedtls", "mbedTLS"),
    ("libjpeg", "LibJPEG"),
    ("open-amp", "OpenAMP"),
    ("stm32h7xx-hal-driver", "STM32H7xx_HAL_Driver"),
];

/// Maps raw SBOM entries onto the monitored library set.
#[derive(Debug, Clone)]
pub struct LibraryFilter {
    monitored: Vec<String>,
}

impl Default for LibraryFilter {
    fn default() -> Self {
        Self::new(FIRMWARE_LIBRARIES.iter().copied())
    }
}

impl LibraryFilter {
    pub fn new<I, S>(monitored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            monitored: monitored.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn monitored(&self) -> &[String] {
        &self.monitored
    }

    /// Canonical monitored name for a raw SBOM package name.
    #[must_use]
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }

        if let Some(name) = self.find(&lowered) {
            return Some(name.to_string());
        }

        let guess = ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, canonical)| *canonical)
            .or_else(|| heuristic(&lowered))?;

        self.find(&guess.to_lowercase()).map(str::to_string)
    }

    /// Canonicalize names, drop unmonitored entries and entries without a
    /// name or version, keeping the first occurrence of each library.
    #[must_use]
    pub fn apply(&self, components: Vec<LibraryComponent>) -> Vec<LibraryComponent> {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for mut component in components {
            if component.declared_version.trim().is_empty() {
                continue;
            }
            let Some(canonical) = self.canonicalize(&component.name) else {
                tracing::debug!("Skipping unmonitored SBOM entry '{}'", component.name);
                continue;
            };
            if !seen.insert(canonical.clone()) {
                tracing::debug!("Ignoring repeated SBOM entry for {canonical}");
                continue;
            }
            component.name = canonical;
            kept.push(component);
        }
        kept
    }

    fn find(&self, lowered: &str) -> Option<&str> {
        self.monitored
            .iter()
            .find(|m| m.to_lowercase() == lowered)
            .map(String::as_str)
    }
}

fn heuristic(s: &str) -> Option<&'static str> {
    let has = |needle: &str| s.contains(needle);
    if has("freertos") {
        Some("FreeRTOS")
    } else if has("lwip") {
        Some("LwIP")
    } else if has("fatfs") || has("fat-fs") {
        Some("FatFs")
    } else if has("cmsis") {
        Some("CMSIS-RTOS")
    } else if has("usb") && has("host") {
        Some("STM32_USB_Host_Library")
    } else if has("usb") && has("device") {
        Some("STM32_USB_Device_Library")
    } else if has("touchgfx") {
        Some("TouchGFX")
    } else if has("mbedtls") || has("mbed-tls") {
        Some("mbedTLS")
    } else if has("openamp") || has("open-amp") {
        Some("OpenAMP")
    } else if has("stemwin") {
        Some("STemWin")
    } else if has("libjpeg") {
        Some("LibJPEG")
    } else if has("stm32h7") && has("hal") {
        Some("STM32H7xx_HAL_Driver")
    } else {
        None
    }
}
