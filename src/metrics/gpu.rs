//! Best-effort GPU identification
//!
//! There is no portable utilization counter, so the HUD only shows a static
//! status and a vendor label.

use serde::Serialize;

/// GPU panel contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpuStatus {
    pub status: String,
    pub detail: String,
}

impl GpuStatus {
    fn active(detail: &str) -> Self {
        Self {
            status: "ACTIVE".to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Map a PCI vendor id (`0x10de` style) to a display label
pub fn vendor_label(pci_vendor: &str) -> Option<&'static str> {
    match pci_vendor.trim().to_lowercase().as_str() {
        "0x10de" => Some("NVIDIA GPU"),
        "0x1002" => Some("AMD GPU"),
        "0x8086" => Some("Intel GPU"),
        _ => None,
    }
}

/// Label for platforms identified by OS and architecture alone
pub fn platform_label(os: &str, arch: &str) -> Option<&'static str> {
    match (os, arch) {
        ("macos", "aarch64") => Some("Apple Silicon"),
        ("macos", _) => Some("Intel GPU"),
        ("windows", _) => Some("Windows GPU"),
        ("linux", _) => Some("Linux GPU"),
        _ => None,
    }
}

/// Detect the GPU for the HUD panel
pub fn gpu_status() -> GpuStatus {
    #[cfg(target_os = "linux")]
    if let Some(label) = drm_vendor_label(std::path::Path::new("/sys/class/drm")) {
        return GpuStatus::active(label);
    }

    let label = platform_label(std::env::consts::OS, std::env::consts::ARCH).unwrap_or("GPU");
    GpuStatus::active(label)
}

/// Vendor of the first DRM card with a recognised PCI vendor id
#[cfg(target_os = "linux")]
fn drm_vendor_label(drm_root: &std::path::Path) -> Option<&'static str> {
    let mut cards: Vec<_> = std::fs::read_dir(drm_root)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                // card0 but not card0-HDMI-A-1
                .is_some_and(|n| n.starts_with("card") && !n.contains('-'))
        })
        .collect();
    cards.sort();

    cards.iter().find_map(|card| {
        std::fs::read_to_string(card.join("device/vendor"))
            .ok()
            .and_then(|id| vendor_label(&id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_label() {
        assert_eq!(vendor_label("0x10de\n"), Some("NVIDIA GPU"));
        assert_eq!(vendor_label("0x1002"), Some("AMD GPU"));
        assert_eq!(vendor_label("0x8086"), Some("Intel GPU"));
        assert_eq!(vendor_label("0x1af4"), None);
    }

    #[test]
    fn test_platform_label() {
        assert_eq!(platform_label("macos", "aarch64"), Some("Apple Silicon"));
        assert_eq!(platform_label("macos", "x86_64"), Some("Intel GPU"));
        assert_eq!(platform_label("windows", "x86_64"), Some("Windows GPU"));
        assert_eq!(platform_label("linux", "riscv64"), Some("Linux GPU"));
        assert_eq!(platform_label("haiku", "x86_64"), None);
    }

    #[test]
    fn test_gpu_status_is_never_empty() {
        let gpu = gpu_status();
        assert!(!gpu.status.is_empty());
        assert!(!gpu.detail.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_drm_vendor_skips_connectors() {
        let root = tempfile::tempdir().unwrap();
        let connector = root.path().join("card0-HDMI-A-1/device");
        let card = root.path().join("card1/device");
        std::fs::create_dir_all(&connector).unwrap();
        std::fs::create_dir_all(&card).unwrap();
        std::fs::write(connector.join("vendor"), "0x10de\n").unwrap();
        std::fs::write(card.join("vendor"), "0x1002\n").unwrap();

        assert_eq!(drm_vendor_label(root.path()), Some("AMD GPU"));
    }
}
