//! Device classes understood by the screenshot renderer
//!
//! The renderer owns this vocabulary; the catalog here only lets the
//! validator flag ids it has never heard of and lets the CLI list sizes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Store,
}

/// Pixel size of one rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceMetrics {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceClass {
    pub id: &'static str,
    pub platform: Platform,
    pub metrics: DeviceMetrics,
    pub description: &'static str,
}

const fn device(
    id: &'static str,
    platform: Platform,
    width: u32,
    height: u32,
    description: &'static str,
) -> DeviceClass {
    DeviceClass {
        id,
        platform,
        metrics: DeviceMetrics { width, height },
        description,
    }
}

static CATALOG: &[DeviceClass] = &[
    device("iphone-6.9", Platform::Ios, 1320, 2868, "iPhone 16 Pro Max, 16 Plus, 15 Pro Max (required for App Store)"),
    device("iphone-6.7", Platform::Ios, 1290, 2796, "iPhone 15 Pro Max"),
    device("iphone-6.5", Platform::Ios, 1284, 2778, "iPhone 14 Plus, 13 Pro Max, 12 Pro Max"),
    device("iphone-6.3", Platform::Ios, 1206, 2622, "iPhone 16 Pro, 16, 15 Pro, 15, 14 Pro"),
    device("iphone-6.1", Platform::Ios, 1179, 2556, "iPhone 16e, 14, 13, 12, 11, X"),
    device("iphone-5.5", Platform::Ios, 1242, 2208, "iPhone 8 Plus, 7 Plus, 6S Plus"),
    device("iphone-4.7", Platform::Ios, 750, 1334, "iPhone SE, 8, 7, 6S"),
    device("ipad-13", Platform::Ios, 2064, 2752, "iPad Pro 13\", iPad Air M3/M2 (required for iPad apps)"),
    device("ipad-12.9", Platform::Ios, 2048, 2732, "iPad Pro 12.9\" (older)"),
    device("ipad-11", Platform::Ios, 1668, 2388, "iPad Pro 11\", iPad Air, iPad mini"),
    device("android-phone", Platform::Android, 1080, 1920, "Android phone"),
    device("android-tablet-7", Platform::Android, 1200, 1920, "7\" Android tablet"),
    device("android-tablet-10", Platform::Android, 1600, 2560, "10\" Android tablet"),
    device("android-wear", Platform::Android, 384, 384, "Wear OS watch"),
    device("android-feature-graphic", Platform::Store, 1024, 500, "Google Play feature graphic"),
];

/// Every known device class, in catalog order
pub fn catalog() -> &'static [DeviceClass] {
    CATALOG
}

pub fn lookup(id: &str) -> Option<&'static DeviceClass> {
    CATALOG.iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_and_unknown() {
        let d = lookup("iphone-6.5").unwrap();
        assert_eq!(d.platform, Platform::Ios);
        assert_eq!(d.metrics, DeviceMetrics { width: 1284, height: 2778 });
        assert_eq!(lookup("android-feature-graphic").unwrap().metrics.width, 1024);
        assert!(lookup("nokia-3310").is_none());
    }

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = catalog().iter().map(|d| d.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }
}
