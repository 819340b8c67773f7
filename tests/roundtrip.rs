//! Serializing a loaded config and loading it again gives the same config

use std::path::{Path, PathBuf};

use storepix_config::{DocumentFormat, Loader};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn json_roundtrip_is_identical() {
    let original = storepix_config::load(fixture("localized.config.json")).unwrap();
    let text = original.to_json_pretty().unwrap();
    let reloaded = Loader::default()
        .load_str(&text, "roundtrip.json", DocumentFormat::Json)
        .unwrap()
        .config;
    assert_eq!(original, reloaded);
    assert_eq!(original.fingerprint().unwrap(), reloaded.fingerprint().unwrap());
}

#[cfg(feature = "js")]
#[test]
fn module_roundtrip_is_identical() {
    for name in ["storepix.config.js", "storepix.feature-graphic.config.js"] {
        let original = storepix_config::load(fixture(name)).unwrap();
        let text = original.to_module_source().unwrap();
        let reloaded = Loader::default()
            .load_str(&text, "roundtrip.js", DocumentFormat::Script)
            .unwrap()
            .config;
        assert_eq!(original, reloaded, "{name}");

        // And once more, serialization is stable
        assert_eq!(text, reloaded.to_module_source().unwrap());
    }
}

#[cfg(feature = "js")]
#[test]
fn module_roundtrip_keeps_whole_number_floats() {
    let doc = r#"{
        "template": "default",
        "output": { "dir": "./output", "format": "png" },
        "devices": ["iphone-6.5"],
        "theme": { "opacity": 1.0, "radius": 12.5 },
        "screenshots": [ { "id": "01_home", "source": "./a.png" } ]
    }"#;
    let loader = Loader::default();
    let original = loader.load_str(doc, "opacity.json", DocumentFormat::Json).unwrap().config;
    let text = original.to_module_source().unwrap();
    let reloaded = loader.load_str(&text, "opacity.js", DocumentFormat::Script).unwrap().config;
    assert_eq!(original, reloaded);
    assert_eq!(original.fingerprint().unwrap(), reloaded.fingerprint().unwrap());
    assert_eq!(reloaded.theme["opacity"], 1);
}
