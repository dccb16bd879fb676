use image_carousel::config::{Configuration, DEFAULT_ADVANCE_INTERVAL_MS};
use image_carousel::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
images:
  - "ads/ad1.png"
  - "ads/ad2.png"
advance-interval-ms: 2500
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        cfg.images,
        vec![PathBuf::from("ads/ad1.png"), PathBuf::from("ads/ad2.png")]
    );
    assert_eq!(cfg.advance_interval(), Duration::from_millis(2500));
    assert_eq!(cfg.initial_index, 0);
}

#[test]
fn interval_defaults_to_four_seconds() {
    let yaml = r#"
images: ["a.png"]
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.advance_interval_ms, DEFAULT_ADVANCE_INTERVAL_MS);
    assert_eq!(cfg.advance_interval(), Duration::from_millis(4000));
}

#[test]
fn unknown_keys_are_rejected() {
    let yaml = r#"
images: ["a.png"]
autoplay: true
"#;
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn empty_image_list_fails_validation() {
    let cfg: Configuration = serde_yaml::from_str("images: []").unwrap();
    let err = cfg.validated().unwrap_err();
    assert_eq!(err.downcast_ref::<Error>(), Some(&Error::NoImages));
}

#[test]
fn zero_interval_fails_validation() {
    let yaml = r#"
images: ["a.png"]
advance-interval-ms: 0
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let err = cfg.validated().unwrap_err();
    assert_eq!(err.downcast_ref::<Error>(), Some(&Error::ZeroInterval));
}

#[test]
fn initial_index_must_name_an_image() {
    let yaml = r#"
images: ["a.png", "b.png"]
initial-index: 2
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let err = cfg.validated().unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::InitialIndexOutOfRange { index: 2, count: 2 })
    );
}

#[test]
fn loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "images:\n  - one.jpg\n  - two.jpg\n  - three.jpg\ninitial-index: 1"
    )
    .unwrap();

    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.item_count(), 3);
    assert_eq!(cfg.initial_index, 1);
}
