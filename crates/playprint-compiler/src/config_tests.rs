use std::path::{Path, PathBuf};

use indoc::indoc;
use playprint_core::{ByteOrder, ScalarEncoding};

use crate::config::{Config, ConfigOverrides, MissingPolicy};

#[test]
fn defaults() {
    let config = Config::new();
    assert_eq!(config.byte_order, ByteOrder::Big);
    assert_eq!(config.scalar, ScalarEncoding::Float);
    assert_eq!(config.on_missing, MissingPolicy::Abort);
    assert!(!config.verbose);
    assert!(config.output_dir.is_none());
}

#[test]
fn builder_setters() {
    let config = Config::new()
        .byte_order(ByteOrder::Little)
        .scalar(ScalarEncoding::Fixed20)
        .on_missing(MissingPolicy::Skip)
        .timestamp(42)
        .verbose(true);

    assert_eq!(config.byte_order, ByteOrder::Little);
    assert_eq!(config.scalar, ScalarEncoding::Fixed20);
    assert_eq!(config.on_missing, MissingPolicy::Skip);
    assert_eq!(config.header_timestamp(), 42);
    assert!(config.verbose);
}

#[test]
fn deserialize_partial_json() {
    let json = indoc! {r#"
        {
          "byte_order": "little",
          "scalar": "fixed16",
          "on_missing": "skip"
        }
    "#};

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.byte_order, ByteOrder::Little);
    assert_eq!(config.scalar, ScalarEncoding::Fixed16);
    assert_eq!(config.on_missing, MissingPolicy::Skip);
    assert_eq!(config.timestamp, None);
}

#[test]
fn deserialize_rejects_unknown_fields() {
    let res: Result<Config, _> = serde_json::from_str(r#"{ "endianness": "big" }"#);
    assert!(res.is_err());
}

#[test]
fn overrides_only_touch_set_fields() {
    let base = Config::new().scalar(ScalarEncoding::Fixed16).timestamp(1);
    let merged = base.merge(ConfigOverrides {
        byte_order: Some(ByteOrder::Little),
        verbose: true,
        ..ConfigOverrides::default()
    });

    assert_eq!(merged.byte_order, ByteOrder::Little);
    assert_eq!(merged.scalar, ScalarEncoding::Fixed16);
    assert_eq!(merged.timestamp, Some(1));
    assert!(merged.verbose);
}

#[test]
fn resolve_output_under_dir() {
    let config = Config::new().output_dir("build");
    assert_eq!(
        config.resolve_output(Path::new("game.ppr")),
        PathBuf::from("build/game.ppr")
    );

    let abs = std::env::temp_dir().join("game.ppr");
    assert_eq!(config.resolve_output(&abs), abs);
    assert_eq!(
        Config::new().resolve_output(Path::new("game.ppr")),
        PathBuf::from("game.ppr")
    );
}

#[test]
fn resolve_asset_under_root() {
    let config = Config::new().asset_root("art");
    assert_eq!(
        config.resolve_asset(Path::new("a.png")),
        PathBuf::from("art/a.png")
    );
}

#[test]
fn missing_policy_names() {
    assert_eq!(MissingPolicy::from_name("skip"), Some(MissingPolicy::Skip));
    assert_eq!(MissingPolicy::from_name("abort"), Some(MissingPolicy::Abort));
    assert_eq!(MissingPolicy::from_name("ignore"), None);
}
