use super::{apply_env, apply_file, load_settings, parse_settings_file, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn file_overrides_defaults_per_table() {
    let file = parse_settings_file(
        r##"
        log_filter = "debug"
        submit_endpoint = "https://example.test/contact"

        [header]
        threshold_px = 64.0

        [menu]
        breakpoint_px = 900
        "##,
    )
    .expect("settings parse");
    let mut settings = Settings::default();
    apply_file(&mut settings, file);

    assert_eq!(settings.log_filter, "debug");
    assert_eq!(
        settings.submit_endpoint.as_deref(),
        Some("https://example.test/contact")
    );
    assert_eq!(settings.controller.header.threshold_px, 64.0);
    assert_eq!(settings.controller.menu.breakpoint_px, 900.0);
    assert_eq!(settings.controller.anchors.header_offset_px, 80.0);
}

#[test]
fn env_overrides_win_and_bad_numbers_are_ignored() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("FOLIO__LOG_FILTER", "folio=trace"),
            ("FOLIO__STATUS_HIDE_AFTER_MS", "2500"),
            ("FOLIO__ANCHOR_OFFSET_PX", "96"),
            ("FOLIO__HEADER_THRESHOLD_PX", "lots"),
            ("FOLIO__SUBMIT_ENDPOINT", ""),
        ]),
    );
    assert_eq!(settings.log_filter, "folio=trace");
    assert_eq!(settings.controller.contact.status_hide_after_ms, 2500);
    assert_eq!(settings.controller.anchors.header_offset_px, 96.0);
    assert_eq!(settings.controller.header.threshold_px, 100.0);
    assert_eq!(settings.submit_endpoint, None);
}

#[test]
fn invalid_selector_in_file_is_an_error() {
    assert!(parse_settings_file("[filter]\nbuttons = \"ul > li\"\n").is_err());
}

#[test]
fn explicit_settings_path_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("folio_missing_{suffix}.toml"));
    let error = load_settings(Some(&missing)).expect_err("missing file should fail");
    assert!(error.to_string().contains("failed to read settings"));

    let present = env::temp_dir().join(format!("folio_settings_{suffix}.toml"));
    fs::write(&present, "[contact]\nstatus_hide_after_ms = 1200\n").expect("write settings");
    let settings = load_settings(Some(&present)).expect("settings load");
    assert_eq!(settings.controller.contact.status_hide_after_ms, 1200);
    fs::remove_file(present).expect("cleanup");
}
