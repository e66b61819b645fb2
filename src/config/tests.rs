use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::player::RepeatMode;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
volume = 0.25
autoplay = true
shuffle = true
repeat = "repeat-one"
unmute_on_first_interaction = true

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
show_queue_on_start = false

[library]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false

[logging]
directory = "/tmp/encore-logs"
filter = "encore=trace"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__PLAYER__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.volume, 0.25);
    assert!(s.player.autoplay);
    assert!(s.player.shuffle);
    assert_eq!(s.player.repeat, RepeatModeSetting::One);
    assert!(s.player.unmute_on_first_interaction);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_queue_on_start);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.logging.directory, "/tmp/encore-logs");
    assert_eq!(s.logging.filter, "encore=trace");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__CONTROLS__SCRUB_SECONDS", "2");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 2);
}

#[test]
fn load_from_missing_file_yields_defaults() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("ENCORE__CONTROLS__SCRUB_SECONDS");

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(s.controls.scrub_seconds, 5);
    assert_eq!(s.player.repeat, RepeatModeSetting::Off);

    let s = Settings::load_from(None).unwrap();
    assert_eq!(s.ui.header_text, UiSettings::default().header_text);
}

#[test]
fn schema_parses_partial_toml_with_defaults() {
    let s: Settings = toml::from_str(
        r#"
[player]
repeat = "all"
"#,
    )
    .unwrap();

    assert_eq!(RepeatMode::from(s.player.repeat), RepeatMode::All);
    assert_eq!(s.player.volume, 0.7);
    assert!(!s.player.autoplay);
    assert_eq!(s.controls.scrub_seconds, 5);
    assert_eq!(s.library.extensions.len(), 6);
    assert_eq!(s.logging.directory, ".logs");
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.player.volume = 1.5;
    assert!(s.validate().is_err());

    s.player.volume = 0.5;
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    s.controls.volume_step = 0.1;
    s.library.extensions = vec![" ".to_string()];
    assert!(s.validate().is_err());
}
