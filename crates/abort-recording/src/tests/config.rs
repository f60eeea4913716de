use crate::{
    AppError,
    config::{Config, DEFAULT_HOST_PORT, DEFAULT_HOTKEY_BINDING, HotkeyConfig},
};

/// WHAT: An empty config file parses into full defaults
/// WHY: First runs and hand-trimmed files must not break startup
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_toml_when_parsing_then_defaults_used() {
    // Given/When: Parsing an empty document
    let config: Config = toml::from_str("").unwrap();

    // Then: Every section carries its default
    assert_eq!(config, Config::default());
    assert_eq!(config.host.port, DEFAULT_HOST_PORT);
    assert_eq!(config.hotkey.binding, DEFAULT_HOTKEY_BINDING);
}

/// WHAT: Missing fields inside a section are defaulted
/// WHY: Users editing one key must not have to spell out the rest
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_toml_when_parsing_then_missing_fields_defaulted() {
    // Given: A config that only overrides the port
    let raw = "[host]\nport = 4460\n";

    // When: Parsing it
    let config: Config = toml::from_str(raw).unwrap();

    // Then: The override sticks and everything else defaults
    assert_eq!(config.host.port, 4460);
    assert_eq!(config.host.address, "localhost");
    assert!(config.host.password.is_none());
    assert_eq!(config.hotkey.binding, DEFAULT_HOTKEY_BINDING);
}

/// WHAT: The config round-trips through TOML unchanged
/// WHY: Saving and reloading must preserve the hotkey binding verbatim
#[test]
#[allow(clippy::unwrap_used)]
fn given_config_when_round_tripping_then_equal() {
    // Given: A config with a custom binding and password
    let mut config = Config::default();
    config.hotkey.binding = "ALT+F4".to_string();
    config.host.password = Some("hunter2".to_string());

    // When: Serializing and parsing it back
    let raw = toml::to_string_pretty(&config).unwrap();
    let reloaded: Config = toml::from_str(&raw).unwrap();

    // Then: Nothing was lost or rewritten
    assert_eq!(config, reloaded);
}

/// WHAT: The default binding parses into a hotkey
/// WHY: A first run must come up with a working abort key
#[test]
fn given_default_binding_when_parsing_then_hotkey_valid() {
    // Given: The default hotkey section
    let config = HotkeyConfig::default();

    // When/Then: It parses, and parses stably to the same id
    let first = config.hotkey();
    let second = config.hotkey();
    match (first, second) {
        (Ok(a), Ok(b)) => assert_eq!(a.id(), b.id()),
        _ => unreachable!("default binding must parse"),
    }
}

/// WHAT: A garbage binding is reported as a config error
/// WHY: The capability gate needs a typed failure to go inert on
#[test]
fn given_garbage_binding_when_parsing_then_config_error() {
    // Given: A binding naming a key that does not exist
    let config = HotkeyConfig {
        binding: "CTRL+NOTAKEY".to_string(),
    };

    // When: Parsing it
    let result = config.hotkey();

    // Then: A config error comes back
    assert!(matches!(result, Err(AppError::ConfigError { .. })));
}
