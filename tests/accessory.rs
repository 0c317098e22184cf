//! Accessory session tests
//!
//! Drives `RokuAccessory` with an in-memory device and a recording host

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use roku_bridge::{
    AccessorySettings, CharacteristicUpdate, Config, EcpKey, Error, HOME_APP_ID, Platform,
    PowerMode, RemoteKey, RokuAccessory, VolumeDirection, derive_numeric_id,
};
use tokio::sync::watch;
use tokio_test::{assert_err, assert_ok};

mod common;
use common::{MockDriver, RecordingHost, raw, sample_apps};

async fn connect_with(
    settings: AccessorySettings,
) -> (RokuAccessory, Arc<MockDriver>, Arc<RecordingHost>) {
    let driver = Arc::new(MockDriver::new(sample_apps()));
    let host = Arc::new(RecordingHost::default());
    let accessory = RokuAccessory::connect(driver.clone(), host.clone(), settings)
        .await
        .unwrap();
    (accessory, driver, host)
}

async fn connect() -> (RokuAccessory, Arc<MockDriver>, Arc<RecordingHost>) {
    connect_with(AccessorySettings::default()).await
}

#[tokio::test]
async fn test_connect_registers_inputs() {
    let (accessory, _, host) = connect().await;

    let registered = host.registered();
    assert_eq!(registered.len(), 1);

    let descriptor = &registered[0];
    assert_eq!(descriptor.id, "YH00AB123456");
    assert_eq!(descriptor.name, "Bedroom TV");
    assert_eq!(descriptor.manufacturer, "TCL");
    assert_eq!(descriptor.model, "TCL Roku TV (7105X)");

    let names: Vec<&str> = descriptor.inputs.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "HDMI 1", "Netflix", "Hulu"]);
    assert_eq!(descriptor.inputs[2].identifier, derive_numeric_id("12"));

    let state = accessory.state().await;
    assert!(state.active);
    assert_eq!(state.active_identifier, derive_numeric_id(HOME_APP_ID));
    assert!(!state.muted);
}

#[tokio::test]
async fn test_excluded_apps_are_not_inputs() {
    let settings = AccessorySettings {
        excluded_apps: HashSet::from(["Hulu".to_string()]),
        ..AccessorySettings::default()
    };
    let (accessory, _, host) = connect_with(settings).await;

    let names: Vec<String> = host.registered()[0]
        .inputs
        .iter()
        .map(|i| i.name.clone())
        .collect();
    assert_eq!(names, vec!["Home", "HDMI 1", "Netflix"]);

    // Still in the index, just not offered
    assert!(accessory.apps().by_native_id("2285").is_some());
}

#[tokio::test]
async fn test_connect_fails_when_device_unreachable() {
    let driver = Arc::new(MockDriver::new(sample_apps()));
    driver.set_offline(true);
    let host = Arc::new(RecordingHost::default());

    let result = RokuAccessory::connect(driver, host.clone(), AccessorySettings::default()).await;
    assert_err!(result);
    assert!(host.registered().is_empty());
}

#[tokio::test]
async fn test_power_commands() {
    let (accessory, driver, host) = connect().await;

    assert_ok!(accessory.set_active(false).await);
    assert_ok!(accessory.set_active(true).await);

    assert_eq!(driver.commands(), vec!["keypress:PowerOff", "keypress:PowerOn"]);
    assert_eq!(
        host.updates(),
        vec![
            CharacteristicUpdate::Active(false),
            CharacteristicUpdate::Active(true)
        ]
    );
}

#[tokio::test]
async fn test_input_selection_launches_app() {
    let (accessory, driver, host) = connect().await;
    let netflix = derive_numeric_id("12");

    assert_ok!(accessory.set_active_identifier(netflix).await);
    assert_eq!(driver.commands(), vec!["launch:12"]);
    assert_eq!(accessory.state().await.active_identifier, netflix);
    assert_eq!(
        host.updates(),
        vec![CharacteristicUpdate::ActiveIdentifier(netflix)]
    );
}

#[tokio::test]
async fn test_home_input_presses_home() {
    let (accessory, driver, _) = connect().await;

    let home = accessory.apps().home().id;
    assert_ok!(accessory.set_active_identifier(home).await);
    assert_eq!(driver.commands(), vec!["keypress:Home"]);
}

#[tokio::test]
async fn test_unknown_input_sends_nothing() {
    let (accessory, driver, host) = connect().await;

    let err = accessory.set_active_identifier(42).await.unwrap_err();
    assert!(matches!(err, Error::UnknownInput(42)));
    assert!(driver.commands().is_empty());
    assert!(host.updates().is_empty());
}

#[tokio::test]
async fn test_remote_keys() {
    let settings = AccessorySettings {
        info_button_override: Some(EcpKey::Home),
        ..AccessorySettings::default()
    };
    let (accessory, driver, _) = connect_with(settings).await;

    for key in [
        RemoteKey::ArrowUp,
        RemoteKey::Select,
        RemoteKey::PlayPause,
        RemoteKey::Information,
    ] {
        assert_ok!(accessory.remote_key(key).await);
    }

    assert_eq!(
        driver.commands(),
        vec![
            "keypress:Up",
            "keypress:Select",
            "keypress:Play",
            "keypress:Home"
        ]
    );
}

#[tokio::test]
async fn test_volume_steps() {
    let settings = AccessorySettings {
        volume_increment: 2,
        volume_decrement: 3,
        ..AccessorySettings::default()
    };
    let (accessory, driver, _) = connect_with(settings).await;

    assert_ok!(accessory.set_volume(VolumeDirection::Up).await);
    assert_ok!(accessory.set_volume(VolumeDirection::Down).await);

    assert_eq!(
        driver.commands(),
        vec![
            "keypress:VolumeUp",
            "keypress:VolumeUp",
            "keypress:VolumeDown",
            "keypress:VolumeDown",
            "keypress:VolumeDown",
        ]
    );
}

#[tokio::test]
async fn test_mute_only_toggles_on_change() {
    let (accessory, driver, host) = connect().await;

    assert_ok!(accessory.set_mute(false).await);
    assert!(driver.commands().is_empty());

    assert_ok!(accessory.set_mute(true).await);
    assert_ok!(accessory.set_mute(true).await);
    assert_ok!(accessory.set_mute(false).await);

    assert_eq!(
        driver.commands(),
        vec!["keypress:VolumeMute", "keypress:VolumeMute"]
    );
    assert_eq!(
        host.updates(),
        vec![
            CharacteristicUpdate::Mute(true),
            CharacteristicUpdate::Mute(false)
        ]
    );
}

#[tokio::test]
async fn test_concurrent_mute_sends_one_toggle() {
    let (accessory, driver, host) = connect().await;

    let (first, second) = tokio::join!(accessory.set_mute(true), accessory.set_mute(true));
    assert_ok!(first);
    assert_ok!(second);

    assert_eq!(driver.commands(), vec!["keypress:VolumeMute"]);
    assert!(accessory.state().await.muted);
    assert_eq!(host.updates(), vec![CharacteristicUpdate::Mute(true)]);
}

#[tokio::test]
async fn test_poll_pushes_changes_once() {
    let (accessory, driver, host) = connect().await;

    driver.set_active(Some(raw("12", "Netflix", "appl")));
    assert_ok!(accessory.poll().await);
    assert_ok!(accessory.poll().await);

    assert_eq!(
        host.updates(),
        vec![CharacteristicUpdate::ActiveIdentifier(derive_numeric_id("12"))]
    );

    driver.set_power(PowerMode::Standby);
    driver.set_active(None);
    assert_ok!(accessory.poll().await);

    let state = accessory.state().await;
    assert!(!state.active);
    assert_eq!(state.active_identifier, accessory.apps().home().id);
}

#[tokio::test]
async fn test_poll_ignores_unknown_active_app() {
    let (accessory, driver, host) = connect().await;
    let before = accessory.state().await;

    driver.set_active(Some(raw("99999", "Installed Later", "appl")));
    assert_ok!(accessory.poll().await);

    assert_eq!(accessory.state().await, before);
    assert!(host.updates().is_empty());
}

#[tokio::test]
async fn test_poll_ignores_excluded_active_app() {
    let settings = AccessorySettings {
        excluded_apps: HashSet::from(["Hulu".to_string()]),
        ..AccessorySettings::default()
    };
    let (accessory, driver, host) = connect_with(settings).await;

    driver.set_active(Some(raw("2285", "Hulu", "appl")));
    assert_ok!(accessory.poll().await);
    assert!(host.updates().is_empty());
}

#[tokio::test]
async fn test_poll_error_when_offline() {
    let (accessory, driver, _) = connect().await;
    driver.set_offline(true);
    assert_err!(accessory.poll().await);
}

#[tokio::test]
async fn test_poller_runs_until_shutdown() {
    let (accessory, driver, host) = connect().await;
    let accessory = Arc::new(accessory);
    driver.set_active(Some(raw("2285", "Hulu", "appl")));

    let (tx, rx) = watch::channel(false);
    let handle = Arc::clone(&accessory).spawn_poller(Duration::from_millis(10), rx);

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("poller did not stop")
        .unwrap();

    assert_eq!(
        accessory.state().await.active_identifier,
        derive_numeric_id("2285")
    );
    assert_eq!(
        host.updates(),
        vec![CharacteristicUpdate::ActiveIdentifier(derive_numeric_id("2285"))]
    );
}

#[tokio::test]
async fn test_platform_skips_duplicate_devices() {
    let host = Arc::new(RecordingHost::default());
    let mut platform = Platform::new(Config::default(), host.clone());

    let first = Arc::new(MockDriver::new(sample_apps()));
    assert!(platform.connect(first.clone()).await);
    assert_eq!(first.info_reads(), 1);

    let repeat = Arc::new(MockDriver::new(sample_apps()));
    assert!(!platform.connect(repeat.clone()).await);
    assert_eq!(repeat.info_reads(), 1);

    let offline = Arc::new(MockDriver::new(Vec::new()));
    offline.set_offline(true);
    assert!(!platform.connect(offline).await);

    assert_eq!(platform.accessories().len(), 1);
    assert_eq!(host.registered().len(), 1);
}
