//! Shared test utilities
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use roku_bridge::{
    AccessoryDescriptor, AccessoryHost, CharacteristicUpdate, DeviceDriver, DeviceInfo, EcpKey,
    PowerMode, RawApp,
};

pub const DEVICE_INFO_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<device-info>
	<serial-number>YH00AB123456</serial-number>
	<vendor-name>TCL</vendor-name>
	<model-name>TCL Roku TV</model-name>
	<model-number>7105X</model-number>
	<user-device-name>Bedroom TV</user-device-name>
	<software-version>11.5.0</software-version>
	<power-mode>PowerOn</power-mode>
	<is-tv>true</is-tv>
</device-info>"#;

pub const APPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<apps>
	<app id="tvinput.hdmi1" type="tvin" version="1.0.0">HDMI 1</app>
	<app id="12" subtype="ndka" type="appl" version="5.1.10">Netflix</app>
	<app id="2285" subtype="rsga" type="appl" version="6.4.0">Hulu</app>
</apps>"#;

pub const ACTIVE_APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<active-app>
	<app id="12" type="appl" version="5.1.10">Netflix</app>
</active-app>"#;

pub fn raw(id: &str, name: &str, app_type: &str) -> RawApp {
    RawApp {
        id: id.to_string(),
        name: name.to_string(),
        app_type: app_type.to_string(),
        version: "1.0.0".to_string(),
    }
}

pub fn sample_apps() -> Vec<RawApp> {
    vec![
        raw("tvinput.hdmi1", "HDMI 1", "tvin"),
        raw("12", "Netflix", "appl"),
        raw("2285", "Hulu", "appl"),
    ]
}

pub fn sample_info(power_mode: PowerMode) -> DeviceInfo {
    DeviceInfo {
        serial_number: "YH00AB123456".to_string(),
        name: "Bedroom TV".to_string(),
        vendor_name: "TCL".to_string(),
        model_name: "TCL Roku TV".to_string(),
        model_number: "7105X".to_string(),
        software_version: "11.5.0".to_string(),
        power_mode,
        is_tv: true,
    }
}

/// In-memory device that records every command it receives
pub struct MockDriver {
    pub info: Mutex<DeviceInfo>,
    pub apps: Vec<RawApp>,
    pub active: Mutex<Option<RawApp>>,
    pub commands: Mutex<Vec<String>>,
    pub offline: Mutex<bool>,
    pub info_reads: AtomicUsize,
}

impl MockDriver {
    pub fn new(apps: Vec<RawApp>) -> Self {
        Self {
            info: Mutex::new(sample_info(PowerMode::On)),
            apps,
            active: Mutex::new(None),
            commands: Mutex::new(Vec::new()),
            offline: Mutex::new(false),
            info_reads: AtomicUsize::new(0),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn info_reads(&self) -> usize {
        self.info_reads.load(Ordering::SeqCst)
    }

    pub fn set_power(&self, mode: PowerMode) {
        self.info.lock().unwrap().power_mode = mode;
    }

    pub fn set_active(&self, app: Option<RawApp>) {
        *self.active.lock().unwrap() = app;
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    fn check_online(&self) -> roku_bridge::Result<()> {
        if *self.offline.lock().unwrap() {
            Err(roku_bridge::Error::Device("device offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DeviceDriver for MockDriver {
    async fn device_info(&self) -> roku_bridge::Result<DeviceInfo> {
        self.check_online()?;
        self.info_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.lock().unwrap().clone())
    }

    async fn apps(&self) -> roku_bridge::Result<Vec<RawApp>> {
        self.check_online()?;
        Ok(self.apps.clone())
    }

    async fn active_app(&self) -> roku_bridge::Result<Option<RawApp>> {
        self.check_online()?;
        Ok(self.active.lock().unwrap().clone())
    }

    async fn launch(&self, app_id: &str) -> roku_bridge::Result<()> {
        self.check_online()?;
        self.commands.lock().unwrap().push(format!("launch:{app_id}"));
        Ok(())
    }

    async fn keypress(&self, key: EcpKey) -> roku_bridge::Result<()> {
        self.check_online()?;
        // Suspend like a network round trip would
        tokio::task::yield_now().await;
        self.commands.lock().unwrap().push(format!("keypress:{key}"));
        Ok(())
    }
}

/// Host that keeps everything it is told
#[derive(Default)]
pub struct RecordingHost {
    pub registered: Mutex<Vec<AccessoryDescriptor>>,
    pub updates: Mutex<Vec<(String, CharacteristicUpdate)>>,
}

impl RecordingHost {
    pub fn updates(&self) -> Vec<CharacteristicUpdate> {
        self.updates.lock().unwrap().iter().map(|(_, u)| *u).collect()
    }

    pub fn registered(&self) -> Vec<AccessoryDescriptor> {
        self.registered.lock().unwrap().clone()
    }
}

impl AccessoryHost for RecordingHost {
    fn register(&self, accessory: &AccessoryDescriptor) {
        self.registered.lock().unwrap().push(accessory.clone());
    }

    fn update(&self, accessory_id: &str, update: CharacteristicUpdate) {
        self.updates
            .lock()
            .unwrap()
            .push((accessory_id.to_string(), update));
    }
}

type Recorded = Arc<Mutex<Vec<String>>>;

/// Serve a fake ECP device on a random local port
///
/// Returns the base URL and the list of commands the device received.
pub async fn spawn_fake_ecp() -> (String, Recorded) {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/query/device-info", get(|| async { DEVICE_INFO_XML }))
        .route("/query/apps", get(|| async { APPS_XML }))
        .route("/query/active-app", get(|| async { ACTIVE_APP_XML }))
        .route(
            "/launch/{app_id}",
            post(
                |State(rec): State<Recorded>, Path(app_id): Path<String>| async move {
                    rec.lock().unwrap().push(format!("launch:{app_id}"));
                    StatusCode::OK
                },
            ),
        )
        .route(
            "/keypress/{key}",
            post(
                |State(rec): State<Recorded>, Path(key): Path<String>| async move {
                    rec.lock().unwrap().push(format!("keypress:{key}"));
                    StatusCode::OK
                },
            ),
        )
        .with_state(Arc::clone(&recorded));

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("failed to bind fake ECP server");
    let addr = listener.local_addr().expect("no local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake ECP server failed");
    });

    (format!("http://{addr}/"), recorded)
}
