use coffee_label_fetch::credentials::KEY_FILE_TEMPLATE;
use coffee_label_fetch::{App, AppError, Config};
use tempfile::TempDir;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 所有远程请求都指向一个不允许被调用的 mock 服务器
async fn config_in(dir: &TempDir, server: &MockServer) -> Config {
    Config {
        order_api_url: format!("{}/orders", server.uri()),
        drive_api_base_url: server.uri(),
        api_key_file: dir.path().join("ShipstationApI-KeyAccess.txt"),
        drive_credentials_file: dir.path().join("GoogleDriveCredentials.json"),
        drive_token_file: dir.path().join("token.json"),
        output_dir: dir.path().join("Pictures"),
        log_file: dir.path().join("app.log"),
        drive_access_token: None,
        ..Config::default()
    }
}

async fn forbid_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn missing_key_file_writes_template_and_stops() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, &server).await;
    let key_file = config.api_key_file.clone();

    let result = App::initialize(config).await;

    assert!(matches!(result, Err(AppError::CredentialMissing { .. })));
    assert_eq!(std::fs::read_to_string(&key_file).unwrap(), KEY_FILE_TEMPLATE);
    assert_eq!(KEY_FILE_TEMPLATE, "PUBLIC KEY: \nPRIVATE KEY: ");
    assert!(!dir.path().join("Pictures").exists());
    server.verify().await;
}

#[tokio::test]
async fn missing_drive_credentials_creates_file_and_stops() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, &server).await;
    std::fs::write(&config.api_key_file, "PUBLIC KEY: pub\nPRIVATE KEY: priv").unwrap();
    let credentials_file = config.drive_credentials_file.clone();

    let result = App::initialize(config).await;

    match result {
        Err(AppError::CredentialMissing { path, .. }) => {
            assert!(path.ends_with("GoogleDriveCredentials.json"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("initialization should fail without drive credentials"),
    }
    assert!(credentials_file.exists());
    server.verify().await;
}

#[tokio::test]
async fn template_key_file_is_rejected() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, &server).await;
    std::fs::write(&config.api_key_file, KEY_FILE_TEMPLATE).unwrap();

    let result = App::initialize(config).await;

    assert!(matches!(result, Err(AppError::CredentialInvalid { .. })));
    server.verify().await;
}

#[tokio::test]
async fn first_run_creates_both_credential_templates() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, &server).await;
    let key_file = config.api_key_file.clone();
    let credentials_file = config.drive_credentials_file.clone();

    let result = App::initialize(config).await;

    match result {
        Err(AppError::CredentialMissing { path, .. }) => {
            assert!(path.ends_with("ShipstationApI-KeyAccess.txt"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("initialization should fail on first run"),
    }
    assert_eq!(std::fs::read_to_string(&key_file).unwrap(), KEY_FILE_TEMPLATE);
    assert!(credentials_file.exists());
    server.verify().await;
}

#[tokio::test]
async fn access_token_skips_drive_credentials_file() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let dir = TempDir::new().unwrap();
    let config = Config {
        drive_access_token: Some("token".to_string()),
        ..config_in(&dir, &server).await
    };
    let credentials_file = config.drive_credentials_file.clone();

    let result = App::initialize(config).await;

    assert!(matches!(result, Err(AppError::CredentialMissing { .. })));
    assert!(!credentials_file.exists());
    server.verify().await;
}
