// core/tests/token_store.rs
//
// File-backed token store and session restore.

use std::time::{Duration, SystemTime};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use lexisium_core::{AdminSession, FileTokenStore, SessionController, SessionEvent, TokenStore};

fn jwt(claims: &str) -> String {
    format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(claims))
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("token");
    let mut store = FileTokenStore::new(&path);

    assert_eq!(store.load().unwrap(), None);
    store.save("tok-123").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("tok-123"));
    store.clear().unwrap();
    assert!(!path.exists());
    // clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn session_restores_and_expires() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    let ttl = Duration::from_secs(30);
    let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
    let token = jwt(r#"{"id":"admin","exp":1030}"#);

    {
        let mut session = AdminSession::new(FileTokenStore::new(&path), ttl);
        session.login(&token, t0).unwrap();
    }

    let session = AdminSession::restore(FileTokenStore::new(&path), ttl, t0).unwrap();
    assert!(session.is_admin());
    assert_eq!(session.token(), Some(token.as_str()));

    let mut controller = SessionController::new(session);
    let later = t0 + Duration::from_secs(31);
    assert_eq!(controller.tick(later).unwrap(), Some(SessionEvent::Expired));
    assert!(!path.exists());
}

#[test]
fn stale_token_from_earlier_run_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    let ttl = Duration::from_secs(60);

    {
        let mut session = AdminSession::new(FileTokenStore::new(&path), ttl);
        session
            .login(&jwt(r#"{"id":"admin","exp":60}"#), SystemTime::UNIX_EPOCH)
            .unwrap();
    }

    let session = AdminSession::restore(FileTokenStore::new(&path), ttl, SystemTime::now()).unwrap();
    assert!(!session.is_admin());
    assert_eq!(session.store().load().unwrap(), None);
    assert!(!path.exists());
}

#[test]
fn garbage_in_token_file_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "old").unwrap();

    let session =
        AdminSession::restore(FileTokenStore::new(&path), Duration::from_secs(60), SystemTime::now())
            .unwrap();
    assert!(!session.is_admin());
    assert!(!path.exists());
}
