use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;

fn charty_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("charty");
    path
}

fn setup_test_env(backend: &str, port: u16) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(root.join("public")).unwrap();

    let config_content = format!(
        r#"[store]
backend = "{backend}"
data_dir = "{root}/data"

[server]
bind = "127.0.0.1:{port}"
public_dir = "{root}/public"

[admin]
password = "test-password-1"
"#,
        backend = backend,
        root = root.display(),
        port = port,
    );

    let config_path = config_dir.join("charty.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_charty(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = charty_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run charty binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

/// Kills the spawned server when the test ends, pass or fail.
struct ServerGuard {
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_server(config_path: &Path, port: u16) -> ServerGuard {
    let child = Command::new(charty_binary())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("serve")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let guard = ServerGuard { child };

    let client = client();
    for _ in 0..50 {
        if let Ok(response) = client
            .get(format!("http://127.0.0.1:{}/health", port))
            .send()
        {
            if response.status().is_success() {
                return guard;
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    panic!("Server on port {} did not become healthy", port);
}

fn client() -> reqwest::blocking::Client {
    // Redirects stay visible so Location and Set-Cookie can be asserted.
    reqwest::blocking::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn login(port: u16) -> String {
    let response = client()
        .post(format!("http://127.0.0.1:{}/admin/login", port))
        .form(&[("password", "test-password-1")])
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

#[test]
fn test_init_seeds_default_record() {
    let (tmp, config_path) = setup_test_env("file", 8471);

    let (stdout, stderr, success) = run_charty(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));

    let store_path = tmp.path().join("data").join("charty.json");
    assert!(store_path.exists(), "init should write charty.json");
    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&store_path).unwrap()).unwrap();
    assert_eq!(record["settings"]["total_surplus"], 15450);
    assert_eq!(record["stories"].as_array().unwrap().len(), 3);

    let details_path = tmp.path().join("data").join("details.json");
    assert!(details_path.exists(), "init should write details.json");
    let ledger: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&details_path).unwrap()).unwrap();
    assert_eq!(ledger.as_array().unwrap().len(), 0);
}

#[test]
fn test_init_idempotent() {
    let (tmp, config_path) = setup_test_env("file", 8471);

    let (_, _, success1) = run_charty(&config_path, &["init"]);
    assert!(success1, "First init failed");
    let first = fs::read_to_string(tmp.path().join("data").join("charty.json")).unwrap();

    let (_, _, success2) = run_charty(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
    let second = fs::read_to_string(tmp.path().join("data").join("charty.json")).unwrap();
    assert_eq!(first, second, "Second init should not rewrite the record");
}

#[test]
fn test_init_sqlite_creates_database() {
    let (tmp, config_path) = setup_test_env("sqlite", 8471);

    let (stdout, stderr, success) = run_charty(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(tmp.path().join("data").join("charty.db").exists());

    let (_, _, success2) = run_charty(&config_path, &["init"]);
    assert!(success2, "Second sqlite init should succeed");
}

#[test]
fn test_stats_reports_counters() {
    let (_tmp, config_path) = setup_test_env("file", 8471);

    run_charty(&config_path, &["init"]);
    let (stdout, stderr, success) = run_charty(&config_path, &["stats"]);
    assert!(success, "stats failed: stderr={}", stderr);
    assert!(stdout.contains("Total surplus:   15450"), "got: {}", stdout);
    assert!(stdout.contains("Stories:         3"));
    assert!(stdout.contains("Ledger entries:  0"));

    // The size summary found the backing files written by init
    assert!(
        !stdout.contains("Size:            0 B"),
        "store size missed the data files: {}",
        stdout
    );
}

#[test]
fn test_unknown_backend_rejected() {
    let (_tmp, config_path) = setup_test_env("postgres", 8471);

    let (_, stderr, success) = run_charty(&config_path, &["init"]);
    assert!(!success, "Unknown backend should fail");
    assert!(stderr.contains("Unknown store backend"));
}

#[test]
fn test_serve_health_and_home() {
    let port = 8472;
    let (_tmp, config_path) = setup_test_env("file", port);
    let _server = spawn_server(&config_path, port);

    let health = client()
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .unwrap();
    let body: serde_json::Value = health.json().unwrap();
    assert_eq!(body["status"], "ok");

    let home = client()
        .get(format!("http://127.0.0.1:{}/", port))
        .send()
        .unwrap();
    assert_eq!(home.status().as_u16(), 200);
    let html = home.text().unwrap();
    assert!(html.contains("شكراً لأنك شريك في الخير"));
    assert!(html.contains("15,450"));
}

#[test]
fn test_visitor_counter_increments_per_home_request() {
    let port = 8473;
    let (tmp, config_path) = setup_test_env("file", port);
    let _server = spawn_server(&config_path, port);

    for _ in 0..3 {
        let response = client()
            .get(format!("http://127.0.0.1:{}/", port))
            .send()
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let record: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("data").join("charty.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(record["settings"]["visitors_count"], 3);
}

#[test]
fn test_login_save_logout_flow() {
    let port = 8474;
    let (_tmp, config_path) = setup_test_env("file", port);
    let _server = spawn_server(&config_path, port);
    let base = format!("http://127.0.0.1:{}", port);

    // Wrong password bounces back without a cookie
    let response = client()
        .post(format!("{}/admin/login", base))
        .form(&[("password", "wrong")])
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers()["location"], "/admin?auth=0");
    assert!(response.headers().get("set-cookie").is_none());

    // Signed out, /admin shows the login form
    let page = client().get(format!("{}/admin", base)).send().unwrap();
    assert!(page.text().unwrap().contains("تسجيل الدخول"));

    let cookie = login(port);

    // Signed in, /admin shows the panel
    let page = client()
        .get(format!("{}/admin", base))
        .header("cookie", &cookie)
        .send()
        .unwrap();
    let html = page.text().unwrap();
    assert!(html.contains("إدخال وتحديث المعلومات"));
    assert!(html.contains("name=\"total_surplus\""));

    // Save a new counter value
    let response = client()
        .post(format!("{}/admin/save", base))
        .header("cookie", &cookie)
        .form(&[
            ("total_surplus", "20000"),
            ("disks_sold", "5200"),
            ("families_supported", "12"),
            ("projects_launched", "8"),
            ("visitors_count", "0"),
            ("base_price", "12"),
            ("extra_price", "1000"),
            ("project_title", "مشروع الاختبار"),
            ("progress_percent", "150"),
            ("remaining_amount", "300"),
            ("sales_points", "دمشق"),
        ])
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers()["location"], "/admin?saved=1");

    // The public page reflects the save, with the percent clamped
    let home = client().get(format!("{}/", base)).send().unwrap();
    let html = home.text().unwrap();
    assert!(html.contains("20,000"));
    assert!(html.contains("مشروع الاختبار"));
    assert!(html.contains("width:100%"));

    // Logout expires the cookie and /admin gates again
    let response = client()
        .post(format!("{}/admin/logout", base))
        .header("cookie", &cookie)
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    let expired = response.headers()["set-cookie"].to_str().unwrap();
    assert!(expired.contains("Max-Age=0"));
}

#[test]
fn test_unauthenticated_save_is_a_no_op() {
    let port = 8475;
    let (tmp, config_path) = setup_test_env("file", port);
    run_charty(&config_path, &["init"]);
    let _server = spawn_server(&config_path, port);
    let store_path = tmp.path().join("data").join("charty.json");
    let before = fs::read_to_string(&store_path).unwrap();

    let response = client()
        .post(format!("http://127.0.0.1:{}/admin/save", port))
        .form(&[("total_surplus", "999999")])
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers()["location"], "/admin?auth=0");

    let after = fs::read_to_string(&store_path).unwrap();
    assert_eq!(before, after, "Unauthenticated save must not touch the store");
}

#[test]
fn test_story_add_and_delete_renumber() {
    let port = 8476;
    let (tmp, config_path) = setup_test_env("file", port);
    let _server = spawn_server(&config_path, port);
    let base = format!("http://127.0.0.1:{}", port);
    let cookie = login(port);

    let response = client()
        .post(format!("{}/admin/story/add", base))
        .header("cookie", &cookie)
        .send()
        .unwrap();
    assert_eq!(response.headers()["location"], "/admin?added=1");

    let response = client()
        .post(format!("{}/admin/story/delete", base))
        .header("cookie", &cookie)
        .form(&[("story_id", "2")])
        .send()
        .unwrap();
    assert_eq!(response.headers()["location"], "/admin?deleted=1");

    let record: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("data").join("charty.json")).unwrap(),
    )
    .unwrap();
    let stories = record["stories"].as_array().unwrap();
    let ids: Vec<u64> = stories.iter().map(|s| s["id"].as_u64().unwrap()).collect();
    let positions: Vec<u64> = stories
        .iter()
        .map(|s| s["position"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3, 4], "deleted id 2 must not be reused");
    assert_eq!(positions, vec![1, 2, 3], "positions must stay dense");
}

#[test]
fn test_details_page_gated_and_ledger_flow() {
    let port = 8477;
    let (tmp, config_path) = setup_test_env("file", port);
    let _server = spawn_server(&config_path, port);
    let base = format!("http://127.0.0.1:{}", port);

    // Signed out, /details shows the login form pointing back to /details
    let page = client().get(format!("{}/details", base)).send().unwrap();
    let html = page.text().unwrap();
    assert!(html.contains("تسجيل الدخول"));
    assert!(html.contains("name=\"redirect_to\" value=\"/details\""));

    let cookie = login(port);

    let response = client()
        .post(format!("{}/admin/detail/add", base))
        .header("cookie", &cookie)
        .send()
        .unwrap();
    assert_eq!(response.headers()["location"], "/details?added=1");

    let response = client()
        .post(format!("{}/admin/detail/save", base))
        .header("cookie", &cookie)
        .form(&[
            ("detail_id", "1"),
            ("detail_kind_1", "expense"),
            ("detail_description_1", "شراء ماكينة خياطة"),
            ("detail_amount_1", "450"),
        ])
        .send()
        .unwrap();
    assert_eq!(response.headers()["location"], "/details?saved=1");

    let ledger: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("data").join("details.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(ledger[0]["kind"], "expense");
    assert_eq!(ledger[0]["amount"], 450);

    let page = client()
        .get(format!("{}/details", base))
        .header("cookie", &cookie)
        .send()
        .unwrap();
    let html = page.text().unwrap();
    assert!(html.contains("شراء ماكينة خياطة"));
    assert!(html.contains("صرف"));
}

#[test]
fn test_store_self_heals_corrupt_file() {
    let port = 8478;
    let (tmp, config_path) = setup_test_env("file", port);

    run_charty(&config_path, &["init"]);
    let store_path = tmp.path().join("data").join("charty.json");
    fs::write(&store_path, "{ not valid json").unwrap();

    let _server = spawn_server(&config_path, port);
    let home = client()
        .get(format!("http://127.0.0.1:{}/", port))
        .send()
        .unwrap();
    assert_eq!(home.status().as_u16(), 200);

    // The truncated file was replaced with a complete default record
    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&store_path).unwrap()).unwrap();
    assert_eq!(record["stories"].as_array().unwrap().len(), 3);
}
