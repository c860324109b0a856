//! Shared helpers for CLI specs
//!
//! Every `Project` gets its own state and socket directories, so specs
//! run against an isolated daemon and can execute in parallel.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Upper bound for polling in specs
pub const SPEC_WAIT_MAX_MS: u64 = 5_000;
const SPEC_POLL_INTERVAL_MS: u64 = 20;

/// Keeps desktop notifications out of test runs
pub const QUIET_CONFIG: &str = "[notify]\nenabled = false\n";

/// Poll `condition` until it holds or `max_ms` elapses
pub fn wait_for(max_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
    condition()
}

/// Directory the workspace binaries are built into
///
/// Test executables live in `target/<profile>/deps`; `rota` and `rotad`
/// sit one level up.
fn bin_dir() -> PathBuf {
    let mut dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    if dir.ends_with("deps") {
        dir.pop();
    }
    dir
}

/// Path to a workspace binary, building `rota` and `rotad` once if missing
///
/// `cargo test -p rota-specs` does not build other packages' binaries.
pub fn binary(name: &str) -> PathBuf {
    static BUILT: OnceLock<()> = OnceLock::new();
    let path = bin_dir().join(name);
    if !path.exists() {
        BUILT.get_or_init(|| {
            let mut cmd = std::process::Command::new(env!("CARGO"));
            cmd.args(["build", "--quiet", "-p", "rota", "-p", "rota-daemon"])
                .arg("--manifest-path")
                .arg(Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"));
            if !cfg!(debug_assertions) {
                cmd.arg("--release");
            }
            let status = cmd.status().unwrap();
            assert!(status.success(), "building rota binaries failed: {status}");
        });
    }
    path
}

pub struct Project {
    dir: TempDir,
}

impl Project {
    /// A project with a quiet config and nothing else
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project = Self { dir };
        std::fs::create_dir_all(project.state_path()).unwrap();
        std::fs::create_dir_all(project.socket_dir()).unwrap();
        project.config(QUIET_CONFIG);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    // Kept short: unix socket paths are capped near 100 bytes
    pub fn socket_dir(&self) -> PathBuf {
        self.dir.path().join("s")
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a placeholder image; only the extension matters to rota
    pub fn image(&self, rel: &str) -> String {
        self.file(rel, "not really a jpeg").display().to_string()
    }

    /// Replace the daemon config
    pub fn config(&self, content: &str) {
        std::fs::write(self.state_path().join("config.toml"), content).unwrap();
    }

    pub fn rota(&self) -> CliBuilder {
        let mut cmd = assert_cmd::Command::new(binary("rota"));
        cmd.current_dir(self.dir.path())
            .env("ROTA_STATE_DIR", self.state_path())
            .env("ROTA_SOCKET_DIR", self.socket_dir())
            .env("ROTA_DAEMON_BINARY", binary("rotad"))
            .env_remove("ROTA_LOG");
        CliBuilder { cmd }
    }

    /// Read the daemon log, empty if it does not exist yet
    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_path().join("daemon.log")).unwrap_or_default()
    }
}

impl Drop for Project {
    // Must not panic: it also runs while a failed spec unwinds
    fn drop(&mut self) {
        let rota = bin_dir().join("rota");
        if !rota.exists() {
            return;
        }
        let _ = std::process::Command::new(rota)
            .args(["daemon", "stop"])
            .env("ROTA_STATE_DIR", self.state_path())
            .env("ROTA_SOCKET_DIR", self.socket_dir())
            .output();
    }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require a zero exit code
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            run.output.status.code(),
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and require a non-zero exit code
    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            !run.output.status.success(),
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout is missing {:?}\nstdout:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout unexpectedly has {:?}\nstdout:\n{}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr is missing {:?}\nstderr:\n{}",
            expected,
            stderr
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    /// Parse stdout as JSON (for `-o json` runs)
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}
