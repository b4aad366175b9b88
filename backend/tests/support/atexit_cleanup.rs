//! Shared embedded cluster with a process-exit shutdown hook.
//!
//! `pg-embed-setup-unpriv` leaks the shared cluster guard so PostgreSQL lives
//! as long as the test binary. Under `nextest` every binary is its own process
//! and a surviving postmaster blocks the next one from starting on the same
//! data directory, so an `atexit` handler stops it.

#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
#[cfg(unix)]
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::sync::OnceLock;
#[cfg(unix)]
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

#[cfg(unix)]
use color_eyre::eyre::eyre;
#[cfg(unix)]
use pg_embedded_setup_unpriv::BootstrapError;
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle};

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
const STABLE_PASSWORD: &str = "shareit_embedded_test";
#[cfg(unix)]
const PROCESS_LOCK_FILE: &str = "shareit-pg-embedded-shared-cluster.lock";
#[cfg(unix)]
const SHUTDOWN_POLLS: usize = 50;
#[cfg(unix)]
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[cfg(unix)]
static POSTMASTER_PID: AtomicI32 = AtomicI32::new(0);
#[cfg(unix)]
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
#[cfg(unix)]
static PROCESS_LOCK_FD: OnceLock<i32> = OnceLock::new();

/// Serialise cluster bootstrap across test binaries with an `flock`.
#[cfg(unix)]
fn acquire_process_lock() -> BootstrapResult<()> {
    if PROCESS_LOCK_FD.get().is_some() {
        return Ok(());
    }

    let path = std::env::temp_dir().join(PROCESS_LOCK_FILE);
    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|err| {
        BootstrapError::from(eyre!("encode lock path '{}': {err}", path.display()))
    })?;

    // SAFETY: `c_path` is NUL-terminated and outlives the call.
    let fd = unsafe { libc::open(c_path.as_ptr(), libc::O_CREAT | libc::O_RDWR, 0o600) };
    if fd < 0 {
        let err = std::io::Error::last_os_error();
        return Err(BootstrapError::from(eyre!(
            "open lock file '{}': {err}",
            path.display()
        )));
    }

    // SAFETY: `fd` came from the successful `open` above.
    if unsafe { libc::flock(fd, libc::LOCK_EX) } != 0 {
        let err = std::io::Error::last_os_error();
        // SAFETY: `fd` is still open and owned here.
        unsafe {
            libc::close(fd);
        }
        return Err(BootstrapError::from(eyre!(
            "lock '{}': {err}",
            path.display()
        )));
    }

    if PROCESS_LOCK_FD.set(fd).is_err() {
        // SAFETY: another caller stored its descriptor first; this one is ours.
        unsafe {
            libc::close(fd);
        }
    }
    Ok(())
}

/// The process-wide cluster, stopped again when the binary exits.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    #[cfg(unix)]
    acquire_process_lock()?;
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => {
                #[cfg(unix)]
                register_exit_hook(handle);
                return Ok(handle);
            }
            Err(err) if attempt >= CLUSTER_RETRIES => return Err(err),
            Err(_) => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pin `PG_PASSWORD` so a reused data directory keeps accepting logins.
///
/// A reused directory skips `initdb`, so a freshly generated password would
/// no longer match the one the cluster was created with.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster library spawns threads; the shared
        // handle is initialised at most once per process.
        unsafe {
            std::env::set_var("PG_PASSWORD", STABLE_PASSWORD);
        }
    }
}

/// First line of `postmaster.pid` in `data_dir`.
#[cfg(unix)]
fn read_postmaster_pid(data_dir: &Path) -> Option<i32> {
    let dir = cap_std::fs::Dir::open_ambient_dir(data_dir, cap_std::ambient_authority()).ok()?;
    let content = dir.read_to_string("postmaster.pid").ok()?;
    content.lines().next()?.trim().parse().ok()
}

/// SIGTERM the postmaster, then SIGKILL if it outlives the grace period.
///
/// Signals only when `postmaster.pid` still names the recorded process.
#[cfg(unix)]
extern "C" fn stop_postgres_on_exit() {
    let recorded = POSTMASTER_PID.load(Ordering::Relaxed);
    if recorded <= 0 {
        return;
    }
    let pid = match DATA_DIR.get().and_then(|dir| read_postmaster_pid(dir)) {
        Some(current) if current == recorded => current,
        _ => return,
    };

    // SAFETY: `pid` matches the live `postmaster.pid`.
    if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
        return;
    }
    for _ in 0..SHUTDOWN_POLLS {
        std::thread::sleep(SHUTDOWN_POLL_INTERVAL);
        // SAFETY: signal 0 only checks that the process exists.
        if unsafe { libc::kill(pid, 0) } != 0 {
            return;
        }
    }
    // SAFETY: same process; the graceful shutdown window has passed.
    unsafe {
        libc::kill(pid, libc::SIGKILL);
    }
}

/// Record the postmaster and register [`stop_postgres_on_exit`] once.
#[cfg(unix)]
fn register_exit_hook(handle: &ClusterHandle) {
    let data_dir = &handle.settings().data_dir;
    let Some(pid) = read_postmaster_pid(data_dir) else {
        return;
    };
    if POSTMASTER_PID
        .compare_exchange(0, pid, Ordering::Relaxed, Ordering::Relaxed)
        .is_err()
    {
        return;
    }
    let _ = DATA_DIR.set(data_dir.clone());

    // SAFETY: `stop_postgres_on_exit` is a plain `extern "C"` fn.
    let rc = unsafe { libc::atexit(stop_postgres_on_exit) };
    if rc != 0 {
        eprintln!("pg-embed: atexit registration failed (rc={rc}); postmaster {pid} may outlive the tests");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use cap_std::ambient_authority;
    use cap_std::fs::Dir;
    use rstest::rstest;

    use super::read_postmaster_pid;

    #[rstest]
    #[case(Some("4242\n/var/lib/pg\n5432\n"), Some(4242))]
    #[case(Some("postmaster\n"), None)]
    #[case(None, None)]
    fn postmaster_pid_comes_from_the_first_line(
        #[case] content: Option<&str>,
        #[case] expected: Option<i32>,
    ) {
        let temp = tempfile::tempdir().expect("tempdir");
        if let Some(content) = content {
            let dir = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open dir");
            dir.write("postmaster.pid", content).expect("write pid file");
        }
        assert_eq!(read_postmaster_pid(temp.path()), expected);
    }
}
