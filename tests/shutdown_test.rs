#![cfg(unix)]

use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn wait_for_exit(child: &mut Child, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if child.try_wait().unwrap().is_some() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn test_ctrl_c_exits_while_stdin_is_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    let mut child = Command::new(env!("CARGO_BIN_EXE_ktimer"))
        .arg("--config")
        .arg(&config)
        .args(["--no-beep", "start", "pasta"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Hold the write end so the reader never sees EOF
    let _stdin = child.stdin.take().unwrap();

    thread::sleep(Duration::from_millis(1500));
    let signalled = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(signalled.success());

    let exited = wait_for_exit(&mut child, Duration::from_secs(5));
    if !exited {
        let _ = child.kill();
        let _ = child.wait();
    }
    assert!(exited, "ktimer kept running after Ctrl-C");
}
