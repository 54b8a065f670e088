#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn handkeys(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("handkeys").unwrap();
    cmd.current_dir(dir.path())
        .env("HANDKEYS_ROOT", dir.path())
        .env_remove("HANDKEYS_DB")
        .env_remove("HANDKEYS_CONFIG")
        .env_remove("HANDKEYS_DETECTOR_CMD");
    cmd
}

/// One JSON-lines frame with a single closed-fist hand at time `t`.
fn fist_closed_frame(t: f64) -> String {
    // wrist high, every fingertip below it and curled below its PIP joint
    let mut ys = [0.5f64; 21];
    ys[0] = 0.3;
    for pip in [6, 10, 14, 18] {
        ys[pip] = 0.6;
    }
    for tip in [4, 8, 12, 16, 20] {
        ys[tip] = 0.8;
    }
    let landmarks: Vec<String> = ys
        .iter()
        .map(|y| format!(r#"{{"x":0.5,"y":{y}}}"#))
        .collect();
    format!(
        r#"{{"t":{t},"hands":[{{"landmarks":[{}],"score":0.95}}]}}"#,
        landmarks.join(",")
    )
}

fn write_frames(dir: &TempDir, times: &[f64]) -> std::path::PathBuf {
    let path = dir.path().join("frames.jsonl");
    let body: Vec<String> = times.iter().map(|t| fist_closed_frame(*t)).collect();
    std::fs::write(&path, body.join("\n") + "\n").unwrap();
    path
}

// ---------------------------------------------------------------------------
// handkeys gesture set / list
// ---------------------------------------------------------------------------

#[test]
fn gesture_set_and_list() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--accessibility", "Scroll Up"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Gesture 'fist_closed' set to action 'Scroll Up'",
        ));

    assert!(dir.path().join("gestures.db").exists());

    handkeys(&dir)
        .args(["gesture", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fist_closed"))
        .stdout(predicate::str::contains("Accessibility Option"));
}

#[test]
fn gesture_set_overwrites() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--accessibility", "volume-up"])
        .assert()
        .success();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--preset", "editor"])
        .assert()
        .success();

    let out = handkeys(&dir)
        .args(["--json", "gesture", "list"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["gesture"], "fist_closed");
    assert_eq!(entries[0]["action_type"], "Open App");
    assert_eq!(entries[0]["action"]["value"], "/usr/bin/code");
}

#[test]
fn gesture_set_unknown_gesture_fails() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "wave", "--accessibility", "Zoom In"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown gesture 'wave'"));
}

#[test]
fn gesture_set_unknown_command_fails() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_opened", "--accessibility", "Do The Thing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown accessibility command"));
}

#[test]
fn gesture_set_needs_exactly_one_action() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_opened"])
        .assert()
        .failure();
    handkeys(&dir)
        .args([
            "gesture",
            "set",
            "fist_opened",
            "--preset",
            "browser",
            "--accessibility",
            "Zoom In",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn gesture_set_hand_up_warns() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "hand_up", "--app", "/usr/bin/xterm"])
        .assert()
        .success()
        .stderr(predicate::str::contains("never trigger"));
}

// ---------------------------------------------------------------------------
// handkeys gesture remove / reset / options
// ---------------------------------------------------------------------------

#[test]
fn gesture_remove() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "one_finger_up", "--accessibility", "Volume Up"])
        .assert()
        .success();
    handkeys(&dir)
        .args(["gesture", "remove", "one_finger_up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    handkeys(&dir)
        .args(["gesture", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No gestures configured."));
}

#[test]
fn gesture_reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--accessibility", "Zoom Out"])
        .assert()
        .success();

    handkeys(&dir)
        .args(["gesture", "reset"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    handkeys(&dir)
        .args(["gesture", "reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reset"));

    handkeys(&dir)
        .args(["gesture", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No gestures configured."));
}

#[test]
fn gesture_options_lists_everything() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "options"])
        .assert()
        .success()
        .stdout(predicate::str::contains("one_finger_down"))
        .stdout(predicate::str::contains("hand_down (not recognized yet)"))
        .stdout(predicate::str::contains("Volume Down"))
        .stdout(predicate::str::contains("/usr/bin/nautilus"));
}

// ---------------------------------------------------------------------------
// handkeys config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_defaults() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("handkeys.yaml"), "scroll_amount: 0\n").unwrap();
    handkeys(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] scroll_amount"));
}

#[test]
fn config_init_then_show() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(dir.path().join("handkeys.yaml").exists());

    handkeys(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    handkeys(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debounce_delay_secs: 0.5"));
}

// ---------------------------------------------------------------------------
// handkeys run
// ---------------------------------------------------------------------------

#[test]
fn run_without_gestures_fails() {
    let dir = TempDir::new().unwrap();
    let frames = write_frames(&dir, &[0.0]);
    handkeys(&dir)
        .args(["run", "--dry-run", "--input"])
        .arg(&frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no gestures found"));
}

#[test]
fn run_debounces_held_gesture() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--app", "/usr/bin/code"])
        .assert()
        .success();
    let frames = write_frames(&dir, &[0.0, 0.1, 0.2]);

    let out = handkeys(&dir)
        .args(["run", "--dry-run", "--input"])
        .arg(&frames)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.matches("Gesture Triggered - fist_closed").count(), 1, "{stdout}");
    assert!(stdout.contains("after 3 frames: 1 triggered, 2 debounced"), "{stdout}");
}

#[test]
fn run_repeats_after_delay() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--accessibility", "Volume Up"])
        .assert()
        .success();
    let frames = write_frames(&dir, &[0.0, 0.25, 0.75]);

    handkeys(&dir)
        .args(["run", "--dry-run", "--input"])
        .arg(&frames)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 triggered, 1 debounced"));
}

#[test]
fn run_from_stdin() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--accessibility", "Scroll Down"])
        .assert()
        .success();

    handkeys(&dir)
        .args(["run", "--dry-run"])
        .write_stdin(fist_closed_frame(1.0) + "\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("function Scroll Down"));
}

#[test]
fn run_stops_on_malformed_frame() {
    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--accessibility", "Zoom In"])
        .assert()
        .success();
    let path = dir.path().join("bad.jsonl");
    std::fs::write(&path, format!("{}\nnot json\n", fist_closed_frame(0.0))).unwrap();

    handkeys(&dir)
        .args(["run", "--dry-run", "--input"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("function Zoom In"))
        .stderr(predicate::str::contains("capture failed"));
}

#[cfg(unix)]
#[test]
fn run_quits_on_sigint_while_stream_is_idle() {
    use std::process::Stdio;
    use std::time::{Duration, Instant};

    let dir = TempDir::new().unwrap();
    handkeys(&dir)
        .args(["gesture", "set", "fist_closed", "--accessibility", "Zoom In"])
        .assert()
        .success();

    // stdin stays open and silent, so the frame reader never sees EOF.
    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("handkeys"))
        .current_dir(dir.path())
        .env("HANDKEYS_ROOT", dir.path())
        .env_remove("HANDKEYS_DB")
        .env_remove("HANDKEYS_CONFIG")
        .env_remove("HANDKEYS_DETECTOR_CMD")
        .args(["run", "--dry-run"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_millis(500));
    let killed = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let deadline = Instant::now() + Duration::from_secs(3);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("handkeys run kept running after SIGINT on an idle frame stream");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert!(status.success(), "{status:?}");

    let out = child.wait_with_output().unwrap();
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Stopped (quit) after 0 frames"), "{stdout}");
}
