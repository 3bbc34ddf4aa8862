/*!
 * Smoke tests running the `farasa` binary
 */

#![cfg(unix)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use anyhow::Result;
use crate::common;

fn farasa() -> Command {
    Command::new(env!("CARGO_BIN_EXE_farasa"))
}

// Run the binary with `stdin_text` piped in
fn run_with_stdin(args: &[&str], stdin_text: &str) -> Result<Output> {
    let mut child = farasa()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(stdin_text.as_bytes())?;
    }

    Ok(child.wait_with_output()?)
}

fn write_mock_config(dir: &Path) -> Result<String> {
    let config = common::create_mock_config(dir)?;
    let config_path = dir.join("farasa.json");
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    Ok(config_path.to_string_lossy().into_owned())
}

/// Test that an unknown function ends the program with an error
#[test]
fn test_cli_withUnknownFunction_shouldAbort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("farasa.json");
    let input = common::create_test_file(temp_dir.path(), "input.txt", "نص\n")?;

    let output = farasa()
        .args(["-f", "bogus", "-o", "out.txt"])
        .arg("-i").arg(&input)
        .arg("-c").arg(&config_path)
        .output()?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Aborting"));
    assert!(stderr.contains("Unknown function: bogus"));
    assert!(config_path.exists());

    Ok(())
}

/// Test that a missing input path ends the program before any tool runs
#[test]
fn test_cli_withMissingInput_shouldAbort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = write_mock_config(temp_dir.path())?;
    let missing = temp_dir.path().join("missing.txt");
    let out = temp_dir.path().join("out.txt");

    let output = farasa()
        .args(["-f", "segment", "-c", &config_path])
        .arg("-i").arg(&missing)
        .arg("-o").arg(&out)
        .output()?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("No such file or folder"));
    assert!(!out.exists());

    Ok(())
}

/// Test that a missing function is asked for on stdin
#[test]
fn test_cli_withoutFunction_shouldPromptForIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = write_mock_config(temp_dir.path())?;

    let output = run_with_stdin(&["-c", &config_path], "bogus\n")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Please provide a function"));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Unknown function: bogus"));

    Ok(())
}

/// Test that prompted paths are used for a full segmentation run
#[test]
fn test_cli_withPromptedPaths_shouldSegmentFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = write_mock_config(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "input.txt", "المدرسة\n")?;
    let out = temp_dir.path().join("segmented.txt");
    let answers = format!("{}\n{}\n", input.display(), out.display());

    let output = run_with_stdin(&["-f", "segment", "-r", "-s", "@", "-c", &config_path], &answers)?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&out)?, "ال@مدرسة\n");

    Ok(())
}

/// Test that the completions subcommand prints a script for the binary
#[test]
fn test_cli_completions_withBash_shouldPrintScript() -> Result<()> {
    let output = farasa().args(["completions", "bash"]).output()?;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("farasa"));

    Ok(())
}
