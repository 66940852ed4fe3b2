//! Subprocess engine adapters.
//!
//! Each adapter wraps an external transpiler binary behind the synchronous
//! compile contract. Binaries are located and probed once, at resolution
//! time; per-segment compilation spawns a short-lived process.

use crate::error::EngineError;
use crate::{BunOptions, EsbuildOptions, TscOptions};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Locates `tool` on PATH and verifies it answers `--version`.
pub(crate) async fn find_tool(tool: &'static str) -> Result<Utf8PathBuf, EngineError> {
    let path = which::which(tool).map_err(|_| EngineError::BinaryNotFound { tool })?;
    let path = Utf8PathBuf::try_from(path).map_err(|_| EngineError::BinaryNotFound { tool })?;

    let output = tokio::process::Command::new(&path)
        .arg("--version")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| EngineError::SpawnFailed { tool, source })?;

    if !output.status.success() {
        return Err(EngineError::ProcessFailed {
            tool,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(path)
}

/// Compiles via `esbuild`, source on stdin, output on stdout.
pub(crate) fn esbuild(
    path: &Utf8Path,
    source: &str,
    opts: &EsbuildOptions,
) -> Result<String, EngineError> {
    let mut cmd = Command::new(path);
    cmd.arg(format!("--loader={}", opts.loader));
    if let Some(target) = &opts.target {
        cmd.arg(format!("--target={target}"));
    }
    cmd.args(&opts.extra_args);

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| EngineError::SpawnFailed {
            tool: "esbuild",
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(source.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(EngineError::ProcessFailed {
            tool: "esbuild",
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Compiles via `bun build --no-bundle` over a temp file, output on stdout.
pub(crate) fn bun(path: &Utf8Path, source: &str, opts: &BunOptions) -> Result<String, EngineError> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.ts");
    fs::write(&input, source)?;

    let mut cmd = Command::new(path);
    cmd.arg("build").arg(&input).arg("--no-bundle");
    if let Some(target) = &opts.target {
        cmd.arg(format!("--target={target}"));
    }
    cmd.args(&opts.extra_args);

    let output = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| EngineError::SpawnFailed {
            tool: "bun",
            source,
        })?;

    if !output.status.success() {
        return Err(EngineError::ProcessFailed {
            tool: "bun",
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Compiles via `tsc` over a temp directory, reading back the emitted file.
///
/// tsc keeps emitting in the presence of type errors; only a missing output
/// file (syntax error, wrong invocation) is treated as a compile failure.
pub(crate) fn tsc(path: &Utf8Path, source: &str, opts: &TscOptions) -> Result<String, EngineError> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.ts");
    fs::write(&input, source)?;

    let mut cmd = Command::new(path);
    cmd.arg("input.ts")
        .arg("--outDir")
        .arg(".")
        .arg("--target")
        .arg(&opts.target)
        .arg("--module")
        .arg(&opts.module)
        .arg("--skipLibCheck")
        .arg("--noResolve")
        .arg("--pretty")
        .arg("false")
        .args(&opts.extra_args)
        .current_dir(dir.path());

    let output = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| EngineError::SpawnFailed {
            tool: "tsc",
            source,
        })?;

    match fs::read_to_string(dir.path().join("input.js")) {
        Ok(compiled) => Ok(compiled),
        Err(_) => Err(EngineError::ProcessFailed {
            tool: "tsc",
            code: output.status.code().unwrap_or(-1),
            // tsc reports errors on stdout
            stderr: String::from_utf8_lossy(&output.stdout).into_owned(),
        }),
    }
}
