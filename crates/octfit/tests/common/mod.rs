//! Shared fixtures for octfit CLI tests.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Format-1 MIDI at 480 PPQ. Each track is `(channel, pitches)`, notes are
/// one beat long and play back to back.
pub fn midi_file(tracks: &[(u8, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    buf.extend_from_slice(&480u16.to_be_bytes());

    for (channel, pitches) in tracks {
        let mut track = Vec::new();
        for &pitch in pitches.iter() {
            track.extend_from_slice(&[0x00, 0x90 | channel, pitch, 100]);
            // 480 ticks as a two-byte VLQ
            track.extend_from_slice(&[0x83, 0x60, 0x80 | channel, pitch, 0]);
        }
        track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(track.len() as u32).to_be_bytes());
        buf.extend_from_slice(&track);
    }

    buf
}

/// A scratch directory that doubles as `$HOME` and `$XDG_CONFIG_HOME`, with
/// an empty config passed via `--config`, so the user's own config files
/// never leak in. Only a system-wide `/etc/octfit/config.toml` can still apply.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("empty.toml"), "").expect("write empty config");
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn octfit(&self) -> Command {
        self.octfit_with_config(&self.path("empty.toml"))
    }

    pub fn octfit_with_config(&self, config: &Path) -> Command {
        let mut cmd = Command::cargo_bin("octfit").expect("octfit binary");
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.path(".config"))
            .env_remove("RUST_LOG")
            .env_remove("OCTFIT_CONFIG")
            .env_remove("OCTFIT_INSTRUMENT")
            .env_remove("OCTFIT_TABLE")
            .env_remove("OCTFIT_AUTO_OCTAVE_SHIFT")
            .env_remove("OCTFIT_PITCH_OFFSET")
            .env_remove("OCTFIT_OUTPUT_DIR")
            .env_remove("OCTFIT_LOG_LEVEL")
            .env_remove("FORCE_COLOR")
            .env_remove("CLICOLOR_FORCE")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(config);
        cmd
    }
}
