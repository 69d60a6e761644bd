use image::{Rgba, RgbaImage};
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn stegcrypt_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_stegcrypt"));
    command.env_remove("STEGCRYPT_MASTER_KEY").env_remove("RUST_LOG");
    command
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(stegcrypt_command().args(args).output()?)
}

fn write_cover(path: &Path, width: u32, height: u32) -> Result<(), Box<dyn Error>> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 2) as u8, (y * 3) as u8, (x + y) as u8, 255])
    });
    image.save(path)?;
    Ok(())
}

#[test]
fn cli_end_to_end_flow() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let cover = dir.path().join("cover.png");
    let stego = dir.path().join("stego.png");
    write_cover(&cover, 80, 60)?;

    let keygen = run(&["keygen"])?;
    assert!(keygen.status.success(), "keygen failed");
    let key = String::from_utf8(keygen.stdout)?.trim().to_string();
    assert_eq!(key.len(), 24, "AES-128 key is 24 Base64 chars");

    let embed = run(&[
        "embed",
        "--master-key",
        &key,
        "--message",
        "the eagle has landed",
        cover.to_str().unwrap(),
        stego.to_str().unwrap(),
    ])?;
    assert!(
        embed.status.success(),
        "embed command failed: {}",
        String::from_utf8_lossy(&embed.stderr)
    );
    assert!(String::from_utf8(embed.stdout)?.contains("Embedded"));
    assert!(stego.exists(), "stego image should exist after embed");

    let info = run(&["info", stego.to_str().unwrap()])?;
    let info_stdout = String::from_utf8(info.stdout)?;
    assert!(info_stdout.contains("Dimensions: 80x60"));
    assert!(info_stdout.contains("Detected:"));

    // Key supplied through the environment this time
    let extract = stegcrypt_command()
        .env("STEGCRYPT_MASTER_KEY", &key)
        .args(["extract", stego.to_str().unwrap()])
        .output()?;
    assert!(
        extract.status.success(),
        "extract command failed: {}",
        String::from_utf8_lossy(&extract.stderr)
    );
    assert_eq!(String::from_utf8(extract.stdout)?.trim_end(), "the eagle has landed");

    Ok(())
}

#[test]
fn cli_transport_flow_with_config_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let cover = dir.path().join("cover.png");
    let stego = dir.path().join("stego.txt");
    let config = dir.path().join("stegcrypt.json");
    write_cover(&cover, 64, 64)?;
    fs::write(
        &config,
        r#"{"master_key": "AAECAwQFBgcICQoLDA0ODw==", "log_level": "error"}"#,
    )?;

    let embed = run(&[
        "e",
        "--config",
        config.to_str().unwrap(),
        "-m",
        "by config",
        "--transport",
        cover.to_str().unwrap(),
        stego.to_str().unwrap(),
    ])?;
    assert!(
        embed.status.success(),
        "embed command failed: {}",
        String::from_utf8_lossy(&embed.stderr)
    );

    let extract = run(&[
        "x",
        "--config",
        config.to_str().unwrap(),
        "--transport",
        stego.to_str().unwrap(),
    ])?;
    assert!(extract.status.success());
    assert_eq!(String::from_utf8(extract.stdout)?.trim_end(), "by config");

    Ok(())
}

#[test]
fn cli_missing_key_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let cover = dir.path().join("cover.png");
    write_cover(&cover, 64, 64)?;

    let embed = run(&[
        "embed",
        "--message",
        "no key",
        cover.to_str().unwrap(),
        dir.path().join("out.png").to_str().unwrap(),
    ])?;
    assert!(!embed.status.success());
    assert!(String::from_utf8(embed.stderr)?.contains("Error: Master key not configured"));

    Ok(())
}

#[test]
fn cli_capacity_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let cover = dir.path().join("small.png");
    write_cover(&cover, 10, 10)?;

    let embed = run(&[
        "embed",
        "--master-key",
        "AAECAwQFBgcICQoLDA0ODw==",
        "--message",
        "too long for this image",
        cover.to_str().unwrap(),
        dir.path().join("out.png").to_str().unwrap(),
    ])?;
    assert!(!embed.status.success());
    assert!(String::from_utf8(embed.stderr)?.contains("Capacity exceeded"));

    Ok(())
}

#[test]
fn cli_version() -> Result<(), Box<dyn Error>> {
    let output = run(&["--version"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("stegcrypt "));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}
