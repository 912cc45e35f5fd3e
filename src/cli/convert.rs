//! Пересохранение ключа в незашифрованный контейнер OpenSSH

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::codec;
use crate::config::{write_private_file, Settings};
use crate::error::{KeyCodecError, Result};

use super::{confirm, prompt_passphrase, read_key_file};

pub fn run(
    settings: &Settings,
    input: &Path,
    output: &Path,
    comment: Option<&str>,
    ask_passphrase: bool,
    force: bool,
) -> Result<()> {
    let pub_path = public_key_path(output);

    if !force && (output.exists() || pub_path.exists()) {
        println!(
            "{} Файл {} уже существует.",
            "Внимание:".yellow().bold(),
            output.display()
        );
        if !confirm("Перезаписать?") {
            return Err(KeyCodecError::Cancelled);
        }
    }

    let data = read_key_file(input)?;
    let passphrase = prompt_passphrase(ask_passphrase)?;

    let imported = codec::import_key(&data, passphrase.as_deref().map(|p| p.as_str()))?;
    let comment = comment
        .or(imported.comment.as_deref())
        .unwrap_or(&settings.default_comment);

    let armored = zeroize::Zeroizing::new(imported.key.to_openssh(comment));
    write_private_file(output, armored.as_bytes())?;

    let line = imported.key.public_key_line(comment);
    fs::write(&pub_path, format!("{}\n", line))?;

    println!(
        "{} {} ключ сохранён в {}",
        "Успех:".green().bold(),
        imported.key.label(),
        output.display().to_string().cyan()
    );
    println!("Публичный ключ: {}", pub_path.display().to_string().cyan());

    Ok(())
}

/// `<path>.pub`, as written by ssh-keygen
pub fn public_key_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".pub");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_path() {
        assert_eq!(
            public_key_path(Path::new("/home/u/.ssh/id_ed25519")),
            PathBuf::from("/home/u/.ssh/id_ed25519.pub")
        );
        assert_eq!(public_key_path(Path::new("key.pem")), PathBuf::from("key.pem.pub"));
    }

    #[test]
    fn test_convert_writes_container_and_public_line() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("seed.bin");
        let output = dir.path().join("id_ed25519");
        fs::write(&input, [5u8; 32]).unwrap();

        let settings = Settings::default();
        run(&settings, &input, &output, Some("me@host"), false, true).unwrap();

        let written = fs::read(&output).unwrap();
        let imported = codec::import_key(&written, None).unwrap();
        assert_eq!(imported.comment.as_deref(), Some("me@host"));

        let line = fs::read_to_string(public_key_path(&output)).unwrap();
        assert!(line.starts_with("ssh-ed25519 "));
        assert!(line.trim_end().ends_with(" me@host"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&output).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
