//! Вывод публичного ключа в формате authorized_keys

use std::path::Path;

use colored::Colorize;

use crate::codec::{self, ParsedPrivateKey};
use crate::config::Settings;
use crate::error::Result;

use super::{prompt_passphrase, read_key_file};

pub fn run(
    settings: &Settings,
    path: &Path,
    comment: Option<&str>,
    ask_passphrase: bool,
) -> Result<()> {
    let data = read_key_file(path)?;
    let passphrase = prompt_passphrase(ask_passphrase)?;

    let imported = codec::import_key(&data, passphrase.as_deref().map(|p| p.as_str()))?;
    let comment = comment
        .or(imported.comment.as_deref())
        .unwrap_or(&settings.default_comment);

    println!("{}", imported.key.public_key_line(comment));
    Ok(())
}

/// Показать публичный ключ с подсказкой по установке
pub fn show(key: &ParsedPrivateKey, comment: &str) {
    let line = key.public_key_line(comment);

    println!();
    println!("{}", "Публичный SSH-ключ:".cyan().bold());
    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", line);
    println!("{}", "─".repeat(60).dimmed());
    println!("{} {}", "Отпечаток:".dimmed(), line.fingerprint());
    println!();
    println!("Добавьте этот ключ в {} на ваших серверах.", "~/.ssh/authorized_keys".cyan());
    println!();
}
