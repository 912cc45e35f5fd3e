//! Сведения о файле ключа

use std::path::Path;

use colored::Colorize;

use crate::codec;
use crate::config::Settings;
use crate::error::Result;

use super::{prompt_passphrase, read_key_file};

pub fn run(settings: &Settings, path: &Path, ask_passphrase: bool) -> Result<()> {
    let data = read_key_file(path)?;
    let passphrase = prompt_passphrase(ask_passphrase)?;

    let imported = codec::import_key(&data, passphrase.as_deref().map(|p| p.as_str()))?;
    let comment = imported.comment.as_deref();
    let line = imported
        .key
        .public_key_line(comment.unwrap_or(&settings.default_comment));

    println!();
    println!("{}", format!("=== {} ===", path.display()).cyan().bold());
    println!();
    println!("  {:<12} {}", "Формат:", imported.format);
    println!("  {:<12} {}", "Тип:", imported.key.label().to_string().green());
    println!("  {:<12} {}", "Отпечаток:", line.fingerprint());
    match comment {
        Some(c) => println!("  {:<12} {}", "Комментарий:", c),
        None => println!("  {:<12} {}", "Комментарий:", "(нет)".dimmed()),
    }
    println!();

    Ok(())
}
