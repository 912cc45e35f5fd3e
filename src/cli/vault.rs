//! Управление зашифрованным хранилищем ключей

use std::path::Path;

use colored::Colorize;

use crate::codec;
use crate::config::{self, EncryptedFileStore, SecretStore, Settings};
use crate::crypto::SecureBytes;
use crate::error::{KeyCodecError, Result};

use super::pubkey::show as show_public_key;
use super::{confirm, prompt_new_password, prompt_password, read_key_file};

fn open_store(settings: &Settings, password: SecureBytes) -> EncryptedFileStore {
    EncryptedFileStore::new(&settings.vault_dir, password, settings.kdf)
}

/// Listing and removing entries need no password
fn locked_store(settings: &Settings) -> EncryptedFileStore {
    open_store(settings, SecureBytes::new(Vec::new()))
}

/// Existing vaults ask for the password once; a new one asks twice
fn unlock(settings: &Settings, creating: bool) -> Result<EncryptedFileStore> {
    let names = locked_store(settings).list()?;
    if creating && names.is_empty() {
        return Ok(open_store(settings, prompt_new_password()?));
    }

    let store = open_store(settings, prompt_password()?);

    // Entries are sealed independently, so check the password against one
    if let Some(first) = names.first() {
        store.get(first)?;
    }
    Ok(store)
}

/// Добавить ключ в хранилище
pub fn import(settings: &Settings, name: &str, file: &Path) -> Result<()> {
    config::validate_secret_name(name)?;

    let data = read_key_file(file)?;
    let imported = codec::import_key(&data, None)?;

    println!(
        "{} ключ, формат: {}",
        imported.key.label().to_string().green(),
        imported.format
    );

    let mut store = unlock(settings, true)?;

    if store.get(name)?.is_some() && !confirm(&format!("Ключ '{}' уже есть. Заменить?", name)) {
        return Err(KeyCodecError::Cancelled);
    }

    print!("{}", "Шифрование ключа (это займёт некоторое время)... ".cyan());
    std::io::Write::flush(&mut std::io::stdout())?;
    store.put(name, &data)?;
    println!("{}", "готово".green());

    println!(
        "{} Ключ '{}' добавлен в хранилище.",
        "Успех:".green().bold(),
        name
    );
    Ok(())
}

/// Показать список ключей в хранилище
pub fn list(settings: &Settings) -> Result<()> {
    let store = locked_store(settings);
    let names = store.list()?;

    println!("{}", "=== Ключи в хранилище ===".cyan().bold());
    println!("{}", store.dir().display().to_string().dimmed());
    println!();

    if names.is_empty() {
        println!("Хранилище пусто.");
        println!("Добавьте ключ: {}", "ssh-keycodec vault import <имя> <файл>".cyan());
        return Ok(());
    }

    for name in names {
        println!("  {}", name.green());
    }
    Ok(())
}

/// Показать публичный ключ для ключа из хранилища
pub fn pubkey(settings: &Settings, name: &str, comment: Option<&str>) -> Result<()> {
    config::validate_secret_name(name)?;
    let store = unlock(settings, false)?;

    let key = config::load_private_key(&store, name, None)?;
    show_public_key(&key, comment.unwrap_or(&settings.default_comment));
    Ok(())
}

/// Удалить ключ из хранилища
pub fn remove(settings: &Settings, name: &str) -> Result<()> {
    config::validate_secret_name(name)?;
    let mut store = locked_store(settings);

    if !confirm(&format!("Удалить ключ '{}'?", name)) {
        println!("Отменено.");
        return Ok(());
    }

    if !store.remove(name)? {
        return Err(KeyCodecError::SecretNotFound(name.to_string()));
    }

    println!("{} Ключ '{}' удалён.", "Успех:".green().bold(), name);
    Ok(())
}
