//! Реализация CLI команд

pub mod convert;
pub mod inspect;
pub mod pubkey;
pub mod vault;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use zeroize::Zeroizing;

use crate::crypto::SecureBytes;
use crate::error::Result;

/// Минимальная длина мастер-пароля хранилища
pub const MIN_PASSWORD_LEN: usize = 12;

/// Прочитать файл ключа в защищённый буфер
pub fn read_key_file(path: &Path) -> Result<SecureBytes> {
    let data = fs::read(path)?;
    tracing::debug!(path = %path.display(), len = data.len(), "read key file");
    Ok(SecureBytes::new(data))
}

/// Запросить парольную фразу ключа, если она нужна
pub fn prompt_passphrase(ask: bool) -> Result<Option<Zeroizing<String>>> {
    if !ask {
        return Ok(None);
    }
    let passphrase = rpassword::prompt_password("Введите парольную фразу ключа: ")?;
    Ok(Some(Zeroizing::new(passphrase)))
}

/// Запросить новый мастер-пароль с подтверждением
pub fn prompt_new_password() -> Result<SecureBytes> {
    println!("{}", "Создание мастер-пароля хранилища".cyan().bold());
    println!("Этот пароль шифрует все ключи в хранилище. Выберите надёжный пароль.");
    println!("Минимальная длина: {} символов\n", MIN_PASSWORD_LEN);

    loop {
        let password = Zeroizing::new(rpassword::prompt_password("Введите мастер-пароль: ")?);

        if password.chars().count() < MIN_PASSWORD_LEN {
            println!(
                "{} Пароль должен содержать минимум {} символов",
                "Ошибка:".red(),
                MIN_PASSWORD_LEN
            );
            continue;
        }

        let confirm = Zeroizing::new(rpassword::prompt_password("Подтвердите мастер-пароль: ")?);

        if *password != *confirm {
            println!("{} Пароли не совпадают", "Ошибка:".red());
            continue;
        }

        return Ok(SecureBytes::from(password.as_bytes()));
    }
}

/// Запросить существующий мастер-пароль
pub fn prompt_password() -> Result<SecureBytes> {
    let password = Zeroizing::new(rpassword::prompt_password("Введите мастер-пароль: ")?);
    Ok(SecureBytes::from(password.as_bytes()))
}

/// Запросить подтверждение да/нет
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "д" | "да")
}
