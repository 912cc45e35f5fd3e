use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ssh_keycodec::cli;
use ssh_keycodec::config::Settings;
use ssh_keycodec::Result;

#[derive(Parser)]
#[command(name = "ssh-keycodec")]
#[command(author = "Oleg")]
#[command(version = "0.1.0")]
#[command(about = "Импорт, проверка и конвертация приватных SSH-ключей", long_about = None)]
struct Cli {
    /// Подробный вывод (уровень debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Путь к файлу конфигурации
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Показать формат, тип и отпечаток ключа
    Inspect {
        /// Файл приватного ключа
        file: PathBuf,
        /// Запросить парольную фразу
        #[arg(long)]
        passphrase: bool,
    },

    /// Вывести публичный ключ в формате authorized_keys
    Pubkey {
        /// Файл приватного ключа
        file: PathBuf,
        /// Комментарий к ключу
        #[arg(short = 'C', long)]
        comment: Option<String>,
        /// Запросить парольную фразу
        #[arg(long)]
        passphrase: bool,
    },

    /// Сохранить ключ как незашифрованный контейнер OpenSSH
    Convert {
        /// Исходный файл ключа
        file: PathBuf,
        /// Файл для записи
        #[arg(short, long)]
        output: PathBuf,
        /// Комментарий к ключу
        #[arg(short = 'C', long)]
        comment: Option<String>,
        /// Запросить парольную фразу
        #[arg(long)]
        passphrase: bool,
        /// Перезаписать существующие файлы без вопроса
        #[arg(short, long)]
        force: bool,
    },

    /// Управление зашифрованным хранилищем ключей
    Vault {
        #[command(subcommand)]
        action: VaultCommands,
    },
}

#[derive(Subcommand)]
enum VaultCommands {
    /// Добавить ключ в хранилище
    Import {
        /// Имя ключа в хранилище
        name: String,
        /// Файл приватного ключа
        file: PathBuf,
    },
    /// Показать список ключей
    List,
    /// Показать публичный ключ из хранилища
    Pubkey {
        /// Имя ключа в хранилище
        name: String,
        /// Комментарий к ключу
        #[arg(short = 'C', long)]
        comment: Option<String>,
    },
    /// Удалить ключ из хранилища
    Remove {
        /// Имя ключа для удаления
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Ошибка:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { file, passphrase } => cli::inspect::run(&settings, &file, passphrase),
        Commands::Pubkey {
            file,
            comment,
            passphrase,
        } => cli::pubkey::run(&settings, &file, comment.as_deref(), passphrase),
        Commands::Convert {
            file,
            output,
            comment,
            passphrase,
            force,
        } => cli::convert::run(
            &settings,
            &file,
            &output,
            comment.as_deref(),
            passphrase,
            force,
        ),
        Commands::Vault { action } => match action {
            VaultCommands::Import { name, file } => cli::vault::import(&settings, &name, &file),
            VaultCommands::List => cli::vault::list(&settings),
            VaultCommands::Pubkey { name, comment } => {
                cli::vault::pubkey(&settings, &name, comment.as_deref())
            }
            VaultCommands::Remove { name } => cli::vault::remove(&settings, &name),
        },
    }
}
