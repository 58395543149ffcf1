#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::Local;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Password;
use owo_colors::OwoColorize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::accounts::Accounts;
use crate::domain::services::help_text;
use crate::domain::services::presenters;
use crate::domain::services::SessionStore;
use crate::infrastructure::transport::TransportManager;

pub const PDF_ONLY_TEXT: &str = "Only PDF files are allowed!";

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn print_section(title: &str, lines: &[String]) {
    println!("{}", title.bold().underline());
    for line in lines {
        println!("{line}");
    }
}

fn accounts() -> Accounts {
    return Accounts::new(TransportManager::get(), SessionStore::default());
}

fn prompt_text(prompt: &str, initial: Option<&String>) -> Result<String> {
    if let Some(initial) = initial {
        return Ok(initial.to_string());
    }

    let res = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    return Ok(res);
}

fn prompt_password(prompt: &str) -> Result<String> {
    let res = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;

    return Ok(res);
}

/// Only the extension is checked, the backend validates the contents.
pub fn is_pdf(file_path: &path::Path) -> bool {
    return file_path
        .extension()
        .and_then(|ext| return ext.to_str())
        .map(|ext| return ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn run_login(matches: &ArgMatches) -> Result<()> {
    let username = prompt_text("Username", matches.get_one::<String>("user"))?;
    let password = prompt_password("Password")?;

    accounts().login(&username, &password).await?;
    println!("{}", "Logged in. Sahayak will use your account from now on.".green());

    return Ok(());
}

async fn run_signup(matches: &ArgMatches) -> Result<()> {
    let username = prompt_text("Username", matches.get_one::<String>("user"))?;
    let email = prompt_text("Email", matches.get_one::<String>("email"))?;
    let password = prompt_password("Password")?;
    let confirm_password = prompt_password("Confirm password")?;

    accounts()
        .signup(&username, &email, &password, &confirm_password)
        .await?;
    println!("{}", "Account created, you are now logged in.".green());

    return Ok(());
}

async fn run_history() -> Result<()> {
    let accounts = accounts();
    let token = accounts.user_token().await?;
    let records = accounts.transport().chat_history(&token).await?;

    print_section(
        "Chat History",
        &presenters::history_lines_in(&records, &Local),
    );
    return Ok(());
}

async fn run_admin_login(matches: &ArgMatches) -> Result<()> {
    let email = prompt_text("Admin email", matches.get_one::<String>("email"))?;
    let password = prompt_password("Password")?;

    accounts().admin_login(&email, &password).await?;
    println!("{}", "Logged in as admin.".green());

    return Ok(());
}

async fn run_admin_stats(accounts: &Accounts) -> Result<()> {
    let token = accounts.admin_token().await?;
    let res = accounts.transport().admin_stats(&token).await;
    let stats = accounts.check_admin(res).await?;

    print_section("Dashboard", &presenters::stats_lines(&stats));
    return Ok(());
}

async fn run_admin_history(accounts: &Accounts) -> Result<()> {
    let token = accounts.admin_token().await?;
    let res = accounts.transport().admin_chat_history(&token).await;
    let records = accounts.check_admin(res).await?;

    print_section(
        "All Chat History",
        &presenters::history_lines_in(&records, &Local),
    );
    return Ok(());
}

async fn run_admin_queries(accounts: &Accounts) -> Result<()> {
    accounts.admin_token().await?;
    let res = accounts.transport().unanswered_queries().await;
    let queries = accounts.check_admin(res).await?;

    print_section(
        "Unanswered Queries",
        &presenters::unanswered_lines(&queries),
    );
    return Ok(());
}

async fn run_admin_respond(accounts: &Accounts, matches: &ArgMatches) -> Result<()> {
    accounts.admin_token().await?;
    let id = prompt_text("Query ID", matches.get_one::<String>("id"))?;
    let response = prompt_text("Response", matches.get_one::<String>("response"))?;
    if id.trim().is_empty() || response.trim().is_empty() {
        bail!("Both a query id and a response are required");
    }

    let res = accounts
        .transport()
        .add_response(id.trim(), response.trim())
        .await;
    accounts.check_admin(res).await?;

    println!("{}", format!("Response added to query {}", id.trim()).green());
    return Ok(());
}

async fn run_admin_delete_query(accounts: &Accounts, matches: &ArgMatches) -> Result<()> {
    accounts.admin_token().await?;
    let id = prompt_text("Query ID", matches.get_one::<String>("id"))?;

    let res = accounts.transport().delete_query(id.trim()).await;
    accounts.check_admin(res).await?;

    println!("{}", format!("Deleted query {}", id.trim()).green());
    return Ok(());
}

async fn run_admin_analytics(accounts: &Accounts) -> Result<()> {
    let token = accounts.admin_token().await?;
    let res = accounts.transport().query_analytics(&token).await;
    let analytics = accounts.check_admin(res).await?;

    print_section(
        "Sentiment Analysis",
        &presenters::sentiment_lines(&analytics),
    );
    println!();
    print_section("Trending Topics", &presenters::trending_lines(&analytics));
    return Ok(());
}

async fn run_pdfs_list(accounts: &Accounts) -> Result<()> {
    let token = accounts.admin_token().await?;
    let res = accounts.transport().list_pdfs(&token).await;
    let pdfs = accounts.check_admin(res).await?;

    print_section("Uploaded PDFs", &presenters::pdf_lines(&pdfs));
    return Ok(());
}

async fn run_pdfs_upload(accounts: &Accounts, matches: &ArgMatches) -> Result<()> {
    let file_path = match matches.get_one::<String>("file") {
        Some(file) => path::PathBuf::from(file),
        None => bail!("Please select a PDF file"),
    };
    if !is_pdf(&file_path) {
        bail!(PDF_ONLY_TEXT);
    }

    let token = accounts.admin_token().await?;
    let file_name = file_path
        .file_name()
        .map(|name| return name.to_string_lossy().to_string())
        .unwrap_or_else(|| return "upload.pdf".to_string());
    let bytes = fs::read(&file_path).await?;

    let res = accounts
        .transport()
        .upload_pdf(&token, &file_name, bytes)
        .await;
    accounts.check_admin(res).await?;

    println!("{}", format!("Uploaded {file_name}").green());
    return Ok(());
}

async fn run_pdfs_delete(accounts: &Accounts, matches: &ArgMatches) -> Result<()> {
    let token = accounts.admin_token().await?;
    let public_id = match matches.get_one::<String>("public-id") {
        Some(public_id) => public_id.to_string(),
        None => bail!("A PDF id is required"),
    };

    if !matches.get_flag("yes") {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Are you sure you want to delete {public_id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let res = accounts.transport().delete_pdf(&token, &public_id).await;
    accounts.check_admin(res).await?;

    println!("{}", format!("Deleted {public_id}").green());
    return Ok(());
}

async fn run_pdfs_rebuild(accounts: &Accounts) -> Result<()> {
    let token = accounts.admin_token().await?;
    let res = accounts.transport().rebuild_embeddings(&token).await;
    accounts.check_admin(res).await?;

    println!("{}", "Embeddings rebuilt.".green());
    return Ok(());
}

async fn run_admin(matches: &ArgMatches) -> Result<()> {
    let accounts = accounts();

    match matches.subcommand() {
        Some(("login", login_matches)) => run_admin_login(login_matches).await?,
        Some(("logout", _)) => {
            accounts.admin_logout().await?;
            println!("Logged out of the admin account.");
        }
        Some(("stats", _)) => run_admin_stats(&accounts).await?,
        Some(("history", _)) => run_admin_history(&accounts).await?,
        Some(("queries", _)) => run_admin_queries(&accounts).await?,
        Some(("respond", respond_matches)) => {
            run_admin_respond(&accounts, respond_matches).await?
        }
        Some(("delete-query", delete_matches)) => {
            run_admin_delete_query(&accounts, delete_matches).await?
        }
        Some(("analytics", _)) => run_admin_analytics(&accounts).await?,
        Some(("pdfs", pdfs_matches)) => match pdfs_matches.subcommand() {
            Some(("list", _)) => run_pdfs_list(&accounts).await?,
            Some(("upload", upload_matches)) => run_pdfs_upload(&accounts, upload_matches).await?,
            Some(("delete", delete_matches)) => run_pdfs_delete(&accounts, delete_matches).await?,
            Some(("rebuild", _)) => run_pdfs_rebuild(&accounts).await?,
            _ => subcommand_admin_pdfs().print_long_help()?,
        },
        _ => subcommand_admin().print_long_help()?,
    }

    return Ok(());
}

fn arg_username() -> Arg {
    return Arg::new("user")
        .short('u')
        .long("user")
        .num_args(1)
        .help("Account username. Prompted for when omitted.");
}

fn arg_email() -> Arg {
    return Arg::new("email")
        .short('e')
        .long("email")
        .num_args(1)
        .help("Account email. Prompted for when omitted.");
}

fn arg_query_id() -> Arg {
    return Arg::new("id")
        .help("ID of the unanswered query.")
        .num_args(1);
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_admin_pdfs() -> Command {
    return Command::new("pdfs")
        .about("Manage the PDFs Sahayak answers from.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List uploaded PDFs."))
        .subcommand(
            Command::new("upload").about("Upload a PDF.").arg(
                Arg::new("file")
                    .help("Path to a .pdf file.")
                    .required(true)
                    .num_args(1),
            ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an uploaded PDF.")
                .arg(
                    Arg::new("public-id")
                        .help("Storage id of the PDF, as shown by `pdfs list`.")
                        .required(true)
                        .num_args(1),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("rebuild").about("Rebuild the answer embeddings from the uploaded PDFs."),
        );
}

fn subcommand_admin() -> Command {
    return Command::new("admin")
        .about("Admin dashboard.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login")
                .about("Log in with an admin account.")
                .arg(arg_email()),
        )
        .subcommand(Command::new("logout").about("Log out of the admin account."))
        .subcommand(Command::new("stats").about("Show user, chat, and unanswered query counts."))
        .subcommand(Command::new("history").about("Show every user's chat history."))
        .subcommand(Command::new("queries").about("List queries Sahayak could not answer."))
        .subcommand(
            Command::new("respond")
                .about("Answer an unanswered query.")
                .arg(arg_query_id())
                .arg(
                    Arg::new("response")
                        .short('r')
                        .long("response")
                        .num_args(1)
                        .help("Answer text. Prompted for when omitted."),
                ),
        )
        .subcommand(
            Command::new("delete-query")
                .about("Delete an unanswered query.")
                .arg(arg_query_id()),
        )
        .subcommand(Command::new("analytics").about("Show sentiment and trending topics."))
        .subcommand(subcommand_admin_pdfs());
}

fn arg_config(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    let mut help = help.to_string();
    let default = Config::default(key);
    if !default.is_empty() {
        help = format!("{help} [default: {default}]");
    }

    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return format!("CHAT {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("sahayak")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Open the chat panel. This is the default."))
        .subcommand(
            Command::new("login")
                .about("Log in to your Sahayak account.")
                .arg(arg_username()),
        )
        .subcommand(
            Command::new("signup")
                .about("Create a Sahayak account and log in.")
                .arg(arg_username())
                .arg(arg_email()),
        )
        .subcommand(Command::new("logout").about("Log out of your Sahayak account."))
        .subcommand(Command::new("history").about("Print your chat history, grouped by day."))
        .subcommand(subcommand_admin())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("SAHAYAK_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_config(
            ConfigKey::ApiURL,
            "SAHAYAK_API_URL",
            "Base URL of the Sahayak backend API.",
        ))
        .arg(arg_config(
            ConfigKey::StoreFile,
            "SAHAYAK_STORE_FILE",
            "JSON file holding session tokens and the chat panel size.",
        ))
        .arg(arg_config(
            ConfigKey::RevealMinMs,
            "SAHAYAK_REVEAL_MIN_MS",
            "Shortest delay in milliseconds between revealed characters of an answer.",
        ))
        .arg(arg_config(
            ConfigKey::RevealMaxMs,
            "SAHAYAK_REVEAL_MAX_MS",
            "Longest delay in milliseconds between revealed characters of an answer.",
        ))
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .long(ConfigKey::Username.to_string())
                .env("SAHAYAK_USERNAME")
                .num_args(1)
                .help("Your name displayed above your messages in the chat panel.")
                .global(true),
        );
}

/// Parses the command line and runs any one-shot subcommand. Returns true
/// when the chat panel should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        Some(("login", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            run_login(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("signup", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            run_signup(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("logout", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            accounts().logout().await?;
            println!("You have been logged out.");
            return Ok(false);
        }
        Some(("history", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            run_history().await?;
            return Ok(false);
        }
        Some(("admin", subcmd_matches)) => {
            let mut all_matches = vec![&matches, subcmd_matches];
            if let Some((_, nested)) = subcmd_matches.subcommand() {
                all_matches.push(nested);
            }
            Config::load(all_matches).await?;
            run_admin(subcmd_matches).await?;
            return Ok(false);
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
