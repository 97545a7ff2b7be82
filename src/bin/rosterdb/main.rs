use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

mod cli;
mod util;
mod cmd_status;
mod cmd_get;
mod cmd_put;
mod cmd_del;
mod cmd_week;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — warn (CLI печатает результат сам).
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let path = cli.path;
    match cli.cmd {
        cli::Cmd::Status { json } =>
            cmd_status::exec(path, json),

        cli::Cmd::Get { collection } =>
            cmd_get::exec(path, collection),

        cli::Cmd::Append { collection, json } =>
            cmd_put::exec_append(path, collection, json),

        cli::Cmd::Update { collection, index, json } =>
            cmd_put::exec_update(path, collection, index, json),

        cli::Cmd::Replace { collection, json } =>
            cmd_put::exec_replace(path, collection, json),

        cli::Cmd::Merge { collection, json } =>
            cmd_put::exec_merge(path, collection, json),

        cli::Cmd::Delete { collection, index } =>
            cmd_del::exec_delete(path, collection, index),

        cli::Cmd::Clear { collection } =>
            cmd_del::exec_clear(path, collection),

        cli::Cmd::WeekList { json } =>
            cmd_week::exec_list(path, json),

        cli::Cmd::WeekGet { week, year } =>
            cmd_week::exec_get(path, week, year),

        cli::Cmd::WeekCreate { week, year } =>
            cmd_week::exec_create(path, week, year),

        cli::Cmd::WeekDelete { week, year } =>
            cmd_week::exec_delete(path, week, year),

        cli::Cmd::WeekRestore { week, year } =>
            cmd_week::exec_restore(path, week, year),
    }
}
