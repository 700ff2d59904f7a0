mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use colored::Colorize;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志系统
    jhttp::logger::init_logger(cli.verbose);

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "错误".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
