use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use tracing::{info, warn};

use jhttp::http::Client;
use jhttp::parser::{self, ParsedFile};
use jhttp::runner::{ExecutionResult, ExecutionSummary, Reporter, RequestExecutor};
use jhttp::variable::{ConfigLoader, EnvFileLocation, VariableContext};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// 执行 .http 文件中的 HTTP 请求
#[derive(Parser, Debug)]
#[command(name = "jhttp", author, version, about, long_about = None)]
pub struct Cli {
    /// .http 文件路径
    pub file: PathBuf,

    /// 环境变量文件路径
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// 使用的环境名称（未指定 --env-file 时自动查找环境文件）
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// 只执行指定名称的请求
    #[arg(long, value_name = "NAME")]
    pub request: Option<String>,

    /// 把第一个响应体写入文件
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// 请求超时（秒）
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// 输出详细信息
    #[arg(short, long)]
    pub verbose: bool,

    /// 列出文件中的所有请求
    #[arg(long)]
    pub list: bool,
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let mut file = parser::parse_file(&cli.file)
        .with_context(|| format!("解析文件 '{}' 失败", cli.file.display()))?;

    if cli.list {
        println!("{}", request_table(&file));
        return Ok(ExitCode::SUCCESS);
    }

    let env = cli.env.as_deref().unwrap_or_default();
    if let Some(scope) = load_environment(&cli)? {
        file.merge_environment(env, scope);
    }

    let client = Client::with_timeout(Duration::from_secs(cli.timeout))?;
    let mut executor = RequestExecutor::new(client);
    if cli.verbose {
        let echo = Reporter::new(true);
        executor = executor.on_resolved(move |request| echo.print_request(request));
    }

    let results = executor
        .execute_file(&file, cli.request.as_deref(), env)
        .await?;

    let reporter = Reporter::new(cli.verbose);
    match (&cli.request, results.first()) {
        (Some(_), Some(result)) => reporter.print_response(result),
        _ => {
            reporter.print_header(&cli.file.display().to_string(), results.len());
            for result in &results {
                reporter.print_result(result);
            }
        }
    }

    let summary = ExecutionSummary::from_results(&results);
    if cli.request.is_none() {
        reporter.print_summary(&summary);
    }

    if let Some(path) = &cli.output {
        write_output(path, &results)?;
    }

    if summary.errors > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// 按命令行参数加载环境变量
///
/// `--env-file` 需要和 `--env` 一起使用；只有 `--env` 时在 .http 文件所在目录及上级目录查找。
fn load_environment(cli: &Cli) -> Result<Option<VariableContext>> {
    let Some(env) = cli.env.as_deref() else {
        if let Some(path) = &cli.env_file {
            warn!(path = %path.display(), "--env-file ignored without --env");
        }
        return Ok(None);
    };

    let path = match &cli.env_file {
        Some(path) => path.clone(),
        None => discovered_env_file(env, ConfigLoader::find_env_file(&cli.file))?,
    };

    let scope = ConfigLoader::load_environment(&path, env)
        .with_context(|| format!("加载环境变量文件 '{}' 失败", path.display()))?;
    Ok(Some(scope))
}

fn discovered_env_file(env: &str, location: Option<EnvFileLocation>) -> Result<PathBuf> {
    let Some(location) = location else {
        bail!(
            "未找到环境文件，但指定了环境名称 '{}'。请使用 --env-file 指定，或在 .http 文件所在目录或上级目录放置 http-client.env.json",
            env
        );
    };

    if location.from_parent_dir {
        warn!(
            path = %location.path.display(),
            "using environment file from a parent directory"
        );
    }
    Ok(location.path)
}

/// 把第一个收到的响应体原样写入文件
fn write_output(path: &Path, results: &[ExecutionResult]) -> Result<()> {
    match results.iter().find_map(|r| r.response.as_ref()) {
        Some(response) => {
            std::fs::write(path, &response.body)
                .with_context(|| format!("写入输出文件 '{}' 失败", path.display()))?;
            info!(path = %path.display(), bytes = response.body.len(), "response written");
        }
        None => warn!(path = %path.display(), "no response to write"),
    }
    Ok(())
}

fn request_table(file: &ParsedFile) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Name", "Method", "URL", "Line", "Description"]);

    for (index, request) in file.requests.iter().enumerate() {
        let name = if request.name().is_some() {
            Cell::new(request.display_name()).add_attribute(Attribute::Bold)
        } else {
            Cell::new(request.display_name()).add_attribute(Attribute::Dim)
        };
        table.add_row(vec![
            Cell::new(index + 1),
            name,
            Cell::new(request.method).fg(Color::Cyan),
            Cell::new(&request.url),
            Cell::new(request.line_number),
            Cell::new(&request.description),
        ]);
    }

    table
}
