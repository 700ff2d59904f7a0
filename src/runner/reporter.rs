use crate::runner::types::{ExecutionResult, ExecutionSummary};
use crate::utils::{ResponseFormat, ResponseFormatter};
use crate::variable::ResolvedRequest;
use colored::Colorize;

pub struct Reporter {
    verbose: bool,
    formatter: ResponseFormatter,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        let format = if verbose {
            ResponseFormat::Verbose
        } else {
            ResponseFormat::Compact
        };

        Self {
            verbose,
            formatter: ResponseFormatter::new(format),
        }
    }

    /// 打印执行开始
    pub fn print_header(&self, file_path: &str, total: usize) {
        println!(
            "\nRunning {} requests from {}...\n",
            total,
            file_path.bold()
        );
    }

    /// 回显替换变量后的请求
    pub fn print_request(&self, request: &ResolvedRequest) {
        println!(
            "{} {} {}",
            ">".dimmed(),
            request.method.to_string().cyan().bold(),
            request.url
        );
        for (name, value) in request.headers.iter() {
            println!("{} {}: {}", ">".dimmed(), name, value);
        }
        if !request.body.is_empty() {
            println!("{}", ">".dimmed());
            for line in request.body.lines() {
                println!("{} {}", ">".dimmed(), line);
            }
        }
        println!();
    }

    /// 打印单个请求的结果
    pub fn print_result(&self, result: &ExecutionResult) {
        let symbol = if result.success { "✓" } else { "✗" };
        let color = if result.success { "green" } else { "red" };

        let name_part = match &result.name {
            Some(name) => format!(" {} -", name),
            None => String::new(),
        };
        let status_part = match result.status {
            Some(code) => format!(" {}", code),
            None => String::new(),
        };

        println!(
            " {} [{}]{} {} {}{} ({}ms)",
            symbol.color(color),
            result.request_number,
            name_part,
            result.method.cyan(),
            result.url,
            status_part,
            result.duration.as_millis()
        );

        if let Some(response) = &result.response
            && (self.verbose || !result.success)
        {
            for line in self.formatter.format(response).lines() {
                println!("   {}", line);
            }
            println!();
        }

        if let Some(error) = &result.error {
            println!("   {}: {}", "Error".red().bold(), error);
            println!();
        }

        if !result.unresolved.is_empty() {
            println!(
                "   {}: {}",
                "Unresolved".yellow(),
                result
                    .unresolved
                    .iter()
                    .map(|name| format!("{{{{{}}}}}", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    /// 打印完整响应（只执行一个请求时）
    pub fn print_response(&self, result: &ExecutionResult) {
        match (&result.response, &result.error) {
            (Some(response), _) => {
                let formatter = ResponseFormatter::new(ResponseFormat::Verbose);
                println!("{}", formatter.format(response));
            }
            (None, Some(error)) => {
                println!("{}: {}", "Error".red().bold(), error);
            }
            (None, None) => {}
        }
    }

    /// 打印执行摘要
    pub fn print_summary(&self, summary: &ExecutionSummary) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        if summary.failed == 0 {
            println!(
                "  {}: {} passed, {} total",
                "Requests".bold(),
                summary.passed.to_string().green(),
                summary.total
            );
        } else {
            println!(
                "  {}: {} passed, {} failed, {} total",
                "Requests".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.total
            );
        }
        if summary.errors > 0 {
            println!(
                "  {}: {}",
                "Errors".bold(),
                summary.errors.to_string().red()
            );
        }

        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_duration.as_secs_f64()
        );
        println!();
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false)
    }
}
