use crate::http::Response;
use colored::{ColoredString, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Compact,
    Verbose,
}

/// 紧凑模式下直接显示的最大响应体长度
const COMPACT_BODY_LIMIT: usize = 200;

pub struct ResponseFormatter {
    format: ResponseFormat,
    color: bool,
}

impl ResponseFormatter {
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn format(&self, response: &Response) -> String {
        let mut output = vec![self.status_line(response), self.timing(response)];

        match self.format {
            ResponseFormat::Compact => {
                let size = response.body.len();
                if size > COMPACT_BODY_LIMIT {
                    output.push(format!("Body: {} bytes", size));
                } else if size > 0 {
                    output.push(pretty_body(&response.text()));
                }
            }
            ResponseFormat::Verbose => {
                output.push(String::new());
                output.push(self.paint("Headers:", |s| s.blue().bold()));
                for (key, value) in response.headers.iter() {
                    let line = format!("   {}: {}", key, value.to_str().unwrap_or("<invalid utf-8>"));
                    output.push(self.paint(&line, |s| s.blue()));
                }

                if !response.body.is_empty() {
                    output.push(String::new());
                    output.push(self.paint("Body:", |s| s.blue().bold()));
                    output.push(pretty_body(&response.text()));
                }
            }
        }

        output.join("\n")
    }

    fn status_line(&self, response: &Response) -> String {
        let line = format!(
            "HTTP {} {}",
            response.status.code(),
            response.status.reason_phrase()
        );
        let verbose = self.format == ResponseFormat::Verbose;
        self.paint(&line, |s| {
            let colored = if response.is_success() {
                s.green()
            } else if response.is_client_error() || response.is_redirect() {
                s.yellow()
            } else {
                s.red()
            };
            if verbose { colored.bold() } else { colored }
        })
    }

    fn timing(&self, response: &Response) -> String {
        let line = format!("Time: {}ms", response.duration.as_millis());
        self.paint(&line, |s| s.cyan())
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// JSON 响应体格式化输出，其它内容原样返回
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}
