use std::path::Path;

use tracing::debug;

use crate::http::{Method, RequestUrl};
use crate::parser::matcher::{self, LineKind};
use crate::parser::types::{ParseError, ParseResult, ParsedFile, ParsedRequest};

/// HTTP 文件解析器
pub struct HttpFileParser;

impl HttpFileParser {
    /// 从文件路径解析
    pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<ParsedFile> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let parsed = Self::parse_content(&content)?;
        Ok(parsed.with_source_path(path.as_ref().to_path_buf()))
    }

    /// 从字符串内容解析
    ///
    /// 逐行处理，不回看；任何请求行 URL 非法都会让整个解析失败。
    pub fn parse_content(content: &str) -> ParseResult<ParsedFile> {
        let mut assembler = BlockAssembler::new();

        for (index, line) in content.lines().enumerate() {
            assembler.feed(line, index + 1)?;
        }

        Ok(assembler.finish())
    }
}

/// 当前请求所处的阶段
#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockState {
    /// 没有可以接收请求头/请求体的请求
    NoRequest,
    /// 刚读到 `###`，后续注释行作为描述
    ReadingNameComment,
    /// 请求行之后，读取请求头
    ReadingHeaders,
    /// 读取请求体；进入后不会再回到请求头阶段
    ReadingBody { buffer: String },
}

/// `###` 之后、请求行之前收集到的名称和描述
#[derive(Debug, Default)]
struct PendingName {
    name: String,
    description: String,
    line_number: usize,
}

/// 逐行组装请求的状态机
struct BlockAssembler {
    file: ParsedFile,
    state: BlockState,
    pending: Option<PendingName>,
}

impl BlockAssembler {
    fn new() -> Self {
        Self {
            file: ParsedFile::new(),
            state: BlockState::NoRequest,
            pending: None,
        }
    }

    fn feed(&mut self, line: &str, line_number: usize) -> ParseResult<()> {
        match matcher::classify(line) {
            LineKind::Blank => self.on_blank(),
            LineKind::RequestName(name) => self.on_request_name(name, line_number),
            LineKind::Comment(text) => self.on_comment(text),
            LineKind::Variable { name, value } => self.on_variable(name, value),
            LineKind::RequestLine { method, url } => {
                self.on_request_line(method, url, line_number)?
            }
            kind @ (LineKind::Header { .. } | LineKind::Other) => {
                self.on_content(line, kind, line_number)
            }
        }
        Ok(())
    }

    fn finish(mut self) -> ParsedFile {
        self.flush_body();
        self.drop_pending_name();
        self.file
    }

    fn on_blank(&mut self) {
        match &mut self.state {
            // 请求头后的第一个空行：进入请求体
            BlockState::ReadingHeaders => {
                self.state = BlockState::ReadingBody {
                    buffer: String::new(),
                };
            }
            BlockState::ReadingBody { buffer } => buffer.push('\n'),
            BlockState::NoRequest | BlockState::ReadingNameComment => {}
        }
    }

    fn on_request_name(&mut self, name: &str, line_number: usize) {
        self.flush_body();
        self.drop_pending_name();

        self.pending = Some(PendingName {
            name: name.to_string(),
            description: String::new(),
            line_number,
        });
        self.state = BlockState::ReadingNameComment;
    }

    fn on_comment(&mut self, text: &str) {
        if self.state != BlockState::ReadingNameComment || text.is_empty() {
            return;
        }
        if let Some(pending) = self.pending.as_mut() {
            if !pending.description.is_empty() {
                pending.description.push('\n');
            }
            pending.description.push_str(text);
        }
    }

    fn on_variable(&mut self, name: &str, value: &str) {
        debug!(variable = name, "global variable defined");
        self.file.global_vars.insert(name, value);

        if self.state == BlockState::ReadingNameComment {
            self.state = BlockState::NoRequest;
        }
    }

    fn on_request_line(&mut self, method: Method, url: &str, line_number: usize) -> ParseResult<()> {
        self.flush_body();

        let url = RequestUrl::parse(url).map_err(|source| ParseError::InvalidUrl {
            line: line_number,
            url: url.trim().to_string(),
            source,
        })?;

        let mut request = ParsedRequest::new(method, url, line_number);
        if let Some(pending) = self.pending.take() {
            request.name = pending.name;
            request.description = pending.description;
        }

        debug!(
            line = line_number,
            method = %request.method,
            url = %request.url,
            "request created"
        );
        self.file.add_request(request);
        self.state = BlockState::ReadingHeaders;
        Ok(())
    }

    /// 请求头、请求体或无法识别的行
    fn on_content(&mut self, line: &str, kind: LineKind<'_>, line_number: usize) {
        match &mut self.state {
            BlockState::ReadingBody { buffer } => {
                if let LineKind::Header { name, .. } = kind {
                    if matcher::is_header_token(name) {
                        debug!(line = line_number, "header-like line treated as body content");
                    }
                }
                buffer.push_str(line);
                buffer.push('\n');
            }
            BlockState::ReadingHeaders => {
                if matcher::starts_json_body(line) {
                    let mut buffer = String::from(line);
                    buffer.push('\n');
                    self.state = BlockState::ReadingBody { buffer };
                } else if let LineKind::Header { name, value } = kind {
                    if let Some(request) = self.file.requests.last_mut() {
                        request.headers.append(name, value);
                    }
                }
            }
            BlockState::ReadingNameComment => self.state = BlockState::NoRequest,
            BlockState::NoRequest => {}
        }
    }

    /// 把累积的请求体写入当前请求；不在请求体阶段时不做任何事
    fn flush_body(&mut self) {
        match std::mem::replace(&mut self.state, BlockState::NoRequest) {
            BlockState::ReadingBody { buffer } => {
                if let Some(request) = self.file.requests.last_mut() {
                    request.body = buffer.trim().to_string();
                }
            }
            other => self.state = other,
        }
    }

    fn drop_pending_name(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(
                line = pending.line_number,
                request_name = %pending.name,
                "request name without request line dropped"
            );
        }
    }
}
