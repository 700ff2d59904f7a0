use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::variable::types::{VariableConfig, VariableContext};

/// 环境文件加载错误
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("无法读取环境文件 '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析环境文件 '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("环境 '{0}' 不存在")]
    NotFound(String),
}

/// 找到的环境文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileLocation {
    pub path: PathBuf,
    /// 是否在 .http 文件所在目录的上级目录中找到
    pub from_parent_dir: bool,
}

/// 环境文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 环境文件名，按优先级排列
    pub const ENV_FILE_NAMES: [&'static str; 2] =
        ["http-client.private.env.json", "http-client.env.json"];

    /// 从指定路径加载环境文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<VariableConfig, EnvError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| EnvError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| EnvError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 加载环境文件中的一个环境
    pub fn load_environment<P: AsRef<Path>>(
        path: P,
        env_name: &str,
    ) -> Result<VariableContext, EnvError> {
        let mut config = Self::load_from_path(path.as_ref())?;
        let vars = config
            .environments
            .remove(env_name)
            .ok_or_else(|| EnvError::NotFound(env_name.to_string()))?;

        info!(
            path = %path.as_ref().display(),
            env = env_name,
            count = vars.len(),
            "environment loaded"
        );
        Ok(vars)
    }

    /// 列出环境文件中的所有环境名（已排序）
    pub fn list_environments<P: AsRef<Path>>(path: P) -> Result<Vec<String>, EnvError> {
        Ok(Self::load_from_path(path)?.environment_names())
    }

    /// 查找 .http 文件对应的环境文件
    /// 查找顺序：
    /// 1. .http 文件所在目录
    /// 2. 父目录递归查找，直到根目录
    pub fn find_env_file<P: AsRef<Path>>(http_file: P) -> Option<EnvFileLocation> {
        let start = http_file
            .as_ref()
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        // 相对路径需要先转成绝对路径才能向上查找
        let start = if start.is_relative() {
            fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf())
        } else {
            start.to_path_buf()
        };

        for (depth, dir) in start.ancestors().enumerate() {
            if let Some(path) = Self::env_file_in(dir) {
                debug!(path = %path.display(), depth = depth, "environment file found");
                return Some(EnvFileLocation {
                    path,
                    from_parent_dir: depth > 0,
                });
            }
        }

        None
    }

    fn env_file_in(dir: &Path) -> Option<PathBuf> {
        Self::ENV_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}
