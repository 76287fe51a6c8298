use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollupError {
    InvalidArgument(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
    DateParse(String),
}

impl RollupError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            RollupError::InvalidArgument(_) => "E001",
            RollupError::Config(_) => "E002",
            RollupError::FileOperation(_) => "E003",
            RollupError::Serialization(_) => "E004",
            RollupError::DateParse(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            RollupError::InvalidArgument(_) => "Invalid Argument",
            RollupError::Config(_) => "Configuration Error",
            RollupError::FileOperation(_) => "File Operation Error",
            RollupError::Serialization(_) => "Serialization Error",
            RollupError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            RollupError::InvalidArgument(msg) => msg,
            RollupError::Config(msg) => msg,
            RollupError::FileOperation(msg) => msg,
            RollupError::Serialization(msg) => msg,
            RollupError::DateParse(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RollupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RollupError {}

// 便捷的构造函数
impl RollupError {
    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        RollupError::InvalidArgument(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        RollupError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        RollupError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RollupError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        RollupError::DateParse(msg.into())
    }
}

impl From<std::io::Error> for RollupError {
    fn from(err: std::io::Error) -> Self {
        RollupError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for RollupError {
    fn from(err: serde_json::Error) -> Self {
        RollupError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for RollupError {
    fn from(err: csv::Error) -> Self {
        RollupError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for RollupError {
    fn from(err: config::ConfigError) -> Self {
        RollupError::Config(err.to_string())
    }
}

impl From<chrono::ParseError> for RollupError {
    fn from(err: chrono::ParseError) -> Self {
        RollupError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RollupError>;
