//! Argument validators for the built-in tools.
//!
//! Each validator is a pure function from an untyped JSON value to a typed
//! argument record. Fields are checked in declaration order and the first
//! violation is reported; unknown keys are ignored and `null` counts as absent.
//! Validators never touch the filesystem.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fileops_protocol::ToolError;
use serde_json::{Map, Value};

/// Default `maxResults` for `search_files`.
pub const DEFAULT_MAX_RESULTS: usize = 100;
/// Upper bound accepted for `maxResults`.
pub const MAX_RESULTS_LIMIT: usize = 1000;

/// Content encoding for read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Text, passed through as UTF-8.
    #[default]
    Utf8,
    /// Raw bytes carried as standard base64.
    Base64,
}

impl Encoding {
    /// Values advertised in the input schemas.
    pub const NAMES: [&'static str; 2] = ["utf-8", "base64"];

    /// Parse a wire value; `utf8` is accepted as an alias of `utf-8`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "base64" => Some(Self::Base64),
            _ => None,
        }
    }

    /// Canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Base64 => "base64",
        }
    }
}

/// Validated arguments for `read_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadArgs {
    path: String,
    encoding: Encoding,
}

impl ReadArgs {
    /// Validate raw arguments.
    pub fn parse(args: &Value) -> Result<Self, ToolError> {
        let fields = Fields::of(args)?;
        let path = fields.non_empty_string("path", "Path cannot be empty")?;
        let encoding = fields.encoding("encoding")?;
        Ok(Self { path, encoding })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

/// Validated arguments for `write_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteArgs {
    path: String,
    content: String,
    encoding: Encoding,
    create_directories: bool,
    payload: Vec<u8>,
}

impl WriteArgs {
    /// Validate raw arguments.
    ///
    /// With `base64` encoding the content must decode; that check runs last
    /// since it depends on the resolved encoding.
    pub fn parse(args: &Value) -> Result<Self, ToolError> {
        let fields = Fields::of(args)?;
        let path = fields.non_empty_string("path", "Path cannot be empty")?;
        let content = fields.string("content")?;
        let encoding = fields.encoding("encoding")?;
        let create_directories = fields.boolean("createDirectories", false)?;
        let payload = match encoding {
            Encoding::Utf8 => content.as_bytes().to_vec(),
            Encoding::Base64 => STANDARD.decode(content.as_bytes()).map_err(|err| {
                ToolError::validation(
                    format!("content is not valid base64: {err}"),
                    "content",
                    None,
                )
            })?,
        };
        Ok(Self {
            path,
            content,
            encoding,
            create_directories,
            payload,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Content as supplied by the caller.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn create_directories(&self) -> bool {
        self.create_directories
    }

    /// Bytes that will be written to disk.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Validated arguments for `search_files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    directory: String,
    pattern: String,
    recursive: bool,
    max_results: usize,
}

impl SearchArgs {
    /// Validate raw arguments.
    pub fn parse(args: &Value) -> Result<Self, ToolError> {
        let fields = Fields::of(args)?;
        let directory = fields.non_empty_string("directory", "Directory path cannot be empty")?;
        let pattern = fields.non_empty_string("pattern", "Search pattern cannot be empty")?;
        let recursive = fields.boolean("recursive", true)?;
        let max_results =
            fields.bounded_count("maxResults", DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT)?;
        Ok(Self {
            directory,
            pattern,
            recursive,
            max_results,
        })
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

/// Read-only view over the argument object.
struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    fn of(args: &'a Value) -> Result<Self, ToolError> {
        match args {
            Value::Null => Ok(Self { map: None }),
            Value::Object(map) => Ok(Self { map: Some(map) }),
            other => Err(ToolError::validation(
                "arguments must be an object",
                "arguments",
                Some(other),
            )),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn string(&self, key: &str) -> Result<String, ToolError> {
        let Some(value) = self.get(key) else {
            return Err(ToolError::validation(format!("{key} is required"), key, None));
        };
        value.as_str().map(str::to_string).ok_or_else(|| {
            ToolError::validation(format!("{key} must be a string"), key, Some(value))
        })
    }

    fn non_empty_string(&self, key: &str, empty_message: &str) -> Result<String, ToolError> {
        let value = self.string(key)?;
        if value.is_empty() {
            return Err(ToolError::validation(
                empty_message,
                key,
                Some(&Value::String(value)),
            ));
        }
        Ok(value)
    }

    fn boolean(&self, key: &str, default: bool) -> Result<bool, ToolError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| {
                ToolError::validation(format!("{key} must be a boolean"), key, Some(value))
            }),
        }
    }

    fn encoding(&self, key: &str) -> Result<Encoding, ToolError> {
        let Some(value) = self.get(key) else {
            return Ok(Encoding::default());
        };
        value.as_str().and_then(Encoding::parse).ok_or_else(|| {
            ToolError::validation(
                format!("{key} must be one of: {}", Encoding::NAMES.join(", ")),
                key,
                Some(value),
            )
        })
    }

    /// Integer in `1..=max`, or `default` when absent.
    fn bounded_count(&self, key: &str, default: usize, max: usize) -> Result<usize, ToolError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        let out_of_range = || {
            ToolError::validation(
                format!("{key} must be between 1 and {max}"),
                key,
                Some(value),
            )
        };
        let not_integer =
            || ToolError::validation(format!("{key} must be an integer"), key, Some(value));

        let count = if let Some(count) = value.as_i64() {
            count
        } else if value.is_u64() {
            return Err(out_of_range());
        } else {
            match value.as_f64() {
                Some(float) if float.fract() == 0.0 && float.is_finite() => {
                    if float < 1.0 || float > max as f64 {
                        return Err(out_of_range());
                    }
                    float as i64
                }
                _ => return Err(not_integer()),
            }
        };
        if count < 1 || count > max as i64 {
            return Err(out_of_range());
        }
        Ok(count as usize)
    }
}
